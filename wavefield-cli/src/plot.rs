//! Terminal waveform plot for sampled `(x, value)` points.

use wavefield_engine::DVec2;

const TRACE: char = '*';
const AXIS: char = '-';

/// Render `points` into a `width × height` character grid.
///
/// The vertical scale is symmetric around zero and fits the largest `|value|`;
/// the zero line is drawn with `-`. Columns pick the nearest sample, so any
/// number of points maps onto any width.
pub fn render(points: &[DVec2], width: usize, height: usize) -> String {
    let width = width.max(2);
    let height = height.max(3);
    let mut grid = vec![vec![' '; width]; height];

    let peak = points
        .iter()
        .map(|p| p.y.abs())
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let peak = if peak > 0.0 { peak } else { 1.0 };
    let last_row = (height - 1) as f64;
    let row_of = |v: f64| -> usize {
        let v = if v.is_finite() { v.clamp(-peak, peak) } else { 0.0 };
        ((peak - v) / (2.0 * peak) * last_row).round() as usize
    };

    let mid = row_of(0.0);
    grid[mid].iter_mut().for_each(|c| *c = AXIS);

    if !points.is_empty() {
        let last_point = (points.len() - 1) as f64;
        for col in 0..width {
            let idx = (col as f64 / (width - 1) as f64 * last_point).round() as usize;
            let row = row_of(points[idx.min(points.len() - 1)].y);
            grid[row.min(height - 1)][col] = TRACE;
        }
    }

    let mut out = String::with_capacity((width + 12) * height);
    for (r, line) in grid.iter().enumerate() {
        let label = peak - 2.0 * peak * r as f64 / last_row;
        out.push_str(&format!("{label:>+8.3} |"));
        out.extend(line.iter());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_signal_sits_on_the_axis() {
        let pts: Vec<DVec2> = (0..10).map(|i| DVec2::new(i as f64, 0.0)).collect();
        let out = render(&pts, 20, 5);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[2].ends_with(&"*".repeat(20)));
        assert!(!lines[0].contains('*'));
    }

    #[test]
    fn extremes_hit_top_and_bottom_rows() {
        let pts = [DVec2::new(0.0, 2.0), DVec2::new(1.0, -2.0)];
        let out = render(&pts, 2, 5);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].ends_with("* "));
        assert!(lines[4].ends_with(" *"));
        assert!(lines[0].starts_with("  +2.000"));
    }

    #[test]
    fn empty_input_draws_only_the_axis() {
        let out = render(&[], 8, 3);
        let cells: String = out.lines().filter_map(|l| l.split_once('|')).map(|(_, g)| g).collect();
        assert_eq!(cells.matches(TRACE).count(), 0);
        assert_eq!(cells.matches(AXIS).count(), 8);
    }
}
