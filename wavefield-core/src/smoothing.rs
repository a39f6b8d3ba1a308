//! Exponential parameter smoothing.
//!
//! A [`SmoothedProperty`] holds the value a caller *wants* (`target`) and the
//! value currently in effect (`displayed`). Every update moves `displayed` a
//! fraction of the way toward `target`:
//!
//! ```text
//! alpha     = 1 - exp(-dt / tau)
//! displayed = displayed + (target - displayed) * alpha
//! ```
//!
//! which is a one-pole lag: after one time constant ~63% of any step has been
//! covered, after five ~99%. No velocity state is kept.

use crate::dsp::{finite_or_zero, lerp, one_pole_alpha};

/// One-pole smoothed scalar: `target` is written by callers, `displayed` only by [`update`](Self::update).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SmoothedProperty {
    target: f64,
    displayed: f64,
}

impl SmoothedProperty {
    /// Both `target` and `displayed` start at `initial`, so creation never jumps.
    /// A non-finite `initial` is replaced by `0.0`.
    #[inline]
    pub fn new(initial: f64) -> Self {
        let v = finite_or_zero(initial);
        Self { target: v, displayed: v }
    }

    #[inline]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    pub fn displayed(&self) -> f64 {
        self.displayed
    }

    /// Assign a new target. `displayed` is left alone until the next update.
    ///
    /// Non-finite values are discarded and the previous target is kept.
    #[inline]
    pub fn set_target(&mut self, v: f64) {
        if v.is_finite() {
            self.target = v;
        } else {
            log::warn!("discarding non-finite smoothing target {v}");
        }
    }

    /// Advance `displayed` toward `target` over `dt` seconds.
    ///
    /// - `time_constant <= 0` snaps to the target.
    /// - `dt <= 0` (clock regression or a repeated timestamp) is a no-op.
    #[inline]
    pub fn update(&mut self, dt: f64, time_constant: f64) {
        let alpha = one_pole_alpha(dt, time_constant);
        if alpha >= 1.0 {
            self.displayed = self.target;
        } else if alpha > 0.0 {
            self.displayed = lerp(self.displayed, self.target, alpha);
        }
    }

    /// Jump `displayed` straight to `target`.
    #[inline]
    pub fn snap(&mut self) {
        self.displayed = self.target;
    }

    /// Set both fields at once (no smoothing, no pending change).
    #[inline]
    pub fn reset(&mut self, v: f64) {
        let v = finite_or_zero(v);
        self.target = v;
        self.displayed = v;
    }

    /// `true` while `displayed` is still further than `epsilon` from `target`.
    #[inline]
    pub fn is_settling(&self, epsilon: f64) -> bool {
        crate::dsp::abs(self.target - self.displayed) > epsilon
    }
}

impl Default for SmoothedProperty {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl From<f64> for SmoothedProperty {
    fn from(v: f64) -> Self {
        Self::new(v)
    }
}

// ------------------------------------ Tests --------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_has_no_pending_change() {
        let p = SmoothedProperty::new(3.5);
        assert_eq!(p.target(), p.displayed());
        assert!(!p.is_settling(0.0));
    }

    #[test]
    fn set_target_leaves_displayed() {
        let mut p = SmoothedProperty::new(0.0);
        p.set_target(100.0);
        assert_eq!(p.target(), 100.0);
        assert_eq!(p.displayed(), 0.0);
    }

    #[test]
    fn one_time_constant_covers_63_percent() {
        let mut p = SmoothedProperty::new(0.0);
        p.set_target(100.0);
        p.update(1.0, 1.0);
        let expected = 100.0 * (1.0 - (-1.0f64).exp());
        assert!((p.displayed() - expected).abs() < 1e-9, "v={}", p.displayed());
        assert!((p.displayed() - 63.21).abs() < 0.01);
    }

    #[test]
    fn non_positive_time_constant_snaps() {
        for tc in [0.0, -1.0] {
            let mut p = SmoothedProperty::new(0.0);
            p.set_target(7.0);
            p.update(0.01, tc);
            assert_eq!(p.displayed(), 7.0);
        }
    }

    #[test]
    fn negative_dt_is_a_no_op() {
        let mut p = SmoothedProperty::new(1.0);
        p.set_target(2.0);
        p.update(-0.5, 0.1);
        assert_eq!(p.displayed(), 1.0);
    }

    #[test]
    fn converges_monotonically() {
        let mut p = SmoothedProperty::new(-4.0);
        p.set_target(12.0);
        let mut gap = (p.target() - p.displayed()).abs();
        // ~8.4 s of frames, about 28 time constants
        for i in 0..1200 {
            let dt = 0.004 + (i % 3) as f64 * 0.003;
            p.update(dt, 0.3);
            let g = (p.target() - p.displayed()).abs();
            assert!(g <= gap, "gap grew at step {i}: {g} > {gap}");
            gap = g;
        }
        assert!(gap < 1e-6, "gap={gap}");
    }

    #[test]
    fn non_finite_target_is_ignored() {
        let mut p = SmoothedProperty::new(1.0);
        p.set_target(f64::NAN);
        p.set_target(f64::INFINITY);
        assert_eq!(p.target(), 1.0);
        p.update(1.0, 0.1);
        assert!(p.displayed().is_finite());
    }
}
