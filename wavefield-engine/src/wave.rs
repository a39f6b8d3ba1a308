//! The single oscillator and its parameter set.
//!
//! A [`Wave`] is a smoothed sine: frequency (Hz), amplitude, phase offset
//! (radians) and noise amount each live in a
//! [`SmoothedProperty`](wavefield_core::smoothing::SmoothedProperty), so a
//! slider jump ramps in rather than snapping. `cycles_across` sets how many
//! periods fit across a drawing rectangle and only matters for
//! [`Wave::value_at`].
//!
//! Evaluation is a pure function of the displayed parameters plus at most one
//! draw from the caller's [`NoiseSource`].

use wavefield_core::dsp::{finite_or_zero, sin, TAU};
use wavefield_core::smoothing::SmoothedProperty;

use crate::noise::NoiseSource;

/// Stable identity of a wave inside a library.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WaveId(pub u32);

impl core::fmt::Display for WaveId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "wave#{}", self.0)
    }
}

/// Parameters a host can write. `CyclesAcross` is a plain value, the rest are smoothed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Param {
    Frequency,
    Amplitude,
    PhaseOffset,
    Noise,
    CyclesAcross,
}

impl Param {
    pub const ALL: [Param; 5] = [
        Param::Frequency,
        Param::Amplitude,
        Param::PhaseOffset,
        Param::Noise,
        Param::CyclesAcross,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Param::Frequency => "frequency",
            Param::Amplitude => "amplitude",
            Param::PhaseOffset => "phase_offset",
            Param::Noise => "noise",
            Param::CyclesAcross => "cycles_across",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// Axis-aligned drawing area a wave is spread across.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(min_x: f64, min_y: f64, width: f64, height: f64) -> Self {
        Self { min_x, min_y, width, height }
    }

    /// Rect anchored at the origin.
    pub fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.min_x + self.width
    }

    #[inline]
    pub fn mid_y(&self) -> f64 {
        self.min_y + 0.5 * self.height
    }

    /// `n` evenly spaced x positions from `min_x` to `max_x` inclusive.
    /// A non-positive width collapses every position onto `min_x`.
    pub fn sample_xs(&self, n: usize) -> impl Iterator<Item = f64> + '_ {
        let span = if self.width > 0.0 { self.width } else { 0.0 };
        let step = if n > 1 { span / (n - 1) as f64 } else { 0.0 };
        (0..n).map(move |i| self.min_x + step * i as f64)
    }
}

/// Initial values for a new [`Wave`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WaveParams {
    pub frequency: f64,
    pub amplitude: f64,
    pub phase_offset: f64,
    pub noise: f64,
    pub cycles_across: f64,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            frequency: 1.0,
            amplitude: 1.0,
            phase_offset: 0.0,
            noise: 0.0,
            cycles_across: 1.0,
        }
    }
}

/// One smoothed sine oscillator.
#[derive(Clone, Debug)]
pub struct Wave {
    id: WaveId,
    /// Display tag; the engine never reads it.
    pub label: String,
    /// Display tag (linear RGB); the engine never reads it.
    pub color: [f32; 3],
    frequency: SmoothedProperty,
    amplitude: SmoothedProperty,
    phase_offset: SmoothedProperty,
    noise: SmoothedProperty,
    cycles_across: f64,
}

impl Wave {
    pub fn new(id: WaveId, params: WaveParams) -> Self {
        Self {
            id,
            label: String::new(),
            color: [1.0, 1.0, 1.0],
            frequency: SmoothedProperty::new(params.frequency),
            amplitude: SmoothedProperty::new(params.amplitude),
            phase_offset: SmoothedProperty::new(params.phase_offset),
            noise: SmoothedProperty::new(params.noise),
            cycles_across: finite_or_zero(params.cycles_across),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_color(mut self, rgb: [f32; 3]) -> Self {
        self.color = rgb;
        self
    }

    #[inline] pub fn id(&self) -> WaveId { self.id }
    #[inline] pub fn frequency(&self) -> &SmoothedProperty { &self.frequency }
    #[inline] pub fn amplitude(&self) -> &SmoothedProperty { &self.amplitude }
    #[inline] pub fn phase_offset(&self) -> &SmoothedProperty { &self.phase_offset }
    #[inline] pub fn noise(&self) -> &SmoothedProperty { &self.noise }
    #[inline] pub fn cycles_across(&self) -> f64 { self.cycles_across }

    #[inline] pub fn set_frequency(&mut self, hz: f64) { self.frequency.set_target(hz); }
    #[inline] pub fn set_amplitude(&mut self, a: f64) { self.amplitude.set_target(a); }
    #[inline] pub fn set_phase_offset(&mut self, rad: f64) { self.phase_offset.set_target(rad); }
    #[inline] pub fn set_noise(&mut self, n: f64) { self.noise.set_target(n); }

    /// Not smoothed: takes effect on the next evaluation. Non-finite values are ignored.
    #[inline]
    pub fn set_cycles_across(&mut self, cycles: f64) {
        if cycles.is_finite() {
            self.cycles_across = cycles;
        }
    }

    /// Write the target of `param` (the plain value for `CyclesAcross`).
    pub fn set_target(&mut self, param: Param, v: f64) {
        match param {
            Param::Frequency => self.set_frequency(v),
            Param::Amplitude => self.set_amplitude(v),
            Param::PhaseOffset => self.set_phase_offset(v),
            Param::Noise => self.set_noise(v),
            Param::CyclesAcross => self.set_cycles_across(v),
        }
    }

    pub fn target(&self, param: Param) -> f64 {
        match self.property(param) {
            Some(p) => p.target(),
            None => self.cycles_across,
        }
    }

    pub fn displayed(&self, param: Param) -> f64 {
        match self.property(param) {
            Some(p) => p.displayed(),
            None => self.cycles_across,
        }
    }

    fn property(&self, param: Param) -> Option<&SmoothedProperty> {
        match param {
            Param::Frequency => Some(&self.frequency),
            Param::Amplitude => Some(&self.amplitude),
            Param::PhaseOffset => Some(&self.phase_offset),
            Param::Noise => Some(&self.noise),
            Param::CyclesAcross => None,
        }
    }

    fn properties_mut(&mut self) -> [&mut SmoothedProperty; 4] {
        [
            &mut self.frequency,
            &mut self.amplitude,
            &mut self.phase_offset,
            &mut self.noise,
        ]
    }

    /// Advance all four smoothed parameters with one shared `dt`/time constant.
    #[inline]
    pub fn update(&mut self, dt: f64, smoothing: f64) {
        for p in self.properties_mut() {
            p.update(dt, smoothing);
        }
    }

    /// Jump every smoothed parameter to its target.
    #[inline]
    pub fn snap(&mut self) {
        for p in self.properties_mut() {
            p.snap();
        }
    }

    /// Temporal phase (radians, unwrapped) at `elapsed` seconds.
    #[inline]
    pub fn temporal_phase(&self, elapsed: f64) -> f64 {
        TAU * self.frequency.displayed() * elapsed + self.phase_offset.displayed()
    }

    /// Spatial wavenumber `2π·cycles_across / width`; `0` for a non-positive width.
    #[inline]
    pub fn wavenumber(&self, rect: &Rect) -> f64 {
        if rect.width > 0.0 {
            finite_or_zero(TAU * self.cycles_across / rect.width)
        } else {
            0.0
        }
    }

    /// Noise term added to the raw sine. Exactly `0` with no draw when the noise amount is zero.
    #[inline]
    pub fn noise_contribution(&self, noise: &mut dyn NoiseSource) -> f64 {
        let amount = self.noise.displayed();
        if amount == 0.0 {
            0.0
        } else {
            noise.next_uniform() * amount
        }
    }

    /// Value at `elapsed` seconds: `amplitude · (sin(2π·f·t + φ) + noise)`.
    pub fn value(&self, elapsed: f64, noise: &mut dyn NoiseSource) -> f64 {
        self.shape(self.temporal_phase(elapsed), noise)
    }

    /// Value at horizontal position `x` inside `rect` at `elapsed` seconds.
    ///
    /// The spatial phase `kx · (x - rect.min_x)` is added to the temporal phase
    /// inside the same sine, so the shape travels while it is drawn.
    pub fn value_at(&self, x: f64, rect: &Rect, elapsed: f64, noise: &mut dyn NoiseSource) -> f64 {
        let spatial = self.wavenumber(rect) * (x - rect.min_x);
        self.shape(self.temporal_phase(elapsed) + spatial, noise)
    }

    #[inline]
    fn shape(&self, phase: f64, noise: &mut dyn NoiseSource) -> f64 {
        let noisy = sin(phase) + self.noise_contribution(noise);
        finite_or_zero(self.amplitude.displayed() * noisy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{SequenceNoise, ZeroNoise};

    fn wave(frequency: f64, amplitude: f64) -> Wave {
        Wave::new(
            WaveId(1),
            WaveParams { frequency, amplitude, ..WaveParams::default() },
        )
    }

    #[test]
    fn quarter_period_hits_the_crest() {
        let w = wave(1.0, 10.0);
        let v = w.value(0.25, &mut ZeroNoise);
        assert!((v - 10.0).abs() < 1e-9, "v={v}");
    }

    #[test]
    fn evaluation_is_idempotent_without_noise() {
        let w = Wave::new(
            WaveId(3),
            WaveParams { frequency: 0.7, amplitude: 2.0, phase_offset: 0.3, ..WaveParams::default() },
        );
        let mut seq = SequenceNoise::new(vec![1.0]);
        let a = w.value(1.234, &mut seq);
        let b = w.value(1.234, &mut seq);
        assert_eq!(a, b);
        assert_eq!(seq.draws(), 0, "zero noise must not draw");
    }

    #[test]
    fn noise_draws_and_scales() {
        let w = Wave::new(
            WaveId(2),
            WaveParams { frequency: 0.0, amplitude: 2.0, noise: 0.5, ..WaveParams::default() },
        );
        let mut seq = SequenceNoise::new(vec![1.0, -1.0]);
        // sin(0) = 0, so only the noise term remains
        assert!((w.value(0.0, &mut seq) - 1.0).abs() < 1e-12);
        assert!((w.value(0.0, &mut seq) + 1.0).abs() < 1e-12);
        assert_eq!(seq.draws(), 2);
    }

    #[test]
    fn negative_amplitude_inverts() {
        let up = wave(1.0, 3.0).value(0.25, &mut ZeroNoise);
        let down = wave(1.0, -3.0).value(0.25, &mut ZeroNoise);
        assert!((up + down).abs() < 1e-12);
    }

    #[test]
    fn spatial_term_spreads_cycles_across_width() {
        let mut w = wave(0.0, 1.0);
        w.set_cycles_across(2.0);
        let rect = Rect::new(10.0, 0.0, 100.0, 50.0);
        // a quarter of one cycle is 12.5 units when two cycles span 100
        let v = w.value_at(22.5, &rect, 0.0, &mut ZeroNoise);
        assert!((v - 1.0).abs() < 1e-9, "v={v}");
        let start = w.value_at(rect.min_x, &rect, 0.0, &mut ZeroNoise);
        assert!(start.abs() < 1e-12);
    }

    #[test]
    fn zero_width_rect_drops_spatial_term() {
        let w = wave(1.0, 4.0);
        for width in [0.0, -5.0] {
            let rect = Rect::new(0.0, 0.0, width, 10.0);
            let v = w.value_at(37.0, &rect, 0.25, &mut ZeroNoise);
            assert!((v - w.value(0.25, &mut ZeroNoise)).abs() < 1e-12);
            assert!(v.is_finite());
        }
    }

    #[test]
    fn update_moves_all_four_together() {
        let mut w = wave(1.0, 1.0);
        w.set_frequency(2.0);
        w.set_amplitude(3.0);
        w.set_phase_offset(1.0);
        w.set_noise(0.5);
        w.update(0.1, 0.0);
        for p in [Param::Frequency, Param::Amplitude, Param::PhaseOffset, Param::Noise] {
            assert_eq!(w.displayed(p), w.target(p), "{p:?}");
        }
    }

    #[test]
    fn param_names_roundtrip() {
        for p in Param::ALL {
            assert_eq!(Param::from_name(p.name()), Some(p));
        }
        assert_eq!(Param::from_name("bogus"), None);
    }

    #[test]
    fn sample_xs_covers_rect() {
        let rect = Rect::new(5.0, 0.0, 10.0, 1.0);
        let xs: Vec<f64> = rect.sample_xs(3).collect();
        assert_eq!(xs, vec![5.0, 10.0, 15.0]);
        assert_eq!(rect.sample_xs(0).count(), 0);
    }
}
