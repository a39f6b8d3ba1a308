//! Ready-made scenes: an engine, a wave library, one composition and the
//! adapters that turn the result into effect parameters.
//!
//! A host that wants motion without assembling the pieces itself calls
//! [`Scene::frame`] once per rendered frame and reads the [`SceneFrame`].

use glam::DVec2;

use crate::composition::{BlendMode, WaveComposition};
use crate::driven::{Angle, WaveDrivenProperty};
use crate::engine::{EngineConfig, WaveEngine};
use crate::noise::NoiseSource;
use crate::wave::{Param, Rect, Wave, WaveId, WaveParams};

fn non_negative(v: f64) -> f64 {
    v.abs()
}

/// Smoothing time constant of the drift scene.
pub const DRIFT_TIME_CONSTANT: f64 = 0.35;

/// Engine phase rate of the drift scene (rotation wobble, ~10 s period).
pub const DRIFT_FREQUENCY: f64 = 0.1;

/// The drift scene's wave library: a slow swell, a ripple and a noisy shimmer, ids `1..=3`.
pub fn drift_layers() -> [Wave; 3] {
    let layer = |id: u32, label: &str, rgb: [f32; 3], params: WaveParams| Wave::new(WaveId(id), params).with_label(label).with_color(rgb);
    [
        layer(1, "swell", [0.9, 0.3, 0.3], WaveParams { frequency: 0.2, amplitude: 1.0, cycles_across: 1.5, ..WaveParams::default() }),
        layer(2, "ripple", [0.3, 0.9, 0.4], WaveParams { frequency: 0.9, amplitude: 0.35, phase_offset: 1.3, cycles_across: 4.0, ..WaveParams::default() }),
        layer(3, "shimmer", [0.3, 0.5, 0.9], WaveParams { frequency: 2.3, amplitude: 0.15, noise: 0.05, cycles_across: 9.0, ..WaveParams::default() }),
    ]
}

/// Everything a frame of the scene produces.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SceneFrame {
    /// Engine elapsed time (seconds since the first tick).
    pub elapsed: f64,
    /// Engine phase accumulator, `[0, 2π)`.
    pub phase: f64,
    /// Raw composition value.
    pub composite: f64,
    pub offset: DVec2,
    pub rotation: Angle,
    /// Always `>= 0`.
    pub blur: f64,
}

/// A single scene instance.
///
/// The composition drives the offset and the blur; the engine's own phase
/// accumulator (its `Frequency` parameter) drives a slow rotation wobble.
pub struct Scene {
    engine: WaveEngine,
    composition: WaveComposition,
    offset: WaveDrivenProperty<DVec2>,
    rotation: WaveDrivenProperty<Angle>,
    blur: WaveDrivenProperty<f64>,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scene")
            .field("engine", &self.engine)
            .field("composition", &self.composition)
            .finish_non_exhaustive()
    }
}

impl Scene {
    /// Wrap an existing engine and composition with the default adapters:
    /// vertical offset `composite · 12`, rotation `sin(phase) · 6°`, blur `|composite| · 2`.
    pub fn new(engine: WaveEngine, composition: WaveComposition) -> Self {
        Self {
            engine,
            composition,
            offset: WaveDrivenProperty::vector_y(12.0, 0.0),
            rotation: WaveDrivenProperty::angle_degrees(6.0, 0.0),
            blur: WaveDrivenProperty::new(2.0, 0.0, non_negative as fn(f64) -> f64),
        }
    }

    /// Default “drift” scene seeded from OS entropy.
    pub fn drift() -> Self {
        Self::build_drift(EngineConfig { smoothing_time_constant: DRIFT_TIME_CONSTANT, noise_seed: None })
    }

    /// Default “drift” scene with a reproducible noise stream.
    pub fn drift_seeded(seed: u64) -> Self {
        Self::build_drift(EngineConfig { smoothing_time_constant: DRIFT_TIME_CONSTANT, noise_seed: Some(seed) })
    }

    fn build_drift(config: EngineConfig) -> Self {
        let mut engine = WaveEngine::with_config(config);
        engine.set_property(Param::Frequency, DRIFT_FREQUENCY);

        let layers = drift_layers();
        let ids = layers.iter().map(Wave::id).collect::<Vec<_>>();
        for wave in layers {
            engine.insert_wave(wave);
        }

        Self::new(engine, WaveComposition::new(ids, BlendMode::Add))
    }

    /// Tweakers (optional use at runtime from a host control UI)
    pub fn set_offset_adapter(&mut self, adapter: WaveDrivenProperty<DVec2>) { self.offset = adapter; }
    pub fn set_rotation_adapter(&mut self, adapter: WaveDrivenProperty<Angle>) { self.rotation = adapter; }
    pub fn set_blur_scale(&mut self, scale: f64) {
        self.blur = self.blur.clone().with_scale(scale);
    }
    pub fn set_blend_mode(&mut self, blend: BlendMode) { self.composition.set_blend_mode(blend); }
    pub fn set_noise_source(&mut self, noise: impl NoiseSource + 'static) { self.engine.set_noise_source(noise); }

    pub fn engine(&self) -> &WaveEngine { &self.engine }
    pub fn engine_mut(&mut self) -> &mut WaveEngine { &mut self.engine }
    pub fn composition(&self) -> &WaveComposition { &self.composition }

    /// Tick the engine to `now` and evaluate every output once.
    pub fn frame(&mut self, now: f64) -> SceneFrame {
        self.engine.tick(now);
        let composite = self.engine.composite(&self.composition);
        SceneFrame {
            elapsed: self.engine.elapsed(),
            phase: self.engine.phase(),
            composite,
            offset: self.offset.evaluate(composite),
            rotation: self.rotation.evaluate(self.engine.sin_phase()),
            blur: self.blur.evaluate(composite),
        }
    }

    /// Composition sampled across `rect` at the current elapsed time (no tick).
    pub fn waveform(&mut self, rect: &Rect, samples: usize) -> Vec<DVec2> {
        self.engine.sample_composition(&self.composition, rect, samples)
    }
}
