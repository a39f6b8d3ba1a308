//! Wavefield Engine: oscillators, compositions, the per-frame driver and typed adapters.
//!
//! Crate layout:
//! - [`wave`]        : `Wave` oscillator, `WaveParams`, `Param`, `Rect`
//! - [`noise`]       : `NoiseSource` trait plus seeded/zero/fixed-sequence sources
//! - [`composition`] : `WaveComposition` and its `BlendMode`s
//! - [`engine`]      : `WaveEngine` tick driver, parameter bag and bindings
//! - [`driven`]      : `WaveDrivenProperty` scalar → typed output adapters
//! - [`scenes`]      : ready-made scenes wiring the pieces together
//!
//! The engine is single-threaded and tick-driven: call `tick(now)` once per
//! frame, then evaluate. Nothing here returns an error; bad numeric input is
//! clamped and no `NaN`/`Inf` reaches the caller.

pub mod composition;
pub mod driven;
pub mod engine;
pub mod noise;
pub mod scenes;
pub mod wave;

// Re-export some commonly used items to make downstream imports ergonomic.
pub use composition::{BlendMode, WaveComposition};
pub use driven::{Angle, WaveDrivenProperty};
pub use engine::{EngineConfig, ParamKey, PropertyBinding, WaveEngine, MIN_TIME_CONSTANT};
pub use noise::{NoiseSource, SequenceNoise, StdNoise, ZeroNoise};
pub use scenes::{Scene, SceneFrame};
pub use wave::{Param, Rect, Wave, WaveId, WaveParams};
pub use wavefield_core::smoothing::SmoothedProperty;

/// Point type returned by the sampling helpers.
pub use glam::DVec2;
