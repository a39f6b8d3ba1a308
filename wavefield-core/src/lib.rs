#![cfg_attr(not(feature = "std"), no_std)]
//! Wavefield Core: no_std-ready numeric primitives for the wave signal engine.
//!
//! Features
//! - `std`      : (default) use the Rust standard library
//! - `no-std`   : build with `#![no_std]` and use the `libm` math backend
//! - `fast-math`: polynomial sine on the wave evaluation path
//!
//! Modules
//! - [`dsp`]       : math backend, phase wrapping, one-pole blend factor, finite guards
//! - [`smoothing`] : [`SmoothedProperty`](smoothing::SmoothedProperty), the target/displayed pair
//!
//! Design
//! - No heap allocations; plain `Copy` state
//! - Nothing here can fail: bad numeric input is clamped or defaulted

pub mod dsp;
pub mod smoothing;

/// Commonly used types/functions for convenience:
pub mod prelude {
    pub use crate::dsp::{clamp, finite_or_zero, lerp, one_pole_alpha, wrap_tau, EPS_TIME, PI, TAU};
    pub use crate::smoothing::SmoothedProperty;
}
