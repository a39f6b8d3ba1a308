//! Generic numeric utilities and math helpers for the wave engine.
//!
//! Design goals:
//! - `no_std` ready (guarded by the crate feature `no-std`)
//! - Math backend selection that works in both `std` and `no_std` contexts
//! - Optional `fast-math` sine approximation for the evaluation hot path
//! - Side-effect free helpers that never hand `NaN`/`Inf` back to callers
//!
//! Conventions:
//! - Everything is `f64`; time is in **seconds**, phase in **radians**.
//! - Argument and return domains are documented per function.

#![allow(clippy::excessive_precision)]

use cfg_if::cfg_if;

// ----------------------------- Math backend selection -----------------------------

cfg_if! {
    // libm (C math) in no_std
    if #[cfg(feature = "no-std")] {
        #[inline] fn m_sin(x: f64) -> f64 { libm::sin(x) }
        #[inline] fn m_cos(x: f64) -> f64 { libm::cos(x) }
        #[inline] fn m_exp(x: f64) -> f64 { libm::exp(x) }
        #[inline] fn m_abs(x: f64) -> f64 { libm::fabs(x) }
    // std backend
    } else {
        #[inline] fn m_sin(x: f64) -> f64 { x.sin() }
        #[inline] fn m_cos(x: f64) -> f64 { x.cos() }
        #[inline] fn m_exp(x: f64) -> f64 { x.exp() }
        #[inline] fn m_abs(x: f64) -> f64 { x.abs() }
    }
}

// --------------------------------- Constants -------------------------------------

/// π
pub const PI: f64 = core::f64::consts::PI;

/// 2π (one full turn in radians)
pub const TAU: f64 = 2.0 * PI;

/// Smallest time constant (seconds) the exponential step divides by.
pub const EPS_TIME: f64 = 1.0e-9;

// --------------------------------- Utilities -------------------------------------

#[inline]
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    if x < lo { lo } else if x > hi { hi } else { x }
}

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[inline]
pub fn abs(x: f64) -> f64 {
    m_abs(x)
}

#[inline]
pub fn exp(x: f64) -> f64 {
    m_exp(x)
}

#[inline]
pub fn cos(x: f64) -> f64 {
    m_cos(x)
}

/// Replace `NaN`/`±Inf` with `0.0`; finite values pass through untouched.
#[inline]
pub fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() { x } else { 0.0 }
}

/// Wrap an angle into `[0, 2π)`.
///
/// Negative inputs get `2π` added after the first remainder so the second
/// remainder only ever sees a non-negative operand. Non-finite input maps to `0`.
#[inline]
pub fn wrap_tau(x: f64) -> f64 {
    if !x.is_finite() {
        return 0.0;
    }
    let mut r = x % TAU;
    if r < 0.0 {
        r = (r + TAU) % TAU;
    }
    // `-tiny + TAU` can round up to exactly TAU
    if r >= TAU { 0.0 } else { r }
}

// --------------------------------- Exponential smoothing -------------------------

/// Blend factor of a one-pole lag after `dt` seconds with time constant `tau`.
///
/// `alpha = 1 - exp(-dt / tau)`, clamped to `[0, 1]`. A non-positive `tau`
/// yields `1.0` (snap). A negative or non-finite `dt` yields `0.0` (hold).
/// After exactly one time constant the lag has covered ~63% (1 - 1/e) of the gap.
#[inline]
pub fn one_pole_alpha(dt: f64, tau: f64) -> f64 {
    if tau.is_nan() || tau <= 0.0 {
        return 1.0;
    }
    if !dt.is_finite() || dt <= 0.0 {
        return 0.0;
    }
    clamp(1.0 - m_exp(-dt / tau), 0.0, 1.0)
}

// --------------------------------- Trig ------------------------------------------

/// Taylor coefficients of `sin` (odd powers 1..15), evaluated with Horner on `x²`.
#[cfg(feature = "fast-math")]
const SIN_COEFFS: [f64; 8] = [
    1.0,
    -1.0 / 6.0,
    1.0 / 120.0,
    -1.0 / 5_040.0,
    1.0 / 362_880.0,
    -1.0 / 39_916_800.0,
    1.0 / 6_227_020_800.0,
    -1.0 / 1_307_674_368_000.0,
];

/// Sine used by every wave evaluation.
///
/// With `fast-math` the argument is reduced into `[-π, π]`, folded into
/// `[-π/2, π/2]` through `sin(x) = sin(π - x)` and fed to a 15th-order odd
/// polynomial (max abs error below 1e-11 over the full turn); otherwise the
/// exact backend sine is used.
#[inline]
pub fn sin(x: f64) -> f64 {
    cfg_if! {
        if #[cfg(feature = "fast-math")] {
            let mut xr = wrap_tau(x);
            if xr > PI {
                xr -= TAU;
            }
            if xr > 0.5 * PI {
                xr = PI - xr;
            } else if xr < -0.5 * PI {
                xr = -PI - xr;
            }
            let x2 = xr * xr;
            xr * SIN_COEFFS.iter().rev().fold(0.0, |acc, &c| c + x2 * acc)
        } else {
            m_sin(x)
        }
    }
}

// --------------------------------- Tests (std only) ------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_tau_stays_in_range() {
        let values = [-10.0 * TAU, -TAU, -PI, -1.0e-18, -0.1, 0.0, PI, TAU, 3.5 * TAU, 1.0e9];
        for v in values {
            let w = wrap_tau(v);
            assert!((0.0..TAU).contains(&w), "wrap_tau({v}) = {w}");
        }
    }

    #[test]
    fn wrap_tau_handles_negative_angles() {
        let w = wrap_tau(-0.5 * PI);
        assert!((w - 1.5 * PI).abs() < 1e-12, "w={w}");
    }

    #[test]
    fn wrap_tau_rejects_non_finite() {
        assert_eq!(wrap_tau(f64::NAN), 0.0);
        assert_eq!(wrap_tau(f64::INFINITY), 0.0);
    }

    #[test]
    fn alpha_edges() {
        assert_eq!(one_pole_alpha(0.5, 0.0), 1.0);
        assert_eq!(one_pole_alpha(0.5, -1.0), 1.0);
        assert_eq!(one_pole_alpha(-0.5, 1.0), 0.0);
        assert_eq!(one_pole_alpha(0.0, 1.0), 0.0);
        let a = one_pole_alpha(1.0, 1.0);
        assert!((a - (1.0 - (-1.0f64).exp())).abs() < 1e-12, "a={a}");
        let big = one_pole_alpha(1.0e6, 1.0);
        assert!(big <= 1.0 && big > 0.999, "big={big}");
    }

    #[test]
    fn finite_guard() {
        assert_eq!(finite_or_zero(f64::NAN), 0.0);
        assert_eq!(finite_or_zero(f64::NEG_INFINITY), 0.0);
        assert_eq!(finite_or_zero(-2.5), -2.5);
    }

    #[test]
    fn sine_matches_quarter_turn() {
        assert!((sin(0.5 * PI) - 1.0).abs() < 1e-9);
        assert!(sin(0.0).abs() < 1e-12);
        assert!(sin(PI).abs() < 1e-9);
    }

    #[cfg(feature = "fast-math")]
    #[test]
    fn fast_sine_error_bound_over_two_turns() {
        let mut worst = 0.0_f64;
        let mut at = 0.0;
        for i in 0..=20_000 {
            let x = -TAU + i as f64 * (2.0 * TAU / 20_000.0);
            let err = (sin(x) - x.sin()).abs();
            if err > worst {
                worst = err;
                at = x;
            }
        }
        assert!(worst < 1e-11, "worst={worst} at x={at}");
    }
}
