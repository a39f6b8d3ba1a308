//! Typed outputs driven by a raw wave scalar.
//!
//! [`WaveDrivenProperty`] applies `raw * scale + offset` and maps the result
//! through a pure transform. It keeps no state: the same raw input always
//! yields the same output, so a frame can be replayed from the raw values
//! alone.

use core::fmt::Debug;
use core::marker::PhantomData;

use glam::DVec2;
use wavefield_core::dsp::{finite_or_zero, PI};

/// Plain angle, stored in radians.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct Angle {
    radians: f64,
}

impl Angle {
    #[inline]
    pub fn from_radians(radians: f64) -> Self {
        Self { radians }
    }

    #[inline]
    pub fn from_degrees(degrees: f64) -> Self {
        Self { radians: degrees * (PI / 180.0) }
    }

    #[inline]
    pub fn radians(self) -> f64 {
        self.radians
    }

    #[inline]
    pub fn degrees(self) -> f64 {
        self.radians * (180.0 / PI)
    }
}

/// `evaluate(raw) = transform(raw * scale + offset)`.
///
/// `F` is `Fn`, not `FnMut`: a transform cannot mutate captured state.
pub struct WaveDrivenProperty<T, F = fn(f64) -> T>
where
    F: Fn(f64) -> T,
{
    scale: f64,
    offset: f64,
    transform: F,
    _out: PhantomData<fn(f64) -> T>,
}

impl<T, F: Fn(f64) -> T> WaveDrivenProperty<T, F> {
    /// Non-finite `scale`/`offset` are replaced by `0`.
    pub fn new(scale: f64, offset: f64, transform: F) -> Self {
        Self {
            scale: finite_or_zero(scale),
            offset: finite_or_zero(offset),
            transform,
            _out: PhantomData,
        }
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = finite_or_zero(scale);
        self
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = finite_or_zero(offset);
        self
    }

    /// The affine step alone, before the transform.
    #[inline]
    pub fn affine(&self, raw: f64) -> f64 {
        finite_or_zero(raw * self.scale + self.offset)
    }

    #[inline]
    pub fn evaluate(&self, raw: f64) -> T {
        (self.transform)(self.affine(raw))
    }

    /// Post-compose another pure mapping onto the output.
    pub fn then<U, G>(self, g: G) -> WaveDrivenProperty<U, impl Fn(f64) -> U>
    where
        G: Fn(T) -> U,
    {
        let transform = self.transform;
        WaveDrivenProperty::new(self.scale, self.offset, move |v| g(transform(v)))
    }
}

fn identity(v: f64) -> f64 {
    v
}

fn along_x(v: f64) -> DVec2 {
    DVec2::new(v, 0.0)
}

fn along_y(v: f64) -> DVec2 {
    DVec2::new(0.0, v)
}

impl WaveDrivenProperty<f64> {
    /// Scalar output (opacity, blur radius, ...).
    pub fn scalar(scale: f64, offset: f64) -> Self {
        Self::new(scale, offset, identity)
    }
}

impl WaveDrivenProperty<DVec2> {
    /// Offset vector moving along `x`; `y` stays `0`.
    pub fn vector_x(scale: f64, offset: f64) -> Self {
        Self::new(scale, offset, along_x)
    }

    /// Offset vector moving along `y`; `x` stays `0`.
    pub fn vector_y(scale: f64, offset: f64) -> Self {
        Self::new(scale, offset, along_y)
    }
}

impl WaveDrivenProperty<Angle> {
    /// Rotation; the affine result is read as degrees.
    pub fn angle_degrees(scale: f64, offset: f64) -> Self {
        Self::new(scale, offset, Angle::from_degrees)
    }
}

impl<T, F: Fn(f64) -> T + Clone> Clone for WaveDrivenProperty<T, F> {
    fn clone(&self) -> Self {
        Self {
            scale: self.scale,
            offset: self.offset,
            transform: self.transform.clone(),
            _out: PhantomData,
        }
    }
}

impl<T, F: Fn(f64) -> T> Debug for WaveDrivenProperty<T, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WaveDrivenProperty")
            .field("scale", &self.scale)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}
