//! The scalar field of an assembled system.
use crate::Real;
use nalgebra::{ClosedAdd, ClosedMul, ClosedSub, Scalar};
use num::{Complex, One, Zero};

/// The scalar type of an element-local matrix or vector.
///
/// A DPG problem is assembled either over the reals or over the complex
/// numbers, while geometry and quadrature always stay real. Every numerical
/// kernel in this crate is written once, generic over `DpgScalar`, and serves
/// both cases; this replaces a pair of near-identical real/complex kernels
/// per integrator.
pub trait DpgScalar: Scalar + Copy + Zero + One + ClosedAdd + ClosedSub + ClosedMul {
    /// The associated real scalar used for geometry and quadrature weights.
    type Real: Real;

    /// Embeds a real value into this scalar field.
    fn from_real(value: Self::Real) -> Self;

    /// Converts a complex value into this scalar field.
    ///
    /// Returns `None` for real scalar types: a complex coefficient cannot
    /// participate in a real-valued form.
    fn from_complex(value: Complex<Self::Real>) -> Option<Self>;

    /// True if this scalar type carries an imaginary part.
    fn is_complex() -> bool;
}

impl DpgScalar for f64 {
    type Real = f64;

    #[inline]
    fn from_real(value: f64) -> Self {
        value
    }

    #[inline]
    fn from_complex(_value: Complex<f64>) -> Option<Self> {
        None
    }

    fn is_complex() -> bool {
        false
    }
}

impl DpgScalar for f32 {
    type Real = f32;

    #[inline]
    fn from_real(value: f32) -> Self {
        value
    }

    #[inline]
    fn from_complex(_value: Complex<f32>) -> Option<Self> {
        None
    }

    fn is_complex() -> bool {
        false
    }
}

impl DpgScalar for Complex<f64> {
    type Real = f64;

    #[inline]
    fn from_real(value: f64) -> Self {
        Complex::new(value, 0.0)
    }

    #[inline]
    fn from_complex(value: Complex<f64>) -> Option<Self> {
        Some(value)
    }

    fn is_complex() -> bool {
        true
    }
}

impl DpgScalar for Complex<f32> {
    type Real = f32;

    #[inline]
    fn from_real(value: f32) -> Self {
        Complex::new(value, 0.0)
    }

    #[inline]
    fn from_complex(value: Complex<f32>) -> Option<Self> {
        Some(value)
    }

    fn is_complex() -> bool {
        true
    }
}
