//! Coefficient functions and component index resolution.
//!
//! Every DPG integrator is constructed from an ordered list of coefficient
//! arguments. The first two arguments of a paired-space integrator are
//! 1-based component indices into the compound space; the remaining
//! arguments are the physical parameters of the form (diffusivity,
//! impedance, source data, ...).
use crate::{DpgScalar, Real};
use eyre::{bail, eyre};
use num::Complex;
use std::fmt;
use std::sync::Arc;

/// A scalar coefficient of a bilinear or linear form.
///
/// A coefficient is either real- or complex-valued, and either spatially
/// constant or evaluated per quadrature point. Spatial functions receive the
/// physical coordinates of the point as a slice of length `dim_space`.
pub enum Coefficient<T: Real> {
    Constant(T),
    ComplexConstant(Complex<T>),
    Function(Arc<dyn Fn(&[T]) -> T + Send + Sync>),
    ComplexFunction(Arc<dyn Fn(&[T]) -> Complex<T> + Send + Sync>),
}

impl<T: Real> Clone for Coefficient<T> {
    fn clone(&self) -> Self {
        match self {
            Coefficient::Constant(value) => Coefficient::Constant(*value),
            Coefficient::ComplexConstant(value) => Coefficient::ComplexConstant(*value),
            Coefficient::Function(f) => Coefficient::Function(Arc::clone(f)),
            Coefficient::ComplexFunction(f) => Coefficient::ComplexFunction(Arc::clone(f)),
        }
    }
}

impl<T: Real> fmt::Debug for Coefficient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coefficient::Constant(value) => write!(f, "Constant({:?})", value),
            Coefficient::ComplexConstant(value) => write!(f, "ComplexConstant({:?})", value),
            Coefficient::Function(_) => write!(f, "Function(..)"),
            Coefficient::ComplexFunction(_) => write!(f, "ComplexFunction(..)"),
        }
    }
}

impl<T: Real> Coefficient<T> {
    pub fn constant(value: T) -> Self {
        Coefficient::Constant(value)
    }

    pub fn complex_constant(value: Complex<T>) -> Self {
        Coefficient::ComplexConstant(value)
    }

    pub fn from_fn(f: impl Fn(&[T]) -> T + Send + Sync + 'static) -> Self {
        Coefficient::Function(Arc::new(f))
    }

    pub fn from_complex_fn(f: impl Fn(&[T]) -> Complex<T> + Send + Sync + 'static) -> Self {
        Coefficient::ComplexFunction(Arc::new(f))
    }

    /// True if the coefficient is complex-valued.
    ///
    /// A complex physical coefficient breaks Hermitian symmetry of the
    /// element block, so the integrators report `is_symmetric()` from this.
    pub fn is_complex(&self) -> bool {
        matches!(
            self,
            Coefficient::ComplexConstant(_) | Coefficient::ComplexFunction(_)
        )
    }

    /// True if the coefficient does not vary spatially.
    pub fn is_constant(&self) -> bool {
        matches!(
            self,
            Coefficient::Constant(_) | Coefficient::ComplexConstant(_)
        )
    }

    /// Point-independent evaluation of a constant coefficient.
    ///
    /// Complex constants are reduced to their real part, matching the access
    /// mode used for component index arguments.
    pub fn evaluate_const(&self) -> eyre::Result<T> {
        match self {
            Coefficient::Constant(value) => Ok(*value),
            Coefficient::ComplexConstant(value) => Ok(value.re),
            _ => bail!("cannot evaluate a spatially varying coefficient without a point"),
        }
    }

    /// Evaluates the coefficient at physical coordinates `x` in the scalar
    /// field of the assembled system.
    ///
    /// Fails with a descriptive error if a complex-valued coefficient is
    /// used in a real-valued form.
    pub fn evaluate<S>(&self, x: &[T]) -> eyre::Result<S>
    where
        S: DpgScalar<Real = T>,
    {
        match self {
            Coefficient::Constant(value) => Ok(S::from_real(*value)),
            Coefficient::Function(f) => Ok(S::from_real(f(x))),
            Coefficient::ComplexConstant(value) => S::from_complex(*value)
                .ok_or_else(|| eyre!("complex-valued coefficient used in a real-valued form")),
            Coefficient::ComplexFunction(f) => S::from_complex(f(x))
                .ok_or_else(|| eyre!("complex-valued coefficient used in a real-valued form")),
        }
    }
}

/// Resolves a single coefficient argument as a 1-based component index,
/// returning the 0-based index.
///
/// The argument must be a constant whose (real part's) truncation is a
/// positive integer. A spatially varying argument is a caller contract
/// violation and is rejected here rather than producing garbage indices.
pub fn resolve_component_index<T: Real>(coeff: &Coefficient<T>) -> eyre::Result<usize> {
    let value = match coeff {
        Coefficient::Constant(value) => *value,
        Coefficient::ComplexConstant(value) => value.re,
        _ => bail!("component index arguments must be constant coefficients"),
    };
    let value: f64 = value
        .to_subset()
        .ok_or_else(|| eyre!("component index argument does not fit in f64"))?;
    let truncated = value.trunc();
    if truncated < 1.0 {
        bail!(
            "component indices are 1-based, got {} as index argument",
            value
        );
    }
    Ok(truncated as usize - 1)
}

/// Resolves the first two coefficient arguments of a paired-space integrator
/// as 1-based component indices, returning the 0-based pair `(ind1, ind2)`.
pub fn resolve_component_indices<T: Real>(coeffs: &[Coefficient<T>]) -> eyre::Result<(usize, usize)> {
    if coeffs.len() < 2 {
        bail!(
            "paired-space integrators expect at least two coefficient arguments \
             (the component indices), got {}",
            coeffs.len()
        );
    }
    let ind1 = resolve_component_index(&coeffs[0])?;
    let ind2 = resolve_component_index(&coeffs[1])?;
    Ok((ind1, ind2))
}
