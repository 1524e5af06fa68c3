//! Element-local integrators for DPG bilinear and linear forms.
//!
//! Every paired-component integrator is constructed from a spatial dimension
//! and an ordered list of coefficient arguments. The first two arguments are
//! 1-based component indices into the compound space (trial and test, in that
//! order); the remaining arguments are the physical coefficients of the form.
//! Construction resolves the indices once and validates the argument list, so
//! an integrator is immutable afterwards and can be shared read-only across
//! an assembly thread pool.
//!
//! Element blocks are always sized for the *full* compound element: the
//! nonzero sub-block has rows belonging to the test component and columns to
//! the trial component, so the host can add the block to the global system
//! without further index translation.
use crate::allocators::DimAllocator;
use crate::assembly::buffers::{BasisFunctionBuffer, QuadratureBuffer};
use crate::coefficient::resolve_component_indices;
use crate::{Coefficient, Real, SmallDim};
use eyre::bail;
use nalgebra::DefaultAllocator;
use serde::{Deserialize, Serialize};

mod boundary;
mod eye_eye;
mod flux_trace;
mod grad_grad;
mod integrator;
mod neumann;
mod robin;
mod trace_trace;

pub use boundary::*;
pub use eye_eye::*;
pub use flux_trace::*;
pub use grad_grad::*;
pub use integrator::*;
pub use neumann::*;
pub use robin::*;
pub use trace_trace::*;

/// The resolved (0-based) component indices of a paired-component form.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentPair {
    ind1: usize,
    ind2: usize,
}

impl ComponentPair {
    /// Resolves the first two coefficient arguments as 1-based component
    /// indices.
    pub fn from_coefficients<T: Real>(coeffs: &[Coefficient<T>]) -> eyre::Result<Self> {
        let (ind1, ind2) = resolve_component_indices(coeffs)?;
        Ok(Self { ind1, ind2 })
    }

    /// The trial component (columns of the element block).
    pub fn trial_component(&self) -> usize {
        self.ind1
    }

    /// The test component (rows of the element block).
    pub fn test_component(&self) -> usize {
        self.ind2
    }
}

/// Whether a form integrates over element interiors or boundary facets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegrationDomain {
    Volume,
    Boundary,
}

pub(crate) fn check_spatial_dim(name: &str, spatial_dim: usize) -> eyre::Result<()> {
    if spatial_dim != 2 && spatial_dim != 3 {
        bail!(
            "{} supports spatial dimensions 2 and 3, got {}",
            name,
            spatial_dim
        );
    }
    Ok(())
}

pub(crate) fn check_coefficient_count(name: &str, expected: usize, actual: usize) -> eyre::Result<()> {
    if actual != expected {
        bail!(
            "{} expects exactly {} coefficient arguments, got {}",
            name,
            expected,
            actual
        );
    }
    Ok(())
}

pub(crate) fn check_assembly_dim(name: &str, expected: usize, actual: usize) -> eyre::Result<()> {
    if actual != expected {
        bail!(
            "{} was constructed for elements of reference dimension {} \
             but is assembled on an element of dimension {}",
            name,
            expected,
            actual
        );
    }
    Ok(())
}

/// Scratch data shared by the volume-form kernels.
#[derive(Debug)]
pub(crate) struct VolumeFormWorkspace<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    pub quadrature: QuadratureBuffer<T, D>,
    pub basis: BasisFunctionBuffer<T>,
}

impl<T, D> Default for VolumeFormWorkspace<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    fn default() -> Self {
        Self {
            quadrature: Default::default(),
            basis: Default::default(),
        }
    }
}

/// Scratch data shared by the boundary-form kernels.
#[derive(Debug)]
pub(crate) struct SurfaceFormWorkspace<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    pub quadrature: QuadratureBuffer<T, D>,
    pub basis: BasisFunctionBuffer<T>,
    pub coords: Vec<T>,
}

impl<T, D> Default for SurfaceFormWorkspace<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    fn default() -> Self {
        Self {
            quadrature: Default::default(),
            basis: Default::default(),
            coords: Vec::new(),
        }
    }
}
