//! Per-element views of compound-space components.
//!
//! A [`ComponentElement`] is the restriction of one component of a compound
//! finite element space to a single mesh element (or, for boundary forms, to
//! a single boundary facet element). Integrators only ever query components
//! through this trait; the concrete element types in this module cover the
//! spaces exercised by the tests and demos, while a host framework is free to
//! supply its own implementations.
use crate::allocators::DimAllocator;
use crate::{Real, SmallDim};
use eyre::bail;
use nalgebra::{DMatrixSliceMut, DefaultAllocator, OPoint};
use std::fmt;

mod hdiv;
mod segment;
mod tetrahedron;
mod triangle;

pub use hdiv::*;
pub use segment::*;
pub use tetrahedron::*;
pub use triangle::*;

/// One component of a compound space, restricted to a single element.
///
/// `D` is the reference dimension of the element the component lives on:
/// the spatial dimension for volume elements, one less for boundary facet
/// elements.
///
/// Not every component supports every query: a scalar component provides
/// basis values and gradients, an H(div)-type component provides facet
/// normal traces. Unsupported queries fail with a descriptive error, which
/// surfaces as a configuration mistake (an integrator was pointed at a
/// component of the wrong kind).
pub trait ComponentElement<T, D>: fmt::Debug + Send + Sync
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    /// Number of degrees of freedom of this component on the element.
    fn num_dofs(&self) -> usize;

    /// Polynomial degree of the basis, used to pick quadrature strength.
    fn degree(&self) -> usize;

    /// Scalar basis values at a reference point.
    ///
    /// `result` must have length `num_dofs()`.
    fn populate_basis(&self, result: &mut [T], xi: &OPoint<T, D>) -> eyre::Result<()>;

    /// Reference basis gradients at a reference point, one column per basis
    /// function (a `D x num_dofs()` matrix).
    fn populate_basis_gradients(&self, result: DMatrixSliceMut<T>, xi: &OPoint<T, D>) -> eyre::Result<()> {
        let _ = (result, xi);
        bail!("component element does not provide scalar basis gradients")
    }

    /// Normal-trace values of the basis on the given facet, at a reference
    /// point embedded in the element's reference domain.
    ///
    /// Normal traces are normalized as unit normal flux density: the value
    /// is the physical flux q.n per unit of physical facet measure.
    fn populate_facet_normal_trace(
        &self,
        facet: usize,
        result: &mut [T],
        xi: &OPoint<T, D>,
    ) -> eyre::Result<()> {
        let _ = (facet, result, xi);
        bail!("component element does not provide facet normal traces")
    }
}

pub(crate) fn check_basis_buffer_len(len: usize, num_dofs: usize) -> eyre::Result<()> {
    if len != num_dofs {
        bail!(
            "basis value buffer has length {}, element has {} degrees of freedom",
            len,
            num_dofs
        );
    }
    Ok(())
}
