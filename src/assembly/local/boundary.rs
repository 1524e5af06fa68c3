//! Bilinear forms assembled directly on boundary facet elements.
//!
//! Unlike the facet-restricted volume forms, these forms are invoked by the
//! host once per *boundary facet element*: the compound element handed to
//! them lives on the facet itself, of reference dimension one less than the
//! ambient space. Flux components appear here through their boundary
//! restriction, a scalar facet element whose basis values are normal flux
//! densities, so all three pairings below reduce to a weighted surface mass
//! matrix between two components' values.
use crate::allocators::DimAllocator;
use crate::assembly::buffers::{BasisFunctionBuffer, QuadratureBuffer};
use crate::assembly::local::{
    check_assembly_dim, check_coefficient_count, check_spatial_dim, ComponentPair,
    SurfaceFormWorkspace,
};
use crate::quadrature::required_strength;
use crate::space::CompoundSurfaceElement;
use crate::{Coefficient, DpgScalar, Real, SmallDim};
use davenport::{define_thread_local_workspace, with_thread_local_workspace};
use itertools::izip;
use nalgebra::{DMatrixSliceMut, DefaultAllocator};
use num::Zero;

define_thread_local_workspace!(WORKSPACE);

/// Assembles the facet matrix of `c u v` over a boundary facet element,
/// pairing the values of two components.
pub fn assemble_surface_value_product_matrix<S, D>(
    mut output: DMatrixSliceMut<S>,
    element: &CompoundSurfaceElement<S::Real, D>,
    components: &ComponentPair,
    coeff: &Coefficient<S::Real>,
    quadrature: &mut QuadratureBuffer<S::Real, D>,
    basis: &mut BasisFunctionBuffer<S::Real>,
    coords: &mut Vec<S::Real>,
) -> eyre::Result<()>
where
    S: DpgScalar,
    D: SmallDim,
    DefaultAllocator: DimAllocator<S::Real, D>,
{
    let trial = element.component(components.trial_component())?;
    let test = element.component(components.test_component())?;
    let trial_offset = element.component_dof_offset(components.trial_component())?;
    let test_offset = element.component_dof_offset(components.test_component())?;

    assert_eq!(output.nrows(), element.num_dofs(), "Output matrix dimension mismatch");
    assert_eq!(output.ncols(), element.num_dofs(), "Output matrix dimension mismatch");
    output.fill(S::zero());

    let geometry = element.geometry();
    let strength = required_strength(trial.degree(), test.degree());
    quadrature.populate_surface(geometry, strength)?;
    basis.resize(trial.num_dofs(), test.num_dofs(), D::dim());
    coords.resize(geometry.dim_space(), S::Real::zero());

    let (weights, points) = quadrature.weights_and_points();
    for (&weight, xi) in izip!(weights, points) {
        let measure = geometry.integration_measure(xi);
        trial.populate_basis(basis.trial_values_mut(), xi)?;
        test.populate_basis(basis.test_values_mut(), xi)?;

        geometry.map_reference_coords(xi, coords)?;
        let c: S = coeff.evaluate(coords)?;
        let scale = c * S::from_real(weight * measure);

        for (i, &phi_trial) in basis.trial_values().iter().enumerate() {
            for (j, &phi_test) in basis.test_values().iter().enumerate() {
                output[(test_offset + j, trial_offset + i)] += scale * S::from_real(phi_trial * phi_test);
            }
        }
    }
    Ok(())
}

macro_rules! boundary_pairing {
    ($(#[$doc:meta])* $name:ident, $display_name:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name<T: Real> {
            components: ComponentPair,
            coeff: Coefficient<T>,
            spatial_dim: usize,
        }

        impl<T: Real> $name<T> {
            /// Creates the integrator from its coefficient arguments: two
            /// component indices followed by the boundary coefficient.
            pub fn new(spatial_dim: usize, coeffs: &[Coefficient<T>]) -> eyre::Result<Self> {
                check_spatial_dim($display_name, spatial_dim)?;
                check_coefficient_count($display_name, 3, coeffs.len())?;
                let components = ComponentPair::from_coefficients(coeffs)?;
                log::info!(
                    "Using DPG integrator {} with components {} and {}",
                    $display_name,
                    components.trial_component() + 1,
                    components.test_component() + 1
                );
                Ok(Self {
                    components,
                    coeff: coeffs[2].clone(),
                    spatial_dim,
                })
            }

            pub fn name(&self) -> &'static str {
                $display_name
            }

            pub fn is_symmetric(&self) -> bool {
                !self.coeff.is_complex()
            }

            pub fn components(&self) -> &ComponentPair {
                &self.components
            }

            pub fn dim_space(&self) -> usize {
                self.spatial_dim
            }

            /// Boundary forms live on facet elements of one dimension less
            /// than the ambient space.
            pub fn dim_element(&self) -> usize {
                self.spatial_dim - 1
            }

            pub fn assemble_boundary_matrix_into<S, D>(
                &self,
                element: &CompoundSurfaceElement<T, D>,
                output: DMatrixSliceMut<S>,
            ) -> eyre::Result<()>
            where
                S: DpgScalar<Real = T>,
                D: SmallDim,
                DefaultAllocator: DimAllocator<T, D>,
            {
                check_assembly_dim(self.name(), self.spatial_dim - 1, D::dim())?;
                with_thread_local_workspace(&WORKSPACE, |ws: &mut SurfaceFormWorkspace<T, D>| {
                    assemble_surface_value_product_matrix(
                        output,
                        element,
                        &self.components,
                        &self.coeff,
                        &mut ws.quadrature,
                        &mut ws.basis,
                        &mut ws.coords,
                    )
                })
            }
        }
    };
}

boundary_pairing!(
    /// The bilinear form `<c q.n, r.n>` over the global boundary, pairing
    /// the normal traces of two flux components.
    FluxFluxBoundary,
    "FluxFluxBoundary"
);

boundary_pairing!(
    /// The bilinear form `<c u, w>` over the global boundary, pairing two
    /// trace components.
    TraceTraceBoundary,
    "TraceTraceBoundary"
);

boundary_pairing!(
    /// The bilinear form `<c q.n, w>` over the global boundary, pairing the
    /// normal trace of a flux component with a trace component.
    FluxTraceBoundary,
    "FluxTraceBoundary"
);
