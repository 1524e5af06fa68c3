use crate::allocators::DimAllocator;
use crate::assembly::buffers::{BasisFunctionBuffer, QuadratureBuffer};
use crate::assembly::local::{
    check_assembly_dim, check_coefficient_count, check_spatial_dim, ComponentPair,
    VolumeFormWorkspace,
};
use crate::geometry::facet_normal_and_scaling;
use crate::quadrature::required_strength;
use crate::space::CompoundVolumeElement;
use crate::{Coefficient, DpgScalar, Real, SmallDim};
use davenport::{define_thread_local_workspace, with_thread_local_workspace};
use itertools::izip;
use nalgebra::{DMatrixSliceMut, DefaultAllocator};

define_thread_local_workspace!(WORKSPACE);

/// The bilinear form `<c u, w>` over all facets of each element, pairing
/// the facet restrictions of two scalar components.
#[derive(Debug, Clone)]
pub struct TraceTrace<T: Real> {
    components: ComponentPair,
    coeff: Coefficient<T>,
    spatial_dim: usize,
}

impl<T: Real> TraceTrace<T> {
    /// Creates the integrator from its coefficient arguments: two component
    /// indices followed by the coefficient `c`.
    pub fn new(spatial_dim: usize, coeffs: &[Coefficient<T>]) -> eyre::Result<Self> {
        check_spatial_dim("TraceTrace", spatial_dim)?;
        check_coefficient_count("TraceTrace", 3, coeffs.len())?;
        let components = ComponentPair::from_coefficients(coeffs)?;
        log::info!(
            "Using DPG integrator TraceTrace with components {} and {}",
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
        "TraceTrace"
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

    pub fn dim_element(&self) -> usize {
        self.spatial_dim
    }

    pub fn assemble_element_matrix_into<S, D>(
        &self,
        element: &CompoundVolumeElement<T, D>,
        output: DMatrixSliceMut<S>,
    ) -> eyre::Result<()>
    where
        S: DpgScalar<Real = T>,
        D: SmallDim,
        DefaultAllocator: DimAllocator<T, D>,
    {
        check_assembly_dim(self.name(), self.spatial_dim, D::dim())?;
        with_thread_local_workspace(&WORKSPACE, |ws: &mut VolumeFormWorkspace<T, D>| {
            assemble_facet_value_product_matrix(
                output,
                element,
                &self.components,
                &self.coeff,
                FacetSelection::All,
                &mut ws.quadrature,
                &mut ws.basis,
            )
        })
    }
}

/// Which facets of an element a facet-restricted form integrates over.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FacetSelection {
    /// All facets of the element.
    All,
    /// Only facets flagged as lying on the domain boundary.
    BoundaryOnly,
}

/// Assembles the element matrix of `<c u, w>` by integrating the product of
/// two components' values over the selected facets of the element.
pub fn assemble_facet_value_product_matrix<S, D>(
    mut output: DMatrixSliceMut<S>,
    element: &CompoundVolumeElement<S::Real, D>,
    components: &ComponentPair,
    coeff: &Coefficient<S::Real>,
    selection: FacetSelection,
    quadrature: &mut QuadratureBuffer<S::Real, D>,
    basis: &mut BasisFunctionBuffer<S::Real>,
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

    let strength = required_strength(trial.degree(), test.degree());
    basis.resize(trial.num_dofs(), test.num_dofs(), D::dim());

    let geometry = element.geometry();
    for facet in 0..geometry.num_facets() {
        if selection == FacetSelection::BoundaryOnly && !geometry.facet_on_boundary(facet) {
            continue;
        }
        let reference_normal = geometry.reference_facet_normal(facet)?;
        quadrature.populate_facet(geometry, facet, strength)?;
        let (weights, points) = quadrature.weights_and_points();
        for (&weight, xi) in izip!(weights, points) {
            let jacobian = geometry.jacobian(xi);
            let (_, scaling) = facet_normal_and_scaling(&jacobian, &reference_normal)?;

            trial.populate_basis(basis.trial_values_mut(), xi)?;
            test.populate_basis(basis.test_values_mut(), xi)?;

            let x = geometry.map_reference_coords(xi);
            let c: S = coeff.evaluate(x.coords.as_slice())?;
            let scale = c * S::from_real(weight * scaling);

            for (i, &phi_trial) in basis.trial_values().iter().enumerate() {
                for (j, &phi_test) in basis.test_values().iter().enumerate() {
                    output[(test_offset + j, trial_offset + i)] +=
                        scale * S::from_real(phi_trial * phi_test);
                }
            }
        }
    }
    Ok(())
}
