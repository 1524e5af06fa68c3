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

/// The bilinear form `<d q.n, w>` over all facets of each element, pairing
/// the normal trace of a flux component with a trace component.
///
/// The flux component is queried through its facet normal traces, the trace
/// component through its basis values; both are evaluated at quadrature
/// points embedded in the element's reference coordinates.
#[derive(Debug, Clone)]
pub struct FluxTrace<T: Real> {
    components: ComponentPair,
    coeff: Coefficient<T>,
    spatial_dim: usize,
}

impl<T: Real> FluxTrace<T> {
    /// Creates the integrator from its coefficient arguments: two component
    /// indices followed by the coefficient `d`.
    pub fn new(spatial_dim: usize, coeffs: &[Coefficient<T>]) -> eyre::Result<Self> {
        check_spatial_dim("FluxTrace", spatial_dim)?;
        check_coefficient_count("FluxTrace", 3, coeffs.len())?;
        let components = ComponentPair::from_coefficients(coeffs)?;
        log::info!(
            "Using DPG integrator FluxTrace with components {} and {}",
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
        "FluxTrace"
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
            assemble_flux_trace_matrix(
                output,
                element,
                &self.components,
                &self.coeff,
                &mut ws.quadrature,
                &mut ws.basis,
            )
        })
    }
}

/// Assembles the element matrix of `<d q.n, w>` by integrating over every
/// facet of the element.
pub fn assemble_flux_trace_matrix<S, D>(
    mut output: DMatrixSliceMut<S>,
    element: &CompoundVolumeElement<S::Real, D>,
    components: &ComponentPair,
    coeff: &Coefficient<S::Real>,
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
        let reference_normal = geometry.reference_facet_normal(facet)?;
        quadrature.populate_facet(geometry, facet, strength)?;
        let (weights, points) = quadrature.weights_and_points();
        for (&weight, xi) in izip!(weights, points) {
            let jacobian = geometry.jacobian(xi);
            let (_, scaling) = facet_normal_and_scaling(&jacobian, &reference_normal)?;

            trial.populate_facet_normal_trace(facet, basis.trial_values_mut(), xi)?;
            test.populate_basis(basis.test_values_mut(), xi)?;

            let x = geometry.map_reference_coords(xi);
            let d: S = coeff.evaluate(x.coords.as_slice())?;
            let scale = d * S::from_real(weight * scaling);

            for (i, &q_n) in basis.trial_values().iter().enumerate() {
                for (j, &phi_test) in basis.test_values().iter().enumerate() {
                    output[(test_offset + j, trial_offset + i)] += scale * S::from_real(q_n * phi_test);
                }
            }
        }
    }
    Ok(())
}
