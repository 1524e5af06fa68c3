use crate::allocators::DimAllocator;
use crate::assembly::buffers::{BasisFunctionBuffer, QuadratureBuffer};
use crate::assembly::local::{
    check_assembly_dim, check_coefficient_count, check_spatial_dim, ComponentPair,
    VolumeFormWorkspace,
};
use crate::quadrature::required_strength;
use crate::space::CompoundVolumeElement;
use crate::{Coefficient, DpgScalar, Real, SmallDim};
use davenport::{define_thread_local_workspace, with_thread_local_workspace};
use eyre::eyre;
use itertools::izip;
use nalgebra::{ComplexField, DMatrixSliceMut, DefaultAllocator};
use num::Zero;

define_thread_local_workspace!(WORKSPACE);

/// The bilinear form `(a grad u, grad v)` over element interiors, pairing
/// the gradients of two scalar components.
#[derive(Debug, Clone)]
pub struct GradGrad<T: Real> {
    components: ComponentPair,
    coeff: Coefficient<T>,
    spatial_dim: usize,
}

impl<T: Real> GradGrad<T> {
    /// Creates the integrator from its coefficient arguments: two component
    /// indices followed by the diffusion coefficient `a`.
    pub fn new(spatial_dim: usize, coeffs: &[Coefficient<T>]) -> eyre::Result<Self> {
        check_spatial_dim("GradGrad", spatial_dim)?;
        check_coefficient_count("GradGrad", 3, coeffs.len())?;
        let components = ComponentPair::from_coefficients(coeffs)?;
        log::info!(
            "Using DPG integrator GradGrad with components {} and {}",
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
        "GradGrad"
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
            assemble_grad_grad_matrix(
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

/// Assembles the element matrix of `(a grad u, grad v)` using quadrature
/// picked from the component degrees.
pub fn assemble_grad_grad_matrix<S, D>(
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
    let n_trial = trial.num_dofs();
    let n_test = test.num_dofs();

    assert_eq!(output.nrows(), element.num_dofs(), "Output matrix dimension mismatch");
    assert_eq!(output.ncols(), element.num_dofs(), "Output matrix dimension mismatch");
    output.fill(S::zero());

    // Gradients drop the polynomial degree by one.
    let strength = required_strength(
        trial.degree().saturating_sub(1),
        test.degree().saturating_sub(1),
    );
    quadrature.populate_volume(element.geometry(), strength)?;
    basis.resize(n_trial, n_test, D::dim());

    let (weights, points) = quadrature.weights_and_points();
    for (&weight, xi) in izip!(weights, points) {
        let jacobian = element.geometry().jacobian(xi);
        let jacobian_det = jacobian.determinant();
        let inv_t = jacobian
            .try_inverse()
            .ok_or_else(|| eyre!("Singular element Jacobian encountered"))?
            .transpose();

        trial.populate_basis_gradients(basis.trial_gradients_mut(), xi)?;
        test.populate_basis_gradients(basis.test_gradients_mut(), xi)?;
        basis.transform_trial_gradients_to_physical(&inv_t);
        basis.transform_test_gradients_to_physical(&inv_t);

        let x = element.geometry().map_reference_coords(xi);
        let a: S = coeff.evaluate(x.coords.as_slice())?;
        let scale = a * S::from_real(weight * jacobian_det.abs());

        let trial_gradients = basis.trial_physical_gradients();
        let test_gradients = basis.test_physical_gradients();
        for i in 0..n_trial {
            for j in 0..n_test {
                let mut dot = S::Real::zero();
                for r in 0..D::dim() {
                    dot += trial_gradients[(r, i)] * test_gradients[(r, j)];
                }
                output[(test_offset + j, trial_offset + i)] += scale * S::from_real(dot);
            }
        }
    }
    Ok(())
}
