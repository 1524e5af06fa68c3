use crate::allocators::DimAllocator;
use crate::assembly::local::{
    assemble_facet_value_product_matrix, check_assembly_dim, check_coefficient_count,
    check_spatial_dim, ComponentPair, FacetSelection, VolumeFormWorkspace,
};
use crate::space::CompoundVolumeElement;
use crate::{Coefficient, DpgScalar, Real, SmallDim};
use davenport::{define_thread_local_workspace, with_thread_local_workspace};
use eyre::bail;
use nalgebra::{DMatrixSliceMut, DefaultAllocator};

define_thread_local_workspace!(WORKSPACE);

/// The Robin-type bilinear form `<c u, w>` restricted to facets that lie on
/// the domain boundary, assembled element by element.
///
/// The coefficient is given as a volume coefficient but is only ever
/// evaluated on boundary facets. There is no general reduction of a volume
/// coefficient to the boundary, so only spatially constant coefficients are
/// accepted; anything else is rejected at construction.
#[derive(Debug, Clone)]
pub struct RobinVolume<T: Real> {
    components: ComponentPair,
    coeff: Coefficient<T>,
    spatial_dim: usize,
}

impl<T: Real> RobinVolume<T> {
    /// Creates the integrator from its coefficient arguments: two component
    /// indices followed by the constant impedance coefficient `c`.
    pub fn new(spatial_dim: usize, coeffs: &[Coefficient<T>]) -> eyre::Result<Self> {
        check_spatial_dim("RobinVolume", spatial_dim)?;
        check_coefficient_count("RobinVolume", 3, coeffs.len())?;
        let components = ComponentPair::from_coefficients(coeffs)?;
        if !coeffs[2].is_constant() {
            bail!("RobinVolume requires a spatially constant coefficient");
        }
        log::info!(
            "Using DPG integrator RobinVolume with components {} and {}",
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
        "RobinVolume"
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
                FacetSelection::BoundaryOnly,
                &mut ws.quadrature,
                &mut ws.basis,
            )
        })
    }
}
