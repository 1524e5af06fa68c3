use crate::allocators::DimAllocator;
use crate::assembly::buffers::{BasisFunctionBuffer, QuadratureBuffer};
use crate::assembly::local::{check_assembly_dim, check_spatial_dim, VolumeFormWorkspace};
use crate::coefficient::resolve_component_index;
use crate::geometry::facet_normal_and_scaling;
use crate::quadrature::required_strength;
use crate::space::CompoundVolumeElement;
use crate::{Coefficient, DpgScalar, Real, SmallDim};
use davenport::{define_thread_local_workspace, with_thread_local_workspace};
use eyre::bail;
use itertools::izip;
use nalgebra::{DVectorSliceMut, DefaultAllocator};

define_thread_local_workspace!(WORKSPACE);

/// The linear form `<G.n + g, e>` over facets on the domain boundary,
/// assembled element by element against a single test component.
///
/// `g` is a scalar coefficient and `G = (Gx, Gy[, Gz])` a vector coefficient
/// whose normal component is taken on the boundary. Both are given as volume
/// coefficients but only evaluated on boundary facets, so like
/// [`RobinVolume`](crate::assembly::local::RobinVolume) only spatially
/// constant coefficients are accepted.
#[derive(Debug, Clone)]
pub struct NeumannVolume<T: Real> {
    component: usize,
    coeff_g: Coefficient<T>,
    coeff_flux: Vec<Coefficient<T>>,
    spatial_dim: usize,
}

impl<T: Real> NeumannVolume<T> {
    /// Creates the integrator from its coefficient arguments: the test
    /// component index, the scalar datum `g`, then one flux component per
    /// spatial dimension.
    pub fn new(spatial_dim: usize, coeffs: &[Coefficient<T>]) -> eyre::Result<Self> {
        check_spatial_dim("NeumannVolume", spatial_dim)?;
        let expected = 2 + spatial_dim;
        if coeffs.len() != expected {
            bail!(
                "NeumannVolume expects exactly {} coefficient arguments in {}D \
                 (component index, g, then the flux components), got {}",
                expected,
                spatial_dim,
                coeffs.len()
            );
        }
        let component = resolve_component_index(&coeffs[0])?;
        if coeffs[1..].iter().any(|coeff| !coeff.is_constant()) {
            bail!("NeumannVolume requires spatially constant coefficients");
        }
        log::info!(
            "Using DPG source integrator NeumannVolume on component {}",
            component + 1
        );
        Ok(Self {
            component,
            coeff_g: coeffs[1].clone(),
            coeff_flux: coeffs[2..].to_vec(),
            spatial_dim,
        })
    }

    pub fn name(&self) -> &'static str {
        "NeumannVolume"
    }

    /// The test component the element vector acts on.
    pub fn component(&self) -> usize {
        self.component
    }

    pub fn dim_space(&self) -> usize {
        self.spatial_dim
    }

    pub fn dim_element(&self) -> usize {
        self.spatial_dim
    }

    pub fn assemble_element_vector_into<S, D>(
        &self,
        element: &CompoundVolumeElement<T, D>,
        output: DVectorSliceMut<S>,
    ) -> eyre::Result<()>
    where
        S: DpgScalar<Real = T>,
        D: SmallDim,
        DefaultAllocator: DimAllocator<T, D>,
    {
        check_assembly_dim(self.name(), self.spatial_dim, D::dim())?;
        with_thread_local_workspace(&WORKSPACE, |ws: &mut VolumeFormWorkspace<T, D>| {
            assemble_neumann_vector(
                output,
                element,
                self.component,
                &self.coeff_g,
                &self.coeff_flux,
                &mut ws.quadrature,
                &mut ws.basis,
            )
        })
    }
}

/// Assembles the element vector of `<G.n + g, e>` over the element's
/// boundary facets.
pub fn assemble_neumann_vector<S, D>(
    mut output: DVectorSliceMut<S>,
    element: &CompoundVolumeElement<S::Real, D>,
    component: usize,
    coeff_g: &Coefficient<S::Real>,
    coeff_flux: &[Coefficient<S::Real>],
    quadrature: &mut QuadratureBuffer<S::Real, D>,
    basis: &mut BasisFunctionBuffer<S::Real>,
) -> eyre::Result<()>
where
    S: DpgScalar,
    D: SmallDim,
    DefaultAllocator: DimAllocator<S::Real, D>,
{
    let test = element.component(component)?;
    let offset = element.component_dof_offset(component)?;

    assert_eq!(output.len(), element.num_dofs(), "Output vector dimension mismatch");
    output.fill(S::zero());

    let strength = required_strength(0, test.degree());
    basis.resize(0, test.num_dofs(), D::dim());

    let geometry = element.geometry();
    for facet in 0..geometry.num_facets() {
        if !geometry.facet_on_boundary(facet) {
            continue;
        }
        let reference_normal = geometry.reference_facet_normal(facet)?;
        quadrature.populate_facet(geometry, facet, strength)?;
        let (weights, points) = quadrature.weights_and_points();
        for (&weight, xi) in izip!(weights, points) {
            let jacobian = geometry.jacobian(xi);
            let (normal, scaling) = facet_normal_and_scaling(&jacobian, &reference_normal)?;

            test.populate_basis(basis.test_values_mut(), xi)?;

            let x = geometry.map_reference_coords(xi);
            let coords = x.coords.as_slice();
            let g: S = coeff_g.evaluate(coords)?;
            let mut flux_normal = S::zero();
            for (k, coeff) in coeff_flux.iter().enumerate() {
                let component_value: S = coeff.evaluate(coords)?;
                flux_normal += component_value * S::from_real(normal[k]);
            }
            let value = (flux_normal + g) * S::from_real(weight * scaling);

            for (j, &phi_test) in basis.test_values().iter().enumerate() {
                output[offset + j] += value * S::from_real(phi_test);
            }
        }
    }
    Ok(())
}
