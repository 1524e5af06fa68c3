use crate::allocators::DimAllocator;
use crate::assembly::local::{
    ComponentPair, EyeEye, FluxFluxBoundary, FluxTrace, FluxTraceBoundary, GradGrad,
    IntegrationDomain, NeumannVolume, RobinVolume, TraceTrace, TraceTraceBoundary,
};
use crate::space::{CompoundSurfaceElement, CompoundVolumeElement};
use crate::{DpgScalar, Real, SmallDim};
use eyre::bail;
use nalgebra::{DMatrixSliceMut, DVectorSliceMut, DefaultAllocator};

/// A paired-component DPG bilinear form integrator.
///
/// This is a closed sum over the supported form kinds; dispatching by tag
/// here replaces per-kind dynamic dispatch, and the registry constructs
/// variants from their configuration names.
#[derive(Debug, Clone)]
pub enum DpgIntegrator<T: Real> {
    GradGrad(GradGrad<T>),
    FluxTrace(FluxTrace<T>),
    EyeEye(EyeEye<T>),
    TraceTrace(TraceTrace<T>),
    RobinVolume(RobinVolume<T>),
    FluxFluxBoundary(FluxFluxBoundary<T>),
    TraceTraceBoundary(TraceTraceBoundary<T>),
    FluxTraceBoundary(FluxTraceBoundary<T>),
}

impl<T: Real> DpgIntegrator<T> {
    pub fn name(&self) -> &'static str {
        match self {
            DpgIntegrator::GradGrad(i) => i.name(),
            DpgIntegrator::FluxTrace(i) => i.name(),
            DpgIntegrator::EyeEye(i) => i.name(),
            DpgIntegrator::TraceTrace(i) => i.name(),
            DpgIntegrator::RobinVolume(i) => i.name(),
            DpgIntegrator::FluxFluxBoundary(i) => i.name(),
            DpgIntegrator::TraceTraceBoundary(i) => i.name(),
            DpgIntegrator::FluxTraceBoundary(i) => i.name(),
        }
    }

    /// True if the element block is Hermitian-symmetric, which holds exactly
    /// when the physical coefficient is real-valued.
    pub fn is_symmetric(&self) -> bool {
        match self {
            DpgIntegrator::GradGrad(i) => i.is_symmetric(),
            DpgIntegrator::FluxTrace(i) => i.is_symmetric(),
            DpgIntegrator::EyeEye(i) => i.is_symmetric(),
            DpgIntegrator::TraceTrace(i) => i.is_symmetric(),
            DpgIntegrator::RobinVolume(i) => i.is_symmetric(),
            DpgIntegrator::FluxFluxBoundary(i) => i.is_symmetric(),
            DpgIntegrator::TraceTraceBoundary(i) => i.is_symmetric(),
            DpgIntegrator::FluxTraceBoundary(i) => i.is_symmetric(),
        }
    }

    pub fn components(&self) -> &ComponentPair {
        match self {
            DpgIntegrator::GradGrad(i) => i.components(),
            DpgIntegrator::FluxTrace(i) => i.components(),
            DpgIntegrator::EyeEye(i) => i.components(),
            DpgIntegrator::TraceTrace(i) => i.components(),
            DpgIntegrator::RobinVolume(i) => i.components(),
            DpgIntegrator::FluxFluxBoundary(i) => i.components(),
            DpgIntegrator::TraceTraceBoundary(i) => i.components(),
            DpgIntegrator::FluxTraceBoundary(i) => i.components(),
        }
    }

    /// Whether the form is assembled per volume element or per boundary
    /// facet element.
    pub fn integration_domain(&self) -> IntegrationDomain {
        match self {
            DpgIntegrator::GradGrad(_)
            | DpgIntegrator::FluxTrace(_)
            | DpgIntegrator::EyeEye(_)
            | DpgIntegrator::TraceTrace(_)
            | DpgIntegrator::RobinVolume(_) => IntegrationDomain::Volume,
            DpgIntegrator::FluxFluxBoundary(_)
            | DpgIntegrator::TraceTraceBoundary(_)
            | DpgIntegrator::FluxTraceBoundary(_) => IntegrationDomain::Boundary,
        }
    }

    pub fn boundary_form(&self) -> bool {
        self.integration_domain() == IntegrationDomain::Boundary
    }

    pub fn dim_space(&self) -> usize {
        match self {
            DpgIntegrator::GradGrad(i) => i.dim_space(),
            DpgIntegrator::FluxTrace(i) => i.dim_space(),
            DpgIntegrator::EyeEye(i) => i.dim_space(),
            DpgIntegrator::TraceTrace(i) => i.dim_space(),
            DpgIntegrator::RobinVolume(i) => i.dim_space(),
            DpgIntegrator::FluxFluxBoundary(i) => i.dim_space(),
            DpgIntegrator::TraceTraceBoundary(i) => i.dim_space(),
            DpgIntegrator::FluxTraceBoundary(i) => i.dim_space(),
        }
    }

    /// Reference dimension of the elements the form is assembled on. Equal
    /// to `dim_space()` for volume forms and one less for boundary forms.
    pub fn dim_element(&self) -> usize {
        match self {
            DpgIntegrator::GradGrad(i) => i.dim_element(),
            DpgIntegrator::FluxTrace(i) => i.dim_element(),
            DpgIntegrator::EyeEye(i) => i.dim_element(),
            DpgIntegrator::TraceTrace(i) => i.dim_element(),
            DpgIntegrator::RobinVolume(i) => i.dim_element(),
            DpgIntegrator::FluxFluxBoundary(i) => i.dim_element(),
            DpgIntegrator::TraceTraceBoundary(i) => i.dim_element(),
            DpgIntegrator::FluxTraceBoundary(i) => i.dim_element(),
        }
    }

    /// Assembles the element matrix of a volume form into `output`.
    ///
    /// Fails for boundary forms, which must be assembled per boundary facet
    /// element through
    /// [`assemble_boundary_matrix_into`](Self::assemble_boundary_matrix_into).
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
        match self {
            DpgIntegrator::GradGrad(i) => i.assemble_element_matrix_into(element, output),
            DpgIntegrator::FluxTrace(i) => i.assemble_element_matrix_into(element, output),
            DpgIntegrator::EyeEye(i) => i.assemble_element_matrix_into(element, output),
            DpgIntegrator::TraceTrace(i) => i.assemble_element_matrix_into(element, output),
            DpgIntegrator::RobinVolume(i) => i.assemble_element_matrix_into(element, output),
            _ => bail!(
                "{} is a boundary form and must be assembled with assemble_boundary_matrix_into",
                self.name()
            ),
        }
    }

    /// Assembles the facet matrix of a boundary form into `output`.
    ///
    /// Fails for volume forms, which must be assembled per volume element
    /// through
    /// [`assemble_element_matrix_into`](Self::assemble_element_matrix_into).
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
        match self {
            DpgIntegrator::FluxFluxBoundary(i) => i.assemble_boundary_matrix_into(element, output),
            DpgIntegrator::TraceTraceBoundary(i) => i.assemble_boundary_matrix_into(element, output),
            DpgIntegrator::FluxTraceBoundary(i) => i.assemble_boundary_matrix_into(element, output),
            _ => bail!(
                "{} is a volume form and must be assembled with assemble_element_matrix_into",
                self.name()
            ),
        }
    }
}

/// A DPG linear (source) form integrator.
#[derive(Debug, Clone)]
pub enum DpgSourceIntegrator<T: Real> {
    NeumannVolume(NeumannVolume<T>),
}

impl<T: Real> DpgSourceIntegrator<T> {
    pub fn name(&self) -> &'static str {
        match self {
            DpgSourceIntegrator::NeumannVolume(i) => i.name(),
        }
    }

    /// The test component the element vector acts on.
    pub fn component(&self) -> usize {
        match self {
            DpgSourceIntegrator::NeumannVolume(i) => i.component(),
        }
    }

    pub fn integration_domain(&self) -> IntegrationDomain {
        IntegrationDomain::Volume
    }

    pub fn dim_space(&self) -> usize {
        match self {
            DpgSourceIntegrator::NeumannVolume(i) => i.dim_space(),
        }
    }

    pub fn dim_element(&self) -> usize {
        match self {
            DpgSourceIntegrator::NeumannVolume(i) => i.dim_element(),
        }
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
        match self {
            DpgSourceIntegrator::NeumannVolume(i) => i.assemble_element_vector_into(element, output),
        }
    }
}
