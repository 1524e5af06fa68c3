//! A name-keyed factory for DPG integrators.
//!
//! The host framework's configuration layer refers to integrators by a fixed
//! lowercase keyword and a spatial dimension. Rather than populating a global
//! factory as a load-time side effect, registration here is an explicit
//! initialization step: build a registry, register constructors (or use
//! [`IntegratorRegistry::with_dpg_integrators`] for the full stock set), and
//! create integrators from parsed form definitions. Duplicate registrations
//! and unknown names are reported as errors instead of being resolved
//! silently.
use crate::assembly::local::{
    DpgIntegrator, DpgSourceIntegrator, EyeEye, FluxFluxBoundary, FluxTrace, FluxTraceBoundary,
    GradGrad, NeumannVolume, RobinVolume, TraceTrace, TraceTraceBoundary,
};
use crate::{Coefficient, Real};
use eyre::{bail, eyre};
use std::collections::HashMap;

/// Constructor of a bilinear form integrator from a spatial dimension and
/// coefficient arguments.
pub type BilinearConstructor<T> = fn(usize, &[Coefficient<T>]) -> eyre::Result<DpgIntegrator<T>>;

/// Constructor of a linear (source) form integrator.
pub type SourceConstructor<T> =
    fn(usize, &[Coefficient<T>]) -> eyre::Result<DpgSourceIntegrator<T>>;

/// Registry of integrator constructors, keyed by configuration name and
/// spatial dimension.
pub struct IntegratorRegistry<T: Real> {
    bilinear: HashMap<(String, usize), BilinearConstructor<T>>,
    source: HashMap<(String, usize), SourceConstructor<T>>,
}

impl<T: Real> Default for IntegratorRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Real> IntegratorRegistry<T> {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            bilinear: HashMap::new(),
            source: HashMap::new(),
        }
    }

    /// A registry with the full stock set of DPG integrators registered for
    /// spatial dimensions 2 and 3.
    pub fn with_dpg_integrators() -> Self {
        let mut registry = Self::new();
        registry
            .register_dpg_integrators()
            .expect("Internal error: stock registrations can by definition not collide");
        registry
    }

    /// Registers the stock set of DPG integrators for spatial dimensions 2
    /// and 3.
    pub fn register_dpg_integrators(&mut self) -> eyre::Result<()> {
        for dim in [2, 3] {
            self.register_bilinear("gradgrad", dim, |dim, coeffs| {
                GradGrad::new(dim, coeffs).map(DpgIntegrator::GradGrad)
            })?;
            self.register_bilinear("fluxtrace", dim, |dim, coeffs| {
                FluxTrace::new(dim, coeffs).map(DpgIntegrator::FluxTrace)
            })?;
            self.register_bilinear("eyeeye", dim, |dim, coeffs| {
                EyeEye::new(dim, coeffs).map(DpgIntegrator::EyeEye)
            })?;
            self.register_bilinear("tracetrace", dim, |dim, coeffs| {
                TraceTrace::new(dim, coeffs).map(DpgIntegrator::TraceTrace)
            })?;
            self.register_bilinear("robinvolume", dim, |dim, coeffs| {
                RobinVolume::new(dim, coeffs).map(DpgIntegrator::RobinVolume)
            })?;
            self.register_bilinear("fluxfluxboundary", dim, |dim, coeffs| {
                FluxFluxBoundary::new(dim, coeffs).map(DpgIntegrator::FluxFluxBoundary)
            })?;
            self.register_bilinear("tracetraceboundary", dim, |dim, coeffs| {
                TraceTraceBoundary::new(dim, coeffs).map(DpgIntegrator::TraceTraceBoundary)
            })?;
            self.register_bilinear("fluxtraceboundary", dim, |dim, coeffs| {
                FluxTraceBoundary::new(dim, coeffs).map(DpgIntegrator::FluxTraceBoundary)
            })?;
            self.register_source("neumannvol", dim, |dim, coeffs| {
                NeumannVolume::new(dim, coeffs).map(DpgSourceIntegrator::NeumannVolume)
            })?;
        }
        Ok(())
    }

    /// Registers a bilinear form constructor under a name and spatial
    /// dimension. Duplicate registration is an error.
    pub fn register_bilinear(
        &mut self,
        name: &str,
        spatial_dim: usize,
        constructor: BilinearConstructor<T>,
    ) -> eyre::Result<()> {
        let key = (name.to_string(), spatial_dim);
        if self.bilinear.contains_key(&key) {
            bail!(
                "bilinear integrator {} is already registered for spatial dimension {}",
                name,
                spatial_dim
            );
        }
        self.bilinear.insert(key, constructor);
        Ok(())
    }

    /// Registers a linear (source) form constructor under a name and spatial
    /// dimension. Duplicate registration is an error.
    pub fn register_source(
        &mut self,
        name: &str,
        spatial_dim: usize,
        constructor: SourceConstructor<T>,
    ) -> eyre::Result<()> {
        let key = (name.to_string(), spatial_dim);
        if self.source.contains_key(&key) {
            bail!(
                "source integrator {} is already registered for spatial dimension {}",
                name,
                spatial_dim
            );
        }
        self.source.insert(key, constructor);
        Ok(())
    }

    /// Constructs the named bilinear integrator from coefficient arguments.
    pub fn create_bilinear(
        &self,
        name: &str,
        spatial_dim: usize,
        coeffs: &[Coefficient<T>],
    ) -> eyre::Result<DpgIntegrator<T>> {
        let constructor = self
            .bilinear
            .get(&(name.to_string(), spatial_dim))
            .ok_or_else(|| {
                eyre!(
                    "no bilinear integrator named {} registered for spatial dimension {}",
                    name,
                    spatial_dim
                )
            })?;
        constructor(spatial_dim, coeffs)
    }

    /// Constructs the named source integrator from coefficient arguments.
    pub fn create_source(
        &self,
        name: &str,
        spatial_dim: usize,
        coeffs: &[Coefficient<T>],
    ) -> eyre::Result<DpgSourceIntegrator<T>> {
        let constructor = self
            .source
            .get(&(name.to_string(), spatial_dim))
            .ok_or_else(|| {
                eyre!(
                    "no source integrator named {} registered for spatial dimension {}",
                    name,
                    spatial_dim
                )
            })?;
        constructor(spatial_dim, coeffs)
    }

    /// The registered bilinear integrator names, sorted and without
    /// dimension duplicates.
    pub fn bilinear_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.bilinear.keys().map(|(name, _)| name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}
