//! Element-local assembly of DPG (discontinuous Petrov-Galerkin) forms.
//!
//! DPG discretizations pose their bilinear forms on *compound* finite element
//! spaces: ordered collections of sub-spaces, one per physical unknown
//! (interior fields, traces, normal fluxes). A form definition names two
//! components of the compound space and an integrator; at assembly time the
//! host framework calls the integrator once per mesh element (or boundary
//! facet) to obtain the element-local block contributed to the global system.
//!
//! This crate provides the integrators themselves: the paired-component
//! bilinear forms ([`assembly::local::DpgIntegrator`]), the Neumann-type
//! source form ([`assembly::local::DpgSourceIntegrator`]), the registry that
//! makes them constructible by configuration name ([`registry`]), and the
//! post-processing utility that splits a component out of a compound solution
//! vector ([`postprocess`]). Mesh management, global assembly and solvers are
//! the host's responsibility.
//!
//! All element matrices follow one convention: the row block belongs to the
//! *test* component (`ind2`) and the column block to the *trial* component
//! (`ind1`) of the compound element.

use nalgebra::{DimMin, DimName, RealField};

pub mod allocators;
pub mod assembly;
pub mod coefficient;
pub mod element;
pub mod geometry;
pub mod postprocess;
pub mod quadrature;
pub mod registry;
pub mod scalar;
pub mod space;

pub extern crate nalgebra;

/// A real scalar suitable for geometry and coefficient arithmetic.
pub trait Real: RealField + Copy {}

impl<T: RealField + Copy> Real for T {}

/// A small, fixed-size dimension.
///
/// Used as a trait alias for the traits frequently needed by generic routines
/// in this crate.
pub trait SmallDim: DimName + DimMin<Self, Output = Self> {}

impl<D> SmallDim for D where D: DimName + DimMin<Self, Output = Self> {}

pub use crate::coefficient::Coefficient;
pub use crate::scalar::DpgScalar;
