//! Assembly functionality for DPG forms.
//!
//! All assembly in this crate is element-local: the host framework owns the
//! assembly loop and the global system, and calls into
//! [`local`](crate::assembly::local) once per element or boundary facet.
pub mod buffers;
pub mod local;
