//! Core domain types
//!
//! Build records as reported by the executor, and the causes attached to
//! them. A merge request cause is the only link between a build and the
//! merge request that triggered it.

pub mod build;
pub mod cause;
