//! Repository layer
//!
//! HTTP access to the build executor. Repositories carry no business
//! logic; the bridge decides what to enqueue and when to annotate.

mod executor;
mod remote_build;

pub use executor::{BuildRepository, HttpExecutor};
pub use remote_build::RemoteBuild;
