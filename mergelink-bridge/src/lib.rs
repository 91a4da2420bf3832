//! Mergelink Bridge
//!
//! Ties merge requests to builds and reports build outcomes back to GitLab.
//!
//! Architecture:
//! - Executor seams: enqueue builds and read/annotate running builds
//! - Notifier seam: merge request lookups and notes in the review system
//! - `MergeRequestBuilds`: the build trigger and the started/completed hooks
//! - Configuration: executor root URL and note templates
//!
//! The bridge keeps no state of its own. Every hook recovers the merge
//! request from the cause attached to the build it is given.

pub mod builds;
pub mod config;
pub mod error;
pub mod executor;
pub mod notifier;

pub use builds::{MergeRequestBuilds, TRIGGER_ACKNOWLEDGEMENT, started_message};
pub use config::BridgeConfig;
pub use error::NotifyError;
pub use executor::{BuildRun, Executor};
pub use notifier::RepositoryNotifier;
