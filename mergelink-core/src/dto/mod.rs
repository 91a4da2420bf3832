//! Data Transfer Objects
//!
//! Messages exchanged with GitLab (webhook payloads) and with the executor
//! (enqueue requests and description updates).

pub mod build;
pub mod merge_request;
