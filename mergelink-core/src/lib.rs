//! Mergelink Core
//!
//! Core types and abstractions shared by the mergelink crates.
//!
//! This crate contains:
//! - Domain types: build causes, build records and outcomes
//! - DTOs: GitLab webhook payloads and executor API messages
//! - Template rendering for build notes

pub mod domain;
pub mod dto;
pub mod template;
