//! Store use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the store operation contract.
//! - Keep FFI/CLI layers decoupled from storage details.

pub mod preview;
pub mod wiki_service;
