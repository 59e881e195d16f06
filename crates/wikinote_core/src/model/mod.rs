//! Domain model for wiki pages and categories.
//!
//! # Responsibility
//! - Define the records owned by the page/category store.
//! - Define the three-state field update used by merge-style mutations.
//!
//! # Invariants
//! - Record ids are assigned by storage, monotonic per collection, never reused.
//! - Deletion is a hard delete; there are no tombstones.
//! - Absent optional text is distinct from empty text.

pub mod category;
pub mod page;
pub mod patch;
