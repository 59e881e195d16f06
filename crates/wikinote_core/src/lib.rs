//! Page/category store for the WikiNote application.
//! This crate is the single source of truth for record invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{
    default_log_level, init_logging, init_logging_with, logging_status, LogConfig, LoggingError,
};
pub use model::category::{Category, CategoryId};
pub use model::page::{Page, PageId, UNTITLED_LABEL};
pub use model::patch::{FieldUpdate, PagePatch};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::page_repo::{PageRepository, SqlitePageRepository};
pub use repo::{RecordRef, RepoError, RepoResult};
pub use service::preview::derive_html_preview;
pub use service::wiki_service::{
    PageGroup, SqliteWikiService, StoreError, StoreResult, WikiService,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
