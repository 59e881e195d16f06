//! FFI operation surface for the Flutter editor UI.
//!
//! # Responsibility
//! - Expose the eight page/category store operations to Dart via FRB.
//! - Translate store errors into plain-text `err` envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Optional parameters keep "absent" (`None`) distinct from `""`.
//! - Absent `update_page` parameters leave the stored field unchanged.

use log::error;
use std::path::PathBuf;
use std::sync::OnceLock;
use wikinote_core::db::open_db;
use wikinote_core::{
    core_version as core_version_inner, derive_html_preview, init_logging as init_logging_inner,
    ping as ping_inner, Category, Page, PagePatch, SqliteWikiService, StoreResult,
};

const DB_PATH_ENV: &str = "WIKINOTE_DB_PATH";
const DB_FILE_NAME: &str = "wikinote.sqlite3";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Two-variant mutation outcome: `ok` or a human-readable `err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpResult {
    pub ok: bool,
    /// Present exactly when `ok` is false.
    pub err: Option<String>,
}

impl OpResult {
    fn success() -> Self {
        Self { ok: true, err: None }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            err: Some(message.into()),
        }
    }
}

/// Create outcome carrying the new id.
///
/// Store creates cannot fail for domain reasons; `err` is only set when the
/// database could not be opened or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateResponse {
    pub id: Option<i64>,
    pub err: Option<String>,
}

/// Category snapshot item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryItem {
    pub id: i64,
    pub name: String,
}

/// Page snapshot item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageItem {
    pub id: i64,
    pub title: Option<String>,
    pub content: Option<String>,
    pub category_id: Option<i64>,
    /// List label; `Untitled` when `title` is absent or empty.
    pub display_title: String,
    /// Plain-text snippet derived from `content`.
    pub preview: Option<String>,
}

impl From<Category> for CategoryItem {
    fn from(value: Category) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}

impl From<Page> for PageItem {
    fn from(value: Page) -> Self {
        let display_title = value.display_title().to_string();
        let preview = value.content.as_deref().and_then(derive_html_preview);
        Self {
            id: value.id,
            title: value.title,
            content: value.content,
            category_id: value.category_id,
            display_title,
            preview,
        }
    }
}

/// Creates a category; empty names are accepted.
#[flutter_rust_bridge::frb(sync)]
pub fn create_category(name: String) -> CreateResponse {
    to_create_response(
        "create_category",
        with_store(|store| store.create_category(name.as_str())),
    )
}

/// Creates an empty page; `category_id` is stored without validation.
#[flutter_rust_bridge::frb(sync)]
pub fn create_page(title: Option<String>, category_id: Option<i64>) -> CreateResponse {
    to_create_response(
        "create_page",
        with_store(|store| store.create_page(title.as_deref(), category_id)),
    )
}

/// Lists all categories in insertion order.
///
/// Returns an empty list if the database cannot be opened.
#[flutter_rust_bridge::frb(sync)]
pub fn get_categories() -> Vec<CategoryItem> {
    match with_store(|store| store.get_categories()) {
        Ok(categories) => categories.into_iter().map(CategoryItem::from).collect(),
        Err(err) => {
            error!("event=ffi_call module=ffi status=error op=get_categories error={err}");
            Vec::new()
        }
    }
}

/// Lists all pages in insertion order.
///
/// Returns an empty list if the database cannot be opened.
#[flutter_rust_bridge::frb(sync)]
pub fn get_pages() -> Vec<PageItem> {
    match with_store(|store| store.get_pages()) {
        Ok(pages) => pages.into_iter().map(PageItem::from).collect(),
        Err(err) => {
            error!("event=ffi_call module=ffi status=error op=get_pages error={err}");
            Vec::new()
        }
    }
}

/// Renames a category.
#[flutter_rust_bridge::frb(sync)]
pub fn update_category(id: i64, name: String) -> OpResult {
    to_op_result(with_store(|store| store.update_category(id, name.as_str())))
}

/// Merges the present fields into a page; absent fields are left unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn update_page(
    id: i64,
    title: Option<String>,
    content: Option<String>,
    category_id: Option<i64>,
) -> OpResult {
    let patch = PagePatch::from_optional(title, content, category_id);
    to_op_result(with_store(|store| store.update_page(id, &patch)))
}

/// Deletes a category; pages keep their reference to it.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_category(id: i64) -> OpResult {
    to_op_result(with_store(|store| store.delete_category(id)))
}

/// Deletes a page.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_page(id: i64) -> OpResult {
    to_op_result(with_store(|store| store.delete_page(id)))
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_store<T>(f: impl FnOnce(&SqliteWikiService<'_>) -> StoreResult<T>) -> Result<T, String> {
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("database open failed: {err}"))?;
    let store = SqliteWikiService::try_from_connection(&conn)
        .map_err(|err| format!("store init failed: {err}"))?;
    f(&store).map_err(|err| err.to_string())
}

fn to_op_result(result: Result<(), String>) -> OpResult {
    match result {
        Ok(()) => OpResult::success(),
        Err(message) => OpResult::failure(message),
    }
}

fn to_create_response(op: &str, result: Result<i64, String>) -> CreateResponse {
    match result {
        Ok(id) => CreateResponse {
            id: Some(id),
            err: None,
        },
        Err(err) => {
            error!("event=ffi_call module=ffi status=error op={op} error={err}");
            CreateResponse {
                id: None,
                err: Some(format!("{op} failed: {err}")),
            }
        }
    }
}
