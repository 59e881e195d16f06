//! Page domain model.
//!
//! # Responsibility
//! - Define the canonical page record returned by store reads.
//!
//! # Invariants
//! - `title`, `content` and `category_id` keep `None` distinct from `Some("")`.
//! - `category_id` is a plain reference; it may outlive the category it names.

use crate::model::category::CategoryId;
use serde::{Deserialize, Serialize};

/// Store-assigned page identifier.
pub type PageId = i64;

/// Label rendered for pages without a title.
pub const UNTITLED_LABEL: &str = "Untitled";

/// Rich-text document record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: PageId,
    /// `None` means "untitled".
    pub title: Option<String>,
    /// Editor HTML markup. `None` means "empty".
    pub content: Option<String>,
    /// `None` means "uncategorized". Serialized as `categoryId`.
    pub category_id: Option<CategoryId>,
}

impl Page {
    /// Returns the title for list rendering, falling back to `Untitled`.
    ///
    /// Absent and empty titles both render as `Untitled`; the stored
    /// `title` still keeps them apart.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|title| !title.is_empty())
            .unwrap_or(UNTITLED_LABEL)
    }
}
