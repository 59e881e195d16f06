//! Three-state field updates for merge-style mutations.
//!
//! # Responsibility
//! - Express "leave unchanged", "clear" and "replace" per optional field.
//!
//! # Invariants
//! - `Keep` never modifies the stored field.
//! - `Clear` always leaves the stored field absent, even if it already was.

use crate::model::category::CategoryId;
use serde::{Deserialize, Serialize};

/// Update instruction for one optional record field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum FieldUpdate<T> {
    /// Leave the stored value unchanged.
    #[default]
    Keep,
    /// Remove the stored value.
    Clear,
    /// Replace the stored value.
    Set(T),
}

impl<T> FieldUpdate<T> {
    /// Maps a flat optional parameter: present replaces, absent keeps.
    ///
    /// This is the mapping used by the remote operation surface, where a
    /// parameter cannot express "clear".
    pub fn from_present(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Set(value),
            None => Self::Keep,
        }
    }

    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }
}

/// Field-level merge request for one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PagePatch {
    pub title: FieldUpdate<String>,
    pub content: FieldUpdate<String>,
    pub category_id: FieldUpdate<CategoryId>,
}

impl PagePatch {
    /// Builds a patch from the flat remote signature `(title?, content?, categoryId?)`.
    pub fn from_optional(
        title: Option<String>,
        content: Option<String>,
        category_id: Option<CategoryId>,
    ) -> Self {
        Self {
            title: FieldUpdate::from_present(title),
            content: FieldUpdate::from_present(content),
            category_id: FieldUpdate::from_present(category_id),
        }
    }

    /// Returns true when applying this patch cannot change a page.
    pub fn is_noop(&self) -> bool {
        self.title.is_keep() && self.content.is_keep() && self.category_id.is_keep()
    }
}
