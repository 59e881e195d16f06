//! Page/category store service.
//!
//! # Responsibility
//! - Serve the create/read/update/delete contract over pages and categories.
//! - Map repository failures to the single domain error: unknown record id.
//! - Provide read-side helpers for resolving category references.
//!
//! # Invariants
//! - Creates never validate `category_id` against existing categories.
//! - Category deletion never cascades into pages.
//! - `update_page` merges per field; `FieldUpdate::Keep` fields are untouched.
//! - A failed mutation has no observable effect on reads.

use crate::model::category::{Category, CategoryId};
use crate::model::page::{Page, PageId};
use crate::model::patch::PagePatch;
use crate::repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
use crate::repo::page_repo::{PageRepository, SqlitePageRepository};
use crate::repo::{RecordRef, RepoError, RepoResult};
use log::{info, warn};
use rusqlite::Connection;
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Target page does not exist.
    PageNotFound(PageId),
    /// Target category does not exist.
    CategoryNotFound(CategoryId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl StoreError {
    /// Returns true for the "record not found" domain error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PageNotFound(_) | Self::CategoryNotFound(_))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PageNotFound(id) => write!(f, "page not found: {id}"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(RecordRef::Page(id)) => Self::PageNotFound(id),
            RepoError::NotFound(RecordRef::Category(id)) => Self::CategoryNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Pages sharing one resolved category.
///
/// `category = None` collects uncategorized pages, including pages whose
/// reference no longer resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageGroup {
    pub category: Option<Category>,
    pub pages: Vec<Page>,
}

/// Store facade owning both record collections through their repositories.
pub struct WikiService<C: CategoryRepository, P: PageRepository> {
    categories: C,
    pages: P,
}

/// Store service backed by one SQLite connection.
pub type SqliteWikiService<'conn> =
    WikiService<SqliteCategoryRepository<'conn>, SqlitePageRepository<'conn>>;

impl<'conn> WikiService<SqliteCategoryRepository<'conn>, SqlitePageRepository<'conn>> {
    /// Builds SQLite repositories over a migrated connection.
    pub fn try_from_connection(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self::new(
            SqliteCategoryRepository::try_new(conn)?,
            SqlitePageRepository::try_new(conn)?,
        ))
    }
}

impl<C: CategoryRepository, P: PageRepository> WikiService<C, P> {
    /// Creates a service using the provided repository implementations.
    pub fn new(categories: C, pages: P) -> Self {
        Self { categories, pages }
    }

    /// Creates a category and returns its new id.
    ///
    /// Empty names are accepted.
    pub fn create_category(&self, name: &str) -> StoreResult<CategoryId> {
        let id = self.categories.create_category(name)?;
        info!("event=category_create module=service status=ok category_id={id}");
        Ok(id)
    }

    /// Creates a page without content and returns its new id.
    ///
    /// `category_id` is stored as given, even if no such category exists.
    pub fn create_page(
        &self,
        title: Option<&str>,
        category_id: Option<CategoryId>,
    ) -> StoreResult<PageId> {
        let id = self.pages.create_page(title, category_id)?;
        info!(
            "event=page_create module=service status=ok page_id={} has_title={} has_category={}",
            id,
            title.is_some(),
            category_id.is_some()
        );
        Ok(id)
    }

    /// Returns a snapshot of all categories in insertion order.
    pub fn get_categories(&self) -> StoreResult<Vec<Category>> {
        Ok(self.categories.list_categories()?)
    }

    /// Returns a snapshot of all pages in insertion order.
    pub fn get_pages(&self) -> StoreResult<Vec<Page>> {
        Ok(self.pages.list_pages()?)
    }

    /// Gets one category by id; unknown ids yield `None`.
    pub fn get_category(&self, id: CategoryId) -> StoreResult<Option<Category>> {
        Ok(self.categories.get_category(id)?)
    }

    /// Gets one page by id; unknown ids yield `None`.
    pub fn get_page(&self, id: PageId) -> StoreResult<Option<Page>> {
        Ok(self.pages.get_page(id)?)
    }

    /// Replaces the name of an existing category.
    pub fn update_category(&self, id: CategoryId, name: &str) -> StoreResult<()> {
        let result = self.categories.rename_category(id, name);
        log_mutation("category_update", RecordRef::Category(id), &result);
        Ok(result?)
    }

    /// Merges `patch` into an existing page.
    ///
    /// An all-`Keep` patch still fails for unknown ids and succeeds otherwise.
    pub fn update_page(&self, id: PageId, patch: &PagePatch) -> StoreResult<()> {
        let result = self.pages.update_page(id, patch);
        if patch.is_noop() && result.is_ok() {
            info!("event=page_update module=service status=noop page_id={id}");
            return Ok(());
        }
        log_mutation("page_update", RecordRef::Page(id), &result);
        Ok(result?)
    }

    /// Deletes a category. Pages referencing it keep their `category_id`.
    pub fn delete_category(&self, id: CategoryId) -> StoreResult<()> {
        let result = self.categories.delete_category(id);
        log_mutation("category_delete", RecordRef::Category(id), &result);
        Ok(result?)
    }

    /// Deletes a page.
    pub fn delete_page(&self, id: PageId) -> StoreResult<()> {
        let result = self.pages.delete_page(id);
        log_mutation("page_delete", RecordRef::Page(id), &result);
        Ok(result?)
    }

    /// Resolves a page's category reference.
    ///
    /// Absent and dangling references both resolve to `None`.
    pub fn resolve_page_category(&self, page: &Page) -> StoreResult<Option<Category>> {
        match page.category_id {
            Some(category_id) => self.get_category(category_id),
            None => Ok(None),
        }
    }

    /// Lists pages whose `category_id` is present but unresolvable.
    pub fn list_orphaned_pages(&self) -> StoreResult<Vec<Page>> {
        Ok(self.pages.list_orphaned_pages()?)
    }

    /// Groups the page snapshot by resolved category.
    ///
    /// One group per category in insertion order (possibly empty), followed
    /// by an uncategorized group when any page lacks a resolvable category.
    pub fn group_pages_by_category(&self) -> StoreResult<Vec<PageGroup>> {
        let categories = self.get_categories()?;
        let mut by_category: HashMap<CategoryId, Vec<Page>> = HashMap::new();
        let mut uncategorized = Vec::new();

        let known: HashSet<CategoryId> = categories.iter().map(|category| category.id).collect();
        for page in self.get_pages()? {
            match page.category_id {
                Some(category_id) if known.contains(&category_id) => {
                    by_category.entry(category_id).or_default().push(page);
                }
                _ => uncategorized.push(page),
            }
        }

        let mut groups: Vec<PageGroup> = categories
            .into_iter()
            .map(|category| PageGroup {
                pages: by_category.remove(&category.id).unwrap_or_default(),
                category: Some(category),
            })
            .collect();
        if !uncategorized.is_empty() {
            groups.push(PageGroup {
                category: None,
                pages: uncategorized,
            });
        }
        Ok(groups)
    }
}

fn log_mutation(event: &str, target: RecordRef, result: &RepoResult<()>) {
    match result {
        Ok(()) => info!("event={event} module=service status=ok target=\"{target}\""),
        Err(RepoError::NotFound(_)) => {
            warn!("event={event} module=service status=not_found target=\"{target}\"")
        }
        Err(err) => warn!(
            "event={event} module=service status=error target=\"{target}\" error={err}"
        ),
    }
}
