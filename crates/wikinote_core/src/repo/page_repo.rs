//! Page repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `pages` table.
//! - Translate `PagePatch` into a single-statement field-level merge.
//!
//! # Invariants
//! - Ids come from SQLite `AUTOINCREMENT` and are never reused.
//! - `category_id` is written as given; it is never checked against
//!   `categories` and never rewritten when a category disappears.
//! - `FieldUpdate::Keep` columns are not part of the UPDATE statement.

use crate::model::category::CategoryId;
use crate::model::page::{Page, PageId};
use crate::model::patch::{FieldUpdate, PagePatch};
use crate::repo::{check_persisted_id, ensure_table_ready, RecordRef, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const PAGE_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    category_id
FROM pages";

/// Repository interface for page CRUD operations.
pub trait PageRepository {
    /// Inserts one page without content and returns its newly assigned id.
    fn create_page(&self, title: Option<&str>, category_id: Option<CategoryId>)
        -> RepoResult<PageId>;
    /// Loads one page by id.
    fn get_page(&self, id: PageId) -> RepoResult<Option<Page>>;
    /// Lists all pages in insertion order.
    fn list_pages(&self) -> RepoResult<Vec<Page>>;
    /// Merges patch fields into one existing page.
    fn update_page(&self, id: PageId, patch: &PagePatch) -> RepoResult<()>;
    /// Removes one page.
    fn delete_page(&self, id: PageId) -> RepoResult<()>;
    /// Lists pages whose category reference no longer resolves.
    fn list_orphaned_pages(&self) -> RepoResult<Vec<Page>>;
}

/// SQLite-backed page repository.
pub struct SqlitePageRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePageRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(
            conn,
            "pages",
            &["id", "title", "content", "category_id", "updated_at"],
        )?;
        Ok(Self { conn })
    }
}

impl PageRepository for SqlitePageRepository<'_> {
    fn create_page(
        &self,
        title: Option<&str>,
        category_id: Option<CategoryId>,
    ) -> RepoResult<PageId> {
        self.conn.execute(
            "INSERT INTO pages (title, content, category_id, created_at, updated_at)
             VALUES (
                ?1,
                NULL,
                ?2,
                (strftime('%s', 'now') * 1000),
                (strftime('%s', 'now') * 1000)
             );",
            params![title, category_id],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_page(&self, id: PageId) -> RepoResult<Option<Page>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PAGE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_page_row(row)?));
        }

        Ok(None)
    }

    fn list_pages(&self) -> RepoResult<Vec<Page>> {
        self.query_pages(&format!("{PAGE_SELECT_SQL} ORDER BY id ASC;"))
    }

    fn update_page(&self, id: PageId, patch: &PagePatch) -> RepoResult<()> {
        let mut assignments: Vec<&str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(value) = text_update_value(&patch.title) {
            assignments.push("title = ?");
            bind_values.push(value);
        }
        if let Some(value) = text_update_value(&patch.content) {
            assignments.push("content = ?");
            bind_values.push(value);
        }
        if let Some(value) = id_update_value(&patch.category_id) {
            assignments.push("category_id = ?");
            bind_values.push(value);
        }

        if assignments.is_empty() {
            // Nothing to write, but unknown ids must still be reported.
            if !self.page_exists(id)? {
                return Err(RepoError::NotFound(RecordRef::Page(id)));
            }
            return Ok(());
        }

        let sql = format!(
            "UPDATE pages
             SET
                {},
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?;",
            assignments.join(", ")
        );
        bind_values.push(Value::Integer(id));

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Err(RepoError::NotFound(RecordRef::Page(id)));
        }

        Ok(())
    }

    fn delete_page(&self, id: PageId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM pages WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(RecordRef::Page(id)));
        }

        Ok(())
    }

    fn list_orphaned_pages(&self) -> RepoResult<Vec<Page>> {
        self.query_pages(&format!(
            "{PAGE_SELECT_SQL}
             WHERE category_id IS NOT NULL
               AND NOT EXISTS (
                    SELECT 1
                    FROM categories c
                    WHERE c.id = pages.category_id
               )
             ORDER BY id ASC;"
        ))
    }
}

impl SqlitePageRepository<'_> {
    fn query_pages(&self, sql: &str) -> RepoResult<Vec<Page>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut pages = Vec::new();
        while let Some(row) = rows.next()? {
            pages.push(parse_page_row(row)?);
        }
        Ok(pages)
    }

    fn page_exists(&self, id: PageId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM pages WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn parse_page_row(row: &Row<'_>) -> RepoResult<Page> {
    Ok(Page {
        id: check_persisted_id("pages", row.get("id")?)?,
        title: row.get("title")?,
        content: row.get("content")?,
        category_id: row.get("category_id")?,
    })
}

fn text_update_value(update: &FieldUpdate<String>) -> Option<Value> {
    match update {
        FieldUpdate::Keep => None,
        FieldUpdate::Clear => Some(Value::Null),
        FieldUpdate::Set(value) => Some(Value::Text(value.clone())),
    }
}

fn id_update_value(update: &FieldUpdate<CategoryId>) -> Option<Value> {
    match update {
        FieldUpdate::Keep => None,
        FieldUpdate::Clear => Some(Value::Null),
        FieldUpdate::Set(value) => Some(Value::Integer(*value)),
    }
}
