//! Category repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `categories` table.
//!
//! # Invariants
//! - Ids come from SQLite `AUTOINCREMENT` and are never reused.
//! - Deleting a category never touches `pages`.

use crate::model::category::{Category, CategoryId};
use crate::repo::{check_persisted_id, ensure_table_ready, RecordRef, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const CATEGORY_SELECT_SQL: &str = "SELECT id, name FROM categories";

/// Repository interface for category CRUD operations.
pub trait CategoryRepository {
    /// Inserts one category and returns its newly assigned id.
    fn create_category(&self, name: &str) -> RepoResult<CategoryId>;
    /// Loads one category by id.
    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    /// Lists all categories in insertion order.
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
    /// Replaces the category name.
    fn rename_category(&self, id: CategoryId, name: &str) -> RepoResult<()>;
    /// Removes one category.
    fn delete_category(&self, id: CategoryId) -> RepoResult<()>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "categories", &["id", "name", "updated_at"])?;
        Ok(Self { conn })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn create_category(&self, name: &str) -> RepoResult<CategoryId> {
        self.conn.execute(
            "INSERT INTO categories (name, created_at, updated_at)
             VALUES (
                ?1,
                (strftime('%s', 'now') * 1000),
                (strftime('%s', 'now') * 1000)
             );",
            [name],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_category_row(row)?));
        }

        Ok(None)
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }
        Ok(categories)
    }

    fn rename_category(&self, id: CategoryId, name: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE categories
             SET
                name = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![id, name],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(RecordRef::Category(id)));
        }

        Ok(())
    }

    fn delete_category(&self, id: CategoryId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(RecordRef::Category(id)));
        }

        Ok(())
    }
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let id = check_persisted_id("categories", row.get("id")?)?;
    Ok(Category::new(id, row.get::<_, String>("name")?))
}
