use rusqlite::Connection;
use wikinote_core::db::migrations::latest_version;
use wikinote_core::db::open_db_in_memory;
use wikinote_core::{
    CategoryRepository, FieldUpdate, PagePatch, PageRepository, RecordRef, RepoError,
    SqliteCategoryRepository, SqlitePageRepository,
};

#[test]
fn category_create_get_rename_delete() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCategoryRepository::try_new(&conn).unwrap();

    let id = repo.create_category("Notes").unwrap();
    assert_eq!(repo.get_category(id).unwrap().unwrap().name, "Notes");

    repo.rename_category(id, "Journal").unwrap();
    assert_eq!(repo.get_category(id).unwrap().unwrap().name, "Journal");

    repo.delete_category(id).unwrap();
    assert!(repo.get_category(id).unwrap().is_none());
    let err = repo.delete_category(id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(RecordRef::Category(missing)) if missing == id));
}

#[test]
fn category_lookup_of_unknown_id_is_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCategoryRepository::try_new(&conn).unwrap();

    assert!(repo.get_category(42).unwrap().is_none());
    let id = repo.create_category("Only").unwrap();
    assert!(repo.get_category(id + 1).unwrap().is_none());
    assert_eq!(repo.list_categories().unwrap().len(), 1);
}

#[test]
fn page_patch_clear_and_set_are_persisted() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePageRepository::try_new(&conn).unwrap();

    let id = repo.create_page(Some("Draft"), Some(3)).unwrap();
    let patch = PagePatch {
        title: FieldUpdate::Set(String::new()),
        content: FieldUpdate::Set("<p>body</p>".to_string()),
        category_id: FieldUpdate::Clear,
    };
    repo.update_page(id, &patch).unwrap();

    let page = repo.get_page(id).unwrap().unwrap();
    assert_eq!(page.title.as_deref(), Some(""));
    assert_eq!(page.content.as_deref(), Some("<p>body</p>"));
    assert_eq!(page.category_id, None);

    let clear_title = PagePatch {
        title: FieldUpdate::Clear,
        ..PagePatch::default()
    };
    repo.update_page(id, &clear_title).unwrap();
    let page = repo.get_page(id).unwrap().unwrap();
    assert_eq!(page.title, None);
    assert_eq!(page.content.as_deref(), Some("<p>body</p>"));
}

#[test]
fn noop_patch_reports_unknown_page() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePageRepository::try_new(&conn).unwrap();

    let err = repo.update_page(41, &PagePatch::default()).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(RecordRef::Page(41))));
}

#[test]
fn orphaned_pages_are_listed_without_repair() {
    let conn = open_db_in_memory().unwrap();
    let categories = SqliteCategoryRepository::try_new(&conn).unwrap();
    let pages = SqlitePageRepository::try_new(&conn).unwrap();

    let kept = categories.create_category("Kept").unwrap();
    let dropped = categories.create_category("Dropped").unwrap();
    let in_kept = pages.create_page(Some("a"), Some(kept)).unwrap();
    let in_dropped = pages.create_page(Some("b"), Some(dropped)).unwrap();
    let never_existed = pages.create_page(Some("c"), Some(999)).unwrap();
    pages.create_page(Some("d"), None).unwrap();

    categories.delete_category(dropped).unwrap();

    let orphans: Vec<_> = pages
        .list_orphaned_pages()
        .unwrap()
        .into_iter()
        .map(|page| page.id)
        .collect();
    assert_eq!(orphans, vec![in_dropped, never_existed]);
    assert_eq!(
        pages.get_page(in_dropped).unwrap().unwrap().category_id,
        Some(dropped)
    );
    assert_eq!(
        pages.get_page(in_kept).unwrap().unwrap().category_id,
        Some(kept)
    );
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqlitePageRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteCategoryRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("categories"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE pages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NULL,
            content TEXT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqlitePageRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "pages",
            column: "category_id"
        })
    ));
}

#[test]
fn read_path_rejects_invalid_persisted_id() {
    let conn = open_db_in_memory().unwrap();
    conn.execute("INSERT INTO categories (id, name) VALUES (0, 'bad');", [])
        .unwrap();
    let repo = SqliteCategoryRepository::try_new(&conn).unwrap();

    let err = repo.list_categories().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
