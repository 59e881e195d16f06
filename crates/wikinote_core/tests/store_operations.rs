use std::collections::HashSet;
use wikinote_core::db::{open_db, open_db_in_memory};
use wikinote_core::{FieldUpdate, Page, PagePatch, SqliteWikiService, StoreError};

fn setup() -> rusqlite::Connection {
    open_db_in_memory().unwrap()
}

#[test]
fn created_ids_are_unique_per_collection() {
    let conn = setup();
    let store = SqliteWikiService::try_from_connection(&conn).unwrap();

    let mut page_ids = HashSet::new();
    let mut category_ids = HashSet::new();
    for index in 0..20 {
        assert!(category_ids.insert(store.create_category(&format!("c{index}")).unwrap()));
        assert!(page_ids.insert(store.create_page(None, None).unwrap()));
    }
    assert_eq!(store.get_pages().unwrap().len(), 20);
    assert_eq!(store.get_categories().unwrap().len(), 20);
}

#[test]
fn ids_are_not_reused_after_deleting_the_newest_record() {
    let conn = setup();
    let store = SqliteWikiService::try_from_connection(&conn).unwrap();

    let first = store.create_page(Some("one"), None).unwrap();
    let second = store.create_page(Some("two"), None).unwrap();
    store.delete_page(second).unwrap();
    let third = store.create_page(Some("three"), None).unwrap();
    assert!(third > second && second > first);

    let category = store.create_category("gone").unwrap();
    store.delete_category(category).unwrap();
    assert!(store.create_category("next").unwrap() > category);
}

#[test]
fn ids_are_not_reused_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wikinote.db");

    let deleted = {
        let conn = open_db(&path).unwrap();
        let store = SqliteWikiService::try_from_connection(&conn).unwrap();
        store.create_page(None, None).unwrap();
        let newest = store.create_page(None, None).unwrap();
        store.delete_page(newest).unwrap();
        newest
    };

    let conn = open_db(&path).unwrap();
    let store = SqliteWikiService::try_from_connection(&conn).unwrap();
    assert!(store.create_page(None, None).unwrap() > deleted);
}

#[test]
fn create_page_then_list_round_trip() {
    let conn = setup();
    let store = SqliteWikiService::try_from_connection(&conn).unwrap();

    let id = store.create_page(Some("T"), None).unwrap();

    let pages = store.get_pages().unwrap();
    assert_eq!(
        pages,
        vec![Page {
            id,
            title: Some("T".to_string()),
            content: None,
            category_id: None,
        }]
    );
}

#[test]
fn update_page_merges_only_present_fields() {
    let conn = setup();
    let store = SqliteWikiService::try_from_connection(&conn).unwrap();

    let notes = store.create_category("Notes").unwrap();
    let page_id = store.create_page(None, Some(notes)).unwrap();

    let patch = PagePatch::from_optional(
        Some("Hello".to_string()),
        Some("<p>hi</p>".to_string()),
        None,
    );
    store.update_page(page_id, &patch).unwrap();

    let page = store.get_page(page_id).unwrap().unwrap();
    assert_eq!(
        page,
        Page {
            id: page_id,
            title: Some("Hello".to_string()),
            content: Some("<p>hi</p>".to_string()),
            category_id: Some(notes),
        }
    );
}

#[test]
fn all_keep_update_is_an_ok_noop() {
    let conn = setup();
    let store = SqliteWikiService::try_from_connection(&conn).unwrap();

    let id = store.create_page(Some("Stable"), Some(7)).unwrap();
    let before = store.get_pages().unwrap();

    store.update_page(id, &PagePatch::default()).unwrap();

    assert_eq!(store.get_pages().unwrap(), before);
}

#[test]
fn clear_is_distinct_from_keep_and_from_empty() {
    let conn = setup();
    let store = SqliteWikiService::try_from_connection(&conn).unwrap();

    let id = store.create_page(Some("Title"), Some(1)).unwrap();
    store
        .update_page(
            id,
            &PagePatch {
                title: FieldUpdate::Set(String::new()),
                category_id: FieldUpdate::Clear,
                ..PagePatch::default()
            },
        )
        .unwrap();

    let page = store.get_page(id).unwrap().unwrap();
    assert_eq!(page.title.as_deref(), Some(""));
    assert_eq!(page.display_title(), "Untitled");
    assert_eq!(page.category_id, None);
    assert_eq!(page.content, None);
}

#[test]
fn mutations_on_unknown_ids_fail_without_side_effects() {
    let conn = setup();
    let store = SqliteWikiService::try_from_connection(&conn).unwrap();

    let category = store.create_category("Notes").unwrap();
    let page = store.create_page(Some("Kept"), Some(category)).unwrap();
    let pages_before = store.get_pages().unwrap();
    let categories_before = store.get_categories().unwrap();

    let err = store.update_category(999, "X").unwrap_err();
    assert!(matches!(err, StoreError::CategoryNotFound(999)));
    assert_eq!(err.to_string(), "category not found: 999");

    let patch = PagePatch::from_optional(Some("X".to_string()), None, None);
    assert!(matches!(
        store.update_page(page + 100, &patch),
        Err(StoreError::PageNotFound(_))
    ));
    assert!(store.delete_page(page + 100).unwrap_err().is_not_found());
    assert!(store.delete_category(category + 100).unwrap_err().is_not_found());

    assert_eq!(store.get_pages().unwrap(), pages_before);
    assert_eq!(store.get_categories().unwrap(), categories_before);
}

#[test]
fn deleted_records_stay_deleted() {
    let conn = setup();
    let store = SqliteWikiService::try_from_connection(&conn).unwrap();

    let page = store.create_page(Some("gone"), None).unwrap();
    store.delete_page(page).unwrap();

    assert!(store.get_page(page).unwrap().is_none());
    assert!(matches!(
        store.delete_page(page),
        Err(StoreError::PageNotFound(id)) if id == page
    ));
    assert!(matches!(
        store.update_page(page, &PagePatch::default()),
        Err(StoreError::PageNotFound(_))
    ));
}

#[test]
fn deleting_a_category_leaves_page_references_untouched() {
    let conn = setup();
    let store = SqliteWikiService::try_from_connection(&conn).unwrap();

    let category = store.create_category("Temp").unwrap();
    let page = store.create_page(Some("child"), Some(category)).unwrap();

    store.delete_category(category).unwrap();

    let pages = store.get_pages().unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].id, page);
    assert_eq!(pages[0].category_id, Some(category));
    assert_eq!(store.resolve_page_category(&pages[0]).unwrap(), None);
    assert_eq!(store.list_orphaned_pages().unwrap(), pages);
}

#[test]
fn create_accepts_empty_names_and_unknown_category_refs() {
    let conn = setup();
    let store = SqliteWikiService::try_from_connection(&conn).unwrap();

    let category = store.create_category("").unwrap();
    assert_eq!(store.get_category(category).unwrap().unwrap().name, "");

    let page = store.create_page(None, Some(12345)).unwrap();
    assert_eq!(
        store.get_page(page).unwrap().unwrap().category_id,
        Some(12345)
    );
}

#[test]
fn listing_follows_insertion_order() {
    let conn = setup();
    let store = SqliteWikiService::try_from_connection(&conn).unwrap();

    let b = store.create_category("b").unwrap();
    let a = store.create_category("a").unwrap();
    store.update_category(b, "renamed").unwrap();

    let ids: Vec<_> = store
        .get_categories()
        .unwrap()
        .into_iter()
        .map(|category| category.id)
        .collect();
    assert_eq!(ids, vec![b, a]);
}

#[test]
fn snapshots_are_unaffected_by_later_mutations() {
    let conn = setup();
    let store = SqliteWikiService::try_from_connection(&conn).unwrap();

    let page = store.create_page(Some("before"), None).unwrap();
    let snapshot = store.get_pages().unwrap();

    store
        .update_page(
            page,
            &PagePatch::from_optional(Some("after".to_string()), None, None),
        )
        .unwrap();
    store.create_page(None, None).unwrap();

    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].title.as_deref(), Some("before"));
}
