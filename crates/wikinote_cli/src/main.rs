//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `wikinote_core` linkage and database bootstrap without the FFI runtime.
//! - Print a deterministic store summary for quick local sanity checks.
//!
//! Usage: `wikinote_cli [DB_PATH]`. Without an argument the path comes from
//! `WIKINOTE_DB_PATH`, falling back to an in-memory database. Setting
//! `WIKINOTE_LOG_DIR` to an absolute directory enables file logging at the
//! build's default level.

use rusqlite::Connection;
use std::process::ExitCode;
use wikinote_core::db::migrations::latest_version;
use wikinote_core::db::{open_db, open_db_in_memory, DbResult};
use wikinote_core::{default_log_level, init_logging, SqliteWikiService, StoreResult};

fn main() -> ExitCode {
    println!("wikinote_core ping={}", wikinote_core::ping());
    println!("wikinote_core version={}", wikinote_core::core_version());
    println!("wikinote_core schema_version={}", latest_version());
    init_logging_from_env();

    let conn = match open_connection() {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("database open failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    let store = match SqliteWikiService::try_from_connection(&conn) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("store init failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    match print_summary(&store) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("store read failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging_from_env() {
    let Some(log_dir) = std::env::var("WIKINOTE_LOG_DIR")
        .ok()
        .filter(|value| !value.trim().is_empty())
    else {
        return;
    };
    let level = default_log_level();
    match init_logging(level, log_dir.trim()) {
        Ok(()) => println!("wikinote_core log_level={level} log_dir={}", log_dir.trim()),
        Err(err) => eprintln!("logging init failed: {err}"),
    }
}

fn open_connection() -> DbResult<Connection> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("WIKINOTE_DB_PATH").ok())
        .filter(|value| !value.trim().is_empty());
    match path {
        Some(path) => {
            println!("wikinote_core db={path}");
            open_db(path.trim())
        }
        None => {
            println!("wikinote_core db=:memory:");
            open_db_in_memory()
        }
    }
}

fn print_summary(store: &SqliteWikiService<'_>) -> StoreResult<()> {
    let groups = store.group_pages_by_category()?;
    let orphans = store.list_orphaned_pages()?;
    println!(
        "wikinote_core categories={} pages={} orphaned_pages={}",
        groups.iter().filter(|group| group.category.is_some()).count(),
        groups.iter().map(|group| group.pages.len()).sum::<usize>(),
        orphans.len()
    );
    for group in &groups {
        let label = group
            .category
            .as_ref()
            .map_or("(uncategorized)", |category| category.name.as_str());
        println!("  {label}: {} page(s)", group.pages.len());
    }
    Ok(())
}
