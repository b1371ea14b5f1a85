// src/commands.rs

use crate::cli::ServeArgs;
use crate::config::Settings;
use crate::db;
use crate::error::{DiaryError, Result};
use crate::listing::{Catalog, Selection};
use crate::server;
use crate::session;
use crate::tags;
use rusqlite::Connection;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

fn resolve_db_path(db: Option<PathBuf>) -> Result<PathBuf> {
    match db {
        Some(p) => Ok(p),
        None => db::get_db_path(),
    }
}

fn open_existing(db_path: &Path) -> Result<Connection> {
    if !db_path.exists() {
        return Err(DiaryError::InvalidInput(format!(
            "No database at {}. Run `diary init` first.",
            db_path.display()
        )));
    }
    db::open_connection(db_path)
}

/// 处理 'init' 命令
pub fn handle_init(db: Option<PathBuf>) -> Result<()> {
    let db_path = resolve_db_path(db)?;
    db::initialize_db(&db_path)?;
    println!("✓ Database initialized successfully at: {}", db_path.display());
    Ok(())
}

/// 处理 'serve' 命令
pub async fn handle_serve(args: ServeArgs) -> Result<()> {
    let settings = Settings::from_args(&args)?;
    server::serve(settings).await
}

/// 处理 'hash-password' 命令
pub fn handle_hash_password(password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => {
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    if password.is_empty() {
        return Err(DiaryError::InvalidInput("Password must not be empty.".to_string()));
    }

    println!("{}", session::hash_password(&password));
    Ok(())
}

/// 处理 'list' 命令
pub fn handle_list(db: Option<PathBuf>, tag: Option<String>, page: Option<usize>) -> Result<()> {
    let db_path = resolve_db_path(db)?;
    let conn = open_existing(&db_path)?;
    let selection = Selection {
        tag: tag.map(|t| tags::trim_blank(&t).to_string()).unwrap_or_default(),
        id: 0,
        page: page.map(|p| p.max(1)),
    };
    let listing = Catalog::build(db::list_entries(&conn)?, &selection.tag)
        .paginate(crate::paging::DEFAULT_PAGE_SIZE, &selection);

    let tags_line: Vec<String> = listing
        .catalog
        .tag_counts
        .iter()
        .map(|c| format!("{} ({})", c.tag, c.count))
        .collect();
    println!("All ({}) | {}", listing.catalog.total_entries, tags_line.join(" | "));
    println!("{}", "─".repeat(40));

    if listing.page_items().is_empty() {
        println!("No entries found.");
        return Ok(());
    }

    for e in listing.page_items() {
        println!("[{}] {} {} | Tags: {}", e.id, e.created_at, e.display_title, e.tags.join(", "));
    }
    println!("{}", "─".repeat(40));
    println!("Page {} / {}", listing.page, listing.total_pages);
    Ok(())
}

/// 处理 'show' 命令
pub fn handle_show(db: Option<PathBuf>, id: i64) -> Result<()> {
    let db_path = resolve_db_path(db)?;
    let conn = open_existing(&db_path)?;
    let entry = db::get_entry(&conn, id)?.ok_or(DiaryError::EntryNotFound(id))?;
    let parsed = tags::parse_title(&entry.title);

    println!("[{}] {}", entry.id, parsed.display_title);
    println!("Tags: {}", parsed.tags.join(", "));
    println!("Created: {} | Updated: {}", entry.created_at, entry.updated_at);
    println!("{}", "─".repeat(40));
    println!("{}", entry.body.trim_end());
    Ok(())
}
