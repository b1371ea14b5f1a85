// src/db.rs

use crate::error::{DiaryError, Result};
use crate::models::{Entry, EntrySummary, NewEntry};
use chrono::{DateTime, FixedOffset, SecondsFormat};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

/// 获取数据库文件的标准路径 (~/.config/diary/diary.db)
pub fn get_db_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or(DiaryError::HomeDirNotFound)?;
    Ok(home_dir.join(".config/diary/diary.db"))
}

/// 打开已存在的数据库文件
pub fn open_connection(db_path: &Path) -> Result<Connection> {
    Connection::open(db_path).map_err(DiaryError::Sql)
}

/// 初始化数据库，创建目录和 entries 表
pub fn initialize_db(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let conn = Connection::open(db_path)?;
    create_schema(&conn)?;
    Ok(conn)
}

/// 在已打开的连接上建表
pub fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            body TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

/// 时间戳以带偏移的 RFC3339 字符串存储
pub fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// 列出所有条目（不含正文），按 id 倒序
pub fn list_entries(conn: &Connection) -> Result<Vec<EntrySummary>> {
    let mut stmt =
        conn.prepare("SELECT id, title, created_at, updated_at FROM entries ORDER BY id DESC")?;
    let entries = stmt
        .query_map([], |row| {
            Ok(EntrySummary {
                id: row.get(0)?,
                title: row.get(1)?,
                created_at: row.get(2)?,
                updated_at: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(entries)
}

/// 按 id 读取完整条目
pub fn get_entry(conn: &Connection, id: i64) -> Result<Option<Entry>> {
    let entry = conn
        .query_row(
            "SELECT id, title, body, created_at, updated_at FROM entries WHERE id = ?",
            [id],
            |row| {
                Ok(Entry {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    body: row.get(2)?,
                    created_at: row.get(3)?,
                    updated_at: row.get(4)?,
                })
            },
        )
        .optional()?;
    Ok(entry)
}

/// 插入新条目并返回其 id
pub fn create_entry(conn: &Connection, entry: &NewEntry, now: &DateTime<FixedOffset>) -> Result<i64> {
    conn.execute(
        "INSERT INTO entries (title, body, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            entry.title,
            entry.body,
            format_timestamp(&entry.created_at),
            format_timestamp(now)
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// 更新条目（id 除外的所有字段）
pub fn update_entry(
    conn: &Connection,
    id: i64,
    entry: &NewEntry,
    now: &DateTime<FixedOffset>,
) -> Result<usize> {
    let count = conn.execute(
        "UPDATE entries SET title = ?1, body = ?2, created_at = ?3, updated_at = ?4 WHERE id = ?5",
        params![
            entry.title,
            entry.body,
            format_timestamp(&entry.created_at),
            format_timestamp(now),
            id
        ],
    )?;
    Ok(count)
}

/// 按 id 删除条目
pub fn delete_entry(conn: &Connection, id: i64) -> Result<usize> {
    let count = conn.execute("DELETE FROM entries WHERE id = ?", [id])?;
    Ok(count)
}
