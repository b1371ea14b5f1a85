// src/models.rs

use chrono::{DateTime, FixedOffset};

/// 列表中的一行，不含正文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySummary {
    pub id: i64,
    pub title: String,
    pub created_at: String, // RFC3339 with offset
    pub updated_at: String,
}

/// 完整条目，仅在详情栏显示时读取
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Tags and display title derived from a raw title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTitle {
    pub tags: Vec<String>,
    pub display_title: String,
}

/// A list row together with its parsed title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedEntry {
    pub id: i64,
    pub title: String,
    pub display_title: String,
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Validated fields for an insert or update.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub title: String,
    pub body: String,
    pub created_at: DateTime<FixedOffset>,
}
