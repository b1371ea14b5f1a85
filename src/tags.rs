// src/tags.rs

use crate::models::{EntrySummary, ParsedTitle, TaggedEntry};
use indexmap::IndexMap;
use regex::Regex;
use std::cmp::Ordering;
use std::sync::OnceLock;

/// Tag given to entries whose title carries no `[tag]` group.
pub const UNCATEGORIZED: &str = "未分類";

/// A tag and the number of entries carrying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

const BLANKS: &[char] = &[' ', '\t', '\n', '\r', '\0', '\x0B'];

/// Strip ASCII blanks from both ends. Wide spaces such as U+3000 are kept.
pub fn trim_blank(s: &str) -> &str {
    s.trim_matches(BLANKS)
}

fn tag_pattern() -> &'static Regex {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    TAG_RE.get_or_init(|| Regex::new(r"\[([^\[\]]+)\]").expect("tag pattern is valid"))
}

fn strip_pattern() -> &'static Regex {
    static STRIP_RE: OnceLock<Regex> = OnceLock::new();
    STRIP_RE.get_or_init(|| Regex::new(r"\s*\[[^\[\]]+\]\s*").expect("strip pattern is valid"))
}

/// 从标题中解析 `[tag]`，例如 `"散歩した[health][work]"` -> `["health", "work"]`
pub fn parse_title(title: &str) -> ParsedTitle {
    let mut tags: Vec<String> = Vec::new();
    for caps in tag_pattern().captures_iter(title) {
        let t = trim_blank(&caps[1]);
        if !t.is_empty() && !tags.iter().any(|seen| seen == t) {
            tags.push(t.to_string());
        }
    }

    if tags.is_empty() {
        return ParsedTitle {
            tags: vec![UNCATEGORIZED.to_string()],
            display_title: title.to_string(),
        };
    }

    let stripped = strip_pattern().replace_all(title, " ");
    let display = trim_blank(&stripped);
    let display_title = if display.is_empty() {
        title.to_string()
    } else {
        display.to_string()
    };

    ParsedTitle { tags, display_title }
}

/// Attach parsed tags to list rows, keeping their order.
pub fn tag_entries(rows: Vec<EntrySummary>) -> Vec<TaggedEntry> {
    rows.into_iter()
        .map(|row| {
            let ParsedTitle { tags, display_title } = parse_title(&row.title);
            TaggedEntry {
                id: row.id,
                title: row.title,
                display_title,
                tags,
                created_at: row.created_at,
                updated_at: row.updated_at,
            }
        })
        .collect()
}

/// Count entries per tag, [`UNCATEGORIZED`] last.
pub fn count_tags(entries: &[TaggedEntry]) -> Vec<TagCount> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for entry in entries {
        for tag in &entry.tags {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }

    let mut ordered: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, count)| TagCount {
            tag: tag.to_string(),
            count,
        })
        .collect();
    ordered.sort_by(|a, b| compare_tags(&a.tag, &b.tag));
    ordered
}

fn compare_tags(a: &str, b: &str) -> Ordering {
    match (a == UNCATEGORIZED, b == UNCATEGORIZED) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => natural_cmp_ignore_case(a, b),
    }
}

/// Keep only entries carrying `tag`. An empty tag means no filter.
pub fn filter_by_tag(entries: Vec<TaggedEntry>, tag: &str) -> Vec<TaggedEntry> {
    if tag.is_empty() {
        return entries;
    }
    entries
        .into_iter()
        .filter(|e| e.tags.iter().any(|t| t == tag))
        .collect()
}

/// 忽略大小写的自然排序 (`"day2"` < `"day10"`)
pub fn natural_cmp_ignore_case(a: &str, b: &str) -> Ordering {
    let mut ai = a.chars().peekable();
    let mut bi = b.chars().peekable();

    loop {
        let (ca, cb) = match (ai.peek().copied(), bi.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) => (ca, cb),
        };

        if ca.is_ascii_digit() && cb.is_ascii_digit() {
            let run_a = take_digits(&mut ai);
            let run_b = take_digits(&mut bi);
            let ord = compare_digit_runs(&run_a, &run_b);
            if ord != Ordering::Equal {
                return ord;
            }
            continue;
        }

        let ord = ca.to_lowercase().cmp(cb.to_lowercase());
        if ord != Ordering::Equal {
            return ord;
        }
        ai.next();
        bi.next();
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
