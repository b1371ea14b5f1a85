// src/listing.rs

use crate::error::Result;
use crate::models::{EntrySummary, TaggedEntry};
use crate::paging::{self, ActiveChoice};
use crate::tags::{self, TagCount};
use std::ops::Range;

/// What a request asked to see.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Empty means every tag.
    pub tag: String,
    /// 0 means nothing selected.
    pub id: i64,
    /// `None` when the request did not name a page.
    pub page: Option<usize>,
}

impl Selection {
    /// Build a selection from raw query values.
    pub fn from_query(id: Option<&str>, tag: Option<&str>, page: Option<&str>) -> Self {
        Selection {
            tag: tag.map(|t| tags::trim_blank(t).to_string()).unwrap_or_default(),
            id: id.map(parse_int_param).unwrap_or(0),
            page: page.map(|p| parse_int_param(p).max(1) as usize),
        }
    }
}

/// 读取开头的整数 (`"12abc"` -> 12, `"abc"` -> 0)
pub fn parse_int_param(raw: &str) -> i64 {
    let s = raw.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().unwrap_or(if end == 0 { 0 } else { i64::MAX });
    if negative {
        -value
    } else {
        value
    }
}

/// Every entry parsed, counted per tag and filtered by the selected tag.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Number of entries before filtering.
    pub total_entries: usize,
    pub tag_counts: Vec<TagCount>,
    /// Entries carrying the selected tag, newest first.
    pub filtered: Vec<TaggedEntry>,
}

impl Catalog {
    /// `rows` must come from the store newest id first.
    pub fn build(rows: Vec<EntrySummary>, selected_tag: &str) -> Self {
        let entries = tags::tag_entries(rows);
        let total_entries = entries.len();
        let tag_counts = tags::count_tags(&entries);
        let filtered = tags::filter_by_tag(entries, selected_tag);
        Catalog {
            total_entries,
            tag_counts,
            filtered,
        }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.filtered.iter().any(|e| e.id == id)
    }

    /// Cut the filtered entries into pages and keep the one to show.
    pub fn paginate(self, page_size: usize, selection: &Selection) -> Listing {
        let target = (selection.id > 0).then_some(selection.id);
        let page = paging::paginate(&self.filtered, page_size, selection.page, target);
        let start = ((page.page - 1) * page_size.max(1)).min(self.filtered.len());
        let range = start..start + page.items.len();
        let (page_no, total_pages) = (page.page, page.total_pages);

        tracing::debug!(
            tag = %selection.tag,
            filtered = self.filtered.len(),
            page = page_no,
            total_pages,
            "listing built"
        );

        Listing {
            catalog: self,
            page: page_no,
            total_pages,
            range,
        }
    }
}

/// A catalog narrowed to one page.
#[derive(Debug, Clone)]
pub struct Listing {
    pub catalog: Catalog,
    pub page: usize,
    pub total_pages: usize,
    range: Range<usize>,
}

impl Listing {
    pub fn page_items(&self) -> &[TaggedEntry] {
        &self.catalog.filtered[self.range.clone()]
    }

    pub fn has_newer(&self) -> bool {
        self.page > 1
    }

    pub fn has_older(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn resolve_active(&self, selected_id: i64) -> Option<ActiveChoice> {
        paging::resolve_active(&self.catalog.filtered, self.page_items(), selected_id)
    }

    /// Fetch the detail row for the active entry; see [`paging::load_active`].
    pub fn load_active<E, F>(&self, selected_id: i64, fetch: F) -> Result<Option<(i64, E)>>
    where
        F: FnMut(i64) -> Result<Option<E>>,
    {
        paging::load_active(&self.catalog.filtered, self.page_items(), selected_id, fetch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::UNCATEGORIZED;

    fn summary(id: i64, title: &str) -> EntrySummary {
        EntrySummary {
            id,
            title: title.to_string(),
            created_at: "2024-01-01T00:00:00+09:00".to_string(),
            updated_at: "2024-01-01T00:00:00+09:00".to_string(),
        }
    }

    /// 25 entries, ids 25..=1; odd ids are tagged [odd], every fifth [five].
    fn rows() -> Vec<EntrySummary> {
        (1..=25)
            .rev()
            .map(|id| {
                let mut title = format!("entry {id}");
                if id % 2 == 1 {
                    title.push_str("[odd]");
                }
                if id % 5 == 0 {
                    title.push_str("[five]");
                }
                summary(id, &title)
            })
            .collect()
    }

    #[test]
    fn test_parse_int_param() {
        assert_eq!(parse_int_param("12"), 12);
        assert_eq!(parse_int_param(" 7 "), 7);
        assert_eq!(parse_int_param("12abc"), 12);
        assert_eq!(parse_int_param("abc"), 0);
        assert_eq!(parse_int_param(""), 0);
        assert_eq!(parse_int_param("-3"), -3);
    }

    #[test]
    fn test_selection_from_query() {
        let s = Selection::from_query(Some("x"), Some("  work "), Some("0"));
        assert_eq!(s.id, 0);
        assert_eq!(s.tag, "work");
        assert_eq!(s.page, Some(1));

        let s = Selection::from_query(None, None, None);
        assert_eq!(s, Selection::default());

        let s = Selection::from_query(None, Some("\u{3000}旅\u{3000}"), None);
        assert_eq!(s.tag, "\u{3000}旅\u{3000}");
    }

    #[test]
    fn test_catalog_counts_and_filter() {
        let catalog = Catalog::build(rows(), "five");
        assert_eq!(catalog.total_entries, 25);
        let ids: Vec<i64> = catalog.filtered.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![25, 20, 15, 10, 5]);

        let names: Vec<&str> = catalog.tag_counts.iter().map(|c| c.tag.as_str()).collect();
        assert_eq!(names, vec!["five", "odd", UNCATEGORIZED]);
        let counts: Vec<usize> = catalog.tag_counts.iter().map(|c| c.count).collect();
        assert_eq!(counts, vec![5, 13, 10]);
    }

    #[test]
    fn test_listing_jumps_to_selected_entry() {
        let selection = Selection::from_query(Some("13"), None, None);
        let listing = Catalog::build(rows(), &selection.tag).paginate(10, &selection);
        assert_eq!(listing.page, 2);
        assert_eq!(listing.total_pages, 3);
        assert_eq!(listing.page_items().first().map(|e| e.id), Some(15));
        assert_eq!(listing.resolve_active(selection.id), Some(ActiveChoice::Selected(13)));
    }

    #[test]
    fn test_listing_keeps_requested_page_for_off_page_selection() {
        let selection = Selection::from_query(Some("3"), None, Some("1"));
        let listing = Catalog::build(rows(), "").paginate(10, &selection);
        assert_eq!(listing.page, 1);
        assert!(listing.page_items().iter().all(|e| e.id != 3));
        assert_eq!(listing.resolve_active(3), Some(ActiveChoice::Selected(3)));
        assert!(!listing.has_newer());
        assert!(listing.has_older());
    }

    #[test]
    fn test_listing_ignores_selection_outside_filter() {
        let selection = Selection::from_query(Some("4"), Some("odd"), None);
        let listing = Catalog::build(rows(), &selection.tag).paginate(10, &selection);
        assert_eq!(listing.page, 1);
        assert_eq!(listing.total_pages, 2);
        assert_eq!(listing.resolve_active(4), Some(ActiveChoice::FirstOnPage(25)));
    }

    #[test]
    fn test_listing_of_unknown_tag_is_empty() {
        let selection = Selection::from_query(None, Some("nope"), Some("5"));
        let listing = Catalog::build(rows(), &selection.tag).paginate(10, &selection);
        assert_eq!(listing.page, 1);
        assert_eq!(listing.total_pages, 1);
        assert!(listing.page_items().is_empty());
        assert_eq!(listing.resolve_active(0), None);
        assert_eq!(listing.catalog.total_entries, 25);
    }
}
