// src/paging.rs

use crate::error::Result;
use crate::models::{EntrySummary, TaggedEntry};

/// Number of entries listed per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Anything that can be located by entry id.
pub trait Identified {
    fn id(&self) -> i64;
}

impl Identified for TaggedEntry {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for EntrySummary {
    fn id(&self) -> i64 {
        self.id
    }
}

/// One page of an already filtered, newest-first sequence.
#[derive(Debug, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-indexed, always within `1..=total_pages`.
    pub page: usize,
    pub total_pages: usize,
}

impl<T> Page<'_, T> {
    /// Whether a page of newer entries exists before this one.
    pub fn has_newer(&self) -> bool {
        self.page > 1
    }

    /// Whether a page of older entries exists after this one.
    pub fn has_older(&self) -> bool {
        self.page < self.total_pages
    }
}

/// `max(1, ceil(total / page_size))`
pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// 分页；未指定页码时跳到 `target_id` 所在页
pub fn paginate<'a, T: Identified>(
    items: &'a [T],
    page_size: usize,
    requested: Option<usize>,
    target_id: Option<i64>,
) -> Page<'a, T> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(items.len(), page_size);

    let mut page = requested.unwrap_or(1);
    if requested.is_none() {
        if let Some(index) = target_id
            .filter(|id| *id > 0)
            .and_then(|id| items.iter().position(|e| e.id() == id))
        {
            page = index / page_size + 1;
        }
    }
    let page = page.clamp(1, total_pages);

    let start = ((page - 1) * page_size).min(items.len());
    let end = (start + page_size).min(items.len());

    Page {
        items: &items[start..end],
        page,
        total_pages,
    }
}

/// Why an entry was picked for the detail pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveChoice {
    /// The requested id, found somewhere in the filtered sequence.
    Selected(i64),
    /// Nothing usable was requested; the newest entry on the page.
    FirstOnPage(i64),
}

impl ActiveChoice {
    pub fn id(&self) -> i64 {
        match *self {
            ActiveChoice::Selected(id) | ActiveChoice::FirstOnPage(id) => id,
        }
    }
}

/// Decide which entry the detail pane shows.
pub fn resolve_active<T: Identified>(
    filtered: &[T],
    page_items: &[T],
    selected_id: i64,
) -> Option<ActiveChoice> {
    if selected_id > 0 && filtered.iter().any(|e| e.id() == selected_id) {
        return Some(ActiveChoice::Selected(selected_id));
    }
    page_items.first().map(|e| ActiveChoice::FirstOnPage(e.id()))
}

/// Resolve the active entry and fetch its full row, falling back to the page head.
pub fn load_active<T, E, F>(
    filtered: &[T],
    page_items: &[T],
    selected_id: i64,
    mut fetch: F,
) -> Result<Option<(i64, E)>>
where
    T: Identified,
    F: FnMut(i64) -> Result<Option<E>>,
{
    let choice = match resolve_active(filtered, page_items, selected_id) {
        Some(choice) => choice,
        None => return Ok(None),
    };

    if let Some(entry) = fetch(choice.id())? {
        return Ok(Some((choice.id(), entry)));
    }

    if let ActiveChoice::Selected(missing) = choice {
        tracing::debug!("selected entry {missing} vanished; falling back to page head");
        if let Some(first) = page_items.first().map(|e| e.id()) {
            if first != missing {
                if let Some(entry) = fetch(first)? {
                    return Ok(Some((first, entry)));
                }
            }
        }
    }

    Ok(None)
}
