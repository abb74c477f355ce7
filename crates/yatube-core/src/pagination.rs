//! Fixed-size pagination over newest-first post listings.
//!
//! Out-of-range requests never fail: a missing, malformed or non-positive page
//! number resolves to the first page, and a number past the end resolves to the
//! last page. An empty listing still has one (empty) page.

use serde::Serialize;

/// Number of posts shown on every listing page.
pub const POSTS_PER_PAGE: u64 = 10;

/// Parse a raw `?page=` value, falling back to the first page.
///
/// Digit strings too large for `u64` saturate, so they still land on the
/// last page once resolved.
pub fn parse_page_number(raw: Option<&str>) -> u64 {
    raw.map(str::trim)
        .and_then(|s| match s.parse::<u64>() {
            Ok(n) => Some(n),
            Err(_) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => Some(u64::MAX),
            Err(_) => None,
        })
        .filter(|n| *n > 0)
        .unwrap_or(1)
}

/// The resolved position of one page inside a listing of `count` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
    pub per_page: u64,
}

impl PageWindow {
    pub fn resolve(count: u64, per_page: u64, requested: Option<&str>) -> Self {
        let per_page = per_page.max(1);
        let num_pages = count.div_ceil(per_page).max(1);
        let number = parse_page_number(requested).min(num_pages);

        Self {
            number,
            num_pages,
            count,
            per_page,
        }
    }

    /// Index of the first item on this page.
    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.per_page
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// One page of a listing plus what navigation needs to render.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub object_list: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_number: Option<u64>,
    pub previous_page_number: Option<u64>,
}

impl<T> Page<T> {
    pub fn new(object_list: Vec<T>, window: PageWindow) -> Self {
        Self {
            object_list,
            number: window.number,
            num_pages: window.num_pages,
            count: window.count,
            has_next: window.has_next(),
            has_previous: window.has_previous(),
            next_page_number: window.has_next().then(|| window.number + 1),
            previous_page_number: window.has_previous().then(|| window.number - 1),
        }
    }

    pub fn len(&self) -> usize {
        self.object_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.object_list.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            object_list: self.object_list.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            has_next: self.has_next,
            has_previous: self.has_previous,
            next_page_number: self.next_page_number,
            previous_page_number: self.previous_page_number,
        }
    }
}

/// Slice an already ordered in-memory sequence.
pub fn paginate<T>(items: Vec<T>, requested: Option<&str>, per_page: u64) -> Page<T> {
    let window = PageWindow::resolve(items.len() as u64, per_page, requested);
    let object_list = items
        .into_iter()
        .skip(window.offset() as usize)
        .take(window.per_page as usize)
        .collect();

    Page::new(object_list, window)
}
