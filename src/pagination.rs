//! Page windowing for list navigation.
//!
//! A list is split into fixed-size pages. Navigation shows a bounded window of
//! page links centered on the current page, clamped at both ends of the range.
//! Page *numbers* are 1-based ([`PageNumber`]); slice positions inside the
//! page range are 0-based indices (`window_start`, `window_end`).

use serde::Serialize;

pub const DEFAULT_PER_PAGE: u64 = 6;
pub const DEFAULT_WINDOW_SIZE: usize = 4;

/// Page size and navigation window size of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    per_page: u64,
    window_size: usize,
}

impl PaginationConfig {
    /// Zero values are raised to one.
    pub fn new(per_page: u64, window_size: usize) -> Self {
        Self {
            per_page: per_page.max(1),
            window_size: window_size.max(1),
        }
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PER_PAGE, DEFAULT_WINDOW_SIZE)
    }
}

/// A 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageNumber(u64);

impl PageNumber {
    pub const FIRST: PageNumber = PageNumber(1);

    pub fn new(number: u64) -> Option<Self> {
        (number >= 1).then_some(Self(number))
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// Position of this page inside the page range.
    pub fn index(self) -> u64 {
        self.0 - 1
    }
}

/// All page numbers `1..=total_pages` of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageRange {
    total_pages: u64,
}

impl PageRange {
    pub fn new(total_pages: u64) -> Self {
        Self { total_pages }
    }

    /// Number of pages needed for `item_count` items, `per_page` items each.
    pub fn for_items(item_count: u64, per_page: u64) -> Self {
        Self::new(item_count.div_ceil(per_page.max(1)))
    }

    pub fn len(&self) -> u64 {
        self.total_pages
    }

    pub fn is_empty(&self) -> bool {
        self.total_pages == 0
    }

    pub fn last(&self) -> Option<PageNumber> {
        PageNumber::new(self.total_pages)
    }

    pub fn numbers(&self) -> impl Iterator<Item = u64> {
        1..=self.total_pages
    }

    /// Moves a requested page into the range: below it resolves to the first
    /// page, above it to the last one. An empty range resolves to page 1.
    pub fn clamp(&self, requested: i64) -> PageNumber {
        match self.last() {
            None => PageNumber::FIRST,
            Some(_) if requested < 1 => PageNumber::FIRST,
            Some(last) => u64::try_from(requested)
                .ok()
                .and_then(PageNumber::new)
                .filter(|page| *page <= last)
                .unwrap_or(last),
        }
    }
}

/// Turns an untrusted page parameter into a page number. Missing or
/// non-numeric values become 1; the result is not range checked.
pub fn resolve_page(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .unwrap_or(1)
}

/// Navigation data for one page of a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct PaginationResult {
    /// Page numbers to render as navigation links
    pub window: Vec<u64>,
    #[serde(skip)]
    pub page_range: PageRange,
    pub window_size: usize,
    pub current_page: u64,
    pub total_pages: u64,
    /// Index of the first window entry inside the page range
    pub window_start: usize,
    /// Index one past the last window entry inside the page range
    pub window_end: usize,
    pub has_hidden_pages_before: bool,
    pub has_hidden_pages_after: bool,
}

/// Computes the navigation window around `current_page`.
///
/// The window holds `window_size` pages (all pages when there are fewer)
/// and is shifted right near the first page and left near the last page so
/// it never leaves the range.
pub fn build_pagination_range(
    page_range: PageRange,
    window_size: usize,
    current_page: PageNumber,
) -> PaginationResult {
    let total = i128::from(page_range.len());
    let size = window_size as i128;
    let half_window = (size + 1) / 2;
    let current = i128::from(current_page.get());

    let mut start = current - half_window;
    let mut stop = start + size;

    if start < 0 {
        stop += start.abs();
        start = 0;
    }

    if stop >= total {
        let offset = total - stop;
        start = (start - offset.abs()).max(0);
        stop = total;
    }

    // 0 <= start <= stop <= total holds from here on
    let window_start = start as u64;
    let window_end = stop as u64;

    PaginationResult {
        window: (window_start + 1..=window_end).collect(),
        page_range,
        window_size,
        current_page: current_page.get(),
        total_pages: page_range.len(),
        window_start: window_start as usize,
        window_end: window_end as usize,
        has_hidden_pages_before: current > half_window,
        has_hidden_pages_after: window_end < page_range.len(),
    }
}

/// Splits a slice into pages of a fixed size.
#[derive(Debug, Clone, Copy)]
pub struct Paginator<'a, T> {
    items: &'a [T],
    per_page: u64,
}

impl<'a, T> Paginator<'a, T> {
    pub fn new(items: &'a [T], per_page: u64) -> Self {
        Self {
            items,
            per_page: per_page.max(1),
        }
    }

    pub fn page_range(&self) -> PageRange {
        PageRange::for_items(self.items.len() as u64, self.per_page)
    }

    /// Returns the requested page, clamped into the page range.
    pub fn get_page(&self, requested: i64) -> Page<'a, T> {
        let number = self.page_range().clamp(requested);
        let per_page = self.per_page as usize;
        let first = (number.index() as usize).saturating_mul(per_page);
        let items = self
            .items
            .get(first..)
            .map(|rest| &rest[..rest.len().min(per_page)])
            .unwrap_or(&[]);
        Page { number, items }
    }
}

/// One page of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    number: PageNumber,
    items: &'a [T],
}

impl<'a, T> Page<'a, T> {
    pub fn number(&self) -> PageNumber {
        self.number
    }

    pub fn items(&self) -> &'a [T] {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Resolves `raw_page`, selects that page of `items` and builds its
/// navigation window.
pub fn paginate<'a, T>(
    raw_page: Option<&str>,
    items: &'a [T],
    config: &PaginationConfig,
) -> (Page<'a, T>, PaginationResult) {
    let paginator = Paginator::new(items, config.per_page());
    let page = paginator.get_page(resolve_page(raw_page));
    let range = build_pagination_range(paginator.page_range(), config.window_size(), page.number());
    (page, range)
}
