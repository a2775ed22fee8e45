//! Page-number pagination for post listings.

use serde::Serialize;

/// Default listing page size.
pub const DEFAULT_PER_PAGE: u64 = 10;

/// A requested page number, as given in `?page=`.
///
/// Lookup is forgiving: anything that is not a number yields the first page,
/// and numbers outside `1..=num_pages` yield the last page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    requested: Option<i64>,
    pub per_page: u64,
}

impl PageRequest {
    pub fn new(page: i64, per_page: u64) -> Self {
        Self {
            requested: Some(page),
            per_page: per_page.max(1),
        }
    }

    pub fn first(per_page: u64) -> Self {
        Self {
            requested: None,
            per_page: per_page.max(1),
        }
    }

    /// Parse a raw query parameter.
    pub fn parse(raw: Option<&str>, per_page: u64) -> Self {
        match raw.and_then(|s| s.trim().parse::<i64>().ok()) {
            Some(page) => Self::new(page, per_page),
            None => Self::first(per_page),
        }
    }

    /// Number of pages needed for `total_items`. Never zero.
    pub fn num_pages(&self, total_items: u64) -> u64 {
        total_items.div_ceil(self.per_page).max(1)
    }

    /// Resolve the 1-based page number to serve for `total_items`.
    pub fn resolve(&self, total_items: u64) -> u64 {
        let num_pages = self.num_pages(total_items);
        match self.requested {
            None => 1,
            Some(page) if page >= 1 && (page as u64) <= num_pages => page as u64,
            Some(_) => num_pages,
        }
    }

    /// Zero-based offset of the resolved page.
    pub fn offset(&self, total_items: u64) -> u64 {
        (self.resolve(total_items) - 1) * self.per_page
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub per_page: u64,
    pub total_items: u64,
    pub num_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, number: u64, per_page: u64, total_items: u64) -> Self {
        let num_pages = total_items.div_ceil(per_page.max(1)).max(1);
        Self {
            items,
            number,
            per_page,
            total_items,
            num_pages,
        }
    }

    /// Slice an already ordered, fully materialised listing.
    pub fn from_vec(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as u64;
        let number = request.resolve(total);
        let items = all
            .into_iter()
            .skip(request.offset(total) as usize)
            .take(request.per_page as usize)
            .collect();
        Self::new(items, number, request.per_page, total)
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            per_page: self.per_page,
            total_items: self.total_items,
            num_pages: self.num_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults_to_first_page() {
        assert_eq!(PageRequest::parse(None, 10).resolve(35), 1);
        assert_eq!(PageRequest::parse(Some("abc"), 10).resolve(35), 1);
        assert_eq!(PageRequest::parse(Some(""), 10).resolve(35), 1);
    }

    #[test]
    fn test_out_of_range_goes_to_last_page() {
        assert_eq!(PageRequest::parse(Some("99"), 10).resolve(35), 4);
        assert_eq!(PageRequest::parse(Some("0"), 10).resolve(35), 4);
        assert_eq!(PageRequest::parse(Some("-3"), 10).resolve(35), 4);
    }

    #[test]
    fn test_empty_listing_has_one_page() {
        let request = PageRequest::parse(Some("5"), 10);
        assert_eq!(request.num_pages(0), 1);
        assert_eq!(request.resolve(0), 1);
        assert_eq!(request.offset(0), 0);
    }

    #[test]
    fn test_from_vec_slices_requested_page() {
        let page = Page::from_vec((1..=25).collect(), PageRequest::new(3, 10));

        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.number, 3);
        assert_eq!(page.num_pages, 3);
        assert!(!page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn test_exact_multiple() {
        let page = Page::from_vec((1..=20).collect::<Vec<_>>(), PageRequest::new(2, 10));
        assert_eq!(page.num_pages, 2);
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.items[0], 11);
    }
}
