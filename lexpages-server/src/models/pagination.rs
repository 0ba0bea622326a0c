//! Pagination types

use serde::Serialize;

/// Questions per page of the public listing
pub const QUESTIONS_PER_PAGE: u32 = 10;

/// Maximum items per page
const MAX_PER_PAGE: u32 = 100;

/// Pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page number (1-indexed)
    pub page: u32,
    /// Items per page (max 100)
    pub per_page: u32,
}

impl Pagination {
    /// Create pagination with validation.
    ///
    /// - Page is clamped to minimum of 1
    /// - Per page is clamped to 1..=100
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// Page `n` of the question listing, read from a raw `?page=` value.
    ///
    /// A missing or non-numeric value means the first page; zero and
    /// negative numbers have no page at all.
    pub fn questions(raw: Option<&str>) -> Option<Self> {
        let number = match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => 1,
            Some(s) => s.parse::<i64>().unwrap_or(1),
        };
        let number = u32::try_from(number).ok().filter(|n| *n >= 1)?;
        Some(Self::new(number, QUESTIONS_PER_PAGE))
    }

    /// Calculate SQL OFFSET value.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }

    /// Get LIMIT value.
    pub fn limit(&self) -> u32 {
        self.per_page
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: QUESTIONS_PER_PAGE,
        }
    }
}

/// Paginated result
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    /// Items for current page
    pub items: Vec<T>,
    /// Total count across all pages
    pub total: i64,
    /// Current page number
    pub page: u32,
    /// Items per page
    pub per_page: u32,
}

impl<T> Paginated<T> {
    /// Calculate total number of pages.
    pub fn total_pages(&self) -> u32 {
        if self.total <= 0 {
            1
        } else {
            let per_page = i64::from(self.per_page.max(1));
            u32::try_from((self.total + per_page - 1) / per_page).unwrap_or(u32::MAX)
        }
    }

    /// Check if there's a next page.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Check if there's a previous page.
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paginated(total: i64, page: u32) -> Paginated<()> {
        Paginated {
            items: vec![],
            total,
            page,
            per_page: 10,
        }
    }

    #[test]
    fn offset_calculation() {
        assert_eq!(Pagination::new(1, 10).offset(), 0);
        assert_eq!(Pagination::new(2, 10).offset(), 10);
        assert_eq!(Pagination::new(3, 25).offset(), 50);
    }

    #[test]
    fn question_page_parsing() {
        assert_eq!(Pagination::questions(None), Some(Pagination::new(1, 10)));
        assert_eq!(Pagination::questions(Some("")), Some(Pagination::new(1, 10)));
        assert_eq!(Pagination::questions(Some("abc")), Some(Pagination::new(1, 10)));
        assert_eq!(Pagination::questions(Some("3")).map(|p| p.page), Some(3));
        assert_eq!(Pagination::questions(Some("0")), None);
        assert_eq!(Pagination::questions(Some("-2")), None);
    }

    #[test]
    fn clamps_per_page() {
        assert_eq!(Pagination::new(1, 0).per_page, 1);
        assert_eq!(Pagination::new(1, 999).per_page, 100);
    }

    #[test]
    fn total_pages() {
        assert_eq!(paginated(0, 1).total_pages(), 1);
        assert_eq!(paginated(25, 1).total_pages(), 3);
        assert_eq!(paginated(100, 1).total_pages(), 10);
    }

    #[test]
    fn has_next_prev() {
        assert!(paginated(30, 1).has_next());
        assert!(!paginated(30, 1).has_prev());
        assert!(paginated(30, 2).has_next() && paginated(30, 2).has_prev());
        assert!(!paginated(30, 3).has_next());
    }
}
