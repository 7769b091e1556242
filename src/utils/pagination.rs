//! Page/per-page handling shared by list endpoints

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Normalized pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    /// Page is 1-based; zero or missing values fall back to defaults
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.filter(|&p| p > 0).unwrap_or(1),
            per_page: per_page
                .filter(|&p| p > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .min(MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.per_page as i64
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_clamping() {
        assert_eq!(
            Pagination::new(None, None),
            Pagination { page: 1, per_page: 20 }
        );
        assert_eq!(Pagination::new(Some(0), Some(0)).page, 1);
        assert_eq!(Pagination::new(Some(2), Some(500)).per_page, 100);
    }

    #[test]
    fn test_offset() {
        let p = Pagination::new(Some(3), Some(10));
        assert_eq!(p.offset(), 20);
        assert_eq!(p.limit(), 10);
    }
}
