//! Pagination query parameter extractor.

use serde::{Deserialize, Serialize};

use watchtower_core::types::pagination::PageRequest;
use watchtower_core::types::sorting::SortDirection;

/// Query parameters for paginated endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-based, default: 1).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page (default: 25, max: 100).
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    /// Sort direction: "asc" or "desc" (default: desc).
    pub sort_dir: Option<String>,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    25
}

impl PaginationParams {
    /// Converts to a `PageRequest`.
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page.max(1),
            page_size: self.per_page.clamp(1, 100),
        }
    }

    /// The requested sort direction, defaulting to descending.
    pub fn sort_direction(&self) -> SortDirection {
        match self.sort_dir.as_deref() {
            Some("asc") => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_clamps_per_page() {
        let params = PaginationParams {
            page: 0,
            per_page: 5000,
            sort_dir: None,
        };
        let req = params.page_request();
        assert_eq!(req.page, 1);
        assert_eq!(req.page_size, 100);
    }

    #[test]
    fn test_sort_direction_defaults_to_desc() {
        let mut params = PaginationParams {
            page: 1,
            per_page: 25,
            sort_dir: None,
        };
        assert_eq!(params.sort_direction(), SortDirection::Desc);
        params.sort_dir = Some("asc".to_string());
        assert_eq!(params.sort_direction(), SortDirection::Asc);
        params.sort_dir = Some("bogus".to_string());
        assert_eq!(params.sort_direction(), SortDirection::Desc);
    }
}
