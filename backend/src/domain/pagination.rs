//! Page/limit pagination primitives shared by list endpoints.

use serde::Serialize;
use utoipa::ToSchema;

/// Default page size applied when the client omits `limit`.
pub const DEFAULT_LIMIT: u32 = 20;
/// Upper bound on page size to keep result sets predictable.
pub const MAX_LIMIT: u32 = 100;

/// A requested page, normalised to sane bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Clamp raw client input: pages start at 1, limits fall in `1..=MAX_LIMIT`.
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        Self { page, limit }
    }

    /// 1-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Rows per page.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Row offset for SQL `OFFSET`.
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Pagination envelope returned alongside list payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: i64,
}

impl PageInfo {
    /// Derive the envelope from a total row count and the requested page.
    pub fn new(total: i64, request: &PageRequest) -> Self {
        let limit = i64::from(request.limit());
        let total_pages = if total <= 0 { 0 } else { (total + limit - 1) / limit };
        Self {
            total,
            page: request.page(),
            limit: request.limit(),
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None, 1, DEFAULT_LIMIT)]
    #[case(Some(0), Some(0), 1, 1)]
    #[case(Some(3), Some(250), 3, MAX_LIMIT)]
    fn page_request_clamps_input(
        #[case] page: Option<u32>,
        #[case] limit: Option<u32>,
        #[case] expected_page: u32,
        #[case] expected_limit: u32,
    ) {
        let request = PageRequest::new(page, limit);
        assert_eq!(request.page(), expected_page);
        assert_eq!(request.limit(), expected_limit);
    }

    #[rstest]
    fn offset_skips_previous_pages() {
        let request = PageRequest::new(Some(3), Some(25));
        assert_eq!(request.offset(), 50);
    }

    #[rstest]
    #[case(0, 20, 0)]
    #[case(1, 20, 1)]
    #[case(41, 20, 3)]
    fn page_info_rounds_total_pages_up(
        #[case] total: i64,
        #[case] limit: u32,
        #[case] expected_pages: i64,
    ) {
        let info = PageInfo::new(total, &PageRequest::new(Some(1), Some(limit)));
        assert_eq!(info.total_pages, expected_pages);
    }
}
