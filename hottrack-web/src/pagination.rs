//! Fixed-size paging over song listings
//!
//! Every listing pages by ten songs. Out-of-range page numbers are clamped
//! rather than rejected.

/// Songs per page
pub const PAGE_SIZE: i64 = 10;

/// A resolved page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-indexed page actually served
    pub page: i64,
    /// Zero when there are no results
    pub total_pages: i64,
    /// Row offset for `LIMIT PAGE_SIZE OFFSET offset`
    pub offset: i64,
}

impl Pagination {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Resolve `requested_page` against `total_results`
///
/// ```
/// use hottrack_web::pagination::calculate_pagination;
///
/// // 23 songs: pages of 10, 10 and 3
/// let p = calculate_pagination(23, 3);
/// assert_eq!((p.page, p.total_pages, p.offset), (3, 3, 20));
/// assert!(!p.has_next());
///
/// // Page 0 and page 99 land on the first and last pages
/// assert_eq!(calculate_pagination(23, 0).page, 1);
/// assert_eq!(calculate_pagination(23, 99).page, 3);
/// ```
pub fn calculate_pagination(total_results: i64, requested_page: i64) -> Pagination {
    let total_pages = if total_results <= 0 {
        0
    } else {
        (total_results + PAGE_SIZE - 1) / PAGE_SIZE
    };
    let page = requested_page.clamp(1, total_pages.max(1));

    Pagination {
        page,
        total_pages,
        offset: (page - 1) * PAGE_SIZE,
    }
}
