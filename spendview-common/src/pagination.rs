use serde::Serialize;

/// Page math shared by every paginated endpoint. The invariants hold whether
/// `total_count` came from a warehouse COUNT query or from the length of an
/// in-memory filtered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub total_count: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PaginationError {
    #[error("per_page must be positive")]
    NonPositivePerPage,
    #[error("offset must be non-negative")]
    NegativeOffset,
}

impl PageInfo {
    /// `total_pages = ceil(total_count / per_page)`;
    /// `page = offset / per_page + 1`. A zero `total_count` gives zero pages
    /// with `has_previous` still evaluated against the computed page.
    pub fn compute(total_count: i64, per_page: i64, offset: i64) -> Result<Self, PaginationError> {
        if per_page <= 0 {
            return Err(PaginationError::NonPositivePerPage);
        }
        if offset < 0 {
            return Err(PaginationError::NegativeOffset);
        }
        let total_pages = (total_count + per_page - 1) / per_page;
        let page = offset / per_page + 1;
        Ok(Self {
            total_count,
            page,
            per_page,
            total_pages,
            has_next: page < total_pages,
            has_previous: page > 1,
        })
    }
}

/// Paginated response envelope.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total_count: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, info: PageInfo) -> Self {
        Self {
            data,
            total_count: info.total_count,
            page: info.page,
            per_page: info.per_page,
            total_pages: info.total_pages,
            has_next: info.has_next,
            has_previous: info.has_previous,
        }
    }
}
