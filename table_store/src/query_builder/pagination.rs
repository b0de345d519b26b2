//! Paging and sorting requests

use super::ordering::SortOrder;

/// A page request: optional limit and offset plus sort entries by column name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pageable {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub sort: Vec<(String, SortOrder)>,
}

impl Pageable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page `page` (zero-based) of `size` rows
    pub fn of(page: i64, size: i64) -> Self {
        Self::new()
            .with_limit(size)
            .with_offset(page.saturating_mul(size))
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn sort_by(mut self, column: &str, order: SortOrder) -> Self {
        self.sort.push((column.to_string(), order));
        self
    }
}
