//! Pagination configuration.

use crate::request::OrderDirection;

/// Largest page a request may ask for.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Field used when a request does not name one.
pub const DEFAULT_ORDER_BY: &str = "createdAt";

/// Limits and defaults applied to incoming requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Upper bound for `limit`; also the value out-of-range limits clamp to.
    pub max_page_size: i64,

    /// Field substituted for an empty `orderBy`.
    pub default_order_by: String,

    /// Direction substituted for an empty `orderDirection`.
    pub default_direction: OrderDirection,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_page_size: MAX_PAGE_SIZE,
            default_order_by: DEFAULT_ORDER_BY.to_string(),
            default_direction: OrderDirection::Desc,
        }
    }
}

impl PaginationConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum page size. Values below 1 are raised to 1.
    #[must_use]
    pub fn max_page_size(mut self, size: i64) -> Self {
        self.max_page_size = if size < 1 { 1 } else { size };
        self
    }

    /// Sets the default order field.
    #[must_use]
    pub fn default_order_by(mut self, field: impl Into<String>) -> Self {
        self.default_order_by = field.into();
        self
    }

    /// Sets the default direction.
    #[must_use]
    pub fn default_direction(mut self, direction: OrderDirection) -> Self {
        self.default_direction = direction;
        self
    }

    /// Clamps `limit` into `1..=max_page_size`.
    ///
    /// Zero, negative and oversized limits all become `max_page_size`.
    #[must_use]
    pub const fn clamp_limit(&self, limit: i64) -> i64 {
        if limit <= 0 || limit > self.max_page_size {
            self.max_page_size
        } else {
            limit
        }
    }
}
