//! The caller-facing pagination request.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;

/// Sort direction of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

impl OrderDirection {
    /// Parses a direction string.
    ///
    /// Only the exact string `asc` means ascending; empty, unknown or
    /// differently cased input is descending.
    pub fn parse_lenient(raw: &str) -> Self {
        if raw == "asc" {
            Self::Asc
        } else {
            Self::Desc
        }
    }

    /// Wire name of the direction.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Whether this is [`OrderDirection::Asc`].
    pub const fn is_asc(self) -> bool {
        matches!(self, Self::Asc)
    }
}

impl FromStr for OrderDirection {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pagination request as bound from a query string.
///
/// Fields are kept in their raw form so that the request can be echoed back
/// to clients unchanged; use [`Pagination::normalize`] to apply defaults and
/// limits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    /// Primary sort field; empty means the configured default.
    pub order_by: String,

    /// `asc` or `desc`; anything else is treated as `desc`.
    pub order_direction: String,

    /// Requested page size.
    pub limit: i64,

    /// 1-based page number, page mode only.
    pub page: i64,

    /// Zero or one opaque cursor token.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cursors: Vec<String>,
}

impl Pagination {
    /// Creates an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the order field.
    #[must_use]
    pub fn with_order_by(mut self, field: impl Into<String>) -> Self {
        self.order_by = field.into();
        self
    }

    /// Sets the order direction from a raw string.
    #[must_use]
    pub fn with_direction(mut self, direction: impl Into<String>) -> Self {
        self.order_direction = direction.into();
        self
    }

    /// Sets the page size.
    #[must_use]
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the page number.
    #[must_use]
    pub fn with_page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    /// Appends a cursor token.
    #[must_use]
    pub fn with_cursor(mut self, token: impl Into<String>) -> Self {
        self.cursors.push(token.into());
        self
    }

    /// Whether the request sorts ascending.
    pub fn is_asc(&self) -> bool {
        self.direction().is_asc()
    }

    /// Parsed direction; unknown values are descending.
    pub fn direction(&self) -> OrderDirection {
        OrderDirection::parse_lenient(&self.order_direction)
    }

    /// Whether the request carries at least one cursor.
    pub fn has_cursor(&self) -> bool {
        !self.cursors.is_empty()
    }

    /// The page size the pipeline will use.
    pub fn effective_limit(&self, config: &PaginationConfig) -> i64 {
        config.clamp_limit(self.limit)
    }

    /// Applies defaults and limits in place.
    ///
    /// - `page <= 0` becomes 1
    /// - out-of-range `limit` becomes `max_page_size`
    /// - empty `orderBy` becomes the default field
    /// - empty `orderDirection` becomes the default direction
    ///
    /// Normalizing twice is the same as normalizing once.
    pub fn normalize(&mut self, config: &PaginationConfig) {
        if self.page <= 0 {
            self.page = 1;
        }

        self.limit = config.clamp_limit(self.limit);

        if self.order_by.is_empty() {
            self.order_by = config.default_order_by.clone();
        }

        if self.order_direction.is_empty() {
            self.order_direction = config.default_direction.as_str().to_string();
        }
    }

    /// Returns a normalized copy.
    #[must_use]
    pub fn normalized(&self, config: &PaginationConfig) -> Self {
        let mut copy = self.clone();
        copy.normalize(config);
        copy
    }

    /// Rows to skip in page mode, `(page - 1) * limit`.
    ///
    /// Meaningful on a normalized request.
    pub fn skip(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_parsing() {
        assert_eq!(OrderDirection::parse_lenient("asc"), OrderDirection::Asc);
        assert_eq!(OrderDirection::parse_lenient("desc"), OrderDirection::Desc);
        assert_eq!(OrderDirection::parse_lenient(""), OrderDirection::Desc);
        assert_eq!(
            OrderDirection::parse_lenient("sideways"),
            OrderDirection::Desc
        );
        assert_eq!(OrderDirection::parse_lenient("ASC"), OrderDirection::Desc);
        assert_eq!("asc".parse::<OrderDirection>(), Ok(OrderDirection::Asc));
        assert_eq!(OrderDirection::Asc.to_string(), "asc");
    }

    #[test]
    fn normalize_fills_defaults() {
        let mut p = Pagination::new();
        p.normalize(&PaginationConfig::default());

        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 100);
        assert_eq!(p.order_by, "createdAt");
        assert_eq!(p.order_direction, "desc");
    }

    #[test]
    fn normalize_keeps_valid_values() {
        let p = Pagination::new()
            .with_order_by("totalDistance")
            .with_direction("asc")
            .with_limit(37)
            .with_page(4)
            .normalized(&PaginationConfig::default());

        assert_eq!(p.page, 4);
        assert_eq!(p.limit, 37);
        assert_eq!(p.order_by, "totalDistance");
        assert_eq!(p.order_direction, "asc");
    }

    #[test]
    fn normalize_clamps_limit() {
        let config = PaginationConfig::default();
        assert_eq!(Pagination::new().with_limit(0).normalized(&config).limit, 100);
        assert_eq!(
            Pagination::new().with_limit(1000).normalized(&config).limit,
            100
        );
        assert_eq!(Pagination::new().with_limit(37).normalized(&config).limit, 37);
    }

    #[test]
    fn normalize_is_idempotent() {
        let config = PaginationConfig::default();
        let once = Pagination::new()
            .with_direction("sideways")
            .with_page(-3)
            .with_limit(500)
            .normalized(&config);
        let twice = once.normalized(&config);

        assert_eq!(once, twice);
    }

    #[test]
    fn unknown_direction_is_kept_but_reads_as_desc() {
        let p = Pagination::new()
            .with_direction("sideways")
            .normalized(&PaginationConfig::default());

        assert_eq!(p.order_direction, "sideways");
        assert_eq!(p.direction(), OrderDirection::Desc);
        assert!(!p.is_asc());
    }

    #[test]
    fn skip_arithmetic() {
        let p = Pagination::new().with_page(3).with_limit(20);
        assert_eq!(p.skip(), 40);
        assert_eq!(Pagination::new().with_page(1).with_limit(20).skip(), 0);
        assert_eq!(Pagination::new().with_page(0).with_limit(20).skip(), 0);
    }

    #[test]
    fn deserializes_partial_camel_case() {
        let p: Pagination =
            serde_json::from_str(r#"{"orderBy":"avgPace","limit":10,"cursors":["abc"]}"#).unwrap();

        assert_eq!(p.order_by, "avgPace");
        assert_eq!(p.order_direction, "");
        assert_eq!(p.limit, 10);
        assert_eq!(p.page, 0);
        assert_eq!(p.cursors, vec!["abc".to_string()]);
    }

    #[test]
    fn serializes_without_empty_cursors() {
        let json = serde_json::to_string(&Pagination::new().with_limit(5)).unwrap();
        assert_eq!(
            json,
            r#"{"orderBy":"","orderDirection":"","limit":5,"page":0}"#
        );
    }
}
