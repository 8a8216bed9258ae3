//! Property-based test generators using proptest.
//!
//! Provides strategies for pagination requests, cursor positions and row
//! sets. Generated values cover the out-of-range inputs clients actually
//! send: zero and negative limits, empty fields, unknown directions.

use chrono::{DateTime, Duration, Utc};
use docpage_core::Pagination;
use proptest::prelude::*;

use crate::fixtures::{epoch, Run, RunCursor};

/// Strategy for raw `orderDirection` values, including unknown ones.
pub fn direction_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        2 => Just("asc".to_string()),
        2 => Just("desc".to_string()),
        1 => Just(String::new()),
        1 => prop::string::string_regex("[a-zA-Z]{1,10}").expect("Invalid regex"),
    ]
}

/// Strategy for raw `limit` values, in and out of range.
pub fn limit_strategy() -> impl Strategy<Value = i64> {
    prop_oneof![
        1 => Just(0i64),
        1 => -50i64..0,
        4 => 1i64..=100,
        2 => 101i64..100_000,
    ]
}

/// Strategy for raw `page` values.
pub fn page_strategy() -> impl Strategy<Value = i64> {
    -3i64..500
}

/// Strategy for `orderBy` values.
pub fn order_by_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("createdAt".to_string()),
        Just("totalDistance".to_string()),
        prop::string::string_regex("[a-z][a-zA-Z]{0,15}").expect("Invalid regex"),
    ]
}

/// Strategy for cursor-less pagination requests.
pub fn pagination_strategy() -> impl Strategy<Value = Pagination> {
    (
        order_by_strategy(),
        direction_strategy(),
        limit_strategy(),
        page_strategy(),
    )
        .prop_map(|(order_by, direction, limit, page)| {
            Pagination::new()
                .with_order_by(order_by)
                .with_direction(direction)
                .with_limit(limit)
                .with_page(page)
        })
}

/// Strategy for timestamps with whole-second precision.
pub fn timestamp_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_000_000_000).prop_filter_map("timestamp out of range", |secs| {
        DateTime::<Utc>::from_timestamp(secs, 0)
    })
}

/// Strategy for distances that survive a JSON round trip exactly.
pub fn distance_strategy() -> impl Strategy<Value = f64> {
    (-4_000_000i32..4_000_000).prop_map(|quarters| f64::from(quarters) / 4.0)
}

/// Strategy for cursor positions, each field possibly absent.
pub fn run_cursor_strategy() -> impl Strategy<Value = RunCursor> {
    (
        prop::option::of(distance_strategy()),
        prop::option::of(timestamp_strategy()),
    )
        .prop_map(|(total_distance, created_at)| RunCursor {
            total_distance,
            created_at,
        })
}

/// Strategy for row sets with repeated distances and unique timestamps.
pub fn runs_strategy(max_rows: usize) -> impl Strategy<Value = Vec<Run>> {
    prop::collection::vec(0u8..4, 0..max_rows).prop_map(|distances| {
        distances
            .into_iter()
            .zip(0i64..)
            .map(|(d, minute)| Run::new(f64::from(d) * 5.0, epoch() + Duration::minutes(minute)))
            .collect()
    })
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
