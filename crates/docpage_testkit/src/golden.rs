//! Golden pipeline vectors.
//!
//! Each vector pins the exact JSON a request renders to. Stores and clients
//! in other languages depend on these bytes, so a change here is a wire
//! change.

use docpage_codec::{encode_cursor, to_json_string, Value};
use docpage_core::{
    cursor_pipeline_with_config, page_pipeline_with_config, Pagination, PaginationConfig,
    PaginationResult,
};

use crate::fixtures::{epoch, RunCursor};

/// Which pipeline a vector exercises.
#[derive(Debug, Clone)]
pub enum VectorMode {
    /// Cursor mode with a [`RunCursor`] model, continuing after `position`.
    Cursor {
        /// Last row of the previous page, if any.
        position: Option<RunCursor>,
    },
    /// Page mode.
    Page,
}

/// A request with the pipeline it must render to.
#[derive(Debug, Clone)]
pub struct PipelineVector {
    /// Unique identifier for this vector.
    pub id: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// Pipeline kind.
    pub mode: VectorMode,
    /// The request, without cursors.
    pub request: Pagination,
    /// Expected compact JSON.
    pub expected: &'static str,
}

impl PipelineVector {
    /// Renders the vector's pipeline to compact JSON.
    ///
    /// # Errors
    ///
    /// Errors building the pipeline.
    pub fn render(&self, config: &PaginationConfig) -> PaginationResult<String> {
        let pipeline = match &self.mode {
            VectorMode::Cursor { position } => {
                let mut request = self.request.clone();
                if let Some(position) = position {
                    request.cursors.push(encode_cursor(position)?);
                }
                cursor_pipeline_with_config(Some(&mut RunCursor::default()), &request, config)?
            }
            VectorMode::Page => page_pipeline_with_config(&self.request, config),
        };

        let stages = pipeline.into_iter().map(|stage| Value::Document(stage.to_document()));
        Ok(to_json_string(&Value::Array(stages.collect()))?)
    }

    /// Panics with both renderings if the pipeline differs from `expected`.
    pub fn assert_matches(&self) {
        let actual = self
            .render(&PaginationConfig::default())
            .expect("Failed to render golden vector");

        if actual != self.expected {
            panic!(
                "Golden vector '{}' failed ({}):\n\
                 --- Expected ---\n{}\n\
                 --- Actual ---\n{}",
                self.id, self.description, self.expected, actual
            );
        }
    }
}

/// Returns the standard pipeline vectors.
#[must_use]
pub fn pipeline_vectors() -> Vec<PipelineVector> {
    vec![
        PipelineVector {
            id: "cursor_first_page",
            description: "No cursor: sort on every field, no $match",
            mode: VectorMode::Cursor { position: None },
            request: Pagination::new().with_limit(20),
            expected: r#"[{"$sort":{"totalDistance":-1,"createdAt":-1}},{"$limit":20}]"#,
        },
        PipelineVector {
            id: "cursor_single_key",
            description: "Only createdAt present in the cursor",
            mode: VectorMode::Cursor {
                position: Some(RunCursor {
                    total_distance: None,
                    created_at: Some(epoch()),
                }),
            },
            request: Pagination::new(),
            expected: concat!(
                r#"[{"$match":{"$and":[{"createdAt":{"$lt":{"$date":"2024-01-01T00:00:00Z"}}}]}},"#,
                r#"{"$sort":{"totalDistance":-1,"createdAt":-1}},{"$limit":100}]"#
            ),
        },
        PipelineVector {
            id: "cursor_two_keys_asc",
            description: "Distance then createdAt, ascending",
            mode: VectorMode::Cursor {
                position: Some(RunCursor {
                    total_distance: Some(10.0),
                    created_at: Some(epoch()),
                }),
            },
            request: Pagination::new().with_direction("asc").with_limit(5),
            expected: concat!(
                r#"[{"$match":{"$or":[{"totalDistance":{"$gt":10.0}},"#,
                r#"{"$and":[{"totalDistance":10.0},"#,
                r#"{"createdAt":{"$gt":{"$date":"2024-01-01T00:00:00Z"}}}]}]}},"#,
                r#"{"$sort":{"totalDistance":1,"createdAt":1}},{"$limit":5}]"#
            ),
        },
        PipelineVector {
            id: "cursor_order_by",
            description: "orderBy narrows $sort; oversized limit is clamped",
            mode: VectorMode::Cursor { position: None },
            request: Pagination::new().with_order_by("createdAt").with_limit(1000),
            expected: r#"[{"$sort":{"createdAt":-1}},{"$limit":100}]"#,
        },
        PipelineVector {
            id: "page_third",
            description: "Third page of twenty by distance",
            mode: VectorMode::Page,
            request: Pagination::new()
                .with_order_by("totalDistance")
                .with_direction("asc")
                .with_limit(20)
                .with_page(3),
            expected: r#"[{"$sort":{"totalDistance":1}},{"$skip":40},{"$limit":20}]"#,
        },
        PipelineVector {
            id: "page_defaults",
            description: "Empty request",
            mode: VectorMode::Page,
            request: Pagination::new(),
            expected: r#"[{"$sort":{"createdAt":-1}},{"$skip":0},{"$limit":100}]"#,
        },
        PipelineVector {
            id: "page_out_of_range",
            description: "Unknown direction, page 0 and a negative limit",
            mode: VectorMode::Page,
            request: Pagination::new()
                .with_direction("sideways")
                .with_limit(-3)
                .with_page(0),
            expected: r#"[{"$sort":{"createdAt":-1}},{"$skip":0},{"$limit":100}]"#,
        },
    ]
}
