//! Pipeline preview commands.

use docpage_codec::{encode_cursor, CursorCodec, Document, Value};
use docpage_core::{
    cursor_pipeline_with_config, page_pipeline_with_config, Pagination, PaginationConfig, Pipeline,
};
use tracing::info;

use super::{CliError, Output};

/// Builds a request from command-line arguments.
pub fn request(
    order_by: String,
    direction: String,
    limit: i64,
    page: i64,
    cursors: Vec<String>,
) -> Pagination {
    Pagination {
        order_by,
        order_direction: direction,
        limit,
        page,
        cursors,
    }
}

/// Renders the cursor-mode pipeline for a model with `fields`.
///
/// The model is a document whose keys are `fields`, in the given order. A
/// cursor only supplies values: keys it lacks stay absent and keys outside
/// `fields` are dropped, so the declared order always sets the priority.
pub fn cursor(
    fields: &[String],
    request: &Pagination,
    config: &PaginationConfig,
    output: Output,
) -> Result<String, Box<dyn std::error::Error>> {
    if fields.iter().any(String::is_empty) {
        return Err(CliError::EmptyField.into());
    }

    let mut scratch = Document::new();
    CursorCodec::new().decode(request.cursors.as_slice(), &mut scratch)?;

    let mut request = request.clone();
    if !request.cursors.is_empty() {
        let projected: Document = fields
            .iter()
            .map(|name| {
                let value = scratch.get(name).cloned().unwrap_or(Value::Null);
                (name.as_str(), value)
            })
            .collect();
        request.cursors = vec![encode_cursor(&projected)?];
    }

    let mut model: Document = fields.iter().map(|name| (name.as_str(), ())).collect();
    let pipeline = cursor_pipeline_with_config(Some(&mut model), &request, config)?;

    info!(stages = pipeline.len(), "cursor pipeline");
    Ok(output.render(&to_value(pipeline))?)
}

/// Renders the page-mode pipeline.
pub fn page(
    request: &Pagination,
    config: &PaginationConfig,
    output: Output,
) -> Result<String, Box<dyn std::error::Error>> {
    let pipeline = page_pipeline_with_config(request, config);

    info!(stages = pipeline.len(), "page pipeline");
    Ok(output.render(&to_value(pipeline))?)
}

fn to_value(pipeline: Pipeline) -> Value {
    Value::Array(
        pipeline
            .into_iter()
            .map(|stage| Value::Document(stage.to_document()))
            .collect(),
    )
}
