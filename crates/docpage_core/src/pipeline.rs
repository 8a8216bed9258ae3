//! Pipeline assembly for cursor mode and page mode.
//!
//! Cursor mode continues strictly after the position stored in the request's
//! cursor: `[$match] [$sort] $limit`. Page mode skips whole pages:
//! `$sort $skip $limit`.
//!
//! ## Continuation predicate
//!
//! For sortable fields `f1 .. fn` (priority order) with cursor values
//! `v1 .. vn` and a strict operator `cmp`, a row comes after the cursor when
//! its tuple is lexicographically after `(v1 .. vn)`. The predicate is built
//! from the lowest-priority field outwards:
//!
//! ```text
//! acc = {fn cmp vn}
//! acc = {f(n-1) cmp v(n-1)} OR ({f(n-1) == v(n-1)} AND acc)
//! ...
//! acc = {f1 cmp v1} OR ({f1 == v1} AND acc)
//! ```
//!
//! A single field yields `$and: [{f1 cmp v1}]`.

use docpage_codec::CursorCodec;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::PaginationConfig;
use crate::error::{PaginationError, PaginationResult};
use crate::fields::{extract_fields, FieldValue, Sortable};
use crate::request::{OrderDirection, Pagination};
use crate::stage::{CompareOp, Pipeline, Predicate, SortOrder, Stage};

/// Builds the `$sort` stage for `model`.
///
/// Every named field of the model takes part (absent or not) unless
/// `order_by` is non-empty, in which case only the field with that name is
/// kept. All clauses share the request's direction; anything but `asc` sorts
/// descending. Returns `None` when no clause is left.
///
/// # Errors
///
/// [`PaginationError::InvalidModel`] if `model` is `None` or its fields
/// cannot be extracted.
pub fn sort_stage(
    model: Option<&dyn Sortable>,
    order_by: &str,
    order_direction: &str,
) -> PaginationResult<Option<Stage>> {
    if model.is_none() {
        warn!("required model to get sort stage");
        return Err(PaginationError::InvalidModel);
    }

    let fields = extract_fields(model, true).map_err(|err| {
        warn!(error = %err, "get sortable fields of model failed");
        PaginationError::InvalidModel
    })?;

    let order = SortOrder::from(OrderDirection::parse_lenient(order_direction));
    let clauses: Vec<(String, SortOrder)> = fields
        .into_iter()
        .filter(|field| order_by.is_empty() || field.name == order_by)
        .map(|field| (field.name, order))
        .collect();

    if clauses.is_empty() {
        return Ok(None);
    }

    Ok(Some(Stage::Sort(clauses)))
}

/// Folds the present fields into a "strictly after" predicate.
///
/// Fields without a value are ignored. Returns `None` when no field has a
/// value.
pub fn tie_break_predicate(fields: &[FieldValue], op: CompareOp) -> Option<Predicate> {
    let mut present = fields
        .iter()
        .filter_map(|field| field.value.as_ref().map(|value| (field.name.as_str(), value)))
        .rev();

    let (name, value) = present.next()?;
    let mut acc = Predicate::compare(name, op, value.clone());
    let mut chained = false;

    for (name, value) in present {
        acc = Predicate::Or(vec![
            Predicate::compare(name, op, value.clone()),
            Predicate::And(vec![Predicate::equals(name, value.clone()), acc]),
        ]);
        chained = true;
    }

    if !chained {
        acc = Predicate::And(vec![acc]);
    }

    Some(acc)
}

/// Builds the continuation predicate from the request's cursor.
///
/// The cursor is decoded into `model`, so after a successful call `model`
/// holds the position of the last row of the previous page. Returns `None`
/// when the request has no cursor or the cursor has no present fields.
///
/// # Errors
///
/// - [`PaginationError::InvalidModel`] if `model` is `None`
/// - [`PaginationError::Codec`] if the cursor count is wrong or the token
///   does not decode into `T`
/// - extraction errors from [`extract_fields`]
pub fn continuation<T>(
    model: Option<&mut T>,
    pagination: &Pagination,
) -> PaginationResult<Option<Predicate>>
where
    T: Sortable + DeserializeOwned,
{
    let Some(model) = model else {
        warn!("required model to get continuation predicate");
        return Err(PaginationError::InvalidModel);
    };

    if pagination.cursors.is_empty() {
        return Ok(None);
    }

    CursorCodec::new().decode(pagination.cursors.as_slice(), &mut *model)?;

    let fields = extract_fields(Some(&*model), false)?;
    Ok(tie_break_predicate(
        &fields,
        CompareOp::from(pagination.direction()),
    ))
}

/// Builds a cursor-mode pipeline with the default configuration.
///
/// # Errors
///
/// See [`cursor_pipeline_with_config`].
pub fn cursor_pipeline<T>(
    model: Option<&mut T>,
    pagination: &Pagination,
) -> PaginationResult<Pipeline>
where
    T: Sortable + DeserializeOwned,
{
    cursor_pipeline_with_config(model, pagination, &PaginationConfig::default())
}

/// Builds a cursor-mode pipeline: `[$match] [$sort] $limit`.
///
/// `$match` is present only when the request carries a cursor, `$sort` only
/// when at least one field is sortable. The limit is clamped to the
/// configured maximum page size.
///
/// # Errors
///
/// Errors of [`continuation`] and [`sort_stage`].
pub fn cursor_pipeline_with_config<T>(
    mut model: Option<&mut T>,
    pagination: &Pagination,
    config: &PaginationConfig,
) -> PaginationResult<Pipeline>
where
    T: Sortable + DeserializeOwned,
{
    let mut pipeline = Pipeline::new();

    if let Some(predicate) = continuation(model.as_deref_mut(), pagination)? {
        pipeline.push(Stage::Match(predicate));
    }

    let sortable = model.as_deref().map(|m| m as &dyn Sortable);
    if let Some(sort) = sort_stage(sortable, &pagination.order_by, &pagination.order_direction)? {
        pipeline.push(sort);
    }

    let limit = pagination.effective_limit(config);
    pipeline.push(Stage::Limit(limit));

    debug!(stages = ?pipeline.keys(), limit, "built cursor pipeline");
    Ok(pipeline)
}

/// Builds a page-mode pipeline with the default configuration.
pub fn page_pipeline(pagination: &Pagination) -> Pipeline {
    page_pipeline_with_config(pagination, &PaginationConfig::default())
}

/// Builds a page-mode pipeline: `$sort $skip $limit`.
///
/// The request is normalized first. Sorting uses the `orderBy` column
/// directly; the skip count is `(page - 1) * limit`.
pub fn page_pipeline_with_config(pagination: &Pagination, config: &PaginationConfig) -> Pipeline {
    let request = pagination.normalized(config);
    let order = SortOrder::from(request.direction());

    let pipeline = Pipeline::from(vec![
        Stage::Sort(vec![(request.order_by.clone(), order)]),
        Stage::Skip(request.skip()),
        Stage::Limit(request.limit),
    ]);

    debug!(
        page = request.page,
        limit = request.limit,
        order_by = %request.order_by,
        "built page pipeline"
    );
    pipeline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Field, Shape};
    use docpage_codec::{encode_cursor, CodecError, Value};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    struct Run {
        total_distance: Option<i64>,
        created_at: Option<i64>,
    }

    impl Sortable for Run {
        fn shape(&self) -> Shape<'_> {
            Shape::Record(vec![
                Field::scalar("totalDistance", self.total_distance),
                Field::scalar("createdAt", self.created_at),
            ])
        }
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    struct Post {
        created_at: Option<i64>,
    }

    impl Sortable for Post {
        fn shape(&self) -> Shape<'_> {
            Shape::Record(vec![Field::scalar("createdAt", self.created_at)])
        }
    }

    fn fv(name: &str, value: i64) -> FieldValue {
        FieldValue::new(name, Some(Value::Int(value)))
    }

    #[test]
    fn single_key_is_a_lone_conjunction() {
        let predicate = tie_break_predicate(&[fv("createdAt", 7)], CompareOp::Lt).unwrap();
        assert_eq!(
            predicate,
            Predicate::And(vec![Predicate::compare("createdAt", CompareOp::Lt, 7)])
        );
    }

    #[test]
    fn two_keys_nest_equality_with_inner_comparison() {
        let predicate = tie_break_predicate(
            &[fv("totalDistance", 10), fv("createdAt", 7)],
            CompareOp::Lt,
        )
        .unwrap();

        assert_eq!(
            predicate,
            Predicate::Or(vec![
                Predicate::compare("totalDistance", CompareOp::Lt, 10),
                Predicate::And(vec![
                    Predicate::equals("totalDistance", 10),
                    Predicate::compare("createdAt", CompareOp::Lt, 7),
                ]),
            ])
        );
    }

    #[test]
    fn three_keys_nest_outwards() {
        let predicate = tie_break_predicate(
            &[fv("a", 1), fv("b", 2), fv("c", 3)],
            CompareOp::Gt,
        )
        .unwrap();

        let inner = Predicate::Or(vec![
            Predicate::compare("b", CompareOp::Gt, 2),
            Predicate::And(vec![
                Predicate::equals("b", 2),
                Predicate::compare("c", CompareOp::Gt, 3),
            ]),
        ]);
        assert_eq!(
            predicate,
            Predicate::Or(vec![
                Predicate::compare("a", CompareOp::Gt, 1),
                Predicate::And(vec![Predicate::equals("a", 1), inner]),
            ])
        );
    }

    #[test]
    fn absent_fields_do_not_participate() {
        let fields = [FieldValue::new("totalDistance", None), fv("createdAt", 7)];
        assert_eq!(
            tie_break_predicate(&fields, CompareOp::Lt),
            Some(Predicate::And(vec![Predicate::compare(
                "createdAt",
                CompareOp::Lt,
                7
            )]))
        );
        assert_eq!(tie_break_predicate(&[], CompareOp::Lt), None);
    }

    #[test]
    fn continuation_without_cursor_is_none() {
        let mut run = Run::default();
        let predicate = continuation(Some(&mut run), &Pagination::new()).unwrap();
        assert_eq!(predicate, None);
    }

    #[test]
    fn continuation_requires_model() {
        let err = continuation::<Run>(None, &Pagination::new()).unwrap_err();
        assert!(matches!(err, PaginationError::InvalidModel));
    }

    #[test]
    fn continuation_decodes_into_model() {
        let token = encode_cursor(&Run {
            total_distance: Some(10),
            created_at: Some(7),
        })
        .unwrap();
        let mut run = Run::default();

        let predicate = continuation(Some(&mut run), &Pagination::new().with_cursor(token))
            .unwrap()
            .unwrap();

        assert_eq!(run.total_distance, Some(10));
        assert!(matches!(predicate, Predicate::Or(_)));
    }

    #[test]
    fn continuation_rejects_two_cursors() {
        let token = encode_cursor(&Post { created_at: Some(1) }).unwrap();
        let request = Pagination::new().with_cursor(token.clone()).with_cursor(token);

        let err = continuation(Some(&mut Post::default()), &request).unwrap_err();
        assert!(matches!(
            err,
            PaginationError::Codec(CodecError::InvalidCursorLength { count: 2 })
        ));
    }

    #[test]
    fn ascending_uses_gt() {
        let token = encode_cursor(&Post { created_at: Some(3) }).unwrap();
        let request = Pagination::new().with_direction("asc").with_cursor(token);

        let predicate = continuation(Some(&mut Post::default()), &request)
            .unwrap()
            .unwrap();
        assert_eq!(
            predicate,
            Predicate::And(vec![Predicate::compare("createdAt", CompareOp::Gt, 3)])
        );
    }

    #[test]
    fn sort_stage_uses_all_fields_without_order_by() {
        let stage = sort_stage(Some(&Run::default()), "", "desc").unwrap().unwrap();
        assert_eq!(
            stage,
            Stage::Sort(vec![
                ("totalDistance".into(), SortOrder::Descending),
                ("createdAt".into(), SortOrder::Descending),
            ])
        );
    }

    #[test]
    fn sort_stage_narrows_to_order_by() {
        let stage = sort_stage(Some(&Run::default()), "createdAt", "asc")
            .unwrap()
            .unwrap();
        assert_eq!(
            stage,
            Stage::Sort(vec![("createdAt".into(), SortOrder::Ascending)])
        );
    }

    #[test]
    fn sort_stage_unknown_field_is_omitted() {
        assert_eq!(sort_stage(Some(&Run::default()), "avgPace", "asc").unwrap(), None);
    }

    #[test]
    fn sort_stage_requires_model() {
        let err = sort_stage(None, "", "asc").unwrap_err();
        assert!(matches!(err, PaginationError::InvalidModel));
    }

    #[test]
    fn sort_stage_reports_bad_shape_as_invalid_model() {
        let err = sort_stage(Some(&Value::Int(1)), "", "asc").unwrap_err();
        assert!(matches!(err, PaginationError::InvalidModel));
    }

    #[test]
    fn first_page_has_sort_and_limit() {
        let request = Pagination::new().with_limit(20);
        let pipeline = cursor_pipeline(Some(&mut Run::default()), &request).unwrap();
        assert_eq!(pipeline.keys(), vec!["$sort", "$limit"]);
        assert_eq!(pipeline.stages()[1], Stage::Limit(20));
    }

    #[test]
    fn cursor_pipeline_clamps_limit() {
        let request = Pagination::new().with_limit(0);
        let pipeline = cursor_pipeline(Some(&mut Run::default()), &request).unwrap();
        assert_eq!(pipeline.stages().last(), Some(&Stage::Limit(100)));

        let config = PaginationConfig::new().max_page_size(10);
        let pipeline = cursor_pipeline_with_config(
            Some(&mut Run::default()),
            &Pagination::new().with_limit(50),
            &config,
        )
        .unwrap();
        assert_eq!(pipeline.stages().last(), Some(&Stage::Limit(10)));
    }

    #[test]
    fn next_page_starts_with_match() {
        let token = encode_cursor(&Run {
            total_distance: Some(10),
            created_at: Some(7),
        })
        .unwrap();
        let request = Pagination::new().with_limit(5).with_cursor(token);

        let pipeline = cursor_pipeline(Some(&mut Run::default()), &request).unwrap();
        assert_eq!(pipeline.keys(), vec!["$match", "$sort", "$limit"]);
    }

    #[test]
    fn page_pipeline_skips_whole_pages() {
        let request = Pagination::new().with_page(3).with_limit(20).with_order_by("avgPace");
        let pipeline = page_pipeline(&request);

        assert_eq!(
            pipeline.into_stages(),
            vec![
                Stage::Sort(vec![("avgPace".into(), SortOrder::Descending)]),
                Stage::Skip(40),
                Stage::Limit(20),
            ]
        );
    }

    #[test]
    fn page_pipeline_normalizes_request() {
        let pipeline = page_pipeline(&Pagination::new().with_direction("asc"));

        assert_eq!(
            pipeline.into_stages(),
            vec![
                Stage::Sort(vec![("createdAt".into(), SortOrder::Ascending)]),
                Stage::Skip(0),
                Stage::Limit(100),
            ]
        );
    }
}
