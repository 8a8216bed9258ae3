//! Sample entities and cursor projections.
//!
//! `Run` is a full row as a store would return it. `RunCursor` and
//! `FeedCursor` are the projections encoded into cursors.

use chrono::{DateTime, Duration, TimeZone, Utc};
use docpage_codec::Document;
use docpage_core::{Field, Shape, Sortable};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Timestamp every fixture is based on, `2024-01-01T00:00:00Z`.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// Audit columns shared by every stored entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseEntity {
    /// Row id.
    pub id: Uuid,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl BaseEntity {
    /// A fresh entity created (and last updated) at `created_at`.
    pub fn at(created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at,
            updated_at: created_at,
        }
    }
}

/// A recorded run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    /// Audit columns.
    #[serde(flatten)]
    pub base: BaseEntity,
    /// Distance in meters.
    pub total_distance: f64,
    /// Seconds per kilometer.
    pub avg_pace: f64,
}

impl Run {
    /// A run of `total_distance` meters created at `created_at`.
    pub fn new(total_distance: f64, created_at: DateTime<Utc>) -> Self {
        Self {
            base: BaseEntity::at(created_at),
            total_distance,
            avg_pace: 300.0,
        }
    }

    /// The row as the store sees it.
    pub fn to_document(&self) -> Document {
        Document::new()
            .with("id", self.base.id)
            .with("createdAt", self.base.created_at)
            .with("updatedAt", self.base.updated_at)
            .with("totalDistance", self.total_distance)
            .with("avgPace", self.avg_pace)
    }
}

const DISTANCES: [f64; 4] = [0.0, 5.0, 10.0, 15.0];

/// `n` runs, one minute apart, with distances repeating every four rows.
///
/// Repeated distances force the tie-break on `createdAt`.
pub fn runs(n: usize) -> Vec<Run> {
    (0..n)
        .map(|i| {
            let minutes = i64::try_from(i).expect("fixture size fits i64");
            Run::new(DISTANCES[i % DISTANCES.len()], epoch() + Duration::minutes(minutes))
        })
        .collect()
}

/// Cursor projection of a run: distance first, then creation time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunCursor {
    /// Distance of the last row seen.
    pub total_distance: Option<f64>,
    /// Creation time of the last row seen.
    pub created_at: Option<DateTime<Utc>>,
}

impl Sortable for RunCursor {
    fn shape(&self) -> Shape<'_> {
        Shape::Record(vec![
            Field::scalar("totalDistance", self.total_distance),
            Field::scalar("createdAt", self.created_at),
        ])
    }
}

impl From<&Run> for RunCursor {
    fn from(run: &Run) -> Self {
        Self {
            total_distance: Some(run.total_distance),
            created_at: Some(run.base.created_at),
        }
    }
}

/// Cursor projection ordered by creation time only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedCursor {
    /// Creation time of the last row seen.
    pub created_at: Option<DateTime<Utc>>,
}

impl Sortable for FeedCursor {
    fn shape(&self) -> Shape<'_> {
        Shape::Record(vec![Field::scalar("createdAt", self.created_at)])
    }
}

impl From<&Run> for FeedCursor {
    fn from(run: &Run) -> Self {
        Self {
            created_at: Some(run.base.created_at),
        }
    }
}
