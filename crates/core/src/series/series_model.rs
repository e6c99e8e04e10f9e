//! Series domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One calendar day's observation for one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub ds: NaiveDate,
    pub y: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Incoming point before it is stamped by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSeriesPoint {
    pub ds: NaiveDate,
    pub y: f64,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewSeriesPoint {
    pub fn new(ds: NaiveDate, y: f64) -> Self {
        Self {
            ds,
            y,
            created_at: None,
        }
    }

    fn stamp(self, now: DateTime<Utc>) -> SeriesPoint {
        SeriesPoint {
            ds: self.ds,
            y: self.y,
            created_at: self.created_at.unwrap_or(now),
            updated_at: now,
        }
    }
}

/// Consolidated series: unique by `ds`, strictly ascending, bounded by the window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    points: Vec<SeriesPoint>,
}

impl Series {
    /// Normalizes points read back from storage.
    pub fn from_stored(points: Vec<SeriesPoint>, window: usize) -> Self {
        consolidate_sorted(points, window)
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<SeriesPoint> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `(ds, y)` pairs in date order, the model's training input.
    pub fn observations(&self) -> Vec<(NaiveDate, f64)> {
        self.points.iter().map(|p| (p.ds, p.y)).collect()
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.ds)
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.ds)
    }
}

/// Result of one consolidation pass.
#[derive(Debug, Clone)]
pub struct Consolidation {
    pub series: Series,
    /// Incoming points dropped before the merge (non-finite values).
    pub discarded: usize,
    /// Recovered problems worth surfacing to the caller.
    pub warnings: Vec<String>,
}

/// Merges `incoming` into `existing`.
///
/// Incoming points are stamped `updated_at = now`. The combined list is
/// stably sorted by `(ds, updated_at)` and the last point of each day wins,
/// so on equal timestamps incoming beats existing and later entries of one
/// batch beat earlier ones. Only the most recent `window` days are kept.
pub fn merge_points(
    existing: Vec<SeriesPoint>,
    incoming: Vec<NewSeriesPoint>,
    now: DateTime<Utc>,
    window: usize,
) -> Series {
    let mut combined = existing;
    combined.extend(incoming.into_iter().map(|p| p.stamp(now)));
    consolidate_sorted(combined, window)
}

fn consolidate_sorted(mut points: Vec<SeriesPoint>, window: usize) -> Series {
    points.sort_by(|a, b| a.ds.cmp(&b.ds).then(a.updated_at.cmp(&b.updated_at)));

    let mut deduped: Vec<SeriesPoint> = Vec::with_capacity(points.len());
    for point in points {
        match deduped.last_mut() {
            Some(last) if last.ds == point.ds => *last = point,
            _ => deduped.push(point),
        }
    }

    if deduped.len() > window {
        deduped.drain(..deduped.len() - window);
    }

    Series { points: deduped }
}
