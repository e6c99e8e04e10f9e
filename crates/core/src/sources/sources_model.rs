use chrono::NaiveDateTime;

use crate::series::NewSeriesPoint;

/// Points extracted from one input, plus how many inputs were unusable.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub points: Vec<NewSeriesPoint>,
    pub skipped: usize,
}

impl NormalizedBatch {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Half-open time range query against one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    pub collection: String,
    pub timestamp_field: String,
    /// Inclusive lower bound.
    pub start: NaiveDateTime,
    /// Exclusive upper bound.
    pub end: NaiveDateTime,
    /// Optional `field = value` restriction.
    pub equals: Option<(String, String)>,
}
