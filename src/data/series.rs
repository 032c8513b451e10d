use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Points in the order the API returned them (ascending by timestamp).
/// Duplicate timestamps are kept as-is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    points: Vec<PricePoint>,
}

impl TimeSeries {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<&PricePoint> {
        self.points.get(index)
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Position of the first point stamped exactly `timestamp`.
    #[allow(dead_code)]
    pub fn position_of(&self, timestamp: DateTime<Utc>) -> Option<usize> {
        let idx = self.points.partition_point(|p| p.timestamp < timestamp);
        match self.points.get(idx) {
            Some(point) if point.timestamp == timestamp => Some(idx),
            _ => None,
        }
    }

    #[allow(dead_code)]
    pub fn at(&self, timestamp: DateTime<Utc>) -> Option<&PricePoint> {
        self.position_of(timestamp).and_then(|idx| self.points.get(idx))
    }

    pub fn price_range(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        Some(self.points.iter().fold(
            (f64::MAX, f64::MIN),
            |(min, max), p| (min.min(p.low), max.max(p.high)),
        ))
    }
}
