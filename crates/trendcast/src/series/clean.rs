//! The clean `(timestamp, value)` series handed to a forecast adapter.

use std::io::Write;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrendcastError};

/// Timestamp format used for every CSV this crate writes.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One observation of the series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

/// Observations sorted by timestamp with no missing entries.
///
/// Timestamps are non-decreasing; duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanSeries {
    points: Vec<SeriesPoint>,
}

impl CleanSeries {
    /// Wrap points that are already sorted by timestamp.
    pub(crate) fn from_sorted(points: Vec<SeriesPoint>) -> Self {
        debug_assert!(points.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn timestamps(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        self.points.iter().map(|p| p.timestamp)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    pub fn first(&self) -> Option<&SeriesPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    /// Fail with [`TrendcastError::EmptySeries`] when there is nothing to forecast.
    pub fn ensure_not_empty(&self) -> Result<()> {
        if self.is_empty() {
            return Err(TrendcastError::EmptySeries(
                "no rows with both a valid date and a numeric value".to_string(),
            ));
        }
        Ok(())
    }

    /// Write the series as `timestamp,value` CSV.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["timestamp", "value"])?;
        for point in &self.points {
            csv_writer.write_record([
                point.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                point.value.to_string(),
            ])?;
        }
        csv_writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn point(day: u32, value: f64) -> SeriesPoint {
        SeriesPoint {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            value,
        }
    }

    #[test]
    fn test_ensure_not_empty() {
        assert!(matches!(
            CleanSeries::default().ensure_not_empty(),
            Err(TrendcastError::EmptySeries(_))
        ));
        assert!(CleanSeries::from_sorted(vec![point(1, 1.0)]).ensure_not_empty().is_ok());
    }

    #[test]
    fn test_write_csv() {
        let series = CleanSeries::from_sorted(vec![point(7, 100.0), point(14, 120.5)]);
        let mut out = Vec::new();
        series.write_csv(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "timestamp,value\n2024-01-07T00:00:00,100\n2024-01-14T00:00:00,120.5\n"
        );
    }
}
