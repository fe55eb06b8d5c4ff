use chrono::{DateTime, Months, NaiveDate, Utc};
use serde_json::json;

use crate::database::models::class_session::timestamp;
use crate::database::record::RecordError;
use crate::filter::FilterData;

/// Document field holding a transaction's timestamp
pub const DATE_FIELD: &str = "date";

/// Half-open interval `[start, end)` covering one calendar month from `start`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MonthRange {
    /// Accepts `YYYY-MM-DD`, `YYYY-MM`, or an RFC 3339 timestamp.
    /// Date-only forms start at midnight UTC.
    pub fn parse(month: &str) -> Result<Self, RecordError> {
        let raw = month.trim();
        let invalid = || RecordError::InvalidMonth(month.to_string());

        let start = if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            dt.with_timezone(&Utc)
        } else {
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d"))
                .map_err(|_| invalid())?;
            date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?.and_utc()
        };

        // Day-of-month clamps to the end of a shorter month
        let end = start.checked_add_months(Months::new(1)).ok_or_else(invalid)?;
        Ok(Self { start, end })
    }

    /// Where clause selecting documents dated inside this range
    pub fn to_filter(&self) -> FilterData {
        FilterData::with_where(json!({
            DATE_FIELD: {
                "$gte": timestamp(self.start),
                "$lt": timestamp(self.end),
            }
        }))
    }
}
