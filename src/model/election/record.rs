use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::status::StatusReport;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// An election as served by the backend.
///
/// Scheduling is carried as civil date/time strings (`2025-05-15`, `08:00`)
/// pinned to UTC+0. A single `date` covers one-day elections; `startDate`
/// and `endDate` override it for longer ones. Missing times fall back to
/// the stock polling hours.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElectionRecord {
    pub is_active: bool,
    pub date: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl ElectionRecord {
    /// The instant voting opens.
    pub fn start_instant(&self) -> Result<DateTime<Utc>> {
        let date = self.resolved_date(&self.start_date, "startDate", "start")?;
        let time = resolved_time(&self.start_time, "startTime", default_start_time())?;
        Ok(combine(date, time))
    }

    /// The instant voting closes.
    pub fn end_instant(&self) -> Result<DateTime<Utc>> {
        let date = self.resolved_date(&self.end_date, "endDate", "end")?;
        let time = resolved_time(&self.end_time, "endTime", default_end_time())?;
        Ok(combine(date, time))
    }

    /// The instant the countdown runs towards: the close while the election
    /// is active, the opening otherwise.
    pub fn target_instant(&self) -> Result<DateTime<Utc>> {
        if self.is_active {
            self.end_instant()
        } else {
            self.start_instant()
        }
    }

    /// Where the election stands at `now`.
    ///
    /// Callers pass the clock in, so the same record and instant always
    /// produce the same report.
    pub fn status_at(&self, now: DateTime<Utc>) -> Result<StatusReport> {
        Ok(StatusReport::from_remaining(
            self.is_active,
            self.target_instant()? - now,
        ))
    }

    fn resolved_date(
        &self,
        specific: &Option<String>,
        specific_field: &'static str,
        which: &'static str,
    ) -> Result<NaiveDate> {
        let (field, value) = match (specific, &self.date) {
            (Some(value), _) => (specific_field, value),
            (None, Some(value)) => ("date", value),
            (None, None) => return Err(Error::MissingDate(which)),
        };
        parse_date(field, value)
    }
}

fn resolved_time(
    value: &Option<String>,
    field: &'static str,
    fallback: NaiveTime,
) -> Result<NaiveTime> {
    match value {
        Some(value) => parse_time(field, value),
        None => Ok(fallback),
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|source| Error::InvalidField {
        field,
        value: value.to_string(),
        source,
    })
}

fn parse_time(field: &'static str, value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|source| Error::InvalidField {
        field,
        value: value.to_string(),
        source,
    })
}

fn combine(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    // Civil fields map straight onto UTC; no site timezone is configured.
    Utc.from_utc_datetime(&date.and_time(time))
}

fn default_start_time() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 0, 0).expect("literal time is valid")
}

fn default_end_time() -> NaiveTime {
    NaiveTime::from_hms_opt(16, 0, 0).expect("literal time is valid")
}

/// Example data for testing.
#[cfg(test)]
mod examples {
    use super::*;

    impl ElectionRecord {
        /// An active one-day election with the stock polling hours.
        pub fn example() -> Self {
            Self {
                is_active: true,
                date: Some("2025-05-15".to_string()),
                start_time: Some("08:00".to_string()),
                end_time: Some("16:00".to_string()),
                ..Self::default()
            }
        }
    }
}
