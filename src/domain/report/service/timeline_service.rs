//! Centralized parsing of caller-supplied report boundaries into a
//! [`TimelineSpec`]. Daily bounds are plain dates stamped with the configured
//! zone; hourly bounds are date-hours with no zone, matching what the
//! reporting API expects for each granularity.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::core::client::wire::{AggregationPeriod, TimePoint, TimeZoneId, TimelineSpec};
use crate::errors::ReportError;

const DAILY_FORMAT: &str = "%Y-%m-%d";
const HOURLY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Builds a DAILY timeline from `YYYY-MM-DD` bounds in the given zone.
pub fn daily_timeline(start: &str, end: &str, time_zone: &str) -> Result<TimelineSpec, ReportError> {
    let start_date = parse_date(start)?;
    let end_date = parse_date(end)?;
    check_ordering(start, end, start_date <= end_date)?;

    Ok(TimelineSpec {
        aggregation_period: AggregationPeriod::Daily,
        start_time: daily_point(start_date, time_zone),
        end_time: daily_point(end_date, time_zone),
    })
}

/// Builds an HOURLY timeline from `YYYY-MM-DD HH:MM` bounds.
pub fn hourly_timeline(start: &str, end: &str) -> Result<TimelineSpec, ReportError> {
    let start_at = parse_date_hour(start)?;
    let end_at = parse_date_hour(end)?;
    check_ordering(start, end, start_at <= end_at)?;

    Ok(TimelineSpec {
        aggregation_period: AggregationPeriod::Hourly,
        start_time: hourly_point(start_at),
        end_time: hourly_point(end_at),
    })
}

fn parse_date(input: &str) -> Result<NaiveDate, ReportError> {
    NaiveDate::parse_from_str(input, DAILY_FORMAT).map_err(|_| ReportError::InvalidTimeInput {
        input: input.to_string(),
        expected: "YYYY-MM-DD",
    })
}

fn parse_date_hour(input: &str) -> Result<NaiveDateTime, ReportError> {
    NaiveDateTime::parse_from_str(input, HOURLY_FORMAT).map_err(|_| {
        ReportError::InvalidTimeInput {
            input: input.to_string(),
            expected: "YYYY-MM-DD HH:MM",
        }
    })
}

fn check_ordering(start: &str, end: &str, ordered: bool) -> Result<(), ReportError> {
    if ordered {
        Ok(())
    } else {
        Err(ReportError::InvalidTimeInput {
            input: format!("{start}..{end}"),
            expected: "start on or before end",
        })
    }
}

fn daily_point(date: NaiveDate, time_zone: &str) -> TimePoint {
    TimePoint {
        year: date.year(),
        month: date.month(),
        day: date.day(),
        hours: None,
        time_zone: Some(TimeZoneId {
            id: time_zone.to_string(),
        }),
    }
}

fn hourly_point(at: NaiveDateTime) -> TimePoint {
    TimePoint {
        year: at.year(),
        month: at.month(),
        day: at.day(),
        hours: Some(at.hour()),
        time_zone: None,
    }
}
