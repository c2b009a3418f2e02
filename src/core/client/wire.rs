//! Serde models of the Play Developer Reporting wire format.
//!
//! Request bodies serialize to the vendor's camelCase JSON; response models
//! tolerate missing fields the way the API actually omits them (empty pages,
//! rows without an hour, metrics without a decimal value).

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

/// Aggregation granularity of a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregationPeriod {
    Hourly,
    Daily,
}

impl AggregationPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationPeriod::Hourly => "HOURLY",
            AggregationPeriod::Daily => "DAILY",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeZoneId {
    #[serde(default)]
    pub id: String,
}

/// One boundary of a timeline. `hours` is set only for hourly timelines;
/// `time_zone` only for daily ones (hourly bounds are zone-less upstream).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePoint {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<TimeZoneId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSpec {
    pub aggregation_period: AggregationPeriod,
    pub start_time: TimePoint,
    pub end_time: TimePoint,
}

/// Body of one `query` page request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPageBody {
    pub dimensions: Vec<String>,
    pub metrics: Vec<String>,
    pub timeline_spec: TimelineSpec,
    pub page_size: i32,
    pub page_token: String,
}

/// Row start time as returned by the API. Fields the vendor omits fall back
/// to zero / empty rather than failing the whole page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawStartTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hours: Option<u32>,
    pub time_zone: TimeZoneId,
}

/// A dimension value is either a string or a stringified int64, never both.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDimensionValue {
    pub dimension: String,
    pub string_value: Option<String>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub int64_value: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecimalValue {
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawMetricValue {
    pub metric: String,
    pub decimal_value: Option<DecimalValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawRow {
    pub start_time: RawStartTime,
    pub dimensions: Vec<RawDimensionValue>,
    pub metrics: Vec<RawMetricValue>,
}

/// One page of query results plus the continuation token, if any.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPage {
    pub rows: Vec<RawRow>,
    pub next_page_token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawFreshness {
    /// Kept as a string: the API may report periods beyond HOURLY/DAILY
    /// (e.g. FULL_RANGE) which the engine ignores.
    pub aggregation_period: String,
    pub latest_end_time: RawStartTime,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawFreshnessInfo {
    pub freshnesses: Vec<RawFreshness>,
}

/// Metric set metadata as returned by the `get` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricSetMetadata {
    pub freshness_info: RawFreshnessInfo,
}
