use std::collections::BTreeMap;

use serde::Serialize;

/// One flattened report row.
///
/// `values` holds one entry per requested dimension and metric, keyed by the
/// vendor field name. Dimension values render as their string form (int64
/// dimensions in decimal); metric values are the decimal string. A field the
/// vendor left empty renders as `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedRecord {
    /// `{year}-{month}-{day}`, with ` {hour}:00` appended for hourly data.
    pub event_date: String,
    pub time_zone: String,
    pub app_package_name: String,
    #[serde(flatten)]
    pub values: BTreeMap<String, String>,
}

/// Latest complete timestamp per aggregation granularity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FreshnessEntry {
    /// `{year}-{month}-{day} {hour}:00`, hour defaulting to `0`.
    pub event_date: String,
    pub time_zone: String,
}

/// Freshness of a metric set. A granularity the API reported nothing for
/// stays `None`; that is a valid answer, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FreshnessInfo {
    pub hourly: Option<FreshnessEntry>,
    pub daily: Option<FreshnessEntry>,
}
