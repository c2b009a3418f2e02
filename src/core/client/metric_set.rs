use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ReportError;

/// The metric sets exposed by the Play Developer Reporting API (v1beta1).
/// Closed set; anything else is rejected before a request is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricSet {
    Anomalies,
    AnrRate,
    CrashRate,
    ErrorCount,
    ErrorIssues,
    ErrorReports,
    ExcessiveWakeupRate,
    SlowRenderingRate,
    SlowStartRate,
    StuckBackgroundWakelockRate,
}

impl MetricSet {
    /// Identifier as it appears in resource names and API docs.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricSet::Anomalies => "anomalies",
            MetricSet::AnrRate => "anrRateMetricSet",
            MetricSet::CrashRate => "crashRateMetricSet",
            MetricSet::ErrorCount => "errorCountMetricSet",
            MetricSet::ErrorIssues => "errorIssues",
            MetricSet::ErrorReports => "errorReports",
            MetricSet::ExcessiveWakeupRate => "excessiveWakeupRateMetricSet",
            MetricSet::SlowRenderingRate => "slowRenderingRateMetricSet",
            MetricSet::SlowStartRate => "slowStartRateMetricSet",
            MetricSet::StuckBackgroundWakelockRate => "stuckBackgroundWakelockRateMetricSet",
        }
    }

    /// Resource name of this metric set for a given app package.
    pub fn resource_name(&self, app_package_name: &str) -> String {
        format!("apps/{}/{}", app_package_name, self.as_str())
    }
}

impl fmt::Display for MetricSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricSet {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "anomalies" => Ok(MetricSet::Anomalies),
            "anrRateMetricSet" => Ok(MetricSet::AnrRate),
            "crashRateMetricSet" => Ok(MetricSet::CrashRate),
            "errorCountMetricSet" => Ok(MetricSet::ErrorCount),
            "errorIssues" => Ok(MetricSet::ErrorIssues),
            "errorReports" => Ok(MetricSet::ErrorReports),
            "excessiveWakeupRateMetricSet" => Ok(MetricSet::ExcessiveWakeupRate),
            "slowRenderingRateMetricSet" => Ok(MetricSet::SlowRenderingRate),
            "slowStartRateMetricSet" => Ok(MetricSet::SlowStartRate),
            "stuckBackgroundWakelockRateMetricSet" => Ok(MetricSet::StuckBackgroundWakelockRate),
            other => Err(ReportError::UnsupportedMetricSet(other.to_string())),
        }
    }
}
