use crate::core::client::metric_set::MetricSet;

/// Device/app breakdown shared by the vitals rate reports.
const VITALS_RATE_DIMENSIONS: &[&str] = &[
    "apiLevel",
    "deviceBrand",
    "versionCode",
    "countryCode",
    "deviceType",
    "deviceModel",
    "deviceRamBucket",
    "deviceSocMake",
    "deviceSocModel",
    "deviceCpuMake",
    "deviceCpuModel",
    "deviceGpuMake",
    "deviceGpuModel",
    "deviceGpuVersion",
    "deviceVulkanVersion",
    "deviceGlEsVersion",
    "deviceScreenSize",
    "deviceScreenDpi",
];

/// Error counts break down by report type and issue instead of country.
const ERROR_COUNT_DIMENSIONS: &[&str] = &[
    "reportType",
    "versionCode",
    "issueId",
    "apiLevel",
    "deviceModel",
    "deviceBrand",
    "deviceType",
    "deviceRamBucket",
    "deviceSocMake",
    "deviceSocModel",
    "deviceCpuMake",
    "deviceCpuModel",
    "deviceGpuMake",
    "deviceGpuModel",
    "deviceGpuVersion",
    "deviceVulkanVersion",
    "deviceGlEsVersion",
    "deviceScreenSize",
    "deviceScreenDpi",
];

/// The report flavors this crate ships defaults for. Each one is pure
/// configuration over the same engine: a metric set plus default dimension
/// and metric lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportType {
    AnrRate,
    CrashRate,
    ErrorCount,
    ExcessiveWakeupRate,
}

#[derive(Debug, Clone, Copy)]
pub struct ReportTypeConfig {
    pub metric_set: MetricSet,
    pub default_dimensions: &'static [&'static str],
    pub default_metrics: &'static [&'static str],
}

impl ReportType {
    pub fn config(&self) -> ReportTypeConfig {
        match self {
            ReportType::AnrRate => ReportTypeConfig {
                metric_set: MetricSet::AnrRate,
                default_dimensions: VITALS_RATE_DIMENSIONS,
                default_metrics: &["anrRate", "userPerceivedAnrRate", "distinctUsers"],
            },
            ReportType::CrashRate => ReportTypeConfig {
                metric_set: MetricSet::CrashRate,
                default_dimensions: VITALS_RATE_DIMENSIONS,
                default_metrics: &["crashRate", "userPerceivedCrashRate", "distinctUsers"],
            },
            ReportType::ErrorCount => ReportTypeConfig {
                metric_set: MetricSet::ErrorCount,
                default_dimensions: ERROR_COUNT_DIMENSIONS,
                default_metrics: &["errorReportCount", "distinctUsers"],
            },
            ReportType::ExcessiveWakeupRate => ReportTypeConfig {
                metric_set: MetricSet::ExcessiveWakeupRate,
                default_dimensions: VITALS_RATE_DIMENSIONS,
                default_metrics: &[
                    "excessiveWakeupRate",
                    "excessiveWakeupRate7dUserWeighted",
                    "excessiveWakeupRate28dUserWeighted",
                    "distinctUsers",
                ],
            },
        }
    }
}
