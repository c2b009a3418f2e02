use validator::Validate;

use crate::config::DEFAULT_PAGE_SIZE;
use crate::core::client::metric_set::MetricSet;
use crate::core::client::wire::TimelineSpec;
use crate::errors::ReportError;

/// A fully specified report query: which metric set, which breakdowns, which
/// measurements, over which timeline.
#[derive(Debug, Clone, Validate)]
pub struct ReportQueryRequest {
    #[validate(length(min = 1, message = "app package name must not be empty"))]
    pub app_package_name: String,
    pub metric_set: MetricSet,
    pub dimensions: Vec<String>,
    pub metrics: Vec<String>,
    pub timeline: TimelineSpec,
    #[validate(range(min = 1, message = "page size must be positive"))]
    pub page_size: i32,
}

impl ReportQueryRequest {
    pub fn new(
        app_package_name: impl Into<String>,
        metric_set: MetricSet,
        timeline: TimelineSpec,
    ) -> Self {
        Self {
            app_package_name: app_package_name.into(),
            metric_set,
            dimensions: Vec::new(),
            metrics: Vec::new(),
            timeline,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_dimensions(mut self, dimensions: Vec<String>) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn with_metrics(mut self, metrics: Vec<String>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Validates the request before any network traffic happens.
    pub fn check(&self) -> Result<(), ReportError> {
        self.validate()
            .map_err(|e| ReportError::InvalidRequest(e.to_string()))
    }
}
