use async_trait::async_trait;

use crate::core::client::wire::{MetricSetMetadata, QueryPageBody, RawPage};
use crate::errors::ReportError;

/// Capability that executes requests against one Play Reporting metric set.
///
/// Implementations own authentication and transport; the engine only sees
/// resource names (`apps/{package}/{metricSet}`) and wire-format bodies.
/// Errors must be classified: transport timeouts as [`ReportError::Timeout`]
/// (never retried), everything else as [`ReportError::Fetch`].
#[async_trait]
pub trait MetricSetClient: Send + Sync {
    /// Executes one `query` page request against the metric set.
    async fn fetch_page(
        &self,
        resource_name: &str,
        body: &QueryPageBody,
    ) -> Result<RawPage, ReportError>;

    /// Fetches the metric set's metadata (freshness) via its `get` endpoint.
    async fn fetch_freshness(&self, resource_name: &str) -> Result<MetricSetMetadata, ReportError>;
}
