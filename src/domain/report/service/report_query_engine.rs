use std::collections::BTreeMap;

use tracing::debug;

use crate::config::EngineConfig;
use crate::core::client::metric_set::MetricSet;
use crate::core::client::metric_set_client::MetricSetClient;
use crate::core::client::wire::{
    AggregationPeriod, QueryPageBody, RawPage, RawRow, TimelineSpec,
};
use crate::core::util::retry_util::{self, RetryPolicy};
use crate::domain::report::dto::report_query_request::ReportQueryRequest;
use crate::domain::report::model::{FreshnessEntry, FreshnessInfo, NormalizedRecord};
use crate::domain::report::report_type::ReportType;
use crate::domain::report::service::timeline_service;
use crate::errors::ReportError;

/// Pages through a metric set and flattens the vendor's nested rows into
/// [`NormalizedRecord`]s. Pagination is strictly sequential: one page in
/// flight at a time, each fetch wrapped in the bounded-retry policy.
pub struct ReportQueryEngine<C> {
    client: C,
    config: EngineConfig,
}

impl<C: MetricSetClient> ReportQueryEngine<C> {
    pub fn new(client: C) -> Self {
        Self::with_config(client, EngineConfig::default())
    }

    pub fn with_config(client: C, config: EngineConfig) -> Self {
        Self { client, config }
    }

    /// Runs the query across all pages and returns the flattened rows in
    /// vendor order. A timeout aborts immediately; any other fetch error is
    /// retried per config and, once attempts are exhausted, fails the whole
    /// operation without returning partial rows.
    pub async fn query(
        &self,
        request: &ReportQueryRequest,
    ) -> Result<Vec<NormalizedRecord>, ReportError> {
        request.check()?;

        let resource_name = request.metric_set.resource_name(&request.app_package_name);
        let policy = RetryPolicy::new(self.config.retry_count, self.config.query_retry_delay);

        let mut rows: Vec<RawRow> = Vec::new();
        let mut page_token = String::new();
        loop {
            let body = QueryPageBody {
                dimensions: request.dimensions.clone(),
                metrics: request.metrics.clone(),
                timeline_spec: request.timeline.clone(),
                page_size: request.page_size,
                page_token: page_token.clone(),
            };

            let page = retry_util::retry(&policy, ReportError::is_timeout, || {
                self.client.fetch_page(&resource_name, &body)
            })
            .await?;

            let RawPage {
                rows: page_rows,
                next_page_token,
            } = page;
            debug!(
                resource = %resource_name,
                rows = page_rows.len(),
                has_next = !next_page_token.is_empty(),
                "Fetched report page"
            );
            rows.extend(page_rows);

            if next_page_token.is_empty() {
                break;
            }
            page_token = next_page_token;
        }

        Ok(rows
            .iter()
            .map(|row| {
                normalize_row(
                    row,
                    &request.app_package_name,
                    request.timeline.aggregation_period,
                )
            })
            .collect())
    }

    /// Fetches the metric set's freshness metadata. Unlike `query`, every
    /// error here is considered transient and retried.
    pub async fn get_freshness(
        &self,
        app_package_name: &str,
        metric_set: MetricSet,
    ) -> Result<FreshnessInfo, ReportError> {
        let resource_name = metric_set.resource_name(app_package_name);
        let policy = RetryPolicy::new(self.config.retry_count, self.config.freshness_retry_delay);

        let metadata = retry_util::retry(&policy, |_| false, || {
            self.client.fetch_freshness(&resource_name)
        })
        .await?;

        let mut info = FreshnessInfo::default();
        for freshness in &metadata.freshness_info.freshnesses {
            let end = &freshness.latest_end_time;
            let entry = FreshnessEntry {
                event_date: format!(
                    "{}-{}-{} {}:00",
                    end.year,
                    end.month,
                    end.day,
                    end.hours.unwrap_or(0)
                ),
                time_zone: end.time_zone.id.clone(),
            };
            match freshness.aggregation_period.as_str() {
                "HOURLY" => info.hourly = Some(entry),
                "DAILY" => info.daily = Some(entry),
                other => debug!(
                    aggregation_period = other,
                    "Ignoring freshness entry with unsupported aggregation period"
                ),
            }
        }
        Ok(info)
    }

    /// Hourly report with the report type's default dimensions and metrics.
    /// Bounds are `YYYY-MM-DD HH:MM` strings.
    pub async fn query_report_hourly(
        &self,
        report: ReportType,
        app_package_name: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<NormalizedRecord>, ReportError> {
        let timeline = timeline_service::hourly_timeline(start, end)?;
        self.query(&self.report_request(report, app_package_name, timeline))
            .await
    }

    /// Daily report with the report type's default dimensions and metrics.
    /// Bounds are `YYYY-MM-DD` strings in the configured daily time zone.
    pub async fn query_report_daily(
        &self,
        report: ReportType,
        app_package_name: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<NormalizedRecord>, ReportError> {
        let timeline =
            timeline_service::daily_timeline(start, end, &self.config.daily_time_zone)?;
        self.query(&self.report_request(report, app_package_name, timeline))
            .await
    }

    pub async fn report_freshness(
        &self,
        report: ReportType,
        app_package_name: &str,
    ) -> Result<FreshnessInfo, ReportError> {
        self.get_freshness(app_package_name, report.config().metric_set)
            .await
    }

    /// Pre-filled request for a report type. Callers that need non-default
    /// dimensions or metrics can adjust the result before passing it to
    /// [`Self::query`].
    pub fn report_request(
        &self,
        report: ReportType,
        app_package_name: &str,
        timeline: TimelineSpec,
    ) -> ReportQueryRequest {
        let config = report.config();
        ReportQueryRequest::new(app_package_name, config.metric_set, timeline)
            .with_dimensions(
                config
                    .default_dimensions
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            )
            .with_metrics(config.default_metrics.iter().map(|s| s.to_string()).collect())
            .with_page_size(self.config.page_size)
    }
}

fn normalize_row(
    row: &RawRow,
    app_package_name: &str,
    period: AggregationPeriod,
) -> NormalizedRecord {
    let start = &row.start_time;

    // Date components render unpadded, exactly as the vendor returns them.
    let event_date = match period {
        AggregationPeriod::Hourly => {
            let hour = start
                .hours
                .map(|h| h.to_string())
                .unwrap_or_else(|| "00".to_string());
            format!("{}-{}-{} {}:00", start.year, start.month, start.day, hour)
        }
        AggregationPeriod::Daily => format!("{}-{}-{}", start.year, start.month, start.day),
    };

    let mut values = BTreeMap::new();
    for dimension in &row.dimensions {
        let value = if let Some(s) = &dimension.string_value {
            s.clone()
        } else if let Some(i) = dimension.int64_value {
            i.to_string()
        } else {
            String::new()
        };
        values.insert(dimension.dimension.clone(), value);
    }
    for metric in &row.metrics {
        let value = metric
            .decimal_value
            .as_ref()
            .map(|d| d.value.clone())
            .unwrap_or_default();
        values.insert(metric.metric.clone(), value);
    }

    NormalizedRecord {
        event_date,
        time_zone: start.time_zone.id.clone(),
        app_package_name: app_package_name.to_string(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::core::client::wire::MetricSetMetadata;

    /// Scripted client: pops pre-canned responses in order and records what
    /// the engine asked for.
    #[derive(Default)]
    struct ScriptedClient {
        pages: Mutex<VecDeque<Result<RawPage, ReportError>>>,
        freshness: Mutex<VecDeque<Result<MetricSetMetadata, ReportError>>>,
        page_calls: AtomicU32,
        freshness_calls: AtomicU32,
        seen_tokens: Mutex<Vec<String>>,
        seen_resources: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        fn with_pages(pages: Vec<Result<RawPage, ReportError>>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                ..Default::default()
            }
        }

        fn with_freshness(responses: Vec<Result<MetricSetMetadata, ReportError>>) -> Self {
            Self {
                freshness: Mutex::new(responses.into()),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl MetricSetClient for ScriptedClient {
        async fn fetch_page(
            &self,
            resource_name: &str,
            body: &QueryPageBody,
        ) -> Result<RawPage, ReportError> {
            self.page_calls.fetch_add(1, Ordering::SeqCst);
            self.seen_resources
                .lock()
                .unwrap()
                .push(resource_name.to_string());
            self.seen_tokens
                .lock()
                .unwrap()
                .push(body.page_token.clone());
            self.pages
                .lock()
                .unwrap()
                .pop_front()
                .expect("scripted client ran out of pages")
        }

        async fn fetch_freshness(
            &self,
            resource_name: &str,
        ) -> Result<MetricSetMetadata, ReportError> {
            self.freshness_calls.fetch_add(1, Ordering::SeqCst);
            self.seen_resources
                .lock()
                .unwrap()
                .push(resource_name.to_string());
            self.freshness
                .lock()
                .unwrap()
                .pop_front()
                .expect("scripted client ran out of freshness responses")
        }
    }

    /// Makes engine logs visible under `RUST_LOG=debug`. Safe to call from
    /// every test; only the first install wins.
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn test_config() -> EngineConfig {
        EngineConfig {
            query_retry_delay: Duration::from_millis(1),
            freshness_retry_delay: Duration::from_millis(1),
            ..Default::default()
        }
    }

    fn engine(client: ScriptedClient) -> ReportQueryEngine<ScriptedClient> {
        ReportQueryEngine::with_config(client, test_config())
    }

    fn page(value: serde_json::Value) -> RawPage {
        serde_json::from_value(value).unwrap()
    }

    fn metadata(value: serde_json::Value) -> MetricSetMetadata {
        serde_json::from_value(value).unwrap()
    }

    fn daily_request() -> ReportQueryRequest {
        let timeline =
            timeline_service::daily_timeline("2023-09-01", "2023-09-04", "America/Los_Angeles")
                .unwrap();
        ReportQueryRequest::new("com.example.app", MetricSet::CrashRate, timeline)
            .with_dimensions(vec!["deviceModel".into(), "apiLevel".into()])
            .with_metrics(vec!["crashRate".into()])
    }

    fn hourly_request() -> ReportQueryRequest {
        let timeline =
            timeline_service::hourly_timeline("2023-09-01 00:00", "2023-09-01 03:00").unwrap();
        ReportQueryRequest::new("com.example.app", MetricSet::AnrRate, timeline)
            .with_metrics(vec!["anrRate".into()])
    }

    fn simple_row(day: u32, model: &str) -> serde_json::Value {
        json!({
            "startTime": {
                "year": 2023, "month": 9, "day": day,
                "timeZone": {"id": "America/Los_Angeles"}
            },
            "dimensions": [{"dimension": "deviceModel", "stringValue": model}],
            "metrics": [{"metric": "crashRate", "decimalValue": {"value": "0.01"}}]
        })
    }

    #[tokio::test]
    async fn test_zero_rows_yields_empty_sequence() {
        let client = ScriptedClient::with_pages(vec![Ok(page(json!({})))]);
        let engine = engine(client);

        let records = engine.query(&daily_request()).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_pagination_preserves_order_and_terminates() {
        init_tracing();
        let client = ScriptedClient::with_pages(vec![
            Ok(page(json!({
                "rows": [simple_row(1, "Pixel 7"), simple_row(2, "Pixel 8")],
                "nextPageToken": "page-2"
            }))),
            Ok(page(json!({"rows": [simple_row(3, "Galaxy S23")]}))),
        ]);
        let engine = engine(client);

        let records = engine.query(&daily_request()).await.unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].values["deviceModel"], "Pixel 7");
        assert_eq!(records[1].values["deviceModel"], "Pixel 8");
        assert_eq!(records[2].values["deviceModel"], "Galaxy S23");
        assert_eq!(
            *engine.client.seen_tokens.lock().unwrap(),
            vec!["".to_string(), "page-2".to_string()]
        );
        assert_eq!(engine.client.page_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_resource_name_built_from_request() {
        let client = ScriptedClient::with_pages(vec![Ok(page(json!({})))]);
        let engine = engine(client);

        engine.query(&daily_request()).await.unwrap();
        assert_eq!(
            *engine.client.seen_resources.lock().unwrap(),
            vec!["apps/com.example.app/crashRateMetricSet".to_string()]
        );
    }

    #[tokio::test]
    async fn test_daily_event_date_has_no_hour_suffix() {
        let client = ScriptedClient::with_pages(vec![Ok(page(
            json!({"rows": [simple_row(4, "Pixel 7")]}),
        ))]);
        let engine = engine(client);

        let records = engine.query(&daily_request()).await.unwrap();
        assert_eq!(records[0].event_date, "2023-9-4");
        assert_eq!(records[0].time_zone, "America/Los_Angeles");
        assert_eq!(records[0].app_package_name, "com.example.app");
    }

    #[tokio::test]
    async fn test_hourly_event_date_appends_hour() {
        let client = ScriptedClient::with_pages(vec![Ok(page(json!({
            "rows": [
                {
                    "startTime": {
                        "year": 2023, "month": 9, "day": 1, "hours": 5,
                        "timeZone": {"id": "UTC"}
                    },
                    "metrics": [{"metric": "anrRate", "decimalValue": {"value": "0.002"}}]
                },
                {
                    // No hour reported: defaults to 00.
                    "startTime": {"year": 2023, "month": 9, "day": 1, "timeZone": {"id": "UTC"}},
                    "metrics": [{"metric": "anrRate"}]
                }
            ]
        })))]);
        let engine = engine(client);

        let records = engine.query(&hourly_request()).await.unwrap();
        assert_eq!(records[0].event_date, "2023-9-1 5:00");
        assert_eq!(records[1].event_date, "2023-9-1 00:00");
    }

    #[tokio::test]
    async fn test_dimension_and_metric_value_fallbacks() {
        let client = ScriptedClient::with_pages(vec![Ok(page(json!({
            "rows": [{
                "startTime": {
                    "year": 2023, "month": 9, "day": 1,
                    "timeZone": {"id": "UTC"}
                },
                "dimensions": [
                    {"dimension": "apiLevel", "int64Value": "33"},
                    {"dimension": "deviceModel"}
                ],
                "metrics": [{"metric": "crashRate"}]
            }]
        })))]);
        let engine = engine(client);

        let records = engine.query(&daily_request()).await.unwrap();
        let record = &records[0];
        assert_eq!(record.values["apiLevel"], "33");
        assert_eq!(record.values["deviceModel"], "");
        assert_eq!(record.values["crashRate"], "");
    }

    #[tokio::test]
    async fn test_transient_page_errors_are_retried() {
        init_tracing();
        let client = ScriptedClient::with_pages(vec![
            Err(ReportError::Fetch("503".into())),
            Err(ReportError::Fetch("503".into())),
            Ok(page(json!({"rows": [simple_row(1, "Pixel 7")]}))),
        ]);
        let engine = engine(client);

        let records = engine.query(&daily_request()).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(engine.client.page_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausted_retries_fail_without_partial_rows() {
        let client = ScriptedClient::with_pages(vec![
            Ok(page(json!({
                "rows": [simple_row(1, "Pixel 7")],
                "nextPageToken": "page-2"
            }))),
            Err(ReportError::Fetch("500".into())),
            Err(ReportError::Fetch("500".into())),
            Err(ReportError::Fetch("500".into())),
        ]);
        let engine = engine(client);

        let result = engine.query(&daily_request()).await;
        assert!(matches!(result, Err(ReportError::Fetch(_))));
        assert_eq!(engine.client.page_calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_timeout_propagates_without_retry() {
        let client =
            ScriptedClient::with_pages(vec![Err(ReportError::Timeout("deadline".into()))]);
        let engine = engine(client);

        let result = engine.query(&daily_request()).await;
        assert!(matches!(result, Err(ReportError::Timeout(_))));
        assert_eq!(engine.client.page_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_request_fails_before_any_fetch() {
        let client = ScriptedClient::default();
        let engine = engine(client);

        let mut request = daily_request();
        request.app_package_name.clear();

        let result = engine.query(&request).await;
        assert!(matches!(result, Err(ReportError::InvalidRequest(_))));
        assert_eq!(engine.client.page_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_freshness_hourly_only() {
        let client = ScriptedClient::with_freshness(vec![Ok(metadata(json!({
            "freshnessInfo": {
                "freshnesses": [{
                    "aggregationPeriod": "HOURLY",
                    "latestEndTime": {
                        "year": 2023, "month": 9, "day": 4, "hours": 11,
                        "timeZone": {"id": "UTC"}
                    }
                }]
            }
        })))]);
        let engine = engine(client);

        let info = engine
            .get_freshness("com.example.app", MetricSet::CrashRate)
            .await
            .unwrap();

        let hourly = info.hourly.unwrap();
        assert_eq!(hourly.event_date, "2023-9-4 11:00");
        assert_eq!(hourly.time_zone, "UTC");
        assert!(info.daily.is_none());
    }

    #[tokio::test]
    async fn test_freshness_defaults_hour_to_zero() {
        let client = ScriptedClient::with_freshness(vec![Ok(metadata(json!({
            "freshnessInfo": {
                "freshnesses": [{
                    "aggregationPeriod": "DAILY",
                    "latestEndTime": {
                        "year": 2023, "month": 9, "day": 3,
                        "timeZone": {"id": "America/Los_Angeles"}
                    }
                }]
            }
        })))]);
        let engine = engine(client);

        let info = engine
            .get_freshness("com.example.app", MetricSet::CrashRate)
            .await
            .unwrap();
        assert_eq!(info.daily.unwrap().event_date, "2023-9-3 0:00");
    }

    #[tokio::test]
    async fn test_freshness_without_entries_is_empty_not_error() {
        let client = ScriptedClient::with_freshness(vec![Ok(metadata(json!({})))]);
        let engine = engine(client);

        let info = engine
            .get_freshness("com.example.app", MetricSet::StuckBackgroundWakelockRate)
            .await
            .unwrap();
        assert_eq!(info, FreshnessInfo::default());
    }

    #[tokio::test]
    async fn test_freshness_ignores_unknown_periods() {
        let client = ScriptedClient::with_freshness(vec![Ok(metadata(json!({
            "freshnessInfo": {
                "freshnesses": [{
                    "aggregationPeriod": "FULL_RANGE",
                    "latestEndTime": {"year": 2023, "month": 9, "day": 3}
                }]
            }
        })))]);
        let engine = engine(client);

        let info = engine
            .get_freshness("com.example.app", MetricSet::ErrorCount)
            .await
            .unwrap();
        assert_eq!(info, FreshnessInfo::default());
    }

    #[tokio::test]
    async fn test_freshness_retries_timeouts_too() {
        let client = ScriptedClient::with_freshness(vec![
            Err(ReportError::Timeout("deadline".into())),
            Ok(metadata(json!({}))),
        ]);
        let engine = engine(client);

        let info = engine
            .get_freshness("com.example.app", MetricSet::CrashRate)
            .await
            .unwrap();
        assert_eq!(info, FreshnessInfo::default());
        assert_eq!(engine.client.freshness_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_report_wrapper_applies_defaults_and_builds_timeline() {
        let client = ScriptedClient::with_pages(vec![Ok(page(json!({})))]);
        let engine = engine(client);

        engine
            .query_report_daily(
                ReportType::CrashRate,
                "com.example.app",
                "2023-09-01",
                "2023-09-04",
            )
            .await
            .unwrap();

        assert_eq!(
            *engine.client.seen_resources.lock().unwrap(),
            vec!["apps/com.example.app/crashRateMetricSet".to_string()]
        );
    }

    #[tokio::test]
    async fn test_report_wrapper_rejects_bad_bounds_before_fetch() {
        let client = ScriptedClient::default();
        let engine = engine(client);

        let result = engine
            .query_report_hourly(
                ReportType::AnrRate,
                "com.example.app",
                "2023-09-01",
                "2023-09-02",
            )
            .await;
        assert!(matches!(result, Err(ReportError::InvalidTimeInput { .. })));
        assert_eq!(engine.client.page_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_report_request_carries_default_lists() {
        let client = ScriptedClient::default();
        let engine = engine(client);
        let timeline =
            timeline_service::daily_timeline("2023-09-01", "2023-09-02", "UTC").unwrap();

        let request = engine.report_request(ReportType::AnrRate, "com.example.app", timeline);
        assert_eq!(request.metric_set, MetricSet::AnrRate);
        assert_eq!(request.dimensions.len(), 18);
        assert_eq!(
            request.metrics,
            vec!["anrRate", "userPerceivedAnrRate", "distinctUsers"]
        );
        assert_eq!(request.page_size, 50_000);
    }
}
