//! Client-side query engine for the Google Play Developer Reporting API.
//!
//! The crate does not own a transport: callers inject a [`MetricSetClient`]
//! that executes one page query or one freshness fetch against a named metric
//! set. [`ReportQueryEngine`] drives pagination with bounded retries and
//! flattens the vendor's nested rows into tabular [`NormalizedRecord`]s.

pub mod config;
pub mod core;
pub mod domain;
pub mod errors;

pub use crate::config::EngineConfig;
pub use crate::core::client::metric_set::MetricSet;
pub use crate::core::client::metric_set_client::MetricSetClient;
pub use crate::core::client::wire::{AggregationPeriod, QueryPageBody, RawPage, TimelineSpec};
pub use crate::domain::report::dto::report_query_request::ReportQueryRequest;
pub use crate::domain::report::model::{FreshnessEntry, FreshnessInfo, NormalizedRecord};
pub use crate::domain::report::report_type::{ReportType, ReportTypeConfig};
pub use crate::domain::report::service::report_query_engine::ReportQueryEngine;
pub use crate::domain::report::service::timeline_service;
pub use crate::errors::ReportError;
