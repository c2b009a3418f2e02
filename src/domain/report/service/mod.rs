pub mod report_query_engine;
pub mod timeline_service;
