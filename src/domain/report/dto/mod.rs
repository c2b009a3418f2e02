pub mod report_query_request;
