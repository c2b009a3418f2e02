pub mod metric_set;
pub mod metric_set_client;
pub mod wire;
