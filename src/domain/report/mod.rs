pub mod dto;
pub mod model;
pub mod report_type;
pub mod service;
