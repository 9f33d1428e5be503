pub mod access_log;
pub mod error_boundary;
