pub mod extractors;
pub mod projects;
