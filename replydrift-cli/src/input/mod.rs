//! Input handling module

pub mod dataset_loader;
pub mod glob_resolver;

pub use dataset_loader::load_datasets;
pub use glob_resolver::resolve_patterns;
