pub mod core;
pub mod error;
pub mod tdnet;
pub mod utils;

// Re-exports
pub use crate::core::EngineConfig;
pub use error::{Diagnostic, FetchError, ResolveError};
pub use tdnet::{resolve, DirectorySource, LabelSource, Resolution, StaticSource, TaxonomyCache};
