pub mod archive;
pub mod classifier;
pub mod engine;
pub mod join;
pub mod parsing;
pub mod report;
pub mod taxonomy;

pub use engine::{resolve, Resolution};
pub use taxonomy::{DirectorySource, LabelSource, StaticSource, TaxonomyCache};
