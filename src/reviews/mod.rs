// Review ingestion: export models and the sources that load them.

pub mod models;
pub mod source;

pub use models::{Company, Dataset, Reply, Review};
pub use source::{InMemorySource, JsonFileSource, ReviewSource};
