// Report pipeline: composes ingestion, analytics and topic tagging.

pub mod weekly;
