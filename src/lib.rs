// reviewpulse: weekly analytics for customer review exports
//
// This is the library root. Each module corresponds to a stage of the
// weekly report: ingest reviews, window and aggregate them, tag topics,
// render the result.

pub mod analytics;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod reviews;
pub mod topics;
