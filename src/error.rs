// Domain errors: malformed review records.
//
// Loading is fail-fast: the first record that can't become a `Review` stops
// the load with an `InvalidReviewError` that says which record and why.
// Everything above the domain layer wraps these in anyhow.

use thiserror::Error;

/// A review record that can't be turned into a `Review`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "invalid review #{index}{}: {reason}",
    .id.as_deref().map(|id| format!(" (id {id})")).unwrap_or_default()
)]
pub struct InvalidReviewError {
    /// Zero-based position of the record in the input
    pub index: usize,
    /// The record's own id, when it has one
    pub id: Option<String>,
    pub reason: InvalidReason,
}

/// Why a record was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidReason {
    #[error("missing rating")]
    MissingRating,

    #[error("rating {0} is not a whole number")]
    NonNumericRating(String),

    #[error("rating {0} is outside 1-5")]
    RatingOutOfRange(i64),

    #[error("missing publishedDate")]
    MissingPublishedDate,

    #[error("unparsable {field}: {value:?}")]
    BadDate { field: &'static str, value: String },

    /// A field is present but holds the wrong JSON type
    #[error("{field} should be {expected}, got {value}")]
    BadField {
        field: &'static str,
        expected: &'static str,
        value: String,
    },
}
