// Review data models: the raw export shape and the validated records.
//
// Raw types mirror the scraper's JSON export loosely: every field is optional
// so a single bad record can be reported precisely instead of failing the
// whole document parse. `RawReview::to_review` is the one place where raw
// records become typed `Review`s.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{InvalidReason, InvalidReviewError};

/// A validated customer review.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Review {
    pub id: Option<String>,
    /// Star rating, always 1-5
    pub rating: u8,
    pub published_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Language code as given by the platform (e.g. "en"), if any
    pub language: Option<String>,
    /// Free-text acquisition label (e.g. "Organic", "Invited"), if any
    pub source: Option<String>,
    pub is_verified: bool,
    pub title: String,
    pub text: String,
    pub reply: Option<Reply>,
}

/// The brand's public reply to a review.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reply {
    /// When the reply was posted. Missing dates still count as a reply.
    pub published_at: Option<DateTime<Utc>>,
    pub message: Option<String>,
}

impl Review {
    /// Uppercased language code, or "UNKNOWN" when the review has none.
    pub fn language_code(&self) -> String {
        match self.language.as_deref().map(str::trim) {
            Some(lang) if !lang.is_empty() => lang.to_uppercase(),
            _ => "UNKNOWN".to_string(),
        }
    }

    pub fn has_reply(&self) -> bool {
        self.reply.is_some()
    }

    /// Reply delay in fractional days. Negative when the reply predates the
    /// review; `None` without a dated reply.
    pub fn response_time_days(&self) -> Option<f64> {
        let replied_at = self.reply.as_ref()?.published_at?;
        let delay = replied_at - self.published_at;
        Some(delay.num_milliseconds() as f64 / MILLIS_PER_DAY)
    }
}

const MILLIS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Brand metadata carried alongside the reviews in an export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default)]
    pub brand_name: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub trust_score: Option<f64>,
    #[serde(default)]
    pub total_reviews: Option<u64>,
    /// Topic labels the platform surfaces for this brand
    #[serde(default)]
    pub top_mentions: Vec<String>,
    #[serde(default)]
    pub ai_summary: Option<AiSummary>,
}

/// Platform-generated summary. Older exports store the bare text, newer ones
/// an object with metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AiSummary {
    Text(String),
    Detailed { summary: String },
}

impl AiSummary {
    pub fn text(&self) -> &str {
        match self {
            AiSummary::Text(text) => text,
            AiSummary::Detailed { summary } => summary,
        }
    }
}

/// A fully validated export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub company: Option<Company>,
    pub reviews: Vec<Review>,
}

impl Dataset {
    /// Validate every record, stopping at the first invalid one.
    pub fn from_raw(raw: RawDataset) -> Result<Self, InvalidReviewError> {
        let (company, raw_reviews) = raw.into_parts();
        let reviews = raw_reviews
            .iter()
            .enumerate()
            .map(|(index, raw)| raw.to_review(index))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { company, reviews })
    }

    /// Topic labels from the company block, if any.
    pub fn top_mentions(&self) -> &[String] {
        self.company
            .as_ref()
            .map(|c| c.top_mentions.as_slice())
            .unwrap_or(&[])
    }
}

/// The export document: either the scraper's `{company, reviews}` envelope
/// or a bare array of reviews.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawDataset {
    Export {
        #[serde(default)]
        company: Option<Company>,
        reviews: Vec<RawReview>,
    },
    Bare(Vec<RawReview>),
}

impl RawDataset {
    pub fn into_parts(self) -> (Option<Company>, Vec<RawReview>) {
        match self {
            RawDataset::Export { company, reviews } => (company, reviews),
            RawDataset::Bare(reviews) => (None, reviews),
        }
    }

    pub fn reviews(&self) -> &[RawReview] {
        match self {
            RawDataset::Export { reviews, .. } => reviews,
            RawDataset::Bare(reviews) => reviews,
        }
    }

    /// Check every record and collect all problems (unlike `Dataset::from_raw`,
    /// which stops at the first).
    pub fn validate_all(&self) -> Vec<InvalidReviewError> {
        self.reviews()
            .iter()
            .enumerate()
            .filter_map(|(index, raw)| raw.to_review(index).err())
            .collect()
    }
}

/// A review exactly as it appears in the export.
///
/// Every field is kept as a loose JSON value so that a wrongly typed field
/// (`"title": 42`, `"reply": "yes"`) fails only its own record in
/// `to_review`, not the whole document parse.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReview {
    pub id: Option<Value>,
    pub rating: Option<Value>,
    pub title: Option<Value>,
    pub text: Option<Value>,
    pub language: Option<Value>,
    pub source: Option<Value>,
    pub published_date: Option<Value>,
    pub updated_date: Option<Value>,
    /// `{publishedDate, updatedDate}`, used when the flat fields are absent
    pub dates: Option<Value>,
    /// `{verification: {isVerified}}`
    pub labels: Option<Value>,
    /// `{isVerified}`, the flat spelling of `labels.verification`
    pub verification: Option<Value>,
    /// `{publishedDate, message}`
    pub reply: Option<Value>,
}

impl RawReview {
    /// Convert into a validated `Review`. `index` is the record's position,
    /// used only for error reporting.
    pub fn to_review(&self, index: usize) -> Result<Review, InvalidReviewError> {
        let id = self.id.as_ref().and_then(|v| match v {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        });
        match self.validate() {
            Ok(review) => Ok(Review { id, ..review }),
            Err(reason) => Err(InvalidReviewError { index, id, reason }),
        }
    }

    fn validate(&self) -> Result<Review, InvalidReason> {
        let rating = parse_rating(self.rating.as_ref())?;

        let dates = object_field(self.dates.as_ref(), "dates")?;

        // The flat field wins; the nested one is only read when it's absent.
        let published_at = match date_field(self.published_date.as_ref(), "publishedDate")? {
            Some(at) => at,
            None => date_field(member(dates, "publishedDate"), "dates.publishedDate")?
                .ok_or(InvalidReason::MissingPublishedDate)?,
        };
        let updated_at = match date_field(self.updated_date.as_ref(), "updatedDate")? {
            Some(at) => Some(at),
            None => date_field(member(dates, "updatedDate"), "dates.updatedDate")?,
        };

        let reply = match object_field(self.reply.as_ref(), "reply")? {
            Some(raw_reply) => Some(Reply {
                published_at: date_field(raw_reply.get("publishedDate"), "reply.publishedDate")?,
                message: string_field(raw_reply.get("message"), "reply.message")?
                    .map(str::to_string),
            }),
            None => None,
        };

        let labelled = match object_field(self.labels.as_ref(), "labels")? {
            Some(labels) => {
                let verification =
                    object_field(labels.get("verification"), "labels.verification")?;
                bool_field(
                    member(verification, "isVerified"),
                    "labels.verification.isVerified",
                )?
            }
            None => None,
        };
        let flat = object_field(self.verification.as_ref(), "verification")?;
        let flagged = bool_field(member(flat, "isVerified"), "verification.isVerified")?;
        let is_verified = labelled.unwrap_or(false) || flagged.unwrap_or(false);

        Ok(Review {
            id: None,
            rating,
            published_at,
            updated_at,
            language: non_empty(string_field(self.language.as_ref(), "language")?)
                .map(str::to_string),
            source: non_empty(string_field(self.source.as_ref(), "source")?).map(str::to_string),
            is_verified,
            title: string_field(self.title.as_ref(), "title")?
                .unwrap_or_default()
                .to_string(),
            text: string_field(self.text.as_ref(), "text")?
                .unwrap_or_default()
                .to_string(),
            reply,
        })
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn wrong_type(field: &'static str, expected: &'static str, value: &Value) -> InvalidReason {
    InvalidReason::BadField {
        field,
        expected,
        value: value.to_string(),
    }
}

// Absent and `null` fields are both `None` in the helpers below.

fn member<'v>(object: Option<&'v Map<String, Value>>, key: &str) -> Option<&'v Value> {
    object.and_then(|o| o.get(key))
}

fn string_field<'v>(
    value: Option<&'v Value>,
    field: &'static str,
) -> Result<Option<&'v str>, InvalidReason> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(wrong_type(field, "a string", other)),
    }
}

fn bool_field(value: Option<&Value>, field: &'static str) -> Result<Option<bool>, InvalidReason> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(wrong_type(field, "true or false", other)),
    }
}

fn object_field<'v>(
    value: Option<&'v Value>,
    field: &'static str,
) -> Result<Option<&'v Map<String, Value>>, InvalidReason> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(wrong_type(field, "an object", other)),
    }
}

/// A timestamp string. Blank strings count as absent.
fn date_field(
    value: Option<&Value>,
    field: &'static str,
) -> Result<Option<DateTime<Utc>>, InvalidReason> {
    match non_empty(string_field(value, field)?) {
        Some(raw) => parse_instant(raw)
            .map(Some)
            .ok_or_else(|| InvalidReason::BadDate {
                field,
                value: raw.to_string(),
            }),
        None => Ok(None),
    }
}

fn parse_rating(value: Option<&Value>) -> Result<u8, InvalidReason> {
    let rating = match value {
        None => return Err(InvalidReason::MissingRating),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => i,
            None => match n.as_f64() {
                Some(f) if f.fract() == 0.0 => f as i64,
                _ => return Err(InvalidReason::NonNumericRating(n.to_string())),
            },
        },
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| InvalidReason::NonNumericRating(s.clone()))?,
        Some(other) => return Err(InvalidReason::NonNumericRating(other.to_string())),
    };

    if (1..=5).contains(&rating) {
        Ok(rating as u8)
    } else {
        Err(InvalidReason::RatingOutOfRange(rating))
    }
}

/// Parse an export timestamp into UTC.
///
/// Accepts RFC 3339 (`2025-12-28T16:29:21.484Z`), a zone-less ISO datetime
/// (read as UTC), or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
