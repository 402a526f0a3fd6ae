//! Reddit data types.
//!
//! Wire envelopes mirror the listing JSON shape (`{"data": {"children":
//! [{"data": …}], "after": …}}`); [`Item`] is the trimmed domain type the
//! digest renders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Shortlink prefix for submissions.
const SHORTLINK_BASE: &str = "https://redd.it/";

/// Author value the API substitutes for deleted accounts.
const DELETED_AUTHOR_SENTINEL: &str = "[deleted]";

/// How far back the "top" ranking looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopWindow {
    Hour,
    Day,
    #[default]
    Week,
    Month,
    Year,
    All,
}

impl TopWindow {
    /// Query-parameter value for the listing endpoint.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::All => "all",
        }
    }
}

/// One ranked submission, trimmed to what the digest renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Submission title.
    pub title: String,
    /// Link target (external URL, or the thread itself for self posts).
    pub url: String,
    /// Author display name; `None` when the account was deleted.
    pub author: Option<String>,
    /// Submission time.
    pub created: DateTime<Utc>,
    /// Shortlink to the comment thread.
    pub permalink: String,
    /// Comment count at fetch time.
    pub comments: u64,
}

// =============================================================================
// Listing wire types
// =============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct Listing<T> {
    pub data: ListingData<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListingData<T> {
    // The explicit path keeps serde from demanding `T: Default` here.
    #[serde(default = "Vec::new")]
    pub children: Vec<Thing<T>>,
    pub after: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Thing<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubredditData {
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmissionData {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub num_comments: u64,
}

impl SubmissionData {
    /// Normalized author name. Deleted accounts surface either as a null
    /// field or as the literal `"[deleted]"` depending on the endpoint;
    /// both collapse to `None`.
    fn author_display(&self) -> Option<String> {
        self.author
            .as_deref()
            .filter(|name| *name != DELETED_AUTHOR_SENTINEL)
            .map(ToString::to_string)
    }
}

impl From<SubmissionData> for Item {
    fn from(raw: SubmissionData) -> Self {
        let author = raw.author_display();
        let created =
            DateTime::from_timestamp(raw.created_utc as i64, 0).unwrap_or(DateTime::UNIX_EPOCH);
        let permalink = format!("{SHORTLINK_BASE}{}", raw.id);
        Self {
            title: raw.title,
            url: raw.url,
            author,
            created,
            permalink,
            comments: raw.num_comments,
        }
    }
}
