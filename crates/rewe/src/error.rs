//! Error types for the newsletter pipeline.
//!
//! One enum per pipeline concern. Nothing here is retried: every variant
//! propagates to the process boundary and aborts the run.

use thiserror::Error;

/// Errors from exchanging Reddit credentials for a session.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token endpoint rejected the supplied credentials.
    #[error("credentials rejected: {0}")]
    Rejected(String),

    /// The token endpoint answered with an unexpected status.
    #[error("token endpoint returned {status}: {body}")]
    TokenEndpoint { status: u16, body: String },

    /// Network failure or an undecodable token response.
    #[error("token request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors from fetching the subscription list or per-subreddit listings.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The subreddit no longer exists.
    #[error("subreddit r/{0} not found")]
    FeedNotFound(String),

    /// Network-level failure or an undecodable listing body.
    #[error("fetch failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the API (rate limiting, expired session,
    /// server errors). Surfaced as-is; the run aborts.
    #[error("reddit returned {status} fetching {what}")]
    Status { what: String, status: u16 },
}

/// Errors from handing the finished digest to a mail transport.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The transactional-email API answered with a non-success status.
    #[error("mail api returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The HTTP request to the mail API failed outright.
    #[error("mail api request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A sender or recipient address failed to parse.
    #[error("invalid mailbox address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The multipart message could not be assembled.
    #[error("failed to assemble message: {0}")]
    Message(#[from] lettre::error::Error),

    /// SMTP connection, authentication, or submission failure.
    #[error("smtp failure: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}
