//! Reddit weekly newsletter pipeline.
//!
//! Turns the operator's subscribed subreddits into one styled HTML email:
//!
//! - authenticates against the Reddit OAuth API and lists subscriptions
//! - fetches the top three submissions per subreddit over the trailing week
//! - renders an escaped HTML digest with a configurable stylesheet source
//! - inlines every CSS rule so the page survives email clients
//! - dispatches through the Mailjet send API or direct SMTP
//!
//! The binary gates itself to Saturdays unless invoked with `--force`.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod digest;
pub mod error;
pub mod mail;
pub mod newsletter;
pub mod reddit;
pub mod schedule;

// Re-export main types
pub use config::{Config, RedditConfig, TransportConfig};
pub use digest::{DigestGenerator, FeedSection, StylesheetSource};
pub use error::{AuthError, DispatchError, FetchError};
pub use mail::{MailTransport, MailjetTransport, SmtpTransport};
pub use newsletter::{Newsletter, RunSummary};
pub use reddit::{Item, RedditClient, Session, TopWindow};
