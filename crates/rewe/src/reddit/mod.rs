//! Reddit API access: OAuth authentication and listings.

mod client;
mod types;

pub(crate) use client::REQUEST_TIMEOUT;
pub use client::{RedditClient, Session, DEFAULT_API_BASE, DEFAULT_AUTH_BASE};
pub use types::{Item, TopWindow};
