//! Authenticated Reddit API client.
//!
//! Talks to two hosts: the public one for the OAuth token endpoint and the
//! OAuth one for listings. Supports both the refresh-token and the
//! username/password grant; the refresh token wins when both are configured.

use std::time::Duration;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::config::RedditConfig;
use crate::error::{AuthError, FetchError};
use crate::reddit::types::{Item, Listing, SubmissionData, SubredditData, TopWindow};

/// Host serving `/api/v1/access_token`.
pub const DEFAULT_AUTH_BASE: &str = "https://www.reddit.com";

/// Host serving the listing endpoints, bearer-token only.
pub const DEFAULT_API_BASE: &str = "https://oauth.reddit.com";

/// Page size for the subscription listing.
const PAGE_SIZE: usize = 100;

/// Ceiling for any single HTTP request the digest makes.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Bearer token obtained from the token endpoint, valid for about an hour.
#[derive(Debug, Clone)]
pub struct Session {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
}

/// HTTP client for the slice of the Reddit API the digest needs.
pub struct RedditClient {
    http: reqwest::Client,
    credentials: RedditConfig,
    auth_base: String,
    api_base: String,
}

impl RedditClient {
    /// Builds a client that identifies itself with `user_agent` on every
    /// request. Reddit throttles the default library agents hard, so the
    /// configured string matters.
    pub fn new(credentials: RedditConfig, user_agent: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("building reddit HTTP client")?;
        Ok(Self {
            http,
            credentials,
            auth_base: DEFAULT_AUTH_BASE.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        })
    }

    /// Points both endpoints at different hosts. Used by tests.
    #[must_use]
    pub fn with_base_urls(mut self, auth_base: &str, api_base: &str) -> Self {
        self.auth_base = auth_base.trim_end_matches('/').to_string();
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    /// Exchanges the configured credentials for a bearer token.
    ///
    /// The token endpoint answers `200 OK` with an `error` field in the body
    /// when it dislikes the grant, so a successful status alone proves
    /// nothing.
    pub async fn authenticate(&self) -> Result<Session, AuthError> {
        let url = format!("{}/api/v1/access_token", self.auth_base);
        let form: Vec<(&str, &str)> = match &self.credentials.refresh_token {
            Some(token) => vec![("grant_type", "refresh_token"), ("refresh_token", token)],
            None => vec![
                ("grant_type", "password"),
                ("username", &self.credentials.username),
                ("password", &self.credentials.password),
            ],
        };

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.credentials.app_id, Some(&self.credentials.app_secret))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AuthError::Rejected(
                "app credentials were not accepted".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenEndpoint {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response.json().await?;
        if let Some(error) = token.error {
            return Err(AuthError::Rejected(error));
        }
        match token.access_token {
            Some(access_token) => {
                debug!("obtained reddit access token");
                Ok(Session { access_token })
            }
            None => Err(AuthError::TokenEndpoint {
                status: status.as_u16(),
                body: "token endpoint answered without an access_token".to_string(),
            }),
        }
    }

    /// Display names of every subreddit the account subscribes to, following
    /// the `after` cursor until the listing runs dry.
    pub async fn subscribed_feeds(&self, session: &Session) -> Result<Vec<String>, FetchError> {
        let url = format!("{}/subreddits/mine/subscriber", self.api_base);
        let mut feeds = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let mut query: Vec<(&str, String)> = vec![("limit", PAGE_SIZE.to_string())];
            if let Some(cursor) = &after {
                query.push(("after", cursor.clone()));
            }
            let listing: Listing<SubredditData> = self
                .get_listing(session, &url, &query, "subscribed subreddits", None)
                .await?;
            feeds.extend(
                listing
                    .data
                    .children
                    .into_iter()
                    .map(|child| child.data.display_name),
            );
            match listing.data.after {
                Some(cursor) => after = Some(cursor),
                None => break,
            }
        }

        debug!(feeds = feeds.len(), "listed subscribed subreddits");
        Ok(feeds)
    }

    /// Top `limit` submissions of `feed` over `window`, best first.
    pub async fn top_items(
        &self,
        session: &Session,
        feed: &str,
        window: TopWindow,
        limit: usize,
    ) -> Result<Vec<Item>, FetchError> {
        let url = format!("{}/r/{feed}/top", self.api_base);
        let query = [
            ("t", window.as_str().to_string()),
            ("limit", limit.to_string()),
        ];
        let listing: Listing<SubmissionData> = self
            .get_listing(session, &url, &query, &format!("/r/{feed}/top"), Some(feed))
            .await?;

        Ok(listing
            .data
            .children
            .into_iter()
            .take(limit)
            .map(|child| Item::from(child.data))
            .collect())
    }

    async fn get_listing<T: DeserializeOwned>(
        &self,
        session: &Session,
        url: &str,
        query: &[(&str, String)],
        what: &str,
        missing_feed: Option<&str>,
    ) -> Result<Listing<T>, FetchError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&session.access_token)
            // Without raw_json=1 the API HTML-escapes every text field.
            .query(&[("raw_json", "1")])
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            if let Some(feed) = missing_feed {
                return Err(FetchError::FeedNotFound(feed.to_string()));
            }
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                what: what.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}
