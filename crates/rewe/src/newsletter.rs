//! The newsletter pipeline.
//!
//! One linear pass: authenticate, list subscriptions, fetch each feed's
//! weekly top, render the page, inline its CSS, hand it to the transport.
//! Nothing is cached or retried; any stage failing aborts the run before
//! anything is sent.

use anyhow::Context;
use chrono::Utc;
use tracing::info;
use url::Url;

use crate::config::Config;
use crate::digest::{inline_document, DigestGenerator, FeedSection, DEFAULT_BASE_URL};
use crate::mail::{transport_for, MailTransport};
use crate::reddit::{RedditClient, REQUEST_TIMEOUT, TopWindow};

/// Fixed subject line.
pub const SUBJECT: &str = "Reddit weekly";

/// Cards per feed section.
pub const ITEMS_PER_FEED: usize = 3;

/// Counters reported after a successful run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    pub feeds: usize,
    pub items: usize,
}

/// Owns every collaborator one run needs.
pub struct Newsletter {
    config: Config,
    client: RedditClient,
    transport: Box<dyn MailTransport>,
}

impl Newsletter {
    /// Builds the pipeline the configuration describes.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let client = RedditClient::new(config.reddit.clone(), &config.user_agent)?;
        let transport = transport_for(&config.transport, &config.recipient)?;
        Ok(Self {
            config,
            client,
            transport,
        })
    }

    /// Assembles a pipeline from pre-built parts. Used by tests.
    #[must_use]
    pub fn with_parts(
        config: Config,
        client: RedditClient,
        transport: Box<dyn MailTransport>,
    ) -> Self {
        Self {
            config,
            client,
            transport,
        }
    }

    /// Runs the pipeline end to end and reports what was sent.
    pub async fn send(&self) -> anyhow::Result<RunSummary> {
        let session = self
            .client
            .authenticate()
            .await
            .context("authenticating to reddit")?;

        let feeds = self
            .client
            .subscribed_feeds(&session)
            .await
            .context("listing subscribed subreddits")?;
        info!(feeds = feeds.len(), "fetched subscription list");

        let mut sections = Vec::with_capacity(feeds.len());
        for feed in feeds {
            info!(feed = %feed, "fetching top submissions");
            let items = self
                .client
                .top_items(&session, &feed, TopWindow::Week, ITEMS_PER_FEED)
                .await
                .with_context(|| format!("fetching top submissions for /r/{feed}"))?;
            sections.push(FeedSection { feed, items });
        }

        let http = reqwest::Client::builder()
            .user_agent(&self.config.user_agent)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("building stylesheet HTTP client")?;
        let style_block = self
            .config
            .stylesheet
            .resolve(&http)
            .await
            .context("resolving the stylesheet")?;

        // One clock read so every relative timestamp agrees.
        let now = Utc::now();
        let html = DigestGenerator::generate_html(&style_block, &sections, now);
        let text = DigestGenerator::generate_text(&sections, now);

        let base_url = self
            .config
            .stylesheet
            .page_url()
            .cloned()
            .or_else(|| Url::parse(DEFAULT_BASE_URL).ok());
        // The inliner fetches remote stylesheets with blocking I/O.
        let inlined = tokio::task::spawn_blocking(move || inline_document(&html, base_url))
            .await
            .context("joining the css inlining task")??;

        info!(
            transport = self.transport.name(),
            recipient = %self.config.recipient,
            bytes = inlined.len(),
            "dispatching digest"
        );
        self.transport
            .send(SUBJECT, &inlined, &text)
            .await
            .context("dispatching the digest email")?;

        Ok(RunSummary {
            feeds: sections.len(),
            items: sections.iter().map(|section| section.items.len()).sum(),
        })
    }
}
