//! Stylesheet sources for the document head.
//!
//! Four modes: concatenate bundled CSS files, embed every stylesheet a
//! reference page links, copy the reference page's head outright, or skip
//! styling. The scraped modes fetch the page, parse it, and extract what
//! they need before touching the network again.

use std::path::PathBuf;

use anyhow::Context;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

/// Where the digest's CSS comes from.
#[derive(Debug, Clone)]
pub enum StylesheetSource {
    /// Local CSS files, concatenated in order into `<style>` blocks.
    Bundled { paths: Vec<PathBuf> },
    /// Download every stylesheet the reference page links and embed the text.
    LinkedStyles { page: Url },
    /// Copy the reference page's head verbatim, with protocol-relative URLs
    /// rewritten to explicit HTTPS.
    PageHead { page: Url },
    /// No stylesheet at all.
    Unstyled,
}

impl StylesheetSource {
    /// Produces the block inserted into the document head.
    pub async fn resolve(&self, http: &reqwest::Client) -> anyhow::Result<String> {
        match self {
            Self::Bundled { paths } => {
                let mut block = String::new();
                for path in paths {
                    let css = std::fs::read_to_string(path)
                        .with_context(|| format!("reading stylesheet {}", path.display()))?;
                    push_style_block(&mut block, &css);
                }
                Ok(block)
            }
            Self::LinkedStyles { page } => {
                let html = fetch_text(http, page.clone()).await?;
                let links = stylesheet_links(&html, page);
                debug!(page = %page, sheets = links.len(), "embedding linked stylesheets");
                let mut block = String::new();
                for link in links {
                    let css = fetch_text(http, link).await?;
                    push_style_block(&mut block, &css);
                }
                Ok(block)
            }
            Self::PageHead { page } => {
                let html = fetch_text(http, page.clone()).await?;
                let head = page_head(&html)
                    .with_context(|| format!("reference page {page} has no <head>"))?;
                Ok(force_https(&head))
            }
            Self::Unstyled => Ok(String::new()),
        }
    }

    /// Reference page backing the scraped modes. The inliner resolves
    /// relative URLs against it.
    #[must_use]
    pub fn page_url(&self) -> Option<&Url> {
        match self {
            Self::LinkedStyles { page } | Self::PageHead { page } => Some(page),
            Self::Bundled { .. } | Self::Unstyled => None,
        }
    }
}

/// Appends one `<style>` block wrapping `css`.
fn push_style_block(block: &mut String, css: &str) {
    block.push_str("\n<style>\n");
    block.push_str(css);
    block.push_str("\n</style>\n");
}

/// Every `<link rel="stylesheet">` target of the page, resolved against
/// the page URL. Unresolvable hrefs are skipped.
fn stylesheet_links(html: &str, page: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(r#"link[rel="stylesheet"]"#).expect("invalid link selector");
    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| page.join(href).ok())
        .collect()
}

/// Inner HTML of the page's `<head>` element.
fn page_head(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("head").expect("invalid head selector");
    document
        .select(&selector)
        .next()
        .map(|head| head.inner_html())
}

/// Rewrites protocol-relative attribute URLs (`="//…"`) to explicit HTTPS.
fn force_https(fragment: &str) -> String {
    fragment.replace(r#"="//"#, r#"="https://"#)
}

async fn fetch_text(http: &reqwest::Client, url: Url) -> anyhow::Result<String> {
    let response = http
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("fetching {url}"))?;
    let status = response.status();
    anyhow::ensure!(status.is_success(), "GET {url} returned status {status}");
    response
        .text()
        .await
        .with_context(|| format!("reading body of {url}"))
}
