//! HTML and plain-text assembly for the weekly page.
//!
//! The card layout keeps the class names the bundled stylesheet targets
//! (`DIV_2`, `P_3`, …), so the inliner can match its rules. Every
//! interpolated value is escaped before it reaches the document.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use url::Url;

use crate::digest::humanize;
use crate::reddit::Item;

/// Profile link prefix for item authors.
const USER_URL_BASE: &str = "https://www.reddit.com/user/";

/// Placeholder shown when the submitting account no longer exists.
const DELETED_AUTHOR: &str = "[deleted]";

/// One rendered section: a feed name plus its ranked items.
#[derive(Debug, Clone)]
pub struct FeedSection {
    pub feed: String,
    pub items: Vec<Item>,
}

/// Renders feed sections into the digest page.
pub struct DigestGenerator;

impl DigestGenerator {
    /// Writes the complete document into `out`: preamble, `style_block`
    /// inside the head, one section per feed in input order, closing tags.
    ///
    /// `now` anchors every relative timestamp, so a page renders the same
    /// bytes for the same instant.
    pub fn write_page<W: Write>(
        out: &mut W,
        style_block: &str,
        sections: &[FeedSection],
        now: DateTime<Utc>,
    ) {
        let _ = write!(
            out,
            r#"<!DOCTYPE html><html><head><meta http-equiv="Content-Type" content="text/html; charset=UTF-8">{style_block}</head><body class="">"#
        );
        for section in sections {
            Self::write_section(out, section, now);
        }
        let _ = write!(out, "</body></html>");
    }

    /// [`write_page`](Self::write_page) into a fresh string.
    #[must_use]
    pub fn generate_html(
        style_block: &str,
        sections: &[FeedSection],
        now: DateTime<Utc>,
    ) -> String {
        let mut page = String::new();
        Self::write_page(&mut page, style_block, sections, now);
        page
    }

    /// Plain-text rendition for the `text/plain` alternative part.
    #[must_use]
    pub fn generate_text(sections: &[FeedSection], now: DateTime<Utc>) -> String {
        let mut text = String::new();
        for section in sections {
            let _ = writeln!(text, "/r/{}", section.feed);
            for item in &section.items {
                let _ = writeln!(
                    text,
                    "  * {title} ({domain})\n    submitted {when} by {author} - {comments} comments\n    {permalink}",
                    title = item.title,
                    domain = domain_of(&item.url),
                    when = humanize(item.created, now),
                    author = item.author.as_deref().unwrap_or(DELETED_AUTHOR),
                    comments = item.comments,
                    permalink = item.permalink,
                );
            }
            let _ = writeln!(text);
        }
        text
    }

    fn write_section<W: Write>(out: &mut W, section: &FeedSection, now: DateTime<Utc>) {
        let _ = write!(out, "<h1>/r/{feed}</h1>", feed = html_escape(&section.feed));
        for item in &section.items {
            Self::write_card(out, item, now);
        }
    }

    fn write_card<W: Write>(out: &mut W, item: &Item, now: DateTime<Utc>) {
        let _ = write!(
            out,
            r#"<div class="DIV_2">
    <p class="P_3"><a href="{url}" class="A_4">{title}</a> <span class="SPAN_5">(<a href="" class="A_6">{domain}</a>)</span></p>
        <p class="P_8">submitted <time class="TIME_9">{when}</time> by "#,
            url = html_escape(&item.url),
            title = html_escape(&item.title),
            domain = html_escape(&domain_of(&item.url)),
            when = humanize(item.created, now),
        );
        Self::write_author(out, item.author.as_deref());
        let _ = write!(
            out,
            r#"<span class="SPAN_11"></span><span class="SPAN_12"></span> <a href="{permalink}" rel="nofollow" class="A_15">{comments} comments</a></p>
        </div>"#,
            permalink = html_escape(&item.permalink),
            comments = item.comments,
        );
    }

    fn write_author<W: Write>(out: &mut W, author: Option<&str>) {
        match author {
            Some(name) => {
                let _ = write!(
                    out,
                    r#"<a href="{base}{href}" class="A_10">{text}</a>"#,
                    base = USER_URL_BASE,
                    href = urlencoding::encode(name),
                    text = html_escape(name),
                );
            }
            None => {
                let _ = write!(out, r#"<span class="A_10">{DELETED_AUTHOR}</span>"#);
            }
        }
    }
}

/// Host part of `link`, or an empty string when the URL does not parse.
fn domain_of(link: &str) -> String {
    Url::parse(link)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .unwrap_or_default()
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
