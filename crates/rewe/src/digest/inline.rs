//! CSS inlining for mail clients.
//!
//! Most clients strip `<style>` blocks and linked stylesheets, so the
//! rendered page goes through one post-processing pass that moves every
//! matching rule onto the elements themselves.

use anyhow::Context;
use css_inline::CSSInliner;
use url::Url;

/// Base URL relative links resolve against when no reference page is
/// configured.
pub const DEFAULT_BASE_URL: &str = "https://www.reddit.com";

/// Rewrites every `<style>`/`<link rel="stylesheet">` rule into inline
/// `style` attributes and strips the source tags. Rules that match nothing
/// are dropped, not kept as a trailing stylesheet.
///
/// Remote stylesheet fetches inside the inliner block the calling thread,
/// so async callers should run this under a blocking task.
pub fn inline_document(html: &str, base_url: Option<Url>) -> anyhow::Result<String> {
    let inliner = CSSInliner::options()
        .base_url(base_url)
        .keep_style_tags(false)
        .keep_link_tags(false)
        .build();
    inliner.inline(html).context("inlining stylesheet rules")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_style_block_becomes_inline_attributes() {
        let html = "<!DOCTYPE html><html><head><style>h1 { color: blue }</style></head>\
                    <body><h1>Weekly</h1></body></html>";
        let out = inline_document(html, None).unwrap();
        assert!(!out.contains("<style>"));
        assert!(out.contains("style="));
        assert!(out.contains("color: blue"));
    }

    #[test]
    fn test_class_rules_attach_to_cards() {
        let html = r#"<html><head><style>.DIV_2 { margin: 8px }</style></head><body><div class="DIV_2">x</div></body></html>"#;
        let out = inline_document(html, None).unwrap();
        assert!(out.contains("margin: 8px"));
        assert!(!out.contains("<style>"));
    }

    #[test]
    fn test_default_base_url_parses() {
        let base = Url::parse(DEFAULT_BASE_URL).unwrap();
        let html = "<html><head><style>p { margin: 0 }</style></head><body><p>x</p></body></html>";
        let out = inline_document(html, Some(base)).unwrap();
        assert!(out.contains("margin: 0"));
    }

    #[tokio::test]
    async fn test_linked_stylesheet_is_fetched_and_stripped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reddit.css"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/css")
                    .set_body_string(".DIV_2 { color: red }"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let html = format!(
            r#"<html><head><link rel="stylesheet" href="{}/reddit.css"></head><body><div class="DIV_2">x</div></body></html>"#,
            server.uri()
        );
        let out = tokio::task::spawn_blocking(move || inline_document(&html, None))
            .await
            .unwrap()
            .unwrap();

        assert!(out.contains("color: red"));
        assert!(!out.contains("<link"));
        assert!(!out.contains(r#"rel="stylesheet""#));
    }
}
