//! End-to-end pipeline tests against mocked Reddit and Mailjet endpoints.

use std::path::PathBuf;

use chrono::Utc;
use regex::Regex;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rewe::{
    Config, DispatchError, MailjetTransport, Newsletter, RedditClient, RedditConfig,
    StylesheetSource, TransportConfig,
};

fn test_config() -> Config {
    Config {
        reddit: RedditConfig {
            app_id: "app-id".to_string(),
            app_secret: "app-secret".to_string(),
            username: "reader".to_string(),
            password: "hunter2".to_string(),
            refresh_token: None,
        },
        recipient: "operator@example.com".to_string(),
        transport: TransportConfig::Mailjet {
            api_key_public: "pub".to_string(),
            api_key_private: "priv".to_string(),
        },
        stylesheet: StylesheetSource::Bundled {
            paths: vec![PathBuf::from(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/css/reddit.css"
            ))],
        },
        user_agent: "rewe-tests/1.0".to_string(),
    }
}

fn submission(id: &str, title: &str, author: serde_json::Value, days_ago: i64) -> serde_json::Value {
    json!({
        "kind": "t3",
        "data": {
            "id": id,
            "title": title,
            "url": format!("https://example.com/{id}"),
            "author": author,
            "created_utc": (Utc::now().timestamp() - days_ago * 86_400) as f64,
            "num_comments": 5
        }
    })
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "sekrit-token",
            "token_type": "bearer",
            "expires_in": 3600,
            "scope": "*"
        })))
        .mount(server)
        .await;
}

async fn mount_subscriptions(server: &MockServer, feeds: &[&str]) {
    let children: Vec<_> = feeds
        .iter()
        .map(|name| json!({"kind": "t5", "data": {"display_name": name}}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/subreddits/mine/subscriber"))
        .and(query_param("raw_json", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"kind": "Listing", "data": {"children": children, "after": null}}),
        ))
        .mount(server)
        .await;
}

async fn mount_top(server: &MockServer, feed: &str, submissions: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path(format!("/r/{feed}/top")))
        .and(query_param("raw_json", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"kind": "Listing", "data": {"children": submissions, "after": null}}),
        ))
        .mount(server)
        .await;
}

fn newsletter_against(reddit: &MockServer, mailjet: &MockServer) -> Newsletter {
    let config = test_config();
    let client = RedditClient::new(config.reddit.clone(), &config.user_agent)
        .unwrap()
        .with_base_urls(&reddit.uri(), &reddit.uri());
    let transport = MailjetTransport::new(
        "pub".to_string(),
        "priv".to_string(),
        config.recipient.clone(),
    )
    .unwrap()
    .with_endpoint(&mailjet.uri());
    Newsletter::with_parts(config, client, Box::new(transport))
}

#[tokio::test]
async fn test_two_feeds_render_six_inlined_cards() {
    let reddit = MockServer::start().await;
    let mailjet = MockServer::start().await;

    mount_token(&reddit).await;
    mount_subscriptions(&reddit, &["rust", "emacs"]).await;
    mount_top(
        &reddit,
        "rust",
        vec![
            submission("r1", "Borrow checker Q&A", json!("alice"), 1),
            submission("r2", "Lifetimes explained", json!("bob"), 2),
            submission("r3", "Pin and Unpin", json!("carol"), 3),
        ],
    )
    .await;
    mount_top(
        &reddit,
        "emacs",
        vec![
            submission("e1", "Org mode tricks", json!("dave"), 1),
            submission("e2", "Magit workflows", json!("erin"), 2),
            submission("e3", "Elisp profiling", json!("frank"), 3),
        ],
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"Messages": [{"Status": "success"}]}),
        ))
        .expect(1)
        .mount(&mailjet)
        .await;

    let summary = newsletter_against(&reddit, &mailjet).send().await.unwrap();
    assert_eq!(summary.feeds, 2);
    assert_eq!(summary.items, 6);

    let requests = mailjet.received_requests().await.unwrap();
    let payload: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let message = &payload["Messages"][0];
    assert_eq!(message["Subject"], "Reddit weekly");
    assert_eq!(message["To"][0]["Email"], "operator@example.com");

    let html = message["HTMLPart"].as_str().unwrap();
    let rust_at = html.find(">/r/rust</h1>").unwrap();
    let emacs_at = html.find(">/r/emacs</h1>").unwrap();
    assert!(rust_at < emacs_at);
    assert_eq!(html.matches(r#"class="DIV_2""#).count(), 6);
    assert!(html.contains("a day ago"));

    // Titles arrive raw (the client asks for unescaped text) and get
    // escaped exactly once, by the renderer.
    assert!(html.contains("Borrow checker Q&amp;A"));
    assert!(!html.contains("&amp;amp;"));

    // The stylesheet must be fully inlined, with nothing left over.
    assert!(!html.contains("<style"));
    assert!(!html.contains(r#"rel="stylesheet""#));
    assert!(html.contains("style=\""));

    // No unresolved template placeholders anywhere in the document.
    let placeholder = Regex::new(r"\{[a-z_]+\}").unwrap();
    assert!(!placeholder.is_match(html));

    let text = message["TextPart"].as_str().unwrap();
    assert!(text.contains("/r/rust"));
    assert!(text.contains("Org mode tricks"));
    assert!(text.contains("Borrow checker Q&A"));
}

#[tokio::test]
async fn test_deleted_authors_get_a_placeholder_and_the_run_completes() {
    let reddit = MockServer::start().await;
    let mailjet = MockServer::start().await;

    mount_token(&reddit).await;
    mount_subscriptions(&reddit, &["rust"]).await;
    mount_top(
        &reddit,
        "rust",
        vec![
            submission("r1", "Posted then gone", json!(null), 1),
            submission("r2", "Also gone", json!("[deleted]"), 2),
            submission("r3", "Still here", json!("alice"), 3),
        ],
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"Messages": [{"Status": "success"}]}),
        ))
        .expect(1)
        .mount(&mailjet)
        .await;

    let summary = newsletter_against(&reddit, &mailjet).send().await.unwrap();
    assert_eq!(summary.items, 3);

    let requests = mailjet.received_requests().await.unwrap();
    let payload: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let html = payload["Messages"][0]["HTMLPart"].as_str().unwrap();
    assert_eq!(html.matches(">[deleted]</span>").count(), 2);
    assert!(html.contains(">alice</a>"));
}

#[tokio::test]
async fn test_dispatch_failure_surfaces_and_is_not_retried() {
    let reddit = MockServer::start().await;
    let mailjet = MockServer::start().await;

    mount_token(&reddit).await;
    mount_subscriptions(&reddit, &["rust"]).await;
    mount_top(
        &reddit,
        "rust",
        vec![submission("r1", "Borrow checker tips", json!("alice"), 1)],
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("mailjet is down"))
        .expect(1)
        .mount(&mailjet)
        .await;

    let err = newsletter_against(&reddit, &mailjet)
        .send()
        .await
        .unwrap_err();
    match err.downcast_ref::<DispatchError>() {
        Some(DispatchError::Api { status, body }) => {
            assert_eq!(*status, 500);
            assert_eq!(body, "mailjet is down");
        }
        other => panic!("expected a dispatch error, got {other:?}"),
    }
}
