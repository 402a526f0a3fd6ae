//! Environment-driven configuration.
//!
//! Everything one run needs comes from the process environment: Reddit API
//! credentials, the destination mailbox, exactly one mail transport, and
//! the stylesheet mode for the rendered page. The loader produces an owned
//! [`Config`] passed down the pipeline; nothing reads the environment after
//! startup.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use url::Url;

use crate::digest::StylesheetSource;

/// User agent presented to Reddit and to stylesheet hosts.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:52.0) Gecko/20100101 Firefox/52.0";

/// Default SMTP submission host.
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Default SMTP submission port (STARTTLS).
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Reference page for the scraped stylesheet modes.
const DEFAULT_CSS_PAGE: &str = "https://www.reddit.com/";

/// Bundled stylesheet, resolved next to the executable when present.
const DEFAULT_CSS_FILE: &str = "css/reddit.css";

/// Reddit API credentials.
#[derive(Debug, Clone)]
pub struct RedditConfig {
    /// OAuth app client id.
    pub app_id: String,
    /// OAuth app client secret.
    pub app_secret: String,
    /// Account username.
    pub username: String,
    /// Account password.
    pub password: String,
    /// Long-lived refresh token; when present the client prefers the
    /// refresh-token grant over the password grant.
    pub refresh_token: Option<String>,
}

/// Which mail transport carries the digest.
#[derive(Debug, Clone)]
pub enum TransportConfig {
    /// Mailjet HTTP send API.
    Mailjet {
        api_key_public: String,
        api_key_private: String,
    },
    /// Direct SMTP submission with an app password.
    Smtp {
        sender: String,
        password: String,
        host: String,
        port: u16,
    },
}

/// Full runtime configuration for one newsletter run.
#[derive(Debug, Clone)]
pub struct Config {
    pub reddit: RedditConfig,
    /// Single destination mailbox.
    pub recipient: String,
    pub transport: TransportConfig,
    pub stylesheet: StylesheetSource,
    pub user_agent: String,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Required Environment Variables
    /// - `REWE_REDDIT_APP_ID` / `REWE_REDDIT_APP_SECRET`: OAuth app credentials
    /// - `REWE_REDDIT_USERNAME` / `REWE_REDDIT_PASSWORD`: account credentials
    /// - `REWE_DEST_EMAIL`: destination mailbox
    /// - one transport pair: `MJ_APIKEY_PUBLIC` + `MJ_APIKEY_PRIVATE`
    ///   (Mailjet), or `REWE_SMTP_SENDER` + `REWE_SMTP_PASSWORD` (SMTP)
    ///
    /// # Optional Environment Variables
    /// - `REWE_REDDIT_REFRESH_TOKEN`: prefer the refresh-token grant
    /// - `REWE_SMTP_HOST` / `REWE_SMTP_PORT`: submission endpoint (default Gmail)
    /// - `REWE_CSS_MODE`: `bundled` (default), `linked`, `head`, or `none`
    /// - `REWE_CSS_PATH`: ordered stylesheet path list for `bundled`
    /// - `REWE_CSS_PAGE_URL`: reference page for `linked`/`head`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require =
            |key: &str| get(key).with_context(|| format!("{key} environment variable not set"));

        let reddit = RedditConfig {
            app_id: require("REWE_REDDIT_APP_ID")?,
            app_secret: require("REWE_REDDIT_APP_SECRET")?,
            username: require("REWE_REDDIT_USERNAME")?,
            password: require("REWE_REDDIT_PASSWORD")?,
            refresh_token: get("REWE_REDDIT_REFRESH_TOKEN"),
        };

        let recipient = require("REWE_DEST_EMAIL")?;

        let transport = match (get("MJ_APIKEY_PUBLIC"), get("MJ_APIKEY_PRIVATE")) {
            (Some(public), Some(private)) => TransportConfig::Mailjet {
                api_key_public: public,
                api_key_private: private,
            },
            _ => match (get("REWE_SMTP_SENDER"), get("REWE_SMTP_PASSWORD")) {
                (Some(sender), Some(password)) => TransportConfig::Smtp {
                    sender,
                    password,
                    host: get("REWE_SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
                    port: get("REWE_SMTP_PORT")
                        .and_then(|p| p.parse().ok())
                        .unwrap_or(DEFAULT_SMTP_PORT),
                },
                _ => bail!(
                    "no mail transport configured: set MJ_APIKEY_PUBLIC/MJ_APIKEY_PRIVATE \
                     or REWE_SMTP_SENDER/REWE_SMTP_PASSWORD"
                ),
            },
        };

        let stylesheet = stylesheet_from(&get)?;

        Ok(Self {
            reddit,
            recipient,
            transport,
            stylesheet,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }
}

fn stylesheet_from<F>(get: &F) -> Result<StylesheetSource>
where
    F: Fn(&str) -> Option<String>,
{
    let mode = get("REWE_CSS_MODE").unwrap_or_else(|| "bundled".to_string());
    match mode.as_str() {
        "bundled" => Ok(StylesheetSource::Bundled {
            paths: css_paths(get),
        }),
        "linked" => Ok(StylesheetSource::LinkedStyles { page: css_page(get)? }),
        "head" => Ok(StylesheetSource::PageHead { page: css_page(get)? }),
        "none" => Ok(StylesheetSource::Unstyled),
        other => bail!("unknown REWE_CSS_MODE: {other} (expected bundled, linked, head, or none)"),
    }
}

fn css_page<F>(get: &F) -> Result<Url>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = get("REWE_CSS_PAGE_URL").unwrap_or_else(|| DEFAULT_CSS_PAGE.to_string());
    Url::parse(&raw).with_context(|| format!("invalid REWE_CSS_PAGE_URL: {raw}"))
}

fn css_paths<F>(get: &F) -> Vec<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(list) = get("REWE_CSS_PATH") {
        return std::env::split_paths(&list).collect();
    }
    vec![default_css_path()]
}

/// Default bundled stylesheet: alongside the executable if present,
/// otherwise relative to the working directory.
fn default_css_path() -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let candidate = dir.join(DEFAULT_CSS_FILE);
            if candidate.exists() {
                return candidate;
            }
        }
    }
    PathBuf::from(DEFAULT_CSS_FILE)
}
