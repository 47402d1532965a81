// src/config.rs
//! Run configuration: the ordered feed list plus SMTP/delivery settings,
//! loaded once at startup and passed into the pipeline. Credentials come
//! from the environment only.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use crate::digest::FeedSource;
use crate::notify::DeliveryMode;

const ENV_PATH: &str = "DIGEST_CONFIG_PATH";

const ENV_SENDER_EMAIL: &str = "SENDER_EMAIL";
const ENV_SENDER_PASSWORD: &str = "SENDER_PASSWORD";
const ENV_KINDLE_EMAIL: &str = "KINDLE_EMAIL";

#[derive(Debug, Clone, Deserialize)]
pub struct DigestConfig {
    pub feeds: Vec<FeedSource>,
    #[serde(default)]
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 587,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    pub mode: DeliveryMode,
    /// Best-effort local copy of the rendered digest; `None` disables it.
    pub preview_path: Option<PathBuf>,
    /// Courtesy pause between article page fetches.
    pub fetch_delay_ms: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            mode: DeliveryMode::default(),
            preview_path: Some(PathBuf::from("digest_preview.html")),
            fetch_delay_ms: 1000,
        }
    }
}

/// Sender credentials and the device inbox address. Environment-only so app
/// passwords never land in a config file.
#[derive(Debug, Clone)]
pub struct MailAccount {
    pub sender: String,
    pub password: String,
    pub recipient: String,
}

impl MailAccount {
    pub fn from_env() -> Result<Self> {
        let get = |key: &str| {
            std::env::var(key).map_err(|_| anyhow!("{key} is not set in the environment"))
        };
        Ok(Self {
            sender: get(ENV_SENDER_EMAIL)?,
            password: get(ENV_SENDER_PASSWORD)?,
            recipient: get(ENV_KINDLE_EMAIL)?,
        })
    }
}

/// Load config from an explicit path. Supports TOML or JSON formats.
pub fn load_from(path: &Path) -> Result<DigestConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading digest config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_config(&content, ext.as_str())
}

/// Load config using env var + fallbacks:
/// 1) $DIGEST_CONFIG_PATH
/// 2) config/digest.toml
/// 3) config/digest.json
pub fn load_default() -> Result<DigestConfig> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_from(&pb);
        }
        return Err(anyhow!("DIGEST_CONFIG_PATH points to non-existent path"));
    }
    let toml_p = PathBuf::from("config/digest.toml");
    if toml_p.exists() {
        return load_from(&toml_p);
    }
    let json_p = PathBuf::from("config/digest.json");
    if json_p.exists() {
        return load_from(&json_p);
    }
    Err(anyhow!(
        "no digest config found (set DIGEST_CONFIG_PATH or create config/digest.toml)"
    ))
}

fn parse_config(s: &str, hint_ext: &str) -> Result<DigestConfig> {
    let try_toml = hint_ext == "toml" || s.contains("[[feeds]]");
    if try_toml {
        if let Ok(cfg) = toml::from_str::<DigestConfig>(s) {
            return validate(cfg);
        }
    }
    if let Ok(cfg) = serde_json::from_str::<DigestConfig>(s) {
        return validate(cfg);
    }
    if !try_toml {
        if let Ok(cfg) = toml::from_str::<DigestConfig>(s) {
            return validate(cfg);
        }
    }
    Err(anyhow!("unsupported digest config format"))
}

fn validate(cfg: DigestConfig) -> Result<DigestConfig> {
    if cfg.feeds.is_empty() {
        return Err(anyhow!("digest config lists no feeds"));
    }
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    const TOML_CFG: &str = r#"
[[feeds]]
name = "BBC News"
url = "http://feeds.bbci.co.uk/news/rss.xml"
max_articles = 5

[[feeds]]
name = "The Verge"
url = "https://www.theverge.com/rss/index.xml"
max_articles = 3

[delivery]
mode = "inline"
fetch_delay_ms = 0
"#;

    #[test]
    fn toml_config_parses_with_defaults() {
        let cfg = parse_config(TOML_CFG, "toml").unwrap();
        assert_eq!(cfg.feeds.len(), 2);
        assert_eq!(cfg.feeds[0].name, "BBC News");
        assert_eq!(cfg.feeds[1].max_articles, 3);
        assert_eq!(cfg.smtp.host, "smtp.gmail.com");
        assert_eq!(cfg.smtp.port, 587);
        assert_eq!(cfg.delivery.mode, DeliveryMode::Inline);
        assert_eq!(cfg.delivery.fetch_delay_ms, 0);
        assert_eq!(
            cfg.delivery.preview_path,
            Some(PathBuf::from("digest_preview.html"))
        );
    }

    #[test]
    fn json_config_parses() {
        let json = r#"{"feeds":[{"name":"BBC","url":"https://example.test/rss","max_articles":5}]}"#;
        let cfg = parse_config(json, "json").unwrap();
        assert_eq!(cfg.feeds.len(), 1);
        assert_eq!(cfg.delivery.mode, DeliveryMode::Attachment);
    }

    #[test]
    fn empty_feed_list_is_rejected() {
        assert!(parse_config(r#"{"feeds":[]}"#, "json").is_err());
        assert!(parse_config("feeds = []", "toml").is_err());
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_then_fallbacks() {
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();

        env::remove_var(ENV_PATH);

        // No files in the temp CWD: config is required, so this errors.
        assert!(load_default().is_err());

        // Env var takes precedence over the config/ fallbacks.
        let p = tmp.path().join("digest.toml");
        fs::write(&p, TOML_CFG).unwrap();
        env::set_var(ENV_PATH, p.display().to_string());
        let cfg = load_default().unwrap();
        assert_eq!(cfg.feeds.len(), 2);
        env::remove_var(ENV_PATH);

        env::set_current_dir(&old).unwrap();
    }

    #[serial_test::serial]
    #[test]
    fn mail_account_requires_all_three_vars() {
        env::remove_var(ENV_SENDER_EMAIL);
        env::remove_var(ENV_SENDER_PASSWORD);
        env::remove_var(ENV_KINDLE_EMAIL);
        assert!(MailAccount::from_env().is_err());

        env::set_var(ENV_SENDER_EMAIL, "sender@example.test");
        env::set_var(ENV_SENDER_PASSWORD, "app-password");
        env::set_var(ENV_KINDLE_EMAIL, "device@kindle.com");
        let acct = MailAccount::from_env().unwrap();
        assert_eq!(acct.recipient, "device@kindle.com");

        env::remove_var(ENV_SENDER_EMAIL);
        env::remove_var(ENV_SENDER_PASSWORD);
        env::remove_var(ENV_KINDLE_EMAIL);
    }
}
