//! Global configuration parsing, validation, and credential loading.

use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::{AppError, Result};

/// Keychain service holding the gateway's secrets.
pub const KEYRING_SERVICE: &str = "zammad-slack-gateway";

/// Zammad connectivity settings.
///
/// The API token is loaded at runtime via OS keychain or environment
/// variables, never from the TOML config file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ZammadConfig {
    /// Base URL of the Zammad instance, e.g. `https://example.zammad.com`.
    pub base_url: String,
    /// API token sent as `Token token=...` (populated at runtime).
    #[serde(skip)]
    pub token: String,
}

/// Slack connectivity settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SlackConfig {
    /// Side-bar color of newly started ticket threads.
    #[serde(default = "default_thread_color")]
    pub thread_color: String,
    /// Bot user token used for posting messages (populated at runtime).
    #[serde(skip)]
    pub bot_token: String,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            thread_color: default_thread_color(),
            bot_token: String::new(),
        }
    }
}

fn default_thread_color() -> String {
    "#87ecc3".into()
}

fn default_bind_address() -> String {
    "0.0.0.0".into()
}

fn default_http_port() -> u16 {
    3000
}

fn default_webhook_path() -> String {
    "/webhook".into()
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// Interface the webhook listener binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// HTTP port for the webhook listener.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Route Zammad delivers webhooks to.
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,
    /// Zammad connectivity settings.
    pub zammad: ZammadConfig,
    /// Slack connectivity settings.
    #[serde(default)]
    pub slack: SlackConfig,
    /// Shared secret for `X-Hub-Signature` verification (populated at runtime).
    #[serde(skip)]
    pub webhook_secret: String,
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string and normalize it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load secrets from OS keychain with env-var fallback.
    ///
    /// Tries the `zammad-slack-gateway` keyring service first, then falls
    /// back to `SLACK_TOKEN`, `ZAMMAD_TOKEN` and `WEBHOOK_SIGNATURE_SECRET`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if neither keychain nor env vars provide
    /// a non-empty value for every secret.
    pub async fn load_credentials(&mut self) -> Result<()> {
        self.slack.bot_token = load_credential("slack_bot_token", "SLACK_TOKEN").await?;
        self.zammad.token = load_credential("zammad_token", "ZAMMAD_TOKEN").await?;
        self.webhook_secret =
            load_credential("webhook_secret", "WEBHOOK_SIGNATURE_SECRET").await?;
        Ok(())
    }

    /// Socket address string the listener binds to.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.http_port)
    }

    fn validate(&mut self) -> Result<()> {
        let base = self.zammad.base_url.trim().trim_end_matches('/');
        let parsed = reqwest::Url::parse(base)
            .map_err(|err| AppError::Config(format!("zammad.base_url invalid: {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::Config(
                "zammad.base_url must use http or https".into(),
            ));
        }
        self.zammad.base_url = base.to_owned();

        if !self.webhook_path.starts_with('/') {
            return Err(AppError::Config("webhook_path must start with '/'".into()));
        }

        if self.slack.thread_color.trim().is_empty() {
            return Err(AppError::Config("slack.thread_color must not be empty".into()));
        }

        Ok(())
    }
}

/// Load a single credential from OS keychain with env-var fallback.
async fn load_credential(keyring_key: &str, env_key: &str) -> Result<String> {
    let key = keyring_key.to_owned();

    // keyring is synchronous I/O.
    let keychain_result = tokio::task::spawn_blocking(move || {
        keyring::Entry::new(KEYRING_SERVICE, &key).and_then(|entry| entry.get_password())
    })
    .await
    .map_err(|err| AppError::Config(format!("keychain task panicked: {err}")))?;

    match keychain_result {
        Ok(value) if !value.is_empty() => return Ok(value),
        Ok(_) => {
            warn!(key = keyring_key, "keychain entry is empty, trying env var");
        }
        Err(err) => {
            warn!(
                key = keyring_key,
                ?err,
                "keychain lookup failed, trying env var"
            );
        }
    }

    match env::var(env_key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        Ok(_) => Err(AppError::Config(format!(
            "credential {keyring_key} is empty in {env_key} env var"
        ))),
        Err(_) => Err(AppError::Config(format!(
            "credential {keyring_key} not found in keychain service {KEYRING_SERVICE} or {env_key} env var"
        ))),
    }
}
