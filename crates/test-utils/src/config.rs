// Test configuration
//
// Environment-specific values (base URL, credentials, timeouts) are gathered
// once into a `TestConfig` and threaded through `TestContext` and page-object
// constructors.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Default timeout for polling assertions (5 seconds, matching Playwright)
pub const DEFAULT_ASSERTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Default polling interval for assertions (100ms)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Default timeout for clicks, fills and other actions
pub const DEFAULT_ACTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for bulk "contains text" checks. Kept low: members are expected
/// to be rendered already.
pub const DEFAULT_GROUP_TEXT_TIMEOUT: Duration = Duration::from_secs(2);

/// Timeout for the trial click used to decide whether an element is actionable
pub const DEFAULT_ACTIONABILITY_PROBE_TIMEOUT: Duration = Duration::from_millis(500);

/// Upper bound on waiting for `DOMContentLoaded`
pub const DEFAULT_LOAD_STATE_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound on waiting for the URL to change after a navigation click
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_BASE_URL: &str = "http://localhost:3000/";

/// Login credentials for an authenticated role
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Configuration shared by every helper and page object of one test.
///
/// # Example
///
/// ```ignore
/// use casino_test_utils::TestConfig;
/// use std::time::Duration;
///
/// let config = TestConfig::default()
///     .base_url("https://staging.casino.test")?
///     .assertion_timeout(Duration::from_secs(8));
/// assert_eq!(config.resolve("/promotions")?.as_str(), "https://staging.casino.test/promotions");
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    #[serde(deserialize_with = "deserialize_base_url")]
    pub base_url: Url,
    pub member: Option<Credentials>,
    #[serde(with = "millis")]
    pub assertion_timeout: Duration,
    #[serde(with = "millis")]
    pub poll_interval: Duration,
    #[serde(with = "millis")]
    pub action_timeout: Duration,
    #[serde(with = "millis")]
    pub group_text_timeout: Duration,
    #[serde(with = "millis")]
    pub actionability_probe_timeout: Duration,
    #[serde(with = "millis")]
    pub load_state_timeout: Duration,
    #[serde(with = "millis")]
    pub navigation_timeout: Duration,
    pub storage_state_dir: PathBuf,
    pub headless: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            member: None,
            assertion_timeout: DEFAULT_ASSERTION_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            action_timeout: DEFAULT_ACTION_TIMEOUT,
            group_text_timeout: DEFAULT_GROUP_TEXT_TIMEOUT,
            actionability_probe_timeout: DEFAULT_ACTIONABILITY_PROBE_TIMEOUT,
            load_state_timeout: DEFAULT_LOAD_STATE_TIMEOUT,
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            storage_state_dir: PathBuf::from(".auth"),
            headless: true,
        }
    }
}

impl TestConfig {
    /// Builds a configuration from `CASINO_*` environment variables.
    ///
    /// Recognised variables:
    /// - `CASINO_BASE_URL`
    /// - `CASINO_MEMBER_USERNAME` / `CASINO_MEMBER_PASSWORD` (both or neither)
    /// - `CASINO_STORAGE_STATE_DIR`
    /// - `CASINO_HEADLESS` (`true`/`false`/`1`/`0`)
    /// - `CASINO_ASSERTION_TIMEOUT_MS`
    ///
    /// Unset variables keep their defaults; malformed values are
    /// configuration errors.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("CASINO_BASE_URL") {
            config = config.base_url(&url)?;
        }

        match (
            lookup("CASINO_MEMBER_USERNAME"),
            lookup("CASINO_MEMBER_PASSWORD"),
        ) {
            (Some(username), Some(password)) => {
                config.member = Some(Credentials::new(username, password));
            }
            (None, None) => {}
            _ => {
                return Err(Error::Configuration(
                    "CASINO_MEMBER_USERNAME and CASINO_MEMBER_PASSWORD must be set together"
                        .to_string(),
                ));
            }
        }

        if let Some(dir) = lookup("CASINO_STORAGE_STATE_DIR") {
            config.storage_state_dir = PathBuf::from(dir);
        }

        if let Some(value) = lookup("CASINO_HEADLESS") {
            config.headless = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => {
                    return Err(Error::Configuration(format!(
                        "CASINO_HEADLESS must be a boolean, got '{other}'"
                    )));
                }
            };
        }

        if let Some(value) = lookup("CASINO_ASSERTION_TIMEOUT_MS") {
            let ms: u64 = value.trim().parse().map_err(|_| {
                Error::Configuration(format!(
                    "CASINO_ASSERTION_TIMEOUT_MS must be a number of milliseconds, got '{value}'"
                ))
            })?;
            config.assertion_timeout = Duration::from_millis(ms);
        }

        Ok(config)
    }

    /// Sets the application base URL.
    ///
    /// A trailing slash is added when missing so that relative paths join
    /// beneath it instead of replacing its last segment.
    pub fn base_url(mut self, url: &str) -> Result<Self> {
        self.base_url = with_trailing_slash(Url::parse(url)?);
        Ok(self)
    }

    pub fn member(mut self, credentials: Credentials) -> Self {
        self.member = Some(credentials);
        self
    }

    pub fn assertion_timeout(mut self, timeout: Duration) -> Self {
        self.assertion_timeout = timeout;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn action_timeout(mut self, timeout: Duration) -> Self {
        self.action_timeout = timeout;
        self
    }

    pub fn group_text_timeout(mut self, timeout: Duration) -> Self {
        self.group_text_timeout = timeout;
        self
    }

    pub fn actionability_probe_timeout(mut self, timeout: Duration) -> Self {
        self.actionability_probe_timeout = timeout;
        self
    }

    pub fn load_state_timeout(mut self, timeout: Duration) -> Self {
        self.load_state_timeout = timeout;
        self
    }

    pub fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    pub fn storage_state_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_state_dir = dir.into();
        self
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Resolves `path` against the base URL. Absolute URLs pass through.
    pub fn resolve(&self, path: &str) -> Result<Url> {
        let relative = path.strip_prefix('/').unwrap_or(path);
        Ok(self.base_url.join(relative)?)
    }

    /// Returns the member credentials or a configuration error.
    pub fn member_credentials(&self) -> Result<&Credentials> {
        self.member.as_ref().ok_or_else(|| {
            Error::Configuration(
                "member credentials are not configured (CASINO_MEMBER_USERNAME / CASINO_MEMBER_PASSWORD)"
                    .to_string(),
            )
        })
    }
}

/// Directory-style base: `/en` becomes `/en/`
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn deserialize_base_url<'de, D>(deserializer: D) -> std::result::Result<Url, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Url::deserialize(deserializer).map(with_trailing_slash)
}

mod millis {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
