//! Harness configuration, loaded from a TOML file.
//!
//! Everything environment-specific lives here: domains, URL templates,
//! profile paths, browser binaries and the settle delays around
//! navigation. Nothing in the codecs hardcodes any of it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level harness configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HarnessConfig {
    /// Seconds to wait before starting a scenario, so a previous browser
    /// instance has fully released its profile.
    #[serde(default = "default_wait_before")]
    pub wait_before: u64,

    /// Seconds to wait after the browser exits before reopening its cookie
    /// store. Cookie writes are flushed asynchronously on shutdown; keep
    /// this generous rather than minimal.
    #[serde(default = "default_wait_after")]
    pub wait_after: u64,

    /// Seconds before a navigation is forcibly terminated.
    #[serde(default = "default_navigation_timeout")]
    pub navigation_timeout: u64,

    /// Name of the tracking cookie (e.g. `adsp_di`).
    pub cookie_name: String,

    /// Root of the tracking server's access-log tree.
    pub adsp_log_dir: PathBuf,

    pub publisher: SiteConfig,
    pub click_to_advertiser: SiteConfig,

    pub chromium: ChromiumConfig,
    pub firefox: FirefoxConfig,
}

/// One test site: its first/third-party domains and the URL the browser is
/// pointed at. `url` may carry a `{di}` slot for the querystring device id.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub first: String,
    pub third: String,
    pub url: String,
}

impl SiteConfig {
    /// URL with the device-id slot substituted. A template without a slot
    /// (the publisher page) is returned unchanged.
    pub fn url_for(&self, device_id: &str) -> String {
        self.url.replace("{di}", device_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChromiumConfig {
    /// Profile directory passed as `--user-data-dir`.
    pub profile_folder: PathBuf,
    #[serde(default = "default_chromium_binary")]
    pub binary: PathBuf,
    #[serde(default = "default_chromium_cookie_db")]
    pub cookie_db: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FirefoxConfig {
    /// Profile name passed as `-P`.
    pub profile_name: String,
    pub profile_folder: PathBuf,
    #[serde(default = "default_firefox_binary")]
    pub binary: PathBuf,
    #[serde(default = "default_firefox_cookie_db")]
    pub cookie_db: String,
    #[serde(default = "default_firefox_permission_db")]
    pub permission_db: String,
}

fn default_wait_before() -> u64 {
    2
}

fn default_wait_after() -> u64 {
    3
}

fn default_navigation_timeout() -> u64 {
    5
}

fn default_chromium_binary() -> PathBuf {
    PathBuf::from("/usr/bin/chromium-browser")
}

fn default_chromium_cookie_db() -> String {
    "Cookies".to_string()
}

fn default_firefox_binary() -> PathBuf {
    PathBuf::from("/usr/bin/firefox")
}

fn default_firefox_cookie_db() -> String {
    "cookies.sqlite".to_string()
}

fn default_firefox_permission_db() -> String {
    "permissions.sqlite".to_string()
}

/// Resolve the config file path: explicit flag, then `TRACKCHECK_CONFIG`,
/// then `trackcheck.toml` in the working directory.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Ok(env) = std::env::var("TRACKCHECK_CONFIG") {
        return PathBuf::from(env);
    }
    PathBuf::from("trackcheck.toml")
}

/// Load and parse the harness config. Unlike an optional app config there
/// is no usable default here, so a missing file is an error.
pub fn load_config(path: &Path) -> Result<HarnessConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config at {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing config at {}", path.display()))
}
