//! Chromium support: the v10 cookie cipher, the `Cookies` SQLite codec,
//! the `Preferences` JSON editor, and process launch against a dedicated
//! `--user-data-dir` profile.

pub mod cookies;
pub mod crypto;
pub mod prefs;

use std::path::PathBuf;
use std::time::Duration;

use trackcheck_core::browser::{Browser, CookieStore, NavigationOutcome, PrefsEditor};
use trackcheck_core::config::ChromiumConfig;
use trackcheck_core::errors::Result;

use crate::launch;
use cookies::ChromiumCookies;
use prefs::ChromiumPrefs;

pub struct ChromiumBrowser {
    config: ChromiumConfig,
}

impl ChromiumBrowser {
    pub fn new(config: ChromiumConfig) -> Self {
        Self { config }
    }

    /// Everything profile-local lives under the `Default` subprofile.
    fn default_dir(&self) -> PathBuf {
        self.config.profile_folder.join("Default")
    }

    fn cookie_db_path(&self) -> PathBuf {
        self.default_dir().join(&self.config.cookie_db)
    }

    fn prefs_path(&self) -> PathBuf {
        self.default_dir().join("Preferences")
    }
}

impl Browser for ChromiumBrowser {
    fn name(&self) -> &str {
        "chromium"
    }

    fn open_cookies(&self) -> Result<Box<dyn CookieStore>> {
        Ok(Box::new(ChromiumCookies::open(&self.cookie_db_path())?))
    }

    fn prefs(&self) -> Box<dyn PrefsEditor> {
        Box::new(ChromiumPrefs::new(self.prefs_path()))
    }

    fn navigate(&self, url: &str, timeout: Duration) -> Result<NavigationOutcome> {
        let args = vec![
            format!("--user-data-dir={}", self.config.profile_folder.display()),
            url.to_string(),
        ];
        launch::run_with_timeout(&self.config.binary, &args, timeout)
    }

    fn blacklist(&self, domain: &str) -> Result<()> {
        ChromiumPrefs::new(self.prefs_path()).add_blacklist(domain)
    }

    fn flush_blacklist(&self) -> Result<()> {
        ChromiumPrefs::new(self.prefs_path()).clear_blacklist()
    }
}
