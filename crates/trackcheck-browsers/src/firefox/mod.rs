//! Firefox support: the `cookies.sqlite` codec, the `prefs.js` editor,
//! the `permissions.sqlite` blacklist and process launch against a named
//! profile.

pub mod cookies;
pub mod permissions;
pub mod prefs;

use std::path::PathBuf;
use std::time::Duration;

use trackcheck_core::browser::{Browser, CookieStore, NavigationOutcome, PrefsEditor};
use trackcheck_core::config::FirefoxConfig;
use trackcheck_core::errors::Result;

use crate::launch;
use cookies::FirefoxCookies;
use permissions::FirefoxPermissions;
use prefs::FirefoxPrefs;

pub struct FirefoxBrowser {
    config: FirefoxConfig,
}

impl FirefoxBrowser {
    pub fn new(config: FirefoxConfig) -> Self {
        Self { config }
    }

    fn cookie_db_path(&self) -> PathBuf {
        self.config.profile_folder.join(&self.config.cookie_db)
    }

    fn permission_db_path(&self) -> PathBuf {
        self.config.profile_folder.join(&self.config.permission_db)
    }

    fn prefs_path(&self) -> PathBuf {
        self.config.profile_folder.join("prefs.js")
    }
}

impl Browser for FirefoxBrowser {
    fn name(&self) -> &str {
        "firefox"
    }

    fn open_cookies(&self) -> Result<Box<dyn CookieStore>> {
        Ok(Box::new(FirefoxCookies::open(&self.cookie_db_path())?))
    }

    fn prefs(&self) -> Box<dyn PrefsEditor> {
        Box::new(FirefoxPrefs::new(self.prefs_path()))
    }

    fn navigate(&self, url: &str, timeout: Duration) -> Result<NavigationOutcome> {
        // -new-window keeps an already-running instance from swallowing the
        // URL and exiting immediately.
        let args = vec![
            "-P".to_string(),
            self.config.profile_name.clone(),
            "-new-window".to_string(),
            url.to_string(),
        ];
        launch::run_with_timeout(&self.config.binary, &args, timeout)
    }

    fn blacklist(&self, domain: &str) -> Result<()> {
        FirefoxPermissions::open(&self.permission_db_path())?.deny_cookies(domain)
    }

    fn flush_blacklist(&self) -> Result<()> {
        FirefoxPermissions::open(&self.permission_db_path())?.clear_cookie_permissions()
    }
}
