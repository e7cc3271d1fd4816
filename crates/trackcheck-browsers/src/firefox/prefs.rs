//! Editor for Firefox's `prefs.js`.
//!
//! The file is a flat list of `user_pref("key", value);` lines. Policy
//! editing is line-oriented: drop every line mentioning the cookie
//! behavior key, then append the new setting. "Accept all" is the
//! browser default and is encoded by absence of the key.

use std::fs;
use std::path::PathBuf;

use trackcheck_core::browser::PrefsEditor;
use trackcheck_core::errors::{HarnessError, Result};
use trackcheck_core::models::CookieBehavior;
use trackcheck_core::paths;

const BEHAVIOR_KEY: &str = "network.cookie.cookieBehavior";

/// Firefox's numeric encoding of the cookie behavior preference.
/// 0 = accept all, 1 = first party only, 2 = block everything.
fn behavior_value(behavior: CookieBehavior) -> Option<u8> {
    match behavior {
        CookieBehavior::All => None,
        CookieBehavior::FirstPartyOnly => Some(1),
        CookieBehavior::Nothing => Some(2),
    }
}

pub struct FirefoxPrefs {
    path: PathBuf,
}

impl FirefoxPrefs {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl PrefsEditor for FirefoxPrefs {
    fn backup(&self) -> Result<()> {
        fs::copy(&self.path, paths::backup_path(&self.path)).map_err(|e| {
            HarnessError::BackupFailed(format!(
                "cannot back up {}: {e}",
                self.path.display()
            ))
        })?;
        Ok(())
    }

    fn set_policy(&mut self, behavior: CookieBehavior) -> Result<()> {
        self.backup()?;

        let raw = fs::read_to_string(&self.path).map_err(|e| {
            HarnessError::StoreUnavailable(format!(
                "cannot read prefs {}: {e}",
                self.path.display()
            ))
        })?;

        let mut lines: Vec<&str> = raw
            .lines()
            .filter(|line| !line.contains(BEHAVIOR_KEY))
            .collect();

        let appended;
        if let Some(value) = behavior_value(behavior) {
            appended = format!("user_pref(\"{BEHAVIOR_KEY}\", {value});");
            lines.push(&appended);
        }

        let mut contents = lines.join("\n");
        contents.push('\n');
        fs::write(&self.path, contents)?;
        Ok(())
    }

    fn restore(&self) -> Result<()> {
        let backup = paths::backup_path(&self.path);
        fs::copy(&backup, &self.path).map_err(|e| {
            HarnessError::BackupFailed(format!(
                "cannot restore {} from {}: {e}",
                self.path.display(),
                backup.display()
            ))
        })?;
        Ok(())
    }
}
