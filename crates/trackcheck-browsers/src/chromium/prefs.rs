//! Editor for Chromium's `Preferences` JSON file.
//!
//! Cookie policy lives under `profile.*`; per-domain blocks live in both
//! `profile.content_settings.exceptions.cookies` and the legacy
//! `profile.content_settings.pattern_pairs` map, keyed by `"<domain>,*"`.
//! Chromium tolerates missing intermediate objects, so every write path
//! creates them on demand.

use std::fs;
use std::path::PathBuf;

use serde_json::{json, Map, Value};

use trackcheck_core::browser::PrefsEditor;
use trackcheck_core::domain;
use trackcheck_core::errors::{HarnessError, Result};
use trackcheck_core::models::CookieBehavior;
use trackcheck_core::paths;

const BLOCK_THIRD_PARTY: &str = "block_third_party_cookies";
/// Content-setting value meaning "block".
const SETTING_BLOCK: i64 = 2;

pub struct ChromiumPrefs {
    path: PathBuf,
}

impl ChromiumPrefs {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read(&self) -> Result<Value> {
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            HarnessError::StoreUnavailable(format!(
                "cannot read preferences {}: {e}",
                self.path.display()
            ))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            HarnessError::DecodeError(format!(
                "preferences {} is not valid JSON: {e}",
                self.path.display()
            ))
        })
    }

    fn write(&self, prefs: &Value) -> Result<()> {
        fs::write(&self.path, serde_json::to_string(prefs)?.as_bytes())?;
        Ok(())
    }

    /// Add a block-cookies exception for the registrable domain of `domain`.
    pub fn add_blacklist(&self, domain: &str) -> Result<()> {
        let base = domain::registrable_domain(domain)?;
        let pattern = format!("{base},*");

        let mut prefs = self.read()?;
        ensure_object(&mut prefs, &["profile", "content_settings", "exceptions", "cookies"])?
            .insert(pattern.clone(), json!({ "setting": SETTING_BLOCK }));
        ensure_object(&mut prefs, &["profile", "content_settings", "pattern_pairs"])?
            .insert(pattern, json!({ "cookies": SETTING_BLOCK }));
        self.write(&prefs)
    }

    /// Drop every per-domain cookie exception.
    pub fn clear_blacklist(&self) -> Result<()> {
        let mut prefs = self.read()?;
        ensure_object(&mut prefs, &["profile", "content_settings", "exceptions", "cookies"])?
            .clear();
        ensure_object(&mut prefs, &["profile", "content_settings", "pattern_pairs"])?.clear();
        self.write(&prefs)
    }
}

/// Walk `segments` into `root`, creating empty objects as needed, and
/// return the innermost map.
fn ensure_object<'a>(root: &'a mut Value, segments: &[&str]) -> Result<&'a mut Map<String, Value>> {
    let mut node = root;
    for segment in segments {
        let map = node.as_object_mut().ok_or_else(|| {
            HarnessError::DecodeError(format!("preference key '{segment}' is not an object"))
        })?;
        node = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    node.as_object_mut().ok_or_else(|| {
        HarnessError::DecodeError(format!(
            "preference key '{}' is not an object",
            segments.last().unwrap_or(&"")
        ))
    })
}

impl PrefsEditor for ChromiumPrefs {
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
        let mut prefs = self.read()?;

        let profile = ensure_object(&mut prefs, &["profile"])?;
        profile.remove(BLOCK_THIRD_PARTY);
        ensure_object(&mut prefs, &["profile", "default_content_setting_values"])?
            .remove("cookies");
        ensure_object(&mut prefs, &["profile", "default_content_settings"])?.remove("cookies");

        match behavior {
            // "accept all" is encoded by key absence.
            CookieBehavior::All => {}
            CookieBehavior::FirstPartyOnly => {
                ensure_object(&mut prefs, &["profile"])?
                    .insert(BLOCK_THIRD_PARTY.into(), Value::Bool(true));
            }
            CookieBehavior::Nothing => {
                // Both the current and the legacy key, matching what the
                // settings UI writes.
                ensure_object(&mut prefs, &["profile", "default_content_setting_values"])?
                    .insert("cookies".into(), json!(SETTING_BLOCK));
                ensure_object(&mut prefs, &["profile", "default_content_settings"])?
                    .insert("cookies".into(), json!(SETTING_BLOCK));
            }
        }

        self.write(&prefs)
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
