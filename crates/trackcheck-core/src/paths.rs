use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Sibling `.bak` path for a preference file. Appends to the full file
/// name instead of replacing an extension, so `prefs.js` maps to
/// `prefs.js.bak` and `Preferences` to `Preferences.bak`.
pub fn backup_path(file: &Path) -> PathBuf {
    let mut name = OsString::from(file.as_os_str());
    name.push(".bak");
    PathBuf::from(name)
}
