//! Capability traits the two browser implementations provide. The schemas
//! share almost no field semantics, so these are narrow interfaces over
//! concrete per-browser codecs rather than a common cookie abstraction.

use std::time::Duration;

use crate::errors::Result;
use crate::models::{Cookie, CookieBehavior, SetOptions};

/// One open handle onto a browser's on-disk cookie database.
///
/// `set` is an unconditional INSERT, never an upsert; scenarios flush the
/// table between runs so `get` lookups stay unambiguous.
pub trait CookieStore {
    /// Look up a cookie by exact name and normalized host.
    fn get(&self, name: &str, domain: &str) -> Result<Option<Cookie>>;

    /// Insert a cookie row, computing browser-native default timestamps
    /// for anything not supplied in `opts`.
    fn set(&self, name: &str, value: &str, domain: &str, opts: &SetOptions) -> Result<()>;

    /// Remove a matching row; no error if absent.
    fn delete(&self, name: &str, domain: &str) -> Result<()>;

    /// Delete every row and commit.
    fn flush(&self) -> Result<()>;

    /// Release the connection. Consuming the handle makes a double close
    /// unrepresentable; Drop covers the error paths.
    fn close(self: Box<Self>) -> Result<()>;
}

/// Editor for a browser profile's persistent preference store.
pub trait PrefsEditor {
    /// Copy the live preference file to a sibling `.bak`. Must succeed
    /// before any mutation.
    fn backup(&self) -> Result<()>;

    /// Rewrite the preference keys for `behavior`, backing up first.
    /// Idempotent per policy.
    fn set_policy(&mut self, behavior: CookieBehavior) -> Result<()>;

    /// Copy the `.bak` file back over the live file. Call exactly once per
    /// scenario, after the browser process has fully exited.
    fn restore(&self) -> Result<()>;
}

/// Whether a navigation was observed to finish inside the timeout.
/// A timeout is not an error: the landing page may already have fired its
/// tracking request, so inspection proceeds optimistically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    Completed,
    TimedOut,
}

/// A target browser: cookie store access, preference editing, domain
/// blacklisting and process launch, all against one profile directory.
pub trait Browser {
    /// Internal name ("chromium", "firefox").
    fn name(&self) -> &str;

    fn open_cookies(&self) -> Result<Box<dyn CookieStore>>;

    fn prefs(&self) -> Box<dyn PrefsEditor>;

    /// Spawn the browser at `url` and wait up to `timeout` for it to exit,
    /// killing it on expiry (hard cancellation, no retry).
    fn navigate(&self, url: &str, timeout: Duration) -> Result<NavigationOutcome>;

    /// Insert a cookie permission-denial record for `domain`.
    fn blacklist(&self, domain: &str) -> Result<()>;

    /// Drop all blacklist records so the next run starts clean.
    fn flush_blacklist(&self) -> Result<()>;
}
