use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::HarnessError;

/// Cookie acceptance policy a browser profile is forced into.
///
/// Firefox's preference model knows a fourth `visited` state; no scenario
/// exercises it, so it is not represented here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CookieBehavior {
    /// Accept all cookies (the browser default).
    All,
    /// First-party only: block third-party cookies.
    FirstPartyOnly,
    /// Block all cookies.
    Nothing,
}

impl CookieBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::FirstPartyOnly => "only_1",
            Self::Nothing => "nothing",
        }
    }
}

impl std::fmt::Display for CookieBehavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CookieBehavior {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "only_1" => Ok(Self::FirstPartyOnly),
            "nothing" => Ok(Self::Nothing),
            other => Err(HarnessError::InvalidArgument(format!(
                "unknown cookie behavior '{other}' (expected all|only_1|nothing)"
            ))),
        }
    }
}

/// A cookie row read back from a browser store. `value` is always the
/// plaintext; the Chromium codec decrypts before returning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub host: String,
    pub value: String,
}

/// Optional overrides for `CookieStore::set`. Unset timestamps are computed
/// from "now" in the browser's own epoch and unit.
#[derive(Debug, Clone, Default)]
pub struct SetOptions {
    pub path: Option<String>,
    /// Browser-native units (Chromium: µs since 1601; Firefox: µs since Unix).
    pub creation: Option<i64>,
    pub last_access: Option<i64>,
    /// Browser-native units (Chromium: µs since 1601; Firefox: s since Unix).
    pub expiry: Option<i64>,
    pub secure: bool,
    pub http_only: bool,
}
