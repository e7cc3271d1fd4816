//! Scenario orchestrator: sequences one policy/seed combination against a
//! live browser and checks the resulting cookie stores and tracking log
//! against the recorded expectations for that combination.
//!
//! A scenario run is: flush store, seed fixture cookies, set policy (plus
//! blacklist for the third-party-only variant), navigate with a fresh
//! querystring device id, settle, re-read both stores and the log, then
//! tear down. Teardown (preference restore, blacklist flush) runs even
//! when a step fails; a failed step aborts only the current scenario.

use std::thread;
use std::time::Duration;

use anyhow::{bail, Result};
use chrono::{Local, Utc};
use uuid::Uuid;

use trackcheck_core::adsplog::AdspLog;
use trackcheck_core::browser::Browser;
use trackcheck_core::config::{HarnessConfig, SiteConfig};
use trackcheck_core::device_id::extract_device_ids;
use trackcheck_core::models::{CookieBehavior, SetOptions};

// ---------------------------------------------------------------------------
// 1. Scenario vocabulary
// ---------------------------------------------------------------------------

/// Which page the browser is pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    /// A publisher page carrying a display tag; no device id in the URL.
    Publisher,
    /// An ad click redirecting to the advertiser's landing page, with a
    /// device id in the querystring.
    ClickToAdvertiser,
}

impl Site {
    pub const ALL: [Site; 2] = [Site::Publisher, Site::ClickToAdvertiser];

    pub fn as_str(&self) -> &'static str {
        match self {
            Site::Publisher => "publisher",
            Site::ClickToAdvertiser => "click_to_advertiser",
        }
    }

    pub fn config<'a>(&self, config: &'a HarnessConfig) -> &'a SiteConfig {
        match self {
            Site::Publisher => &config.publisher,
            Site::ClickToAdvertiser => &config.click_to_advertiser,
        }
    }
}

impl std::str::FromStr for Site {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "publisher" => Ok(Site::Publisher),
            "click_to_advertiser" | "click" => Ok(Site::ClickToAdvertiser),
            other => bail!("unknown site '{other}' (expected publisher|click_to_advertiser)"),
        }
    }
}

/// Effective cookie policy for a scenario. `ThirdPartyOnly` is not a
/// browser setting of its own: it is `all` with the first-party domain
/// blacklisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    All,
    FirstPartyOnly,
    Nothing,
    ThirdPartyOnly,
}

impl Policy {
    pub const ALL: [Policy; 4] = [
        Policy::All,
        Policy::FirstPartyOnly,
        Policy::Nothing,
        Policy::ThirdPartyOnly,
    ];

    pub fn behavior(&self) -> CookieBehavior {
        match self {
            Policy::All | Policy::ThirdPartyOnly => CookieBehavior::All,
            Policy::FirstPartyOnly => CookieBehavior::FirstPartyOnly,
            Policy::Nothing => CookieBehavior::Nothing,
        }
    }

    pub fn blacklists_first_party(&self) -> bool {
        matches!(self, Policy::ThirdPartyOnly)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Policy::All => "all",
            Policy::FirstPartyOnly => "only_1",
            Policy::Nothing => "nothing",
            Policy::ThirdPartyOnly => "only_3",
        }
    }
}

impl std::str::FromStr for Policy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(Policy::All),
            "only_1" => Ok(Policy::FirstPartyOnly),
            "nothing" => Ok(Policy::Nothing),
            "only_3" => Ok(Policy::ThirdPartyOnly),
            other => bail!("unknown policy '{other}' (expected all|only_1|nothing|only_3)"),
        }
    }
}

/// Initial cookie-store contents before navigation. Fixture values use a
/// literal-separator payload for the first-party cookie and a
/// percent-encoded payload for the third-party cookie, matching what the
/// tracking script itself writes on each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seed {
    AllEmpty,
    /// One device id (A) in the first-party cookie only.
    FirstPartyOnly,
    /// One device id (A) in the third-party cookie only.
    ThirdPartyOnly,
    /// The same device id (A) in both cookies.
    SameDevice,
    /// Device id A first-party, a different id B third-party.
    DifferentDevices,
}

impl Seed {
    pub const ALL: [Seed; 5] = [
        Seed::AllEmpty,
        Seed::FirstPartyOnly,
        Seed::ThirdPartyOnly,
        Seed::SameDevice,
        Seed::DifferentDevices,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Seed::AllEmpty => "all_empty",
            Seed::FirstPartyOnly => "first_only",
            Seed::ThirdPartyOnly => "third_only",
            Seed::SameDevice => "same_device",
            Seed::DifferentDevices => "different_devices",
        }
    }
}

impl std::str::FromStr for Seed {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all_empty" => Ok(Seed::AllEmpty),
            "first_only" => Ok(Seed::FirstPartyOnly),
            "third_only" => Ok(Seed::ThirdPartyOnly),
            "same_device" => Ok(Seed::SameDevice),
            "different_devices" => Ok(Seed::DifferentDevices),
            other => bail!(
                "unknown seed '{other}' \
                 (expected all_empty|first_only|third_only|same_device|different_devices)"
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenario {
    pub site: Site,
    pub policy: Policy,
    pub seed: Seed,
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.site.as_str(),
            self.policy.as_str(),
            self.seed.as_str()
        )
    }
}

// ---------------------------------------------------------------------------
// 2. Expectations
// ---------------------------------------------------------------------------

/// Where a device-id list was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Place {
    FirstStore,
    ThirdStore,
    Log,
}

impl Place {
    fn describe(&self) -> &'static str {
        match self {
            Place::FirstStore => "first-party cookie",
            Place::ThirdStore => "third-party cookie",
            Place::Log => "tracking log",
        }
    }
}

/// Which fixture id a check refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixture {
    /// The fresh id placed in the navigation querystring.
    Query,
    /// The id seeded before navigation (first-party side, or the only one).
    SeedA,
    /// The second seeded id (third-party side of `DifferentDevices`).
    SeedB,
}

impl Fixture {
    fn describe(&self) -> &'static str {
        match self {
            Fixture::Query => "querystring id",
            Fixture::SeedA => "seeded id A",
            Fixture::SeedB => "seeded id B",
        }
    }
}

/// One assertion over the post-navigation observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    NotEmpty(Place),
    Empty(Place),
    Contains(Place, Fixture),
    Lacks(Place, Fixture),
    /// Both places report the identical ordered id list.
    SameIds(Place, Place),
    DifferentIds(Place, Place),
    /// Both places agree on the first (highest-priority) id.
    SameHead(Place, Place),
}

/// Recorded expectations for one (browser, scenario) combination, or `None`
/// when the combination has no recorded behavior (e.g. Firefox has no
/// first-party-only runs, and its click blacklist run only covers the
/// third-party seed).
pub fn expectations(browser: &str, scenario: &Scenario) -> Option<Vec<Check>> {
    use Check::*;
    use Fixture::{Query, SeedA, SeedB};
    use Place::{FirstStore as First, Log, ThirdStore as Third};

    let checks = match (browser, scenario.site, scenario.policy, scenario.seed) {
        // -- Chromium, publisher, accept all ------------------------------
        ("chromium", Site::Publisher, Policy::All, Seed::AllEmpty) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            SameIds(First, Third),
            SameIds(First, Log),
        ],
        ("chromium", Site::Publisher, Policy::All, Seed::FirstPartyOnly) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(First, SeedA),
            SameIds(First, Third),
            Contains(Log, SeedA),
        ],
        ("chromium", Site::Publisher, Policy::All, Seed::ThirdPartyOnly) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(Third, SeedA),
            Contains(First, SeedA),
            Contains(Log, SeedA),
        ],
        ("chromium", Site::Publisher, Policy::All, Seed::SameDevice) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(First, SeedA),
            Contains(Third, SeedA),
            SameIds(First, Third),
            Contains(Log, SeedA),
        ],
        ("chromium", Site::Publisher, Policy::All, Seed::DifferentDevices) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(First, SeedA),
            Contains(Third, SeedB),
            Contains(First, SeedB),
            Contains(Log, SeedA),
            Contains(Log, SeedB),
        ],

        // -- Chromium, publisher, first party only ------------------------
        ("chromium", Site::Publisher, Policy::FirstPartyOnly, Seed::AllEmpty) => vec![
            NotEmpty(First),
            Empty(Third),
            DifferentIds(First, Third),
            SameIds(First, Log),
        ],
        ("chromium", Site::Publisher, Policy::FirstPartyOnly, Seed::FirstPartyOnly) => vec![
            NotEmpty(First),
            Empty(Third),
            Contains(First, SeedA),
            DifferentIds(First, Third),
            Contains(Log, SeedA),
        ],
        // Third-party writes still land; the block only stops the cookie
        // from being *sent*, so it is never stacked into the first party.
        ("chromium", Site::Publisher, Policy::FirstPartyOnly, Seed::ThirdPartyOnly) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(Third, SeedA),
            Lacks(First, SeedA),
            Lacks(Log, SeedA),
        ],
        ("chromium", Site::Publisher, Policy::FirstPartyOnly, Seed::SameDevice) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(First, SeedA),
            Contains(Third, SeedA),
            SameIds(First, Third),
            Contains(Log, SeedA),
        ],
        ("chromium", Site::Publisher, Policy::FirstPartyOnly, Seed::DifferentDevices) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(First, SeedA),
            Contains(Third, SeedB),
            Lacks(First, SeedB),
            Contains(Log, SeedA),
            Lacks(Log, SeedB),
        ],

        // -- Chromium, publisher, accept all + first party blacklisted ----
        // Chromium refuses to persist cookies for a blacklisted domain;
        // the first-party store stays as seeded (or empty).
        ("chromium", Site::Publisher, Policy::ThirdPartyOnly, Seed::AllEmpty) => vec![
            Empty(First),
            NotEmpty(Third),
            DifferentIds(First, Third),
            SameIds(Third, Log),
        ],
        ("chromium", Site::Publisher, Policy::ThirdPartyOnly, Seed::FirstPartyOnly) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(First, SeedA),
            Lacks(Third, SeedA),
            SameIds(Third, Log),
        ],
        ("chromium", Site::Publisher, Policy::ThirdPartyOnly, Seed::ThirdPartyOnly) => vec![
            Empty(First),
            NotEmpty(Third),
            Contains(Third, SeedA),
            Lacks(First, SeedA),
            Contains(Log, SeedA),
        ],
        ("chromium", Site::Publisher, Policy::ThirdPartyOnly, Seed::SameDevice) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(First, SeedA),
            Contains(Third, SeedA),
            SameIds(First, Third),
            Contains(Log, SeedA),
        ],
        ("chromium", Site::Publisher, Policy::ThirdPartyOnly, Seed::DifferentDevices) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(First, SeedA),
            Contains(Third, SeedB),
            Lacks(First, SeedB),
            Lacks(Log, SeedA),
            Contains(Log, SeedB),
        ],

        // -- Chromium, click, accept nothing ------------------------------
        // Nothing is written, but the querystring id still reaches the log
        // through the landing page URL.
        ("chromium", Site::ClickToAdvertiser, Policy::Nothing, Seed::AllEmpty) => vec![
            Empty(First),
            Empty(Third),
            Lacks(First, Query),
            Lacks(Third, Query),
            Contains(Log, Query),
        ],
        ("chromium", Site::ClickToAdvertiser, Policy::Nothing, Seed::FirstPartyOnly) => vec![
            NotEmpty(First),
            Empty(Third),
            Lacks(First, Query),
            Lacks(Third, Query),
            Lacks(Log, SeedA),
            Contains(Log, Query),
        ],
        ("chromium", Site::ClickToAdvertiser, Policy::Nothing, Seed::ThirdPartyOnly) => vec![
            Empty(First),
            NotEmpty(Third),
            Contains(Third, SeedA),
            Lacks(First, SeedA),
            Lacks(First, Query),
            Lacks(Log, SeedA),
            Contains(Log, Query),
        ],
        ("chromium", Site::ClickToAdvertiser, Policy::Nothing, Seed::SameDevice) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(First, SeedA),
            Contains(Third, SeedA),
            Lacks(First, Query),
            Lacks(Log, SeedA),
            Contains(Log, Query),
        ],
        ("chromium", Site::ClickToAdvertiser, Policy::Nothing, Seed::DifferentDevices) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(First, SeedA),
            Contains(Third, SeedB),
            Lacks(First, SeedB),
            Lacks(First, Query),
            Lacks(Log, SeedA),
            Lacks(Log, SeedB),
            Contains(Log, Query),
        ],

        // -- Chromium, click, first party only ----------------------------
        ("chromium", Site::ClickToAdvertiser, Policy::FirstPartyOnly, Seed::AllEmpty) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(First, Query),
            Contains(Third, Query),
            Contains(Log, Query),
        ],
        ("chromium", Site::ClickToAdvertiser, Policy::FirstPartyOnly, Seed::FirstPartyOnly) => {
            vec![
                NotEmpty(First),
                NotEmpty(Third),
                Contains(First, SeedA),
                Contains(First, Query),
                Contains(Third, Query),
                Contains(Log, SeedA),
                Contains(Log, Query),
            ]
        }
        ("chromium", Site::ClickToAdvertiser, Policy::FirstPartyOnly, Seed::ThirdPartyOnly) => {
            vec![
                NotEmpty(First),
                NotEmpty(Third),
                Contains(Third, SeedA),
                Contains(First, SeedA),
                Lacks(First, Query),
                Contains(Log, SeedA),
                Lacks(Log, Query),
            ]
        }
        ("chromium", Site::ClickToAdvertiser, Policy::FirstPartyOnly, Seed::SameDevice) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(First, SeedA),
            Contains(Third, SeedA),
            Lacks(First, Query),
            Contains(Log, SeedA),
            Lacks(Log, Query),
        ],
        ("chromium", Site::ClickToAdvertiser, Policy::FirstPartyOnly, Seed::DifferentDevices) => {
            vec![
                NotEmpty(First),
                NotEmpty(Third),
                Contains(First, SeedA),
                Contains(Third, SeedB),
                Contains(First, SeedB),
                Lacks(First, Query),
                Contains(Log, SeedA),
                Contains(Log, SeedB),
                Lacks(Log, Query),
            ]
        }

        // -- Chromium, click, accept all + first party blacklisted --------
        ("chromium", Site::ClickToAdvertiser, Policy::ThirdPartyOnly, Seed::AllEmpty) => vec![
            Empty(First),
            NotEmpty(Third),
            Lacks(First, Query),
            Contains(Third, Query),
            Contains(Log, Query),
        ],
        ("chromium", Site::ClickToAdvertiser, Policy::ThirdPartyOnly, Seed::FirstPartyOnly) => {
            vec![
                NotEmpty(First),
                NotEmpty(Third),
                Contains(First, SeedA),
                Lacks(First, Query),
                Contains(Third, Query),
                Lacks(Log, SeedA),
                Contains(Log, Query),
            ]
        }
        ("chromium", Site::ClickToAdvertiser, Policy::ThirdPartyOnly, Seed::ThirdPartyOnly) => {
            vec![
                Empty(First),
                NotEmpty(Third),
                Contains(Third, SeedA),
                Lacks(First, SeedA),
                Lacks(First, Query),
                Contains(Log, SeedA),
                Lacks(Log, Query),
            ]
        }
        ("chromium", Site::ClickToAdvertiser, Policy::ThirdPartyOnly, Seed::SameDevice) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(First, SeedA),
            Contains(Third, SeedA),
            Lacks(First, Query),
            Contains(Log, SeedA),
            Lacks(Log, Query),
        ],
        ("chromium", Site::ClickToAdvertiser, Policy::ThirdPartyOnly, Seed::DifferentDevices) => {
            vec![
                NotEmpty(First),
                NotEmpty(Third),
                Contains(First, SeedA),
                Contains(Third, SeedB),
                Lacks(First, SeedB),
                Lacks(First, Query),
                Lacks(Log, SeedA),
                Contains(Log, SeedB),
                Lacks(Log, Query),
            ]
        }

        // -- Firefox, publisher, accept all -------------------------------
        ("firefox", Site::Publisher, Policy::All, Seed::AllEmpty) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            SameIds(First, Third),
            SameIds(First, Log),
        ],
        ("firefox", Site::Publisher, Policy::All, Seed::FirstPartyOnly) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(First, SeedA),
            SameIds(First, Third),
            Contains(Log, SeedA),
        ],
        ("firefox", Site::Publisher, Policy::All, Seed::ThirdPartyOnly) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(Third, SeedA),
            SameIds(First, Third),
            Contains(Log, SeedA),
        ],
        ("firefox", Site::Publisher, Policy::All, Seed::SameDevice) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(First, SeedA),
            Contains(Third, SeedA),
            SameIds(First, Third),
            Contains(Log, SeedA),
        ],
        ("firefox", Site::Publisher, Policy::All, Seed::DifferentDevices) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(First, SeedA),
            Contains(Third, SeedB),
            Contains(First, SeedB),
            SameHead(First, Third),
            Contains(Log, SeedA),
            Contains(Log, SeedB),
        ],

        // -- Firefox, publisher, accept nothing ---------------------------
        ("firefox", Site::Publisher, Policy::Nothing, Seed::AllEmpty) => vec![
            Empty(First),
            Empty(Third),
            DifferentIds(First, Log),
            DifferentIds(Third, Log),
        ],
        ("firefox", Site::Publisher, Policy::Nothing, Seed::FirstPartyOnly) => vec![
            NotEmpty(First),
            Empty(Third),
            Contains(First, SeedA),
            Lacks(Log, SeedA),
        ],
        ("firefox", Site::Publisher, Policy::Nothing, Seed::ThirdPartyOnly) => vec![
            Empty(First),
            NotEmpty(Third),
            Contains(Third, SeedA),
            Lacks(First, SeedA),
            Lacks(Log, SeedA),
        ],
        ("firefox", Site::Publisher, Policy::Nothing, Seed::SameDevice) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(First, SeedA),
            Contains(Third, SeedA),
            Lacks(Log, SeedA),
        ],
        ("firefox", Site::Publisher, Policy::Nothing, Seed::DifferentDevices) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(First, SeedA),
            Contains(Third, SeedB),
            Lacks(First, SeedB),
            Lacks(Log, SeedA),
            Lacks(Log, SeedB),
        ],

        // -- Firefox, publisher, accept all + first party blacklisted -----
        // Firefox still persists the first-party cookie for a blacklisted
        // origin; the block only suppresses content.
        ("firefox", Site::Publisher, Policy::ThirdPartyOnly, Seed::AllEmpty) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            SameIds(First, Third),
            SameIds(First, Log),
        ],
        ("firefox", Site::Publisher, Policy::ThirdPartyOnly, Seed::FirstPartyOnly) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(First, SeedA),
            SameIds(First, Third),
            Contains(Log, SeedA),
        ],
        ("firefox", Site::Publisher, Policy::ThirdPartyOnly, Seed::ThirdPartyOnly) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(Third, SeedA),
            Contains(First, SeedA),
            Contains(Log, SeedA),
        ],
        ("firefox", Site::Publisher, Policy::ThirdPartyOnly, Seed::SameDevice) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(First, SeedA),
            Contains(Third, SeedA),
            SameIds(First, Third),
            Contains(Log, SeedA),
        ],
        ("firefox", Site::Publisher, Policy::ThirdPartyOnly, Seed::DifferentDevices) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(First, SeedA),
            Contains(Third, SeedB),
            Contains(First, SeedB),
            Contains(Log, SeedA),
            Contains(Log, SeedB),
        ],

        // -- Firefox, click, accept all -----------------------------------
        ("firefox", Site::ClickToAdvertiser, Policy::All, Seed::AllEmpty) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(First, Query),
            SameIds(First, Third),
            SameIds(First, Log),
        ],
        ("firefox", Site::ClickToAdvertiser, Policy::All, Seed::FirstPartyOnly) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(First, Query),
            Contains(Third, Query),
            Contains(First, SeedA),
            SameHead(First, Third),
            SameIds(First, Log),
        ],
        ("firefox", Site::ClickToAdvertiser, Policy::All, Seed::ThirdPartyOnly) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(Third, SeedA),
            Contains(First, SeedA),
            Lacks(First, Query),
            SameHead(First, Third),
            Contains(Log, SeedA),
        ],
        ("firefox", Site::ClickToAdvertiser, Policy::All, Seed::SameDevice) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(First, SeedA),
            Contains(Third, SeedA),
            Lacks(First, Query),
            SameHead(First, Third),
            Contains(Log, SeedA),
        ],
        ("firefox", Site::ClickToAdvertiser, Policy::All, Seed::DifferentDevices) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(First, SeedA),
            Contains(Third, SeedB),
            Contains(First, SeedB),
            Lacks(First, Query),
            SameHead(First, Third),
            Contains(Log, SeedA),
            Contains(Log, SeedB),
        ],

        // -- Firefox, click, accept nothing -------------------------------
        ("firefox", Site::ClickToAdvertiser, Policy::Nothing, Seed::AllEmpty) => vec![
            Empty(First),
            Empty(Third),
            Lacks(First, Query),
            Lacks(Third, Query),
            Contains(Log, Query),
        ],
        ("firefox", Site::ClickToAdvertiser, Policy::Nothing, Seed::FirstPartyOnly) => vec![
            NotEmpty(First),
            Empty(Third),
            Lacks(First, Query),
            Lacks(Third, Query),
            Lacks(Log, SeedA),
            Contains(Log, Query),
        ],
        ("firefox", Site::ClickToAdvertiser, Policy::Nothing, Seed::ThirdPartyOnly) => vec![
            Empty(First),
            NotEmpty(Third),
            Contains(Third, SeedA),
            Lacks(First, SeedA),
            Lacks(First, Query),
            Lacks(Log, SeedA),
            Contains(Log, Query),
        ],
        ("firefox", Site::ClickToAdvertiser, Policy::Nothing, Seed::SameDevice) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(First, SeedA),
            Contains(Third, SeedA),
            Lacks(First, Query),
            Lacks(Log, SeedA),
            Contains(Log, Query),
        ],
        ("firefox", Site::ClickToAdvertiser, Policy::Nothing, Seed::DifferentDevices) => vec![
            NotEmpty(First),
            NotEmpty(Third),
            Contains(First, SeedA),
            Contains(Third, SeedB),
            Lacks(First, SeedB),
            Lacks(First, Query),
            Lacks(Log, SeedA),
            Lacks(Log, SeedB),
            Contains(Log, Query),
        ],

        // -- Firefox, click, accept all + first party blacklisted ---------
        // Only the third-party seed has recorded behavior for this run.
        ("firefox", Site::ClickToAdvertiser, Policy::ThirdPartyOnly, Seed::ThirdPartyOnly) => {
            vec![
                NotEmpty(First),
                NotEmpty(Third),
                Contains(Third, SeedA),
                Contains(First, SeedA),
                Lacks(First, Query),
                Contains(Log, SeedA),
                Lacks(Log, Query),
            ]
        }

        _ => return None,
    };

    Some(checks)
}

/// All scenarios with recorded expectations for `browser`.
pub fn all_scenarios(browser: &str) -> Vec<Scenario> {
    let mut scenarios = Vec::new();
    for site in Site::ALL {
        for policy in Policy::ALL {
            for seed in Seed::ALL {
                let scenario = Scenario { site, policy, seed };
                if expectations(browser, &scenario).is_some() {
                    scenarios.push(scenario);
                }
            }
        }
    }
    scenarios
}

// ---------------------------------------------------------------------------
// 3. Runner
// ---------------------------------------------------------------------------

/// Everything observed after one navigation.
#[derive(Debug, Clone)]
pub struct Observation {
    pub first_ids: Vec<String>,
    pub third_ids: Vec<String>,
    pub log_ids: Vec<String>,
    pub query_id: String,
    pub seed_a: Option<String>,
    pub seed_b: Option<String>,
}

impl Observation {
    fn ids(&self, place: Place) -> &[String] {
        match place {
            Place::FirstStore => &self.first_ids,
            Place::ThirdStore => &self.third_ids,
            Place::Log => &self.log_ids,
        }
    }

    fn fixture(&self, fixture: Fixture) -> Option<&str> {
        match fixture {
            Fixture::Query => Some(&self.query_id),
            Fixture::SeedA => self.seed_a.as_deref(),
            Fixture::SeedB => self.seed_b.as_deref(),
        }
    }
}

#[derive(Debug)]
pub struct ScenarioReport {
    pub browser: String,
    pub scenario: Scenario,
    pub failures: Vec<String>,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

pub fn fresh_device_id() -> String {
    format!("{}.{}", Utc::now().timestamp(), Uuid::new_v4())
}

/// Payload the tracking script writes on the first-party side.
fn literal_payload(device_id: &str) -> String {
    format!("ls={}|v=1|di={}", Utc::now().timestamp_millis(), device_id)
}

/// Payload on the third-party side, percent-encoded end to end.
fn encoded_payload(device_id: &str) -> String {
    format!(
        "ls%3D{}%7Cv%3D1%7Cdi%3D{}",
        Utc::now().timestamp_millis(),
        device_id
    )
}

fn seed_store(
    browser: &dyn Browser,
    config: &HarnessConfig,
    site: &SiteConfig,
    seed: Seed,
) -> Result<(Option<String>, Option<String>)> {
    if seed == Seed::AllEmpty {
        return Ok((None, None));
    }

    let store = browser.open_cookies()?;
    let opts = SetOptions::default();

    let result = match seed {
        Seed::AllEmpty => unreachable!(),
        Seed::FirstPartyOnly => {
            let a = fresh_device_id();
            store.set(&config.cookie_name, &literal_payload(&a), &site.first, &opts)?;
            (Some(a), None)
        }
        Seed::ThirdPartyOnly => {
            let a = fresh_device_id();
            store.set(&config.cookie_name, &encoded_payload(&a), &site.third, &opts)?;
            (Some(a), None)
        }
        Seed::SameDevice => {
            let a = fresh_device_id();
            store.set(&config.cookie_name, &literal_payload(&a), &site.first, &opts)?;
            store.set(&config.cookie_name, &encoded_payload(&a), &site.third, &opts)?;
            (Some(a), None)
        }
        Seed::DifferentDevices => {
            let a = fresh_device_id();
            let b = fresh_device_id();
            store.set(&config.cookie_name, &literal_payload(&a), &site.first, &opts)?;
            store.set(&config.cookie_name, &encoded_payload(&b), &site.third, &opts)?;
            (Some(a), Some(b))
        }
    };

    store.close()?;
    Ok(result)
}

fn observe(
    browser: &dyn Browser,
    config: &HarnessConfig,
    site: &SiteConfig,
    query_id: &str,
    seed_a: Option<String>,
    seed_b: Option<String>,
) -> Result<Observation> {
    let url = site.url_for(query_id);
    browser.navigate(&url, Duration::from_secs(config.navigation_timeout))?;

    // Cookie writes are flushed asynchronously on browser shutdown.
    thread::sleep(Duration::from_secs(config.wait_after));

    let store = browser.open_cookies()?;
    let first = store.get(&config.cookie_name, &site.first)?;
    let third = store.get(&config.cookie_name, &site.third)?;
    store.close()?;

    let first_ids = first.map(|c| extract_device_ids(&c.value)).unwrap_or_default();
    let third_ids = third.map(|c| extract_device_ids(&c.value)).unwrap_or_default();

    let adsplog = AdspLog::for_hour(&config.adsp_log_dir, Local::now());
    let line = adsplog.last_line()?;
    let log_ids = adsplog.device_ids(&line)?;

    Ok(Observation {
        first_ids,
        third_ids,
        log_ids,
        query_id: query_id.to_string(),
        seed_a,
        seed_b,
    })
}

/// Run one scenario end to end and evaluate its recorded expectations.
/// Preference restore and blacklist flush run even when a middle step
/// fails.
pub fn run_scenario(
    browser: &dyn Browser,
    config: &HarnessConfig,
    scenario: &Scenario,
) -> Result<ScenarioReport> {
    let Some(checks) = expectations(browser.name(), scenario) else {
        bail!("no recorded expectations for {} {scenario}", browser.name());
    };

    log::info!("running {} {scenario}", browser.name());
    thread::sleep(Duration::from_secs(config.wait_before));

    let site = scenario.site.config(config);

    let store = browser.open_cookies()?;
    store.flush()?;
    store.close()?;

    let (seed_a, seed_b) = seed_store(browser, config, site, scenario.seed)?;

    let mut prefs = browser.prefs();
    if let Err(e) = prefs.set_policy(scenario.policy.behavior()) {
        // The backup may already exist with the live file half-written.
        let _ = prefs.restore();
        return Err(e.into());
    }
    if scenario.policy.blacklists_first_party() {
        if let Err(e) = browser.blacklist(&site.first) {
            let _ = prefs.restore();
            return Err(e.into());
        }
    }

    let query_id = fresh_device_id();
    let outcome = observe(browser, config, site, &query_id, seed_a, seed_b);

    if let Err(e) = prefs.restore() {
        log::error!("preference restore failed: {e}");
    }
    if scenario.policy.blacklists_first_party() {
        if let Err(e) = browser.flush_blacklist() {
            log::error!("blacklist flush failed: {e}");
        }
    }

    let observation = outcome?;
    let failures = evaluate(&checks, &observation);
    for failure in &failures {
        log::warn!("{} {scenario}: {failure}", browser.name());
    }

    Ok(ScenarioReport {
        browser: browser.name().to_string(),
        scenario: *scenario,
        failures,
    })
}

/// Apply every check, collecting human-readable failures.
pub fn evaluate(checks: &[Check], obs: &Observation) -> Vec<String> {
    let mut failures = Vec::new();

    for check in checks {
        match *check {
            Check::NotEmpty(place) => {
                if obs.ids(place).is_empty() {
                    failures.push(format!(
                        "{} has no device ids, but should",
                        place.describe()
                    ));
                }
            }
            Check::Empty(place) => {
                if !obs.ids(place).is_empty() {
                    failures.push(format!(
                        "{} has device ids {:?}, but should be empty",
                        place.describe(),
                        obs.ids(place)
                    ));
                }
            }
            Check::Contains(place, fixture) => match obs.fixture(fixture) {
                Some(id) if obs.ids(place).iter().any(|x| x == id) => {}
                Some(id) => failures.push(format!(
                    "{} is missing the {} ({id})",
                    place.describe(),
                    fixture.describe()
                )),
                None => failures.push(format!(
                    "check refers to the {} but the seed never produced one",
                    fixture.describe()
                )),
            },
            Check::Lacks(place, fixture) => match obs.fixture(fixture) {
                Some(id) if obs.ids(place).iter().any(|x| x == id) => {
                    failures.push(format!(
                        "{} contains the {} ({id}), but should not",
                        place.describe(),
                        fixture.describe()
                    ));
                }
                Some(_) => {}
                None => failures.push(format!(
                    "check refers to the {} but the seed never produced one",
                    fixture.describe()
                )),
            },
            Check::SameIds(a, b) => {
                if obs.ids(a) != obs.ids(b) {
                    failures.push(format!(
                        "{} ids {:?} differ from {} ids {:?}",
                        a.describe(),
                        obs.ids(a),
                        b.describe(),
                        obs.ids(b)
                    ));
                }
            }
            Check::DifferentIds(a, b) => {
                if obs.ids(a) == obs.ids(b) {
                    failures.push(format!(
                        "{} and {} report identical ids {:?}, but should differ",
                        a.describe(),
                        b.describe(),
                        obs.ids(a)
                    ));
                }
            }
            Check::SameHead(a, b) => {
                let (head_a, head_b) = (obs.ids(a).first(), obs.ids(b).first());
                if head_a.is_none() || head_a != head_b {
                    failures.push(format!(
                        "{} head {:?} differs from {} head {:?}",
                        a.describe(),
                        head_a,
                        b.describe(),
                        head_b
                    ));
                }
            }
        }
    }

    failures
}

// ---------------------------------------------------------------------------
// 4. Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use std::path::PathBuf;
    use std::rc::Rc;

    use tempfile::TempDir;

    use trackcheck_core::browser::{CookieStore, NavigationOutcome, PrefsEditor};
    use trackcheck_core::config::{ChromiumConfig, FirefoxConfig};
    use trackcheck_core::errors::{HarnessError, Result as CoreResult};
    use trackcheck_core::paths;

    use crate::firefox::cookies::{tests::create_firefox_db, FirefoxCookies};

    // ---- expectation matrix shape ----

    #[test]
    fn scenario_matrix_covers_the_recorded_runs() {
        // chromium: publisher {all, only_1, only_3}, click {nothing, only_1,
        // only_3}, five seeds each.
        assert_eq!(all_scenarios("chromium").len(), 30);
        // firefox: publisher {all, nothing, only_3}, click {all, nothing}
        // with five seeds, plus the single recorded click only_3 run.
        assert_eq!(all_scenarios("firefox").len(), 26);
        assert!(all_scenarios("lynx").is_empty());
    }

    #[test]
    fn uncovered_combinations_have_no_expectations() {
        // Firefox never ran first-party-only.
        for site in Site::ALL {
            for seed in Seed::ALL {
                let scenario = Scenario {
                    site,
                    policy: Policy::FirstPartyOnly,
                    seed,
                };
                assert!(expectations("firefox", &scenario).is_none());
            }
        }
    }

    #[test]
    fn fresh_device_ids_have_the_canonical_shape() {
        let id = fresh_device_id();
        assert_eq!(extract_device_ids(&format!("di={id}")), vec![id.clone()]);
        assert_ne!(id, fresh_device_id());
    }

    #[test]
    fn payloads_embed_the_id_in_both_encodings() {
        let id = fresh_device_id();
        assert_eq!(extract_device_ids(&literal_payload(&id)), vec![id.clone()]);
        assert_eq!(extract_device_ids(&encoded_payload(&id)), vec![id]);
    }

    // ---- evaluate ----

    fn observation(first: &[&str], third: &[&str], log: &[&str]) -> Observation {
        Observation {
            first_ids: first.iter().map(|s| s.to_string()).collect(),
            third_ids: third.iter().map(|s| s.to_string()).collect(),
            log_ids: log.iter().map(|s| s.to_string()).collect(),
            query_id: "1.aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa".to_string(),
            seed_a: Some("2.bbbbbbbb-bbbb-bbbb-bbbb-bbbbbbbbbbbb".to_string()),
            seed_b: None,
        }
    }

    #[test]
    fn evaluate_reports_each_failed_check() {
        let obs = observation(&[], &["2.bbbbbbbb-bbbb-bbbb-bbbb-bbbbbbbbbbbb"], &[]);
        let failures = evaluate(
            &[
                Check::NotEmpty(Place::FirstStore),
                Check::NotEmpty(Place::ThirdStore),
                Check::Contains(Place::ThirdStore, Fixture::SeedA),
                Check::Contains(Place::Log, Fixture::SeedA),
            ],
            &obs,
        );
        assert_eq!(failures.len(), 2);
        assert!(failures[0].contains("first-party cookie"));
        assert!(failures[1].contains("tracking log"));
    }

    #[test]
    fn evaluate_same_head_needs_a_head_on_both_sides() {
        let obs = observation(&["a.x", "b.y"], &["a.x"], &[]);
        // Heads agree even though the full lists differ.
        let obs = Observation {
            first_ids: vec!["1.h".into(), "2.t".into()],
            third_ids: vec!["1.h".into()],
            ..obs
        };
        assert!(evaluate(&[Check::SameHead(Place::FirstStore, Place::ThirdStore)], &obs)
            .is_empty());

        let empty = observation(&[], &[], &[]);
        assert_eq!(
            evaluate(&[Check::SameHead(Place::FirstStore, Place::ThirdStore)], &empty).len(),
            1
        );
    }

    #[test]
    fn evaluate_flags_a_check_against_a_missing_seed() {
        let obs = observation(&[], &[], &[]);
        let failures = evaluate(&[Check::Contains(Place::Log, Fixture::SeedB)], &obs);
        assert_eq!(failures.len(), 1);
        assert!(failures[0].contains("seeded id B"));
    }

    // ---- end-to-end runs against a simulated browser ----

    /// Shared mutable state between the stub browser and its editors.
    struct StubState {
        behavior: CookieBehavior,
        blacklisted: Vec<String>,
    }

    /// A browser double backed by a real Firefox-schema cookie store. Its
    /// `navigate` applies the tracking pipeline's documented semantics for
    /// the configured policy instead of spawning a process.
    struct StubBrowser {
        profile: PathBuf,
        log_base: PathBuf,
        cookie_name: String,
        first: String,
        third: String,
        state: Rc<RefCell<StubState>>,
    }

    struct StubPrefs {
        state: Rc<RefCell<StubState>>,
    }

    impl PrefsEditor for StubPrefs {
        fn backup(&self) -> CoreResult<()> {
            Ok(())
        }

        fn set_policy(&mut self, behavior: CookieBehavior) -> CoreResult<()> {
            self.state.borrow_mut().behavior = behavior;
            Ok(())
        }

        fn restore(&self) -> CoreResult<()> {
            self.state.borrow_mut().behavior = CookieBehavior::All;
            Ok(())
        }
    }

    impl StubBrowser {
        fn new(dir: &TempDir, first: &str, third: &str) -> Self {
            let profile = dir.path().join("profile");
            fs::create_dir_all(&profile).unwrap();
            create_firefox_db(&profile.join("cookies.sqlite"));
            Self {
                profile,
                log_base: dir.path().join("access"),
                cookie_name: "adsp_di".to_string(),
                first: first.to_string(),
                third: third.to_string(),
                state: Rc::new(RefCell::new(StubState {
                    behavior: CookieBehavior::All,
                    blacklisted: Vec::new(),
                })),
            }
        }

        fn write_log_line(&self, ids: &[String]) {
            let adsplog = AdspLog::for_hour(&self.log_base, Local::now());
            fs::create_dir_all(adsplog.folder()).unwrap();
            let payload = serde_json::json!({ "deviceIds": ids });
            fs::write(
                adsplog.folder().join("access.log"),
                format!("a,b,c,d,e,f,g,h,i,j,k,l,m,{payload}\n"),
            )
            .unwrap();
        }
    }

    impl Browser for StubBrowser {
        fn name(&self) -> &str {
            "firefox"
        }

        fn open_cookies(&self) -> CoreResult<Box<dyn CookieStore>> {
            Ok(Box::new(FirefoxCookies::open(
                &self.profile.join("cookies.sqlite"),
            )?))
        }

        fn prefs(&self) -> Box<dyn PrefsEditor> {
            Box::new(StubPrefs {
                state: Rc::clone(&self.state),
            })
        }

        fn navigate(&self, url: &str, _timeout: Duration) -> CoreResult<NavigationOutcome> {
            let query_ids = extract_device_ids(url);
            let behavior = self.state.borrow().behavior;

            match behavior {
                // Cookies disabled: nothing persists, but the querystring
                // id still reaches the tracking server.
                CookieBehavior::Nothing => self.write_log_line(&query_ids),
                CookieBehavior::All | CookieBehavior::FirstPartyOnly => {
                    let store = self.open_cookies()?;
                    let third_ids = store
                        .get(&self.cookie_name, &self.third)?
                        .map(|c| extract_device_ids(&c.value))
                        .unwrap_or_default();

                    // The third-party cookie outranks the querystring id.
                    let effective = if third_ids.is_empty() {
                        query_ids
                    } else {
                        third_ids
                    };

                    // Firefox persists the first-party cookie even when the
                    // domain is blacklisted.
                    let value = format!(
                        "di={}",
                        effective.first().map(String::as_str).unwrap_or_default()
                    );
                    store.delete(&self.cookie_name, &self.first)?;
                    store.set(&self.cookie_name, &value, &self.first, &SetOptions::default())?;
                    store.close()?;

                    self.write_log_line(&effective);
                }
            }

            Ok(NavigationOutcome::Completed)
        }

        fn blacklist(&self, domain: &str) -> CoreResult<()> {
            self.state.borrow_mut().blacklisted.push(domain.to_string());
            Ok(())
        }

        fn flush_blacklist(&self) -> CoreResult<()> {
            self.state.borrow_mut().blacklisted.clear();
            Ok(())
        }
    }

    fn stub_config(dir: &TempDir) -> HarnessConfig {
        HarnessConfig {
            wait_before: 0,
            wait_after: 0,
            navigation_timeout: 1,
            cookie_name: "adsp_di".to_string(),
            adsp_log_dir: dir.path().join("access"),
            publisher: SiteConfig {
                first: "publisher.localhost".to_string(),
                third: ".adsp.localhost".to_string(),
                url: "http://publisher.localhost/publisher.html".to_string(),
            },
            click_to_advertiser: SiteConfig {
                first: "advertiser.localhost".to_string(),
                third: ".adsp.localhost".to_string(),
                url: "http://www2.adsp.localhost/click.php?id=2763&di={di}&data=".to_string(),
            },
            chromium: ChromiumConfig {
                profile_folder: dir.path().join("chromium"),
                binary: PathBuf::from("/bin/true"),
                cookie_db: "Cookies".to_string(),
            },
            firefox: FirefoxConfig {
                profile_name: "CookiesAll".to_string(),
                profile_folder: dir.path().join("profile"),
                binary: PathBuf::from("/bin/true"),
                cookie_db: "cookies.sqlite".to_string(),
                permission_db: "permissions.sqlite".to_string(),
            },
        }
    }

    #[test]
    fn accept_nothing_blocks_stores_but_not_the_log() {
        let dir = TempDir::new().unwrap();
        let config = stub_config(&dir);
        let browser = StubBrowser::new(&dir, "advertiser.localhost", ".adsp.localhost");

        let scenario = Scenario {
            site: Site::ClickToAdvertiser,
            policy: Policy::Nothing,
            seed: Seed::AllEmpty,
        };
        let report = run_scenario(&browser, &config, &scenario).unwrap();
        assert!(report.passed(), "failures: {:?}", report.failures);

        // Teardown restored the default policy.
        assert_eq!(browser.state.borrow().behavior, CookieBehavior::All);
    }

    #[test]
    fn blacklisted_first_party_keeps_the_third_party_id() {
        let dir = TempDir::new().unwrap();
        let config = stub_config(&dir);
        let browser = StubBrowser::new(&dir, "advertiser.localhost", ".adsp.localhost");

        let scenario = Scenario {
            site: Site::ClickToAdvertiser,
            policy: Policy::ThirdPartyOnly,
            seed: Seed::ThirdPartyOnly,
        };
        let report = run_scenario(&browser, &config, &scenario).unwrap();
        assert!(report.passed(), "failures: {:?}", report.failures);

        // Blacklist was applied during the run and flushed at teardown.
        assert!(browser.state.borrow().blacklisted.is_empty());
    }

    /// Editor over a real prefs file that backs up, half-writes the new
    /// policy, then fails.
    struct SabotagedPrefs {
        path: PathBuf,
    }

    impl PrefsEditor for SabotagedPrefs {
        fn backup(&self) -> CoreResult<()> {
            fs::copy(&self.path, paths::backup_path(&self.path))?;
            Ok(())
        }

        fn set_policy(&mut self, _behavior: CookieBehavior) -> CoreResult<()> {
            self.backup()?;
            fs::write(
                &self.path,
                "user_pref(\"network.cookie.cookieBehavior\", 2);\n",
            )?;
            Err(HarnessError::StoreUnavailable(
                "preference store locked".to_string(),
            ))
        }

        fn restore(&self) -> CoreResult<()> {
            fs::copy(paths::backup_path(&self.path), &self.path)?;
            Ok(())
        }
    }

    struct SabotagedPrefsBrowser {
        inner: StubBrowser,
        prefs_path: PathBuf,
    }

    impl Browser for SabotagedPrefsBrowser {
        fn name(&self) -> &str {
            self.inner.name()
        }

        fn open_cookies(&self) -> CoreResult<Box<dyn CookieStore>> {
            self.inner.open_cookies()
        }

        fn prefs(&self) -> Box<dyn PrefsEditor> {
            Box::new(SabotagedPrefs {
                path: self.prefs_path.clone(),
            })
        }

        fn navigate(&self, url: &str, timeout: Duration) -> CoreResult<NavigationOutcome> {
            self.inner.navigate(url, timeout)
        }

        fn blacklist(&self, domain: &str) -> CoreResult<()> {
            self.inner.blacklist(domain)
        }

        fn flush_blacklist(&self) -> CoreResult<()> {
            self.inner.flush_blacklist()
        }
    }

    #[test]
    fn failed_policy_write_still_restores_preferences() {
        let dir = TempDir::new().unwrap();
        let config = stub_config(&dir);

        let prefs_path = dir.path().join("prefs.js");
        let original = "# Mozilla User Preferences\n";
        fs::write(&prefs_path, original).unwrap();

        let browser = SabotagedPrefsBrowser {
            inner: StubBrowser::new(&dir, "advertiser.localhost", ".adsp.localhost"),
            prefs_path: prefs_path.clone(),
        };

        let scenario = Scenario {
            site: Site::ClickToAdvertiser,
            policy: Policy::Nothing,
            seed: Seed::AllEmpty,
        };
        assert!(run_scenario(&browser, &config, &scenario).is_err());

        // The half-written policy must not survive the failed run.
        assert_eq!(fs::read_to_string(&prefs_path).unwrap(), original);
    }

    #[test]
    fn run_scenario_rejects_an_unrecorded_combination() {
        let dir = TempDir::new().unwrap();
        let config = stub_config(&dir);
        let browser = StubBrowser::new(&dir, "advertiser.localhost", ".adsp.localhost");

        let scenario = Scenario {
            site: Site::ClickToAdvertiser,
            policy: Policy::FirstPartyOnly,
            seed: Seed::AllEmpty,
        };
        assert!(run_scenario(&browser, &config, &scenario).is_err());
    }

    #[test]
    fn scenario_names_round_trip_for_filters() {
        for site in Site::ALL {
            assert_eq!(site.as_str().parse::<Site>().unwrap(), site);
        }
        for policy in Policy::ALL {
            assert_eq!(policy.as_str().parse::<Policy>().unwrap(), policy);
        }
        for seed in Seed::ALL {
            assert_eq!(seed.as_str().parse::<Seed>().unwrap(), seed);
        }
    }
}
