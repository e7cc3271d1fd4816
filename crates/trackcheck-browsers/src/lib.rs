//! Concrete browser implementations and the scenario runner.
//!
//! Each browser is an independent implementation of the core capability
//! traits; the two on-disk schemas share almost no field semantics, so
//! there is no common codec layer beyond those traits.

use trackcheck_core::browser::Browser;
use trackcheck_core::config::HarnessConfig;

pub mod chromium;
pub mod firefox;
pub mod launch;
pub mod scenario;

/// Both target browsers, configured from the harness config.
pub fn all_browsers(config: &HarnessConfig) -> Vec<Box<dyn Browser>> {
    vec![
        Box::new(chromium::ChromiumBrowser::new(config.chromium.clone())),
        Box::new(firefox::FirefoxBrowser::new(config.firefox.clone())),
    ]
}

/// Look up a browser by name.
pub fn get_browser(name: &str, config: &HarnessConfig) -> Option<Box<dyn Browser>> {
    all_browsers(config).into_iter().find(|b| b.name() == name)
}
