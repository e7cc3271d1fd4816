//! Shared foundation of the trackcheck harness: error taxonomy, harness
//! configuration, the capability traits browsers implement, domain
//! canonicalization, the device-id extractor and the tracking-log reader.

pub mod adsplog;
pub mod browser;
pub mod config;
pub mod device_id;
pub mod domain;
pub mod errors;
pub mod models;
pub mod paths;
