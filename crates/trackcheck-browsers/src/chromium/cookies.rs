//! Codec for Chromium's `Cookies` SQLite database.
//!
//! Timestamps are microseconds since 1601-01-01 UTC. Values live in the
//! `encrypted_value` BLOB column (see [`super::crypto`]); the plaintext
//! `value` column is written empty and ignored on read. Hosts are stored
//! in `host_key`, optionally with a leading dot, so lookups use a suffix
//! match on the registrable domain rather than exact equality.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, OpenFlags};

use trackcheck_core::browser::CookieStore;
use trackcheck_core::domain;
use trackcheck_core::errors::{HarnessError, Result};
use trackcheck_core::models::{Cookie, SetOptions};

use super::crypto;

/// Seconds between 1601-01-01 and the Unix epoch.
const CHROME_EPOCH_OFFSET: i64 = 11_644_473_600;

const TABLE: &str = "cookies";

/// Convert a wall-clock instant to Chromium's cookie timestamp.
pub fn chrome_time(at: DateTime<Utc>) -> i64 {
    (at.timestamp() + CHROME_EPOCH_OFFSET) * 1_000_000 + i64::from(at.timestamp_subsec_micros())
}

pub struct ChromiumCookies {
    conn: Connection,
}

impl ChromiumCookies {
    /// Open an existing Chromium cookie database. The file must already
    /// exist (the browser profile creates it) and carry the expected
    /// schema; anything else is `StoreUnavailable`.
    pub fn open(db_path: &Path) -> Result<Self> {
        if !db_path.is_file() {
            return Err(HarnessError::StoreUnavailable(format!(
                "cookie database {} does not exist",
                db_path.display()
            )));
        }

        let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_WRITE)
            .map_err(|e| {
                HarnessError::StoreUnavailable(format!(
                    "cannot open cookie database {}: {e}",
                    db_path.display()
                ))
            })?;

        // Schema probe: catches both a foreign database and a schema from
        // a Chromium version this codec does not understand.
        conn.prepare(&format!(
            "SELECT name, host_key, encrypted_value FROM {TABLE} LIMIT 1"
        ))
        .map_err(|e| {
            HarnessError::StoreUnavailable(format!(
                "unexpected schema in {}: {e}",
                db_path.display()
            ))
        })?;

        Ok(Self { conn })
    }
}

impl CookieStore for ChromiumCookies {
    fn get(&self, name: &str, domain: &str) -> Result<Option<Cookie>> {
        let base = domain::registrable_domain(domain)?;

        let mut stmt = self.conn.prepare(&format!(
            "SELECT name, host_key, encrypted_value FROM {TABLE} WHERE name = ?1 AND host_key LIKE ?2"
        ))?;
        let mut rows = stmt.query(params![name, format!("%{base}")])?;

        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let cookie_name: String = row.get(0)?;
        let host: String = row.get(1)?;
        let encrypted: Vec<u8> = row.get(2)?;

        // A row that cannot be decrypted is a format mismatch, not an
        // absent cookie.
        let value = crypto::decrypt(&encrypted)?;

        Ok(Some(Cookie {
            name: cookie_name,
            host,
            value,
        }))
    }

    fn set(&self, name: &str, value: &str, domain: &str, opts: &SetOptions) -> Result<()> {
        let host_key = domain::host_key(domain)?;
        let now = Utc::now();

        let last_access = opts.last_access.unwrap_or_else(|| chrome_time(now));
        let creation = opts.creation.unwrap_or(last_access);
        let expires = opts
            .expiry
            .unwrap_or_else(|| chrome_time(now + Duration::days(365)));
        let path = opts.path.as_deref().unwrap_or("/");

        let encrypted = crypto::encrypt(value)?;

        self.conn.execute(
            &format!(
                "INSERT INTO {TABLE} (creation_utc, host_key, name, value, path, expires_utc, \
                 secure, httponly, last_access_utc, has_expires, persistent, priority, \
                 encrypted_value, firstpartyonly) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"
            ),
            params![
                creation,
                host_key,
                name,
                "", // plaintext column stays empty alongside encrypted_value
                path,
                expires,
                opts.secure as i64,
                opts.http_only as i64,
                last_access,
                1, // has_expires
                1, // persistent
                1, // priority
                encrypted,
                0, // firstpartyonly
            ],
        )?;
        Ok(())
    }

    fn delete(&self, name: &str, domain: &str) -> Result<()> {
        // Same suffix match as get, so a delete always reaches the rows a
        // lookup would have found.
        let base = domain::registrable_domain(domain)?;
        self.conn.execute(
            &format!("DELETE FROM {TABLE} WHERE name = ?1 AND host_key LIKE ?2"),
            params![name, format!("%{base}")],
        )?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.conn.execute(&format!("DELETE FROM {TABLE}"), [])?;
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e.into())
    }
}
