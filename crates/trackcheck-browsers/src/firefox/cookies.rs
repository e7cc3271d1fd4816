//! Codec for Firefox's `cookies.sqlite` database.
//!
//! Values are stored in the clear. `expiry` is Unix seconds while
//! `lastAccessed` and `creationTime` are Unix microseconds; `baseDomain`
//! carries the registrable domain without any leading dot and must stay
//! consistent with `host` or Firefox ignores the row.

use std::path::Path;

use chrono::{Duration, Utc};
use rusqlite::{params, Connection, OpenFlags};

use trackcheck_core::browser::CookieStore;
use trackcheck_core::domain;
use trackcheck_core::errors::{HarnessError, Result};
use trackcheck_core::models::{Cookie, SetOptions};

const TABLE: &str = "moz_cookies";

pub struct FirefoxCookies {
    conn: Connection,
}

impl FirefoxCookies {
    /// Open an existing `cookies.sqlite`. The profile must already exist;
    /// a missing file or foreign schema is `StoreUnavailable`.
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

        conn.prepare(&format!("SELECT name, host, value FROM {TABLE} LIMIT 1"))
            .map_err(|e| {
                HarnessError::StoreUnavailable(format!(
                    "unexpected schema in {}: {e}",
                    db_path.display()
                ))
            })?;

        Ok(Self { conn })
    }
}

impl CookieStore for FirefoxCookies {
    fn get(&self, name: &str, domain: &str) -> Result<Option<Cookie>> {
        let base = domain::registrable_domain(domain)?;

        let mut stmt = self.conn.prepare(&format!(
            "SELECT name, host, value FROM {TABLE} WHERE name = ?1 AND host LIKE ?2"
        ))?;
        let mut rows = stmt.query(params![name, format!("%{base}")])?;

        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        Ok(Some(Cookie {
            name: row.get(0)?,
            host: row.get(1)?,
            value: row.get(2)?,
        }))
    }

    fn set(&self, name: &str, value: &str, domain: &str, opts: &SetOptions) -> Result<()> {
        if value.is_empty() {
            return Err(HarnessError::InvalidArgument(
                "refusing to store an empty cookie value".to_string(),
            ));
        }

        let base = domain::registrable_domain(domain)?;
        let host = domain::host_key(domain)?;
        let now = Utc::now();
        let now_us = now.timestamp_micros();

        let last_accessed = opts.last_access.unwrap_or(now_us);
        let creation = opts.creation.unwrap_or(last_accessed);
        let expiry = opts
            .expiry
            .unwrap_or_else(|| (now + Duration::days(365)).timestamp());
        let path = opts.path.as_deref().unwrap_or("/");

        self.conn.execute(
            &format!(
                "INSERT INTO {TABLE} (baseDomain, appId, inBrowserElement, name, value, host, \
                 path, expiry, lastAccessed, creationTime, isSecure, isHttpOnly) \
                 VALUES (?1, 0, 0, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
            ),
            params![
                base,
                name,
                value,
                host,
                path,
                expiry,
                last_accessed,
                creation,
                opts.secure as i64,
                opts.http_only as i64,
            ],
        )?;
        Ok(())
    }

    fn delete(&self, name: &str, domain: &str) -> Result<()> {
        let host = domain::host_key(domain)?;
        self.conn.execute(
            &format!("DELETE FROM {TABLE} WHERE name = ?1 AND host = ?2"),
            params![name, host],
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
