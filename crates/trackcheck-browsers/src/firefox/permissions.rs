//! Codec for Firefox's `permissions.sqlite` blacklist.
//!
//! A cookie block is one `moz_perms` row: origin with an explicit scheme,
//! type `cookie`, permission 2 (deny), never expiring. `modificationTime`
//! is Unix milliseconds, unlike the microsecond timestamps in the cookie
//! store.

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OpenFlags};

use trackcheck_core::domain;
use trackcheck_core::errors::{HarnessError, Result};

const TABLE: &str = "moz_perms";
const TYPE_COOKIE: &str = "cookie";
const PERMISSION_DENY: i64 = 2;
const EXPIRE_NEVER: i64 = 0;

pub struct FirefoxPermissions {
    conn: Connection,
}

impl FirefoxPermissions {
    pub fn open(db_path: &Path) -> Result<Self> {
        if !db_path.is_file() {
            return Err(HarnessError::StoreUnavailable(format!(
                "permission database {} does not exist",
                db_path.display()
            )));
        }

        let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_WRITE)
            .map_err(|e| {
                HarnessError::StoreUnavailable(format!(
                    "cannot open permission database {}: {e}",
                    db_path.display()
                ))
            })?;

        conn.prepare(&format!(
            "SELECT origin, type, permission FROM {TABLE} LIMIT 1"
        ))
        .map_err(|e| {
            HarnessError::StoreUnavailable(format!(
                "unexpected schema in {}: {e}",
                db_path.display()
            ))
        })?;

        Ok(Self { conn })
    }

    /// Deny cookies for the registrable domain of `domain`.
    pub fn deny_cookies(&self, domain: &str) -> Result<()> {
        let base = domain::registrable_domain(domain)?;
        let origin = format!("http://{base}");
        let now_ms = Utc::now().timestamp_millis();

        self.conn.execute(
            &format!(
                "INSERT INTO {TABLE} (origin, type, permission, expireType, expireTime, \
                 modificationTime) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
            ),
            params![
                origin,
                TYPE_COOKIE,
                PERMISSION_DENY,
                EXPIRE_NEVER,
                0,
                now_ms
            ],
        )?;
        Ok(())
    }

    /// Remove every cookie permission row. Permissions of other types
    /// (popups, geolocation) are left alone.
    pub fn clear_cookie_permissions(&self) -> Result<()> {
        self.conn.execute(
            &format!("DELETE FROM {TABLE} WHERE type = ?1"),
            params![TYPE_COOKIE],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    pub(crate) fn create_permissions_db(path: &Path) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(
            "CREATE TABLE moz_perms (
                id INTEGER PRIMARY KEY,
                origin TEXT,
                type TEXT,
                permission INTEGER,
                expireType INTEGER,
                expireTime INTEGER,
                modificationTime INTEGER
            );",
        )
        .unwrap();
    }

    fn open_fixture(dir: &TempDir) -> FirefoxPermissions {
        let db_path = dir.path().join("permissions.sqlite");
        create_permissions_db(&db_path);
        FirefoxPermissions::open(&db_path).unwrap()
    }

    #[test]
    fn missing_file_is_store_unavailable() {
        let dir = TempDir::new().unwrap();
        let result = FirefoxPermissions::open(&dir.path().join("permissions.sqlite"));
        assert!(matches!(result, Err(HarnessError::StoreUnavailable(_))));
    }

    #[test]
    fn deny_writes_a_scheme_qualified_deny_row() {
        let dir = TempDir::new().unwrap();
        let perms = open_fixture(&dir);
        let before_ms = Utc::now().timestamp_millis();

        perms.deny_cookies("http://www.publisher.localhost").unwrap();

        let (origin, ptype, permission, expire_type, modified): (String, String, i64, i64, i64) =
            perms
                .conn
                .query_row(
                    "SELECT origin, type, permission, expireType, modificationTime FROM moz_perms",
                    [],
                    |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)),
                )
                .unwrap();

        assert_eq!(origin, "http://publisher.localhost");
        assert_eq!(ptype, "cookie");
        assert_eq!(permission, 2);
        assert_eq!(expire_type, 0);
        // Milliseconds, not microseconds.
        assert!(modified >= before_ms && modified <= Utc::now().timestamp_millis());
    }

    #[test]
    fn clear_only_touches_cookie_rows() {
        let dir = TempDir::new().unwrap();
        let perms = open_fixture(&dir);
        perms.deny_cookies("publisher.localhost").unwrap();
        perms
            .conn
            .execute(
                "INSERT INTO moz_perms (origin, type, permission, expireType, expireTime, \
                 modificationTime) VALUES ('http://example.com', 'popup', 1, 0, 0, 0)",
                [],
            )
            .unwrap();

        perms.clear_cookie_permissions().unwrap();

        let remaining: Vec<String> = perms
            .conn
            .prepare("SELECT type FROM moz_perms")
            .unwrap()
            .query_map([], |r| r.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(remaining, vec!["popup".to_string()]);
    }
}
