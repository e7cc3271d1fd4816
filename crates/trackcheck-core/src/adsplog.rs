//! Reader for the tracking server's access log.
//!
//! The log tree is partitioned by local time, `<base>/<year>/<month>/<day>/
//! <hour>` with non-zero-padded components. Each navigation appends one
//! line whose trailing comma-delimited field is a JSON object carrying a
//! `deviceIds` array.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Datelike, Local, Timelike};
use walkdir::WalkDir;

/// Only files touched this recently count as "the navigation we just ran".
const RECENT_WINDOW: Duration = Duration::from_secs(60);

/// The server's own debug output lives in the same tree and must never be
/// mistaken for an access log.
const DEBUG_LOG_NAME: &str = "debug.log";

/// The structured payload is the 14th comma-delimited field onward.
const PAYLOAD_FIELD: usize = 14;

pub struct AdspLog {
    folder: PathBuf,
}

impl AdspLog {
    /// Reader for the current local hour's partition under `base`.
    pub fn new(base: &Path) -> Self {
        Self::for_hour(base, Local::now())
    }

    /// Reader pinned to the partition for `at`. Tests use this to build a
    /// tree and read it back without racing an hour rollover.
    pub fn for_hour(base: &Path, at: DateTime<Local>) -> Self {
        let folder = base
            .join(at.year().to_string())
            .join(at.month().to_string())
            .join(at.day().to_string())
            .join(at.hour().to_string());
        Self { folder }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Last line of the most recently modified log file in the partition,
    /// considering only files touched within the last minute and skipping
    /// `debug.log`.
    pub fn last_line(&self) -> Result<String> {
        let now = SystemTime::now();
        let mut candidates: Vec<(SystemTime, PathBuf)> = Vec::new();

        for entry in WalkDir::new(&self.folder).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.file_name() == DEBUG_LOG_NAME {
                continue;
            }
            let Ok(meta) = entry.metadata() else { continue };
            let Ok(modified) = meta.modified() else { continue };
            let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
            if age <= RECENT_WINDOW {
                candidates.push((modified, entry.into_path()));
            }
        }

        let Some((_, newest)) = candidates.into_iter().max_by_key(|(m, _)| *m) else {
            bail!(
                "no log file modified within the last minute under {}",
                self.folder.display()
            );
        };

        let content = fs::read_to_string(&newest)
            .with_context(|| format!("reading log file {}", newest.display()))?;
        let Some(last) = content.lines().last() else {
            bail!("log file {} is empty", newest.display());
        };

        log::debug!("tracking log line from {}: {last}", newest.display());
        Ok(last.to_string())
    }

    /// Device ids reported by one log line. The line's first 13 fields are
    /// plain CSV; everything after is a single JSON field (which may itself
    /// contain commas). A payload without a `deviceIds` key yields an empty
    /// list.
    pub fn device_ids(&self, line: &str) -> Result<Vec<String>> {
        let payload = line
            .splitn(PAYLOAD_FIELD, ',')
            .last()
            .unwrap_or_default();

        let data: serde_json::Value = serde_json::from_str(payload)
            .with_context(|| format!("log line payload is not JSON: {payload}"))?;

        let ids = data
            .get("deviceIds")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ID_A: &str = "1447859209.11111111-1111-1111-aaaa-111111111111";

    fn sample_line(ids: &[&str]) -> String {
        let ids_json = serde_json::to_string(ids).unwrap();
        format!(
            "2766,21915,5069,0,lead,1,0,0,0,0,0,0,http://advertiser.localhost/,{{\"deviceIds\":{ids_json},\"referrer\":\"\"}}"
        )
    }

    fn write_log(log: &AdspLog, name: &str, lines: &[String]) {
        fs::create_dir_all(log.folder()).unwrap();
        fs::write(log.folder().join(name), lines.join("\n")).unwrap();
    }

    #[test]
    fn reads_last_line_of_recent_file() {
        let dir = TempDir::new().unwrap();
        let log = AdspLog::for_hour(dir.path(), Local::now());
        write_log(
            &log,
            "access.log",
            &["older line".to_string(), sample_line(&[ID_A])],
        );

        let line = log.last_line().unwrap();
        assert_eq!(line, sample_line(&[ID_A]));
    }

    #[test]
    fn debug_log_is_excluded() {
        let dir = TempDir::new().unwrap();
        let log = AdspLog::for_hour(dir.path(), Local::now());
        write_log(&log, "debug.log", &["noise".to_string()]);

        assert!(log.last_line().is_err());
    }

    #[test]
    fn missing_partition_is_an_error() {
        let dir = TempDir::new().unwrap();
        let log = AdspLog::for_hour(dir.path(), Local::now());
        assert!(log.last_line().is_err());
    }

    #[test]
    fn parses_device_ids_from_trailing_json() {
        let dir = TempDir::new().unwrap();
        let log = AdspLog::for_hour(dir.path(), Local::now());
        let ids = log.device_ids(&sample_line(&[ID_A])).unwrap();
        assert_eq!(ids, vec![ID_A.to_string()]);
    }

    #[test]
    fn payload_commas_stay_inside_json_field() {
        let dir = TempDir::new().unwrap();
        let log = AdspLog::for_hour(dir.path(), Local::now());
        // Two ids: the JSON field itself contains a comma.
        let other = "1447344866.44444444-4444-4444-bbbb-444444444444";
        let ids = log.device_ids(&sample_line(&[ID_A, other])).unwrap();
        assert_eq!(ids, vec![ID_A.to_string(), other.to_string()]);
    }

    #[test]
    fn missing_device_ids_key_is_empty() {
        let dir = TempDir::new().unwrap();
        let log = AdspLog::for_hour(dir.path(), Local::now());
        let line = "1,2,3,4,5,6,7,8,9,10,11,12,13,{\"referrer\":\"\"}";
        assert!(log.device_ids(line).unwrap().is_empty());
    }

    #[test]
    fn non_json_payload_is_an_error() {
        let dir = TempDir::new().unwrap();
        let log = AdspLog::for_hour(dir.path(), Local::now());
        assert!(log.device_ids("1,2,3,not json").is_err());
    }
}
