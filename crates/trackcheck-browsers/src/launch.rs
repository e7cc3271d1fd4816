//! Browser process launch with a bounded wait.
//!
//! Navigation is "spawn and wait": the harness does not speak to the
//! browser, it only observes whether the process exits inside the timeout.
//! On expiry the process is killed outright; the landing page may already
//! have fired its tracking request, so a timeout is reported as an
//! outcome, not an error.

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use trackcheck_core::browser::NavigationOutcome;
use trackcheck_core::errors::Result;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Spawn `binary` with `args` and wait up to `timeout` for it to exit.
pub fn run_with_timeout(
    binary: &Path,
    args: &[String],
    timeout: Duration,
) -> Result<NavigationOutcome> {
    log::info!("launching {} {}", binary.display(), args.join(" "));

    let mut child = Command::new(binary)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    let deadline = Instant::now() + timeout;
    loop {
        if child.try_wait()?.is_some() {
            return Ok(NavigationOutcome::Completed);
        }
        if Instant::now() >= deadline {
            log::warn!(
                "browser did not exit within {}s, terminating",
                timeout.as_secs()
            );
            // Best effort: the process may have exited in the meantime.
            let _ = child.kill();
            let _ = child.wait();
            return Ok(NavigationOutcome::TimedOut);
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}
