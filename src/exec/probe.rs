// src/exec/probe.rs

//! Readiness probe for just-started targets.
//!
//! An address beginning with `/` is a socket file whose existence signals
//! readiness; anything else is dialed as a `host:port` TCP address. The
//! probe retries with exponential backoff and gives up after a bounded
//! number of attempts.

use std::time::Duration;

use anyhow::{bail, Result};
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};
use tracing::debug;

const PROBE_ATTEMPTS: u32 = 10;
const DIAL_TIMEOUT: Duration = Duration::from_secs(1);

/// Poll `addr` until it is ready, sleeping `exp_sleep(i)` after attempt `i`.
///
/// Exhausting all attempts fails the owning job.
pub async fn wait_until_listening(addr: &str) -> Result<()> {
    for attempt in 0..PROBE_ATTEMPTS {
        if check_listening(addr).await {
            return Ok(());
        }
        sleep(exp_sleep(attempt)).await;
    }
    bail!("service didn't listen to: {addr}");
}

/// One readiness check. A dial that connects is immediately closed again;
/// refused connections and any other dial error count as not-ready so the
/// caller retries.
async fn check_listening(addr: &str) -> bool {
    if addr.starts_with('/') {
        return tokio::fs::try_exists(addr).await.unwrap_or(false);
    }

    match timeout(DIAL_TIMEOUT, TcpStream::connect(addr)).await {
        Ok(Ok(_conn)) => true,
        Ok(Err(err)) => {
            debug!(%addr, error = %err, "readiness dial failed");
            false
        }
        Err(_) => {
            debug!(%addr, "readiness dial timed out");
            false
        }
    }
}

/// Backoff schedule shared with the service-manager retry loop:
/// `50ms · 2^attempt`.
pub fn exp_sleep(attempt: u32) -> Duration {
    Duration::from_millis(50) * 2u32.saturating_pow(attempt)
}
