//! The per-target prober: a TCP reachability phase, then an HTTP phase for http(s)
//! targets. Each phase has its own deadline and retries at a fixed interval.

pub mod tcp;

use std::collections::HashMap;
use std::time::Duration;

use crate::config::model::{ConnectionSpec, DEFAULT_RETRY_MILLIS, DEFAULT_TIMEOUT_SECONDS};
use crate::connection::ConnectionDescriptor;
use crate::error::Result;
use crate::http_probe::probe::ping_http;
use crate::progress::{ProgressEvent, ProgressSink};

pub use tcp::ping_tcp;

/// Stand-in deadline for budgets too large to add to the current instant.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// `now + budget`, saturating to a far-future instant instead of overflowing.
pub(crate) fn deadline_after(budget: Duration) -> tokio::time::Instant {
    let now = tokio::time::Instant::now();
    now.checked_add(budget).unwrap_or(now + FAR_FUTURE)
}

/// How one target is polled. Owned by the task probing that target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbePolicy {
    /// Budget of each phase; the HTTP phase gets a fresh one after TCP succeeds.
    pub timeout: Duration,
    /// Pause between failed attempts.
    pub retry: Duration,
    pub expected_status: Option<u16>,
    pub headers: HashMap<String, String>,
    pub insecure: bool,
}

impl Default for ProbePolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            retry: Duration::from_millis(DEFAULT_RETRY_MILLIS),
            expected_status: None,
            headers: HashMap::new(),
            insecure: false,
        }
    }
}

impl From<&ConnectionSpec> for ProbePolicy {
    fn from(spec: &ConnectionSpec) -> Self {
        Self {
            timeout: spec.timeout(),
            retry: spec.retry_interval(),
            expected_status: spec.status,
            headers: spec.headers.clone(),
            insecure: spec.insecure,
        }
    }
}

/// Waits for one target: TCP first, then HTTP when the scheme asks for it.
pub async fn dial_conn(
    conn: &ConnectionDescriptor,
    policy: &ProbePolicy,
    sink: &dyn ProgressSink,
) -> Result<()> {
    let target = conn.to_string();
    sink.emit(&ProgressEvent::Waiting {
        target: &target,
        timeout: policy.timeout,
    });

    ping_tcp(conn, policy, sink).await?;

    if !conn.needs_http_check() {
        return Ok(());
    }

    ping_http(conn, policy, sink).await
}
