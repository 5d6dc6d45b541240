//! Progress notices emitted while probing.
//!
//! Probers never decide what gets printed. They hand every step to a [`ProgressSink`]
//! chosen by the caller: [`NoopSink`] stays silent, [`TracingSink`] turns events into
//! `debug` level tracing events, and any `Fn(&ProgressEvent)` closure works too.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Which of the two checks an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Tcp,
    Http,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Tcp => f.write_str("tcp"),
            Phase::Http => f.write_str("http"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent<'a> {
    /// A target starts being probed with the given per-phase budget.
    Waiting { target: &'a str, timeout: Duration },
    /// A phase begins dialing `address`.
    Dialing { phase: Phase, address: &'a str },
    /// One attempt of a phase succeeded.
    Up { phase: Phase, address: &'a str },
    /// One attempt of a phase failed.
    Down {
        phase: Phase,
        address: &'a str,
        reason: &'a str,
    },
    /// An HTTP response came back, acceptable or not.
    Status { address: &'a str, status: &'a str },
}

impl ProgressEvent<'_> {
    pub fn phase(&self) -> Option<Phase> {
        match self {
            ProgressEvent::Waiting { .. } => None,
            ProgressEvent::Dialing { phase, .. }
            | ProgressEvent::Up { phase, .. }
            | ProgressEvent::Down { phase, .. } => Some(*phase),
            ProgressEvent::Status { .. } => Some(Phase::Http),
        }
    }
}

impl fmt::Display for ProgressEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::Waiting { target, timeout } => {
                write!(f, "Waiting {} seconds for {target}", timeout.as_secs())
            }
            ProgressEvent::Dialing { phase, address } => write!(f, "Dial {phase}: {address}"),
            ProgressEvent::Up { phase, address } => write!(f, "Up ({phase}): {address}"),
            ProgressEvent::Down {
                phase,
                address,
                reason,
            } => write!(f, "Down ({phase}): {address}: {reason}"),
            ProgressEvent::Status { address, status } => write!(f, "HTTP {address} {status}"),
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: &ProgressEvent<'_>);
}

pub type SharedSink = Arc<dyn ProgressSink>;

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl ProgressSink for NoopSink {
    fn emit(&self, _event: &ProgressEvent<'_>) {}
}

/// Forwards every event to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn emit(&self, event: &ProgressEvent<'_>) {
        match event.phase() {
            Some(phase) => tracing::debug!(phase = %phase, "{event}"),
            None => tracing::debug!("{event}"),
        }
    }
}

impl<F> ProgressSink for F
where
    F: Fn(&ProgressEvent<'_>) + Send + Sync,
{
    fn emit(&self, event: &ProgressEvent<'_>) {
        self(event)
    }
}

pub fn noop() -> SharedSink {
    Arc::new(NoopSink)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_event_lines() {
        let down = ProgressEvent::Down {
            phase: Phase::Tcp,
            address: "db:5432",
            reason: "connection refused",
        };
        assert_eq!(down.to_string(), "Down (tcp): db:5432: connection refused");

        let status = ProgressEvent::Status {
            address: "http://web:80",
            status: "503 Service Unavailable",
        };
        assert_eq!(status.phase(), Some(Phase::Http));
        assert_eq!(status.to_string(), "HTTP http://web:80 503 Service Unavailable");
    }

    #[test]
    fn test_closure_sink_receives_events() {
        let lines = Mutex::new(Vec::new());
        let sink = |event: &ProgressEvent<'_>| lines.lock().unwrap().push(event.to_string());

        sink.emit(&ProgressEvent::Up {
            phase: Phase::Tcp,
            address: "db:5432",
        });
        NoopSink.emit(&ProgressEvent::Up {
            phase: Phase::Tcp,
            address: "ignored:1",
        });

        assert_eq!(lines.into_inner().unwrap(), vec!["Up (tcp): db:5432".to_string()]);
    }
}
