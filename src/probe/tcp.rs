use std::io;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::{Instant, sleep, timeout};

use super::{ProbePolicy, deadline_after};
use crate::connection::ConnectionDescriptor;
use crate::error::{Result, WaitError};
use crate::progress::{Phase, ProgressEvent, ProgressSink};

/// Upper bound for a single connect attempt so one hung dial cannot eat the budget.
pub const CONNECT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(1);

fn attempt_timeout(phase_timeout: Duration) -> Duration {
    if phase_timeout.is_zero() {
        CONNECT_ATTEMPT_TIMEOUT
    } else {
        CONNECT_ATTEMPT_TIMEOUT.min(phase_timeout)
    }
}

async fn connect_once(address: &str, connect_timeout: Duration) -> io::Result<()> {
    match timeout(connect_timeout, TcpStream::connect(address)).await {
        Ok(Ok(_stream)) => Ok(()),
        Ok(Err(err)) => Err(err),
        Err(_) => Err(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("tcp connect timed out after {connect_timeout:?}"),
        )),
    }
}

/// Dials `host:port` until a connection is accepted or the timeout elapses.
pub async fn ping_tcp(
    conn: &ConnectionDescriptor,
    policy: &ProbePolicy,
    sink: &dyn ProgressSink,
) -> Result<()> {
    let address = conn.dial_address();
    let connect_timeout = attempt_timeout(policy.timeout);
    let deadline = deadline_after(policy.timeout);

    sink.emit(&ProgressEvent::Dialing {
        phase: Phase::Tcp,
        address: &address,
    });

    loop {
        match connect_once(&address, connect_timeout).await {
            Ok(()) => {
                sink.emit(&ProgressEvent::Up {
                    phase: Phase::Tcp,
                    address: &address,
                });
                return Ok(());
            }
            Err(err) => {
                let reason = err.to_string();
                sink.emit(&ProgressEvent::Down {
                    phase: Phase::Tcp,
                    address: &address,
                    reason: &reason,
                });

                if Instant::now() > deadline {
                    return Err(WaitError::TcpUnavailable {
                        address,
                        source: err,
                    });
                }
            }
        }

        sleep(policy.retry).await;
    }
}
