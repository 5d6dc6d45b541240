use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tokio::time::{Instant, sleep};

use super::report;
use super::result::HttpAttempt;
use crate::connection::{ConnectionDescriptor, Scheme};
use crate::error::{Result, WaitError};
use crate::probe::{ProbePolicy, deadline_after};
use crate::progress::{Phase, ProgressEvent, ProgressSink};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Floor for the per-request timeout so a zero phase budget still allows one request.
const MIN_REQUEST_TIMEOUT: Duration = Duration::from_secs(1);

fn header_map(headers: &HashMap<String, String>) -> std::result::Result<HeaderMap, String> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| format!("invalid header name `{name}`: {e}"))?;
        let value =
            HeaderValue::from_str(value).map_err(|e| format!("invalid value for header `{name}`: {e}"))?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Certificate checks are only ever skipped for https targets that asked for it.
fn accepts_invalid_certs(conn: &ConnectionDescriptor, policy: &ProbePolicy) -> bool {
    policy.insecure && conn.scheme == Scheme::Https
}

fn build_client(conn: &ConnectionDescriptor, policy: &ProbePolicy) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(policy.timeout.max(MIN_REQUEST_TIMEOUT))
        .danger_accept_invalid_certs(accepts_invalid_certs(conn, policy))
        .user_agent(USER_AGENT)
        .build()
}

async fn request_once(client: &Client, url: &str, headers: &HeaderMap) -> HttpAttempt {
    match client.get(url).headers(headers.clone()).send().await {
        Ok(resp) => HttpAttempt::Response(resp.status()),
        Err(err) => HttpAttempt::Transport(report(&err)),
    }
}

/// Requests the target URL until it answers with an acceptable status or the
/// timeout elapses. Runs after the TCP phase with a budget of its own.
pub async fn ping_http(
    conn: &ConnectionDescriptor,
    policy: &ProbePolicy,
    sink: &dyn ProgressSink,
) -> Result<()> {
    let url = conn.http_url().unwrap_or_else(|| conn.to_string());
    let unavailable = |reason: String| WaitError::HttpUnavailable {
        url: url.clone(),
        reason,
    };

    let headers = header_map(&policy.headers).map_err(unavailable)?;
    let client = build_client(conn, policy).map_err(|e| unavailable(report(&e)))?;
    let deadline = deadline_after(policy.timeout);

    sink.emit(&ProgressEvent::Dialing {
        phase: Phase::Http,
        address: &url,
    });

    loop {
        let attempt = request_once(&client, &url, &headers).await;
        let description = attempt.describe();

        if let HttpAttempt::Response(_) = attempt {
            sink.emit(&ProgressEvent::Status {
                address: &url,
                status: &description,
            });
        }

        if attempt.is_accepted(policy.expected_status) {
            sink.emit(&ProgressEvent::Up {
                phase: Phase::Http,
                address: &url,
            });
            return Ok(());
        }

        sink.emit(&ProgressEvent::Down {
            phase: Phase::Http,
            address: &url,
            reason: &description,
        });

        if Instant::now() > deadline {
            return Err(unavailable(description));
        }

        sleep(policy.retry).await;
    }
}
