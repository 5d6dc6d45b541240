use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_RETRY_MILLIS: u64 = 500;

/// One target to wait for, as written in a batch file or assembled from CLI flags.
/// Either `host` (plus `port` or `protocol`) or `address` names the target; when
/// both are present the host wins.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSpec {
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default)]
    pub port: Option<u16>,

    /// Scheme hint applied to `host:port`, e.g. `http`.
    #[serde(default, alias = "proto")]
    pub protocol: Option<String>,

    /// Free-form address: a full URL or a scheme-less `host:port/path`.
    #[serde(default, alias = "connectionString")]
    pub address: Option<String>,

    /// Exact HTTP status to wait for. Without it any status below 500 passes.
    #[serde(default)]
    pub status: Option<u16>,

    /// Per-phase budget in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Pause between attempts in milliseconds.
    #[serde(default = "default_retry")]
    pub retry: u64,

    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Skip certificate validation for https targets.
    #[serde(default)]
    pub insecure: bool,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_retry() -> u64 {
    DEFAULT_RETRY_MILLIS
}

impl Default for ConnectionSpec {
    fn default() -> Self {
        Self {
            host: None,
            port: None,
            protocol: None,
            address: None,
            status: None,
            timeout: DEFAULT_TIMEOUT_SECONDS,
            retry: DEFAULT_RETRY_MILLIS,
            headers: HashMap::new(),
            insecure: false,
        }
    }
}

impl ConnectionSpec {
    pub fn from_address(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            ..Self::default()
        }
    }

    pub fn from_host_port(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: Some(host.into()),
            port: Some(port),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry)
    }

    /// Short human-readable name used in progress output and error messages.
    pub fn label(&self) -> String {
        match (non_empty(&self.host), non_empty(&self.address)) {
            (Some(host), _) => match self.port {
                Some(port) => format!("{host}:{port}"),
                None => host.to_string(),
            },
            (None, Some(address)) => address.to_string(),
            (None, None) => "<unnamed>".to_string(),
        }
    }
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Top-level shape of a batch file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(alias = "Configs")]
    pub configs: Vec<ConnectionSpec>,
}
