//! Waits for TCP and HTTP(S) endpoints to become available.
//!
//! Targets are described by [`ConnectionSpec`]s, resolved into
//! [`ConnectionDescriptor`]s and probed concurrently by the [`coordinator`]. The
//! result is a single verdict for the whole batch.

pub mod config;
pub mod connection;
pub mod coordinator;
pub mod error;
pub mod http_probe;
pub mod probe;
pub mod progress;

pub use config::{AppConfig, ConnectionSpec, FileConfig};
pub use connection::{ConnectionDescriptor, Scheme, resolve};
pub use coordinator::dial_configs;
pub use error::WaitError;
pub use probe::{ProbePolicy, dial_conn};

pub mod prelude {
    pub use crate::config::model::ConnectionSpec;
    pub use crate::connection::{ConnectionDescriptor, NetworkKind, Scheme};
    pub use crate::error::{Result, WaitError};
    pub use crate::http_probe::result::HttpAttempt;
    pub use crate::probe::ProbePolicy;
    pub use crate::progress::{NoopSink, Phase, ProgressEvent, ProgressSink, TracingSink};
}
