use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop a target (or the whole batch) from being declared available.
#[derive(Debug, Error)]
pub enum WaitError {
    #[error("connection target is missing: neither host nor address was given")]
    SpecInvalid,

    #[error("could not parse address `{input}`: {reason}")]
    AddressParse { input: String, reason: String },

    #[error("address `{input}` resolved without a {missing}")]
    ResolutionIncomplete { input: String, missing: &'static str },

    #[error("{address} is not reachable over tcp")]
    TcpUnavailable {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{url} did not answer with an acceptable status: {reason}")]
    HttpUnavailable { url: String, reason: String },

    #[error("could not load config {}: {reason}", .path.display())]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("target {target}")]
    Target {
        target: String,
        #[source]
        source: Box<WaitError>,
    },
}

impl WaitError {
    pub(crate) fn for_target(self, target: impl Into<String>) -> Self {
        WaitError::Target {
            target: target.into(),
            source: Box::new(self),
        }
    }

    /// The error with any target wrapper peeled off.
    pub fn root(&self) -> &WaitError {
        match self {
            WaitError::Target { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, WaitError>;
