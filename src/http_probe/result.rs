use reqwest::StatusCode;

/// What a single HTTP attempt came back with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpAttempt {
    Response(StatusCode),
    Transport(String),
}

impl HttpAttempt {
    /// Exact match against `expected` when one is configured, otherwise anything
    /// short of a server error passes.
    pub fn is_accepted(&self, expected: Option<u16>) -> bool {
        match (self, expected) {
            (HttpAttempt::Response(status), Some(code)) => status.as_u16() == code,
            (HttpAttempt::Response(status), None) => {
                status.as_u16() < StatusCode::INTERNAL_SERVER_ERROR.as_u16()
            }
            (HttpAttempt::Transport(_), _) => false,
        }
    }

    /// Status line text such as `500 Internal Server Error`, or the transport error.
    pub fn describe(&self) -> String {
        match self {
            HttpAttempt::Response(status) => status.to_string(),
            HttpAttempt::Transport(reason) => reason.clone(),
        }
    }
}
