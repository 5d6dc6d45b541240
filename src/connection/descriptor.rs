use std::fmt;

/// Transport used for the reachability phase. Every supported target is dialed over TCP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetworkKind {
    #[default]
    Tcp,
}

impl NetworkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkKind::Tcp => "tcp",
        }
    }
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application scheme of a target. Only `Http` and `Https` enable the HTTP phase;
/// any other token is carried along but only the TCP check runs for it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Scheme {
    #[default]
    None,
    Http,
    Https,
    Other(String),
}

impl Scheme {
    /// Maps a parsed URL scheme token. `tcp` names the transport, not an application
    /// protocol, so it collapses to `None`.
    pub fn from_token(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "" | "tcp" => Scheme::None,
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            other => Scheme::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Scheme::None => "",
            Scheme::Http => "http",
            Scheme::Https => "https",
            Scheme::Other(token) => token,
        }
    }

    pub fn is_http(&self) -> bool {
        matches!(self, Scheme::Http | Scheme::Https)
    }

    /// Well-known port for the scheme, used when the address leaves the port out.
    pub fn default_port(&self) -> Option<u16> {
        match self {
            Scheme::Http => Some(80),
            Scheme::Https => Some(443),
            Scheme::Other(token) if token == "ssh" => Some(22),
            _ => None,
        }
    }

    /// Scheme implied by a well-known port when the address carried none.
    pub fn from_port(port: u16) -> Self {
        match port {
            80 => Scheme::Http,
            443 => Scheme::Https,
            _ => Scheme::None,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved target. Built once by the resolver and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    pub network_kind: NetworkKind,
    pub scheme: Scheme,
    /// Hostname or IP literal; IPv6 literals keep their brackets.
    pub host: String,
    pub port: u16,
    /// Path plus query, empty when the address had none.
    pub path: String,
}

impl ConnectionDescriptor {
    pub fn tcp(host: impl Into<String>, port: u16) -> Self {
        Self {
            network_kind: NetworkKind::Tcp,
            scheme: Scheme::None,
            host: host.into(),
            port,
            path: String::new(),
        }
    }

    /// `host:port` as handed to the TCP dialer.
    pub fn dial_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The URL requested during the HTTP phase, `None` for TCP-only targets.
    pub fn http_url(&self) -> Option<String> {
        self.scheme.is_http().then(|| {
            format!(
                "{}://{}:{}{}",
                self.scheme, self.host, self.port, self.path
            )
        })
    }

    pub fn needs_http_check(&self) -> bool {
        self.scheme.is_http()
    }
}

impl fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.http_url() {
            Some(url) => f.write_str(&url),
            None => write!(f, "{}://{}", self.network_kind, self.dial_address()),
        }
    }
}
