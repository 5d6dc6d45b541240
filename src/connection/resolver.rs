use std::net::Ipv6Addr;

use url::{Host, Url};

use super::descriptor::{ConnectionDescriptor, NetworkKind, Scheme};
use crate::config::model::{ConnectionSpec, non_empty};
use crate::error::{Result, WaitError};

/// Scheme prepended when an address cannot be read as a URL on its own.
const FALLBACK_SCHEME: &str = "tcp";

/// Result of reading an address as written, before any fallback is attempted.
#[derive(Debug)]
pub enum ParseOutcome {
    /// The address is a URL with a host.
    Parsed(Url),
    /// Not a usable URL as written; `host:port` strings land here because they
    /// read as `scheme:opaque-path`.
    NeedsFallback,
    /// The address claims a scheme (`scheme://`) and still does not parse.
    Invalid(url::ParseError),
}

/// First stage of address parsing.
pub fn parse_stage(input: &str) -> ParseOutcome {
    match Url::parse(input) {
        Ok(url) if has_host(&url) => ParseOutcome::Parsed(url),
        Ok(_) => ParseOutcome::NeedsFallback,
        Err(err) if has_explicit_scheme(input) => ParseOutcome::Invalid(err),
        Err(_) => ParseOutcome::NeedsFallback,
    }
}

/// True when the address starts with `scheme://`. A `://` further in, e.g. inside a
/// query string, does not count.
fn has_explicit_scheme(input: &str) -> bool {
    input.split_once("://").is_some_and(|(scheme, _)| {
        let mut chars = scheme.chars();
        chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

fn has_host(url: &Url) -> bool {
    url.host_str().is_some_and(|h| !h.is_empty())
}

/// Parses an address, retrying with `tcp://` in front when the first stage asks for it.
/// The returned flag tells whether the fallback scheme was injected.
fn parse_with_fallback(input: &str) -> Result<(Url, bool)> {
    let parse_error = |err: url::ParseError| WaitError::AddressParse {
        input: input.to_string(),
        reason: err.to_string(),
    };

    match parse_stage(input) {
        ParseOutcome::Parsed(url) => Ok((url, false)),
        ParseOutcome::Invalid(err) => Err(parse_error(err)),
        ParseOutcome::NeedsFallback => {
            let url = Url::parse(&format!("{FALLBACK_SCHEME}://{input}")).map_err(parse_error)?;
            if !has_host(&url) {
                return Err(WaitError::ResolutionIncomplete {
                    input: input.to_string(),
                    missing: "host",
                });
            }
            Ok((url, true))
        }
    }
}

fn valid_domain(domain: &str) -> bool {
    domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'))
}

/// Resolves one spec into the descriptor the probers dial.
pub fn resolve(spec: &ConnectionSpec) -> Result<ConnectionDescriptor> {
    if let Some(host) = non_empty(&spec.host) {
        return resolve_host(host, spec.port, non_empty(&spec.protocol));
    }

    match non_empty(&spec.address) {
        Some(address) => resolve_address(address),
        None => Err(WaitError::SpecInvalid),
    }
}

fn resolve_host(host: &str, port: Option<u16>, protocol: Option<&str>) -> Result<ConnectionDescriptor> {
    let host = bracket_ipv6(host);
    let port = port.filter(|p| *p != 0);

    if let Some(protocol) = protocol {
        let address = match port {
            Some(port) => format!("{protocol}://{host}:{port}"),
            None => format!("{protocol}://{host}"),
        };
        return resolve_address(&address);
    }

    match port {
        Some(port) => Ok(ConnectionDescriptor::tcp(host, port)),
        None => Err(WaitError::ResolutionIncomplete {
            input: host,
            missing: "port",
        }),
    }
}

fn bracket_ipv6(host: &str) -> String {
    match host.parse::<Ipv6Addr>() {
        Ok(_) => format!("[{host}]"),
        Err(_) => host.to_string(),
    }
}

/// Resolves a free-form address string, applying default port and scheme inference.
pub fn resolve_address(address: &str) -> Result<ConnectionDescriptor> {
    let (url, used_fallback) = parse_with_fallback(address)?;

    let host = match url.host() {
        Some(Host::Domain(domain)) if !valid_domain(domain) => {
            return Err(WaitError::AddressParse {
                input: address.to_string(),
                reason: format!("invalid host `{domain}`"),
            });
        }
        Some(_) => url.host_str().unwrap_or_default().to_string(),
        None => String::new(),
    };
    if host.is_empty() {
        return Err(WaitError::ResolutionIncomplete {
            input: address.to_string(),
            missing: "host",
        });
    }

    let mut scheme = Scheme::from_token(url.scheme());
    let port = url
        .port()
        .filter(|p| *p != 0)
        .or_else(|| scheme.default_port())
        .ok_or_else(|| WaitError::ResolutionIncomplete {
            input: address.to_string(),
            missing: "port",
        })?;

    // An explicit tcp:// keeps the target TCP-only; a scheme-less address may still
    // become http(s) through its port.
    let explicit_tcp = !used_fallback && url.scheme().eq_ignore_ascii_case(FALLBACK_SCHEME);
    if scheme == Scheme::None && !explicit_tcp {
        scheme = Scheme::from_port(port);
    }

    let mut path = match url.path() {
        "/" => String::new(),
        p => p.to_string(),
    };
    if let Some(query) = url.query() {
        if path.is_empty() {
            path.push('/');
        }
        path.push('?');
        path.push_str(query);
    }

    Ok(ConnectionDescriptor {
        network_kind: NetworkKind::Tcp,
        scheme,
        host,
        port,
        path,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn address(input: &str) -> Result<ConnectionDescriptor> {
        resolve(&ConnectionSpec::from_address(input))
    }

    #[test]
    fn test_host_and_port_bypass_inference() {
        for (host, port) in [("localhost", 80), ("localhost", 90), ("10.0.0.7", 443), ("db", 5432)] {
            let desc = resolve(&ConnectionSpec::from_host_port(host, port)).expect("resolves");
            assert_eq!(desc, ConnectionDescriptor::tcp(host, port));
            assert_eq!(desc.network_kind.as_str(), "tcp");
        }
    }

    #[test]
    fn test_host_wins_over_address() {
        let mut spec = ConnectionSpec::from_host_port("localhost", 90);
        spec.address = Some("tcp://remotehost:10".to_string());
        assert_eq!(resolve(&spec).unwrap(), ConnectionDescriptor::tcp("localhost", 90));
    }

    #[test]
    fn test_protocol_hint_goes_through_inference() {
        let mut spec = ConnectionSpec::from_host_port("localhost", 0);
        spec.protocol = Some("https".to_string());
        let desc = resolve(&spec).unwrap();
        assert_eq!(desc.scheme, Scheme::Https);
        assert_eq!(desc.port, 443);

        spec.port = Some(8080);
        spec.protocol = Some("http".to_string());
        assert_eq!(
            resolve(&spec).unwrap().http_url().as_deref(),
            Some("http://localhost:8080")
        );
    }

    #[test]
    fn test_bare_ipv6_host_is_bracketed() {
        let desc = resolve(&ConnectionSpec::from_host_port("::1", 9000)).unwrap();
        assert_eq!(desc.host, "[::1]");
        assert_eq!(desc.dial_address(), "[::1]:9000");
    }

    #[test]
    fn test_host_without_port_is_incomplete() {
        let spec = ConnectionSpec {
            host: Some("db".to_string()),
            ..ConnectionSpec::default()
        };
        assert!(matches!(
            resolve(&spec),
            Err(WaitError::ResolutionIncomplete { missing: "port", .. })
        ));
    }

    #[test]
    fn test_explicit_tcp_address() {
        assert_eq!(
            address("tcp://remotehost:10").unwrap(),
            ConnectionDescriptor::tcp("remotehost", 10)
        );
        // tcp:// on port 80 stays a plain socket check
        assert_eq!(address("tcp://web:80").unwrap().scheme, Scheme::None);
    }

    #[test]
    fn test_default_ports_from_scheme() {
        let http = address("http://localhost").unwrap();
        assert_eq!((http.scheme.clone(), http.host.as_str(), http.port), (Scheme::Http, "localhost", 80));

        let https = address("https://localhost").unwrap();
        assert_eq!((https.scheme, https.port), (Scheme::Https, 443));

        assert_eq!(address("https://localhost:444").unwrap().port, 444);
        assert_eq!(address("http://localhost:0").unwrap().port, 80);
        assert_eq!(address("ssh://bastion").unwrap().port, 22);
    }

    #[test]
    fn test_default_scheme_from_port() {
        assert_eq!(address("localhost:80").unwrap().scheme, Scheme::Http);
        assert_eq!(address("localhost:443").unwrap().scheme, Scheme::Https);
        assert_eq!(address("localhost:8080").unwrap().scheme, Scheme::None);
    }

    #[test]
    fn test_scheme_less_address_uses_fallback() {
        assert!(matches!(parse_stage("host:1234/path"), ParseOutcome::NeedsFallback));

        let desc = address("host:1234/path").unwrap();
        assert_eq!(desc.scheme, Scheme::None);
        assert_eq!(desc.host, "host");
        assert_eq!(desc.port, 1234);
        assert_eq!(desc.path, "/path");
    }

    #[test]
    fn test_path_and_query_are_preserved() {
        assert_eq!(address("https://localhost/cars").unwrap().path, "/cars");
        assert_eq!(address("http://localhost/").unwrap().path, "");
        assert_eq!(
            address("http://localhost:8080/health?deep=true").unwrap().path,
            "/health?deep=true"
        );
    }

    #[test]
    fn test_ipv6_address_round_trips() {
        let desc = address("http://[::1]:8080/x").unwrap();
        assert_eq!(desc.host, "[::1]");
        assert_eq!(desc.dial_address(), "[::1]:8080");
        assert_eq!(desc.http_url().as_deref(), Some("http://[::1]:8080/x"));
    }

    #[test]
    fn test_other_schemes_are_tcp_only() {
        let desc = address("redis://cache:6379").unwrap();
        assert_eq!(desc.scheme, Scheme::Other("redis".to_string()));
        assert!(!desc.needs_http_check());
    }

    #[test]
    fn test_missing_target_is_invalid() {
        assert!(matches!(resolve(&ConnectionSpec::default()), Err(WaitError::SpecInvalid)));
        assert!(matches!(address("   "), Err(WaitError::SpecInvalid)));
    }

    #[test]
    fn test_malformed_addresses_never_resolve() {
        for input in [":/localhost;80", "http:/localhost;8081", "http://", "tcp://:80"] {
            let result = address(input);
            assert!(result.is_err(), "{input} resolved to {result:?}");
        }
    }

    #[test]
    fn test_host_only_address_needs_a_port() {
        let err = address("myhost").unwrap_err();
        assert!(matches!(err, WaitError::ResolutionIncomplete { missing: "port", .. }));
        assert!(err.to_string().contains("myhost"));
    }

    #[test]
    fn test_url_inside_query_does_not_block_fallback() {
        assert!(!has_explicit_scheme("127.0.0.1:8080/cb?next=http://x"));
        assert!(has_explicit_scheme("http://exa mple.com"));

        let desc = address("127.0.0.1:8080/cb?next=http://x").unwrap();
        assert_eq!(desc.scheme, Scheme::None);
        assert_eq!(desc.host, "127.0.0.1");
        assert_eq!(desc.port, 8080);
        assert_eq!(desc.path, "/cb?next=http://x");
    }

    #[test]
    fn test_broken_url_with_scheme_is_invalid() {
        assert!(matches!(parse_stage("http://exa mple.com"), ParseOutcome::Invalid(_)));
        assert!(matches!(
            address("http://exa mple.com"),
            Err(WaitError::AddressParse { .. })
        ));
    }
}
