use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use waitgate::config::model::{DEFAULT_RETRY_MILLIS, DEFAULT_TIMEOUT_SECONDS};
use waitgate::config::{AppConfig, ConnectionSpec, parse_headers};

#[derive(Debug, Parser)]
#[command(
    name = "waitgate",
    about = "Wait for TCP and HTTP(S) endpoints before running a command",
    version
)]
pub struct Cli {
    /// Address to wait for, e.g. `db:5432` or `http://web:8000/health`
    #[arg(short, long, env = "WAITGATE_ADDRESS")]
    pub address: Option<String>,

    /// Host to wait for (takes precedence over --address)
    #[arg(long, env = "WAITGATE_HOST")]
    pub host: Option<String>,

    /// Port to connect to together with --host
    #[arg(long, env = "WAITGATE_PORT")]
    pub port: Option<u16>,

    /// Protocol applied to --host/--port, e.g. `http`
    #[arg(long, env = "WAITGATE_PROTO")]
    pub proto: Option<String>,

    /// Seconds to wait for each phase of a target
    #[arg(short, long, env = "WAITGATE_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout: u64,

    /// Milliseconds between attempts
    #[arg(long, env = "WAITGATE_RETRY", default_value_t = DEFAULT_RETRY_MILLIS)]
    pub retry: u64,

    /// Exact HTTP status to wait for; otherwise any status below 500 is accepted
    #[arg(long, env = "WAITGATE_STATUS")]
    pub status: Option<u16>,

    /// Header sent with HTTP checks, as `Name: value` (repeatable). WAITGATE_HEADER
    /// takes several headers separated by newlines.
    #[arg(short = 'H', long = "header", env = "WAITGATE_HEADER", value_delimiter = '\n')]
    pub headers: Vec<String>,

    /// Skip TLS certificate validation for https targets
    #[arg(long, env = "WAITGATE_INSECURE")]
    pub insecure: bool,

    /// JSON or YAML file listing several targets (replaces the single-target flags)
    #[arg(short, long, env = "WAITGATE_FILE")]
    pub file: Option<PathBuf>,

    /// Print every connection attempt
    #[arg(long, env = "WAITGATE_DEBUG")]
    pub debug: bool,

    /// Command to run once every target is available
    #[arg(last = true)]
    pub command: Vec<String>,
}

impl Cli {
    pub fn into_app_config(self) -> Result<AppConfig> {
        let headers = parse_headers(&self.headers).map_err(anyhow::Error::msg)?;

        Ok(AppConfig {
            file: self.file,
            target: ConnectionSpec {
                host: self.host,
                port: self.port,
                protocol: self.proto,
                address: self.address,
                status: self.status,
                timeout: self.timeout,
                retry: self.retry,
                headers,
                insecure: self.insecure,
            },
            debug: self.debug,
            command: self.command,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_single_target_flags() {
        let cli = Cli::try_parse_from([
            "waitgate",
            "--address",
            "http://web:8000/health",
            "--timeout",
            "30",
            "--status",
            "204",
            "-H",
            "Authorization: Basic Zm9vOmJhcg==",
            "--insecure",
        ])
        .unwrap();

        let app = cli.into_app_config().unwrap();
        assert_eq!(app.target.address.as_deref(), Some("http://web:8000/health"));
        assert_eq!(app.target.timeout, 30);
        assert_eq!(app.target.retry, DEFAULT_RETRY_MILLIS);
        assert_eq!(app.target.status, Some(204));
        assert_eq!(app.target.headers["Authorization"], "Basic Zm9vOmJhcg==");
        assert!(app.target.insecure);
        assert!(app.command.is_empty());
    }

    #[test]
    fn test_trailing_command() {
        let cli = Cli::try_parse_from([
            "waitgate", "--host", "db", "--port", "5432", "--", "npm", "start", "--verbose",
        ])
        .unwrap();

        let app = cli.into_app_config().unwrap();
        assert_eq!(app.target.label(), "db:5432");
        assert_eq!(app.command, vec!["npm", "start", "--verbose"]);
    }

    #[test]
    fn test_newline_separates_headers() {
        let cli = Cli::try_parse_from([
            "waitgate",
            "-a",
            "web:80",
            "-H",
            "Authorization: Bearer abc\nX-Trace: a,b",
        ])
        .unwrap();
        assert_eq!(cli.headers.len(), 2);

        let app = cli.into_app_config().unwrap();
        assert_eq!(app.target.headers["Authorization"], "Bearer abc");
        assert_eq!(app.target.headers["X-Trace"], "a,b");
    }

    #[test]
    fn test_malformed_header_is_rejected() {
        let cli = Cli::try_parse_from(["waitgate", "-a", "web:80", "-H", "nonsense"]).unwrap();
        let err = cli.into_app_config().unwrap_err();
        assert!(err.to_string().contains("nonsense"));
    }
}
