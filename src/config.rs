//! Server Configuration
//!
//! Typed configuration read once at startup. [`Cli`] parses command-line
//! flags, each backed by an environment variable, and converts into the
//! [`ServerConfig`] the rest of the server consumes.

use std::fmt;
use std::time::Duration;

use clap::builder::FalseyValueParser;
use clap::{Parser, ValueEnum};

/// Provider environment selecting the base host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Environment {
    #[default]
    Test,
    #[value(alias = "prod")]
    Production,
}

impl Environment {
    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Test => "https://test.api.amadeus.com",
            Environment::Production => "https://api.amadeus.com",
        }
    }
}

/// What to do when no provider credentials are configured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialPolicy {
    /// Serve deterministic mock records
    #[default]
    Mock,
    /// Refuse to build the service
    Fail,
}

/// Provider client credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Command-line interface; every flag falls back to its environment variable
#[derive(Parser, Debug, Clone)]
#[command(name = "amadeus-mcp")]
#[command(about = "MCP server exposing Amadeus travel search tools")]
#[command(version)]
pub struct Cli {
    /// Provider API key
    #[arg(long, env = "AMADEUS_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Provider API secret
    #[arg(long, env = "AMADEUS_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Provider environment
    #[arg(long, env = "AMADEUS_ENVIRONMENT", value_enum, ignore_case = true)]
    pub environment: Option<Environment>,

    /// Legacy selector; `production` picks the live host when --environment is unset
    #[arg(long, env = "NODE_ENV", hide = true)]
    pub node_env: Option<String>,

    /// Override the provider base URL, path prefix included
    #[arg(long, env = "AMADEUS_BASE_URL")]
    pub base_url: Option<String>,

    /// Fail at startup instead of serving mock data when credentials are missing
    #[arg(long, env = "AMADEUS_REQUIRE_CREDENTIALS", value_parser = FalseyValueParser::new())]
    pub require_credentials: bool,

    /// Serve the HTTP transport instead of stdio
    #[arg(long, env = "MCP_HTTP", value_parser = FalseyValueParser::new())]
    pub http: bool,

    #[arg(long, env = "MCP_BIND_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Seconds an idle HTTP session survives
    #[arg(long, env = "MCP_SESSION_TIMEOUT", default_value_t = 30 * 60)]
    pub session_timeout: u64,

    /// Tracing filter directive
    #[arg(long = "log", env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,
}

/// Options for the HTTP transport
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Serve HTTP instead of stdio
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    /// Sessions idle for longer than this are dropped
    pub session_timeout: Duration,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            host: "127.0.0.1".to_string(),
            port: 3000,
            session_timeout: Duration::from_secs(30 * 60),
        }
    }
}

impl HttpOptions {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    pub credentials: Option<Credentials>,
    pub environment: Environment,
    /// Overrides the environment's base host
    pub base_url: Option<String>,
    pub credential_policy: CredentialPolicy,
    pub http: HttpOptions,
    pub log_filter: String,
}

impl From<Cli> for ServerConfig {
    fn from(cli: Cli) -> Self {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let credentials = match (non_empty(cli.client_id), non_empty(cli.client_secret)) {
            (Some(client_id), Some(client_secret)) => Some(Credentials {
                client_id,
                client_secret,
            }),
            _ => None,
        };

        // NODE_ENV=production selected the live host in earlier deployments
        let environment = match cli.environment {
            Some(environment) => environment,
            None if cli.node_env.as_deref().map(str::trim) == Some("production") => {
                Environment::Production
            }
            None => Environment::Test,
        };

        let credential_policy = if cli.require_credentials {
            CredentialPolicy::Fail
        } else {
            CredentialPolicy::Mock
        };

        Self {
            credentials,
            environment,
            base_url: non_empty(cli.base_url),
            credential_policy,
            http: HttpOptions {
                enabled: cli.http,
                host: cli.host,
                port: cli.port,
                session_timeout: Duration::from_secs(cli.session_timeout),
            },
            log_filter: cli.log_filter,
        }
    }
}

impl ServerConfig {
    /// Base URL every provider path is joined onto
    pub fn provider_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
    }

    pub fn with_credentials(mut self, client_id: &str, client_secret: &str) -> Self {
        self.credentials = Some(Credentials {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        });
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.to_string());
        self
    }

    pub fn with_credential_policy(mut self, policy: CredentialPolicy) -> Self {
        self.credential_policy = policy;
        self
    }
}
