/*
 * Responsibility
 * - Load environment variables and settings (DATABASE_URL, CORS allowlist, auth settings)
 * - Validate values up front (missing or invalid -> startup fails)
 * - Build the explicit AuthConfig handed to the token verifier
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings consumed by the token verifier.
///
/// Built once at startup and passed in explicitly; nothing in the auth path
/// reads the environment on its own.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Trusted issuer domain, e.g. `example.eu.auth0.com`.
    pub domain: String,
    pub algorithms: Vec<Algorithm>,
    pub audience: String,
    pub leeway_seconds: u64,
    pub jwks_timeout: Duration,
}

impl AuthConfig {
    pub fn new(
        domain: impl Into<String>,
        algorithms: Vec<Algorithm>,
        audience: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let domain = domain.into().trim().trim_end_matches('/').to_string();
        if domain.is_empty() || domain.contains("://") {
            return Err(ConfigError::Invalid("AUTH0_DOMAIN"));
        }
        // JWK records carry RSA modulus/exponent only.
        if algorithms.is_empty() || !algorithms.iter().all(is_rsa_family) {
            return Err(ConfigError::Invalid("ALGORITHMS"));
        }

        let config = Self {
            domain,
            algorithms,
            audience: audience.into(),
            leeway_seconds: 0,
            jwks_timeout: Duration::from_secs(5),
        };
        config.jwks_url()?;

        Ok(config)
    }

    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    pub fn with_jwks_timeout(mut self, timeout: Duration) -> Self {
        self.jwks_timeout = timeout;
        self
    }

    /// Expected `iss` claim: `https://{domain}/`.
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.domain)
    }

    pub fn jwks_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.issuer())
            .and_then(|base| base.join(".well-known/jwks.json"))
            .map_err(|_| ConfigError::Invalid("AUTH0_DOMAIN"))
    }
}

fn is_rsa_family(alg: &Algorithm) -> bool {
    matches!(
        alg,
        Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512
    )
}

pub fn parse_algorithms(raw: &str) -> Result<Vec<Algorithm>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Algorithm::from_str(s).map_err(|_| ConfigError::Invalid("ALGORITHMS")))
        .collect()
}

/// Optional numeric setting: unset or blank gives `default`, anything unparseable
/// is `ConfigError::Invalid(key)`.
fn parse_or<T: FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid(key)),
    }
}

pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,
    pub database_max_connections: u32,
    pub reset_db_on_start: bool,

    pub cors_allowed_origins: Vec<String>,

    pub auth: AuthConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = parse_or("PORT", std::env::var("PORT").ok(), 3000)?;

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let database_max_connections: u32 = parse_or(
            "DATABASE_MAX_CONNECTIONS",
            std::env::var("DATABASE_MAX_CONNECTIONS").ok(),
            5,
        )?;
        if database_max_connections == 0 {
            return Err(ConfigError::Invalid("DATABASE_MAX_CONNECTIONS"));
        }

        let reset_db_on_start = std::env::var("RESET_DB_ON_START")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let domain =
            std::env::var("AUTH0_DOMAIN").map_err(|_| ConfigError::Missing("AUTH0_DOMAIN"))?;

        let algorithms = std::env::var("ALGORITHMS")
            .map_err(|_| ConfigError::Missing("ALGORITHMS"))
            .and_then(|raw| parse_algorithms(&raw))?;

        let audience =
            std::env::var("API_AUDIENCE").map_err(|_| ConfigError::Missing("API_AUDIENCE"))?;

        let leeway_seconds: u64 = parse_or(
            "ACCESS_TOKEN_LEEWAY_SECONDS",
            std::env::var("ACCESS_TOKEN_LEEWAY_SECONDS").ok(),
            0,
        )?;

        let jwks_timeout_seconds: u64 = parse_or(
            "JWKS_TIMEOUT_SECONDS",
            std::env::var("JWKS_TIMEOUT_SECONDS").ok(),
            5,
        )?;
        if jwks_timeout_seconds == 0 {
            return Err(ConfigError::Invalid("JWKS_TIMEOUT_SECONDS"));
        }

        let auth = AuthConfig::new(domain, algorithms, audience)?
            .with_leeway(leeway_seconds)
            .with_jwks_timeout(Duration::from_secs(jwks_timeout_seconds));

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            reset_db_on_start,
            cors_allowed_origins,
            auth,
        })
    }
}
