//! Server Configuration
//!
//! Everything the binary reads from the environment, parsed once at startup.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::AuthConfig;
use base64::Engine;
use base64::engine::general_purpose;
use platform::rate_limit::RateLimitConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Unset only in debug builds, which then fall back to in-memory stores
    pub database_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
    pub rate_limit: RateLimitConfig,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok(), cfg!(debug_assertions))
    }

    /// Build from an arbitrary variable source; `development` relaxes the
    /// secret and database requirements.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        development: bool,
    ) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL");
        if database_url.is_none() && !development {
            bail!("DATABASE_URL must be set in production");
        }

        let mut auth = match lookup("TOKEN_SECRET") {
            Some(encoded) => AuthConfig {
                token_secret: decode_secret(&encoded)?,
                ..AuthConfig::default()
            },
            None if development => AuthConfig::development(),
            None => bail!("TOKEN_SECRET must be set in production"),
        };
        if development {
            auth.cookie.secure = false;
        }
        if let Some(ttl) = lookup("TOKEN_TTL_SECS") {
            let secs: u64 = ttl.parse().context("TOKEN_TTL_SECS must be a whole number")?;
            if secs == 0 {
                bail!("TOKEN_TTL_SECS must be positive");
            }
            auth.token_ttl = Duration::from_secs(secs);
        }

        let mut rate_limit = RateLimitConfig::default();
        if let Some(burst) = lookup("RATE_LIMIT_BURST") {
            rate_limit.burst = burst.parse().context("RATE_LIMIT_BURST must be a whole number")?;
            if rate_limit.burst == 0 {
                bail!("RATE_LIMIT_BURST must be positive");
            }
        }
        if let Some(rate) = lookup("RATE_LIMIT_PER_SEC") {
            rate_limit.per_second = rate.parse().context("RATE_LIMIT_PER_SEC must be a number")?;
            if !rate_limit.per_second.is_finite() || rate_limit.per_second < 0.0 {
                bail!("RATE_LIMIT_PER_SEC must be a non-negative number");
            }
        }

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be host:port")?;

        let frontend_origins = lookup("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            database_url,
            bind_addr,
            frontend_origins,
            auth,
            rate_limit,
        })
    }
}

fn decode_secret(encoded: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = general_purpose::STANDARD
        .decode(encoded.trim())
        .context("TOKEN_SECRET must be base64")?;
    let secret: [u8; 32] = bytes
        .try_into()
        .map_err(|b: Vec<u8>| anyhow::anyhow!("TOKEN_SECRET must be 32 bytes, got {}", b.len()))?;
    if secret.iter().all(|b| *b == 0) {
        bail!("TOKEN_SECRET must not be all zeros");
    }
    Ok(secret)
}
