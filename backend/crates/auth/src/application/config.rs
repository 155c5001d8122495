//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use chrono::TimeDelta;
use platform::cookie::CookieConfig;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret key for HMAC signing (32 bytes)
    pub token_secret: [u8; 32],
    /// Lifetime of an issued credential
    pub token_ttl: Duration,
    /// Credential cookie attributes
    pub cookie: CookieConfig,
    /// Landing path for admins after login
    pub admin_landing: String,
    /// Landing path for everyone else
    pub user_landing: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: [0u8; 32],
            token_ttl: Duration::from_secs(5 * 60), // 5 minutes
            cookie: CookieConfig::default(),
            admin_landing: "/admin".to_string(),
            user_landing: "/user".to_string(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random token secret (for development)
    pub fn with_random_secret() -> Self {
        Self {
            token_secret: platform::crypto::random_secret(),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        let mut config = Self::with_random_secret();
        config.cookie.secure = false;
        config
    }

    /// Token TTL as a chrono delta for claim arithmetic
    pub fn token_ttl_delta(&self) -> TimeDelta {
        TimeDelta::from_std(self.token_ttl).unwrap_or(TimeDelta::MAX)
    }

    /// Whether a usable signing secret is configured
    pub fn has_secret(&self) -> bool {
        self.token_secret.iter().any(|b| *b != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_secret() {
        let config = AuthConfig::default();
        assert!(!config.has_secret());
        assert_eq!(config.token_ttl_delta(), TimeDelta::minutes(5));
    }

    #[test]
    fn test_development_config() {
        let config = AuthConfig::development();
        assert!(config.has_secret());
        assert!(!config.cookie.secure);
        assert_eq!(config.cookie.name, "token");
    }
}
