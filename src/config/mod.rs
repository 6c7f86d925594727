use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration, built once in `main` and passed into the
/// application state. There is no ambient config singleton; everything that
/// needs a setting receives it explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Key material used to verify inbound identity assertions.
    pub assertion_secret: String,
    /// Expected `iss` claim on identity assertions; unchecked when unset.
    pub assertion_issuer: Option<String>,
    /// The single configured platform operator.
    pub super_admin_email: String,
    /// PIN assigned to newly provisioned tenants; only the bcrypt hash is kept.
    pub default_admin_pin: String,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Idle lifetime of a PIN-elevated admin session, in seconds.
    pub unlock_ttl_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("ATTEND_API_PORT").or_else(|_| env::var("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Security overrides
        if let Ok(v) = env::var("AUTH_ASSERTION_SECRET") {
            self.security.assertion_secret = v;
        }
        if let Ok(v) = env::var("AUTH_ASSERTION_ISSUER") {
            self.security.assertion_issuer = Some(v);
        }
        if let Ok(v) = env::var("SUPER_ADMIN_EMAIL") {
            self.security.super_admin_email = v;
        }
        if let Ok(v) = env::var("DEFAULT_ADMIN_PIN") {
            self.security.default_admin_pin = v;
        }
        if let Ok(v) = env::var("BCRYPT_COST") {
            self.security.bcrypt_cost = v.parse().unwrap_or(self.security.bcrypt_cost);
        }

        // Session overrides
        if let Ok(v) = env::var("SESSION_UNLOCK_TTL_SECS") {
            self.session.unlock_ttl_secs = v.parse().unwrap_or(self.session.unlock_ttl_secs);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 3000 },
            security: SecurityConfig {
                assertion_secret: "dev-assertion-secret".to_string(),
                assertion_issuer: None,
                super_admin_email: "root@localhost".to_string(),
                default_admin_pin: "123456".to_string(),
                // Low cost keeps tenant provisioning fast during development
                bcrypt_cost: 4,
            },
            session: SessionConfig {
                unlock_ttl_secs: 30 * 60,
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 3000 },
            security: SecurityConfig {
                assertion_secret: String::new(),
                assertion_issuer: None,
                super_admin_email: String::new(),
                default_admin_pin: "123456".to_string(),
                bcrypt_cost: bcrypt::DEFAULT_COST,
            },
            session: SessionConfig {
                unlock_ttl_secs: 15 * 60,
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 3000 },
            security: SecurityConfig {
                // Must come from the environment; empty secrets reject all assertions
                assertion_secret: String::new(),
                assertion_issuer: None,
                super_admin_email: String::new(),
                default_admin_pin: "123456".to_string(),
                bcrypt_cost: bcrypt::DEFAULT_COST,
            },
            session: SessionConfig {
                unlock_ttl_secs: 5 * 60,
            },
        }
    }
}
