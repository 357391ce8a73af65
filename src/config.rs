//! Layered configuration for the portal.
//!
//! Sources, highest priority first:
//! 1. Environment variables (`AAKKAI_*` prefix, `__` separates sections)
//! 2. `aakkai.toml` in the working directory
//! 3. `~/.config/aakkai/config.toml`
//! 4. Built-in defaults
//!
//! `AAKKAI_SUPABASE__URL` maps to `supabase.url`,
//! `AAKKAI_AUTH__ADMIN_EMAILS` to `auth.admin_emails` (comma separated or a
//! TOML array).

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    /// A value the process cannot start without.
    #[error("Missing required configuration '{0}' (set {1})")]
    Missing(&'static str, &'static str),

    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PortalConfig {
    #[serde(default)]
    pub supabase: SupabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Identity provider project credentials.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SupabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub anon_key: String,
    /// Seconds before a provider request is abandoned.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default, deserialize_with = "email_list")]
    pub admin_emails: Vec<String>,
    /// Where the provider sends the browser after OAuth sign-in.
    #[serde(default = "default_redirect")]
    pub redirect_to: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_emails: Vec::new(),
            redirect_to: default_redirect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// SQLite file; the platform data directory is used when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_redirect() -> String {
    "http://localhost:5173/dashboard".into()
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    3000
}

fn email_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Emails {
        Joined(String),
        List(Vec<String>),
    }

    let emails = match Emails::deserialize(deserializer)? {
        Emails::Joined(joined) => joined.split(',').map(str::to_string).collect(),
        Emails::List(list) => list,
    };
    Ok(emails
        .into_iter()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect())
}

impl PortalConfig {
    /// Loads `.env` and all configuration layers, then checks the values the
    /// process cannot start without.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let config: Self = Self::figment().extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from("aakkai.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("AAKKAI_").split("__"))
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("aakkai").join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.supabase.url.trim().is_empty() {
            return Err(ConfigError::Missing("supabase.url", "AAKKAI_SUPABASE__URL"));
        }
        if self.supabase.anon_key.trim().is_empty() {
            return Err(ConfigError::Missing("supabase.anon_key", "AAKKAI_SUPABASE__ANON_KEY"));
        }
        if !self.supabase.url.starts_with("http://") && !self.supabase.url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "supabase.url".into(),
                reason: format!("'{}' is not an http(s) URL", self.supabase.url),
            });
        }
        Ok(())
    }
}
