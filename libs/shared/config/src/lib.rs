use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

pub const DEFAULT_APPOINTMENTS_TABLE: &str = "Appointments";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Unknown STORE_BACKEND '{0}' (expected memory, redis or supabase)")]
    UnknownBackend(String),

    #[error("Invalid {name} value '{value}'")]
    InvalidValue { name: &'static str, value: String },

    #[error("STORE_BACKEND={backend} requires {variable} to be set")]
    MissingVariable { backend: StoreBackend, variable: &'static str },

    #[error("No record store configured: set SUPABASE_URL or REDIS_URL, or STORE_BACKEND=memory for local development")]
    NoBackendConfigured,
}

/// Which record store implementation backs the appointment table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Redis,
    Supabase,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory"),
            StoreBackend::Redis => write!(f, "redis"),
            StoreBackend::Supabase => write!(f, "supabase"),
        }
    }
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            "redis" => Ok(StoreBackend::Redis),
            "supabase" | "postgrest" => Ok(StoreBackend::Supabase),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub appointments_table: String,
    pub store_backend: StoreBackend,
    pub supabase_url: String,
    pub supabase_api_key: String,
    pub redis_url: Option<String>,
    pub host: IpAddr,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source. `from_env` passes
    /// the process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let appointments_table = non_empty("APPOINTMENTS_TABLE").unwrap_or_else(|| {
            warn!("APPOINTMENTS_TABLE not set, using default '{}'", DEFAULT_APPOINTMENTS_TABLE);
            DEFAULT_APPOINTMENTS_TABLE.to_string()
        });

        let supabase_url = non_empty("SUPABASE_URL").unwrap_or_default();
        let supabase_api_key = non_empty("SUPABASE_API_KEY").unwrap_or_default();
        let redis_url = non_empty("REDIS_URL");

        let store_backend = match non_empty("STORE_BACKEND") {
            Some(value) => value.parse()?,
            None if !supabase_url.is_empty() => StoreBackend::Supabase,
            None if redis_url.is_some() => StoreBackend::Redis,
            // The in-memory store is process-local; it is never picked implicitly.
            None => return Err(ConfigError::NoBackendConfigured),
        };

        let host = match non_empty("HOST") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                name: "HOST",
                value,
            })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port = match non_empty("PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                name: "PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let config = Self {
            appointments_table,
            store_backend,
            supabase_url,
            supabase_api_key,
            redis_url,
            host,
            port,
        };

        config.check_backend()?;
        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    fn check_backend(&self) -> Result<(), ConfigError> {
        match self.store_backend {
            StoreBackend::Supabase if self.supabase_url.is_empty() => {
                Err(ConfigError::MissingVariable {
                    backend: self.store_backend,
                    variable: "SUPABASE_URL",
                })
            }
            StoreBackend::Supabase => {
                if self.supabase_api_key.is_empty() {
                    warn!("SUPABASE_API_KEY not set, requests will be anonymous");
                }
                Ok(())
            }
            StoreBackend::Redis if self.redis_url.is_none() => Err(ConfigError::MissingVariable {
                backend: self.store_backend,
                variable: "REDIS_URL",
            }),
            StoreBackend::Redis => Ok(()),
            StoreBackend::Memory => {
                warn!("Using in-memory record store, appointments are local to this process");
                Ok(())
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            appointments_table: DEFAULT_APPOINTMENTS_TABLE.to_string(),
            store_backend: StoreBackend::Memory,
            supabase_url: String::new(),
            supabase_api_key: String::new(),
            redis_url: None,
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}
