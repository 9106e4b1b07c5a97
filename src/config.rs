use std::{env, net::SocketAddr, path::PathBuf};
use thiserror::Error;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub enum Backend {
    /// Files on disk, records in process memory.
    Local { storage_path: PathBuf },
    Supabase(SupabaseConfig),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    pub bucket: String,
    pub table: String,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: Backend,
    pub static_dir: PathBuf,
    pub host: String,
    pub port: u16,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid STORAGE_TYPE {0:?}, expected \"local\" or \"supabase\"")]
    InvalidStorageType(String),
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} must be a number, got {value:?}")]
    NotANumber { name: &'static str, value: String },
    #[error("invalid listen address {0:?}")]
    InvalidAddr(String),
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let storage_type = var("STORAGE_TYPE").unwrap_or_else(|| "local".to_string());
        let backend = match storage_type.as_str() {
            "local" => Backend::Local {
                storage_path: var("STORAGE_PATH")
                    .unwrap_or_else(|| "./uploads".to_string())
                    .into(),
            },
            "supabase" => Backend::Supabase(SupabaseConfig {
                url: var("SUPABASE_URL").ok_or(ConfigError::Missing("SUPABASE_URL"))?,
                anon_key: var("SUPABASE_ANON_KEY").ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))?,
                bucket: var("SUPABASE_BUCKET").unwrap_or_else(|| "gallery".to_string()),
                table: var("SUPABASE_TABLE").unwrap_or_else(|| "gallery".to_string()),
                max_upload_bytes: match var("MAX_UPLOAD_BYTES") {
                    Some(value) => parse_number("MAX_UPLOAD_BYTES", value)?,
                    None => DEFAULT_MAX_UPLOAD_BYTES,
                },
            }),
            other => return Err(ConfigError::InvalidStorageType(other.to_string())),
        };

        let default_static = match backend {
            Backend::Local { .. } => ".",
            Backend::Supabase(_) => "public",
        };

        Ok(Self {
            backend,
            static_dir: var("STATIC_DIR")
                .unwrap_or_else(|| default_static.to_string())
                .into(),
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: match var("PORT") {
                Some(value) => parse_number("PORT", value)?,
                None => 3000,
            },
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::InvalidAddr(addr))
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::NotANumber { name, value })
}
