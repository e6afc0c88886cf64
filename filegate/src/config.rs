//! Configuration management

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use filegate_storage::{handlers::DEFAULT_MAX_FORM_BYTES, UrlStrategy};

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub credentials: CredentialsConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Upload form size limit in bytes
    #[serde(default = "default_max_form_bytes")]
    pub max_form_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            max_form_bytes: default_max_form_bytes(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    S3,
    Ephemeral,
}

#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: Backend,

    #[serde(default = "default_bucket")]
    pub bucket: String,

    #[serde(default = "default_region")]
    pub region: String,

    /// Custom endpoint for S3-compatible providers
    #[serde(default)]
    pub endpoint_url: Option<String>,

    #[serde(default)]
    pub force_path_style: bool,

    #[serde(default)]
    pub list_all_pages: bool,

    #[serde(default)]
    pub url: UrlConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            bucket: default_bucket(),
            region: default_region(),
            endpoint_url: None,
            force_path_style: false,
            list_all_pages: false,
            url: UrlConfig::default(),
        }
    }
}

/// URL handed back after an upload
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum UrlConfig {
    Public,

    Presigned {
        #[serde(default = "default_presign_expiry_secs")]
        expires_secs: u64,
    },
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self::Presigned {
            expires_secs: default_presign_expiry_secs(),
        }
    }
}

impl UrlConfig {
    pub fn strategy(&self) -> UrlStrategy {
        match self {
            Self::Public => UrlStrategy::Public,
            Self::Presigned { expires_secs } => {
                UrlStrategy::presigned(Duration::from_secs(*expires_secs))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default = "default_credentials_path")]
    pub path: PathBuf,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            path: default_credentials_path(),
        }
    }
}

fn default_port() -> u16 {
    8080
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_max_form_bytes() -> usize {
    DEFAULT_MAX_FORM_BYTES
}

fn default_bucket() -> String {
    "sisdis".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_presign_expiry_secs() -> u64 {
    UrlStrategy::DEFAULT_PRESIGN_EXPIRY.as_secs()
}

fn default_credentials_path() -> PathBuf {
    PathBuf::from("./rootkey.csv")
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Without an explicit path, `filegate.toml` in the working directory is
    /// read if present. Environment variables use the `FILEGATE__` prefix and
    /// `__` between levels, e.g. `FILEGATE__STORAGE__BUCKET`.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("filegate").required(false),
        };

        let config = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("FILEGATE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize::<Config>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.max_form_bytes, 10 * 1024 * 1024);
        assert_eq!(config.storage.backend, Backend::S3);
        assert_eq!(config.storage.bucket, "sisdis");
        assert_eq!(config.storage.region, "us-east-1");
        assert!(!config.storage.list_all_pages);
        assert_eq!(config.credentials.path, PathBuf::from("./rootkey.csv"));
        assert_eq!(
            config.storage.url.strategy(),
            UrlStrategy::presigned(Duration::from_secs(15 * 60 * 60))
        );
    }

    #[test]
    fn test_load_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9000

[storage]
backend = "ephemeral"
bucket = "uploads"
list_all_pages = true

[storage.url]
strategy = "public"
"#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.backend, Backend::Ephemeral);
        assert_eq!(config.storage.bucket, "uploads");
        assert!(config.storage.list_all_pages);
        assert_eq!(config.storage.url.strategy(), UrlStrategy::Public);
    }

    #[test]
    fn test_presign_expiry_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[storage.url]
strategy = "presigned"
expires_secs = 900
"#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(
            config.storage.url.strategy(),
            UrlStrategy::presigned(Duration::from_secs(900))
        );
    }
}
