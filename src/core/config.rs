use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::errors::UtilError;

/// S3 multipart minimum, also the default form-size cap.
pub const DEFAULT_PART_SIZE: u64 = 5 * 1024 * 1024;
pub const DEFAULT_ENCRYPTION_ALGORITHM: &str = "AES256";
pub const DEFAULT_PORT: u16 = 8080;

/// Deployment class controlling resource naming.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    Uat,
    Prod,
    #[default]
    Dev,
}

impl Environment {
    /// Maps an environment tag onto its class. Only the exact tags `UAT` and
    /// `PROD` are recognised; every other value, empty included, is `Dev`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "UAT" => Environment::Uat,
            "PROD" => Environment::Prod,
            _ => Environment::Dev,
        }
    }

    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Environment::Uat => "uat-",
            Environment::Prod => "prod-",
            Environment::Dev => "dev-",
        }
    }

    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Environment::Uat => "UAT",
            Environment::Prod => "PROD",
            Environment::Dev => "DEV",
        }
    }
}

/// Bucket and encryption parameters for the object storage client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub region: String,
    /// Customer-supplied encryption key. Empty means "not provisioned".
    pub key: String,
    pub download_location: PathBuf,
    pub bucket: String,
    pub encryption_algorithm: String,
    /// Multipart part size in bytes; also caps incoming upload bodies.
    pub part_size: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            region: String::new(),
            key: String::new(),
            download_location: env::temp_dir(),
            bucket: String::new(),
            encryption_algorithm: DEFAULT_ENCRYPTION_ALGORITHM.to_string(),
            part_size: DEFAULT_PART_SIZE,
        }
    }
}

/// Wiring parameters for one deployment.
///
/// `table` always holds the unprefixed base name; the environment prefix is
/// applied by [`ServiceConfig::resolved_table_name`] each time it is asked for.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub environment: Environment,
    pub region: String,
    pub table: String,
    pub search_param: String,
    pub broker_url: String,
    pub port: u16,
    pub storage: Arc<StorageConfig>,
}

impl ServiceConfig {
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a numeric one
    /// does not parse.
    pub fn from_env() -> Result<Self, UtilError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads the configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a numeric one
    /// does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, UtilError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| UtilError::ConfigError(format!("{name}: environment variable not set")))
        };

        let region = match lookup("REGION").filter(|value| !value.is_empty()) {
            Some(region) => region,
            None => required("AWS_REGION")
                .map_err(|_| UtilError::ConfigError("REGION: environment variable not set".to_string()))?,
        };

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| UtilError::ConfigError(format!("PORT: {e}")))?,
            None => DEFAULT_PORT,
        };

        let part_size = match lookup("S3_PART_SIZE") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| UtilError::ConfigError(format!("S3_PART_SIZE: {e}")))?,
            None => DEFAULT_PART_SIZE,
        };

        let storage = StorageConfig {
            region: lookup("S3_REGION").unwrap_or_else(|| region.clone()),
            key: lookup("S3_KEY").unwrap_or_default(),
            download_location: lookup("S3_DOWNLOAD_LOCATION")
                .map_or_else(env::temp_dir, PathBuf::from),
            bucket: required("S3_BUCKET")?,
            encryption_algorithm: lookup("S3_ENCRYPTION_ALGORITHM")
                .unwrap_or_else(|| DEFAULT_ENCRYPTION_ALGORITHM.to_string()),
            part_size,
        };

        Ok(Self {
            environment: Environment::from_tag(&lookup("ENVIRONMENT").unwrap_or_default()),
            region,
            table: required("TABLE_NAME")?,
            search_param: required("SEARCH_PARAM")?,
            broker_url: required("BROKER_URL")?,
            port,
            storage: Arc::new(storage),
        })
    }

    /// Startup banner for the runtime-loaded settings.
    pub fn log_env_configs(&self) {
        info!("Environment: {}", self.environment.tag());
        info!("Running on {}", self.port);
    }

    /// The table name with the environment prefix applied exactly once.
    #[must_use]
    pub fn resolved_table_name(&self) -> String {
        format!("{}{}", self.environment.prefix(), self.table)
    }
}
