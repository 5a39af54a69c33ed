use std::io::SeekFrom;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncSeekExt;
use tracing::{error, info, warn};

use super::models::{
    CustomerKey, DownloadRequest, DownloadedFile, EncryptionPolicy, UploadOutput, UploadRequest,
};
use super::multipart::read_file_field;
use super::s3::{ObjectStore, S3ObjectStore};
use crate::core::config::StorageConfig;
use crate::errors::{UtilError, log_error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Unconfigured,
    Configured,
    SessionActive,
}

/// Object storage client bound to a single bucket and encryption policy.
///
/// Lifecycle: `set_configs` attaches the configuration, `init` opens the
/// session, and only then do the transfer operations work.
#[derive(Debug)]
pub struct BucketClient<S = S3ObjectStore> {
    store: Option<S>,
    config: Option<Arc<StorageConfig>>,
}

/// Places `name` under `dir`. Absolute names and names with `.`/`..`
/// components are refused so the result cannot leave `dir`.
fn local_path(dir: &Path, name: &str) -> Result<PathBuf, UtilError> {
    let relative = Path::new(name);
    let mut components = relative.components().peekable();
    let contained = components.peek().is_some()
        && components.all(|component| matches!(component, Component::Normal(_)));
    if !contained {
        let err = UtilError::InvalidObjectName(name.to_string());
        log_error(&err);
        return Err(err);
    }
    Ok(dir.join(relative))
}

impl<S> Default for BucketClient<S> {
    fn default() -> Self {
        Self {
            store: None,
            config: None,
        }
    }
}

impl<S: ObjectStore> BucketClient<S> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_configs(&mut self, config: Arc<StorageConfig>) {
        self.config = Some(config);
    }

    #[must_use]
    pub fn configs(&self) -> Option<&StorageConfig> {
        self.config.as_deref()
    }

    /// The backing store once a session is active.
    #[must_use]
    pub fn store(&self) -> Option<&S> {
        self.store.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> ClientState {
        match (&self.config, &self.store) {
            (_, Some(_)) => ClientState::SessionActive,
            (Some(_), None) => ClientState::Configured,
            (None, None) => ClientState::Unconfigured,
        }
    }

    /// Checks that the configuration and its encryption key are present.
    fn validated_config(&self) -> Result<&StorageConfig, UtilError> {
        let Some(config) = self.config.as_deref() else {
            let err = UtilError::MissingConfiguration("storage configuration not set".to_string());
            log_error(&err);
            return Err(err);
        };
        if config.key.is_empty() {
            let err = UtilError::MissingCredentials("no storage encryption key found".to_string());
            log_error(&err);
            return Err(err);
        }
        Ok(config)
    }

    /// Activates the session with an already constructed store.
    ///
    /// # Errors
    ///
    /// Returns `MissingConfiguration` or `MissingCredentials` when the
    /// configuration is absent or carries no key; no session is created.
    pub fn init_with(&mut self, store: S) -> Result<(), UtilError> {
        self.validated_config()?;
        self.store = Some(store);
        info!("Session Initiated");
        Ok(())
    }

    fn session(&self) -> Result<(&StorageConfig, &S), UtilError> {
        match (self.config.as_deref(), self.store.as_ref()) {
            (Some(config), Some(store)) => Ok((config, store)),
            _ => Err(UtilError::NotInitialised),
        }
    }

    fn customer_key(config: &StorageConfig) -> CustomerKey {
        CustomerKey::from_raw(&config.encryption_algorithm, &config.key)
    }

    /// Uploads the file sent under `field_name` in a multipart form request.
    ///
    /// The object key is the uploaded file's name, unmodified. Form bodies are
    /// capped at the part size, so the store receives them as one request;
    /// only direct [`ObjectStore::upload`] calls with larger bodies are split
    /// into parts.
    ///
    /// # Errors
    ///
    /// Returns an error if the body exceeds the configured part size, the
    /// form has no such file field, or the upload fails.
    pub async fn upload_file(
        &self,
        request: &http::Request<Bytes>,
        field_name: &str,
    ) -> Result<UploadOutput, UtilError> {
        let (config, store) = self.session()?;

        let form_file = read_file_field(
            request.headers(),
            request.body().clone(),
            field_name,
            config.part_size,
        )
        .await
        .inspect_err(log_error)?;
        info!("file name {} size {}", form_file.file_name, form_file.data.len());

        let content_type = form_file.content_type.or_else(|| {
            mime_guess::from_path(&form_file.file_name)
                .first()
                .map(|mime| mime.to_string())
        });
        let upload = UploadRequest {
            bucket: config.bucket.clone(),
            key: form_file.file_name,
            content_type,
            body: form_file.data,
            encryption: Self::customer_key(config),
            part_size: config.part_size,
            leave_parts_on_error: true,
        };

        let output = store.upload(upload).await.inspect_err(log_error)?;
        info!("{:?}", output);
        Ok(output)
    }

    /// Downloads object `name` into the configured download directory.
    ///
    /// # Errors
    ///
    /// Returns `InvalidObjectName` for names that are absolute or contain
    /// `.`/`..` components, and an error if the local file cannot be created
    /// or the download fails; in the latter case the partial file is removed
    /// first.
    pub async fn download_file(&self, name: &str) -> Result<DownloadedFile, UtilError> {
        let (config, store) = self.session()?;
        let path = local_path(&config.download_location, name)?;

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .await
            .map_err(|e| {
                error!("error creating file {}: {}", path.display(), e);
                UtilError::from(e)
            })?;

        let request = DownloadRequest {
            bucket: config.bucket.clone(),
            key: name.to_string(),
            encryption: Self::customer_key(config),
        };

        match store.download(&request, &mut file).await {
            Ok(bytes) => {
                file.seek(SeekFrom::Start(0)).await?;
                Ok(DownloadedFile { path, file, bytes })
            }
            Err(err) => {
                log_error(&err);
                drop(file);
                if let Err(e) = fs::remove_file(&path).await {
                    warn!("Failed to remove partial download {}: {}", path.display(), e);
                }
                Err(err)
            }
        }
    }

    /// Sets the bucket's default encryption to the configured algorithm
    /// with the given KMS key.
    ///
    /// # Errors
    ///
    /// Returns an error if the service rejects the policy.
    pub async fn put_encryption(&self, kms_key_id: &str) -> Result<EncryptionPolicy, UtilError> {
        let (config, store) = self.session()?;
        let policy = EncryptionPolicy {
            bucket: config.bucket.clone(),
            algorithm: config.encryption_algorithm.clone(),
            kms_key_id: kms_key_id.to_string(),
        };
        store
            .put_bucket_encryption(&policy)
            .await
            .inspect_err(log_error)?;
        Ok(policy)
    }
}

impl BucketClient<S3ObjectStore> {
    /// Validates the configuration and opens a region-scoped S3 session.
    ///
    /// # Errors
    ///
    /// Returns `MissingConfiguration` or `MissingCredentials`; both are
    /// fatal kinds a host is expected to stop on.
    pub async fn init(&mut self) -> Result<(), UtilError> {
        let region = self.validated_config()?.region.clone();
        let store = S3ObjectStore::connect(&region).await;
        self.init_with(store)
    }
}
