use std::path::PathBuf;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use md5::{Digest, Md5};

/// SSE-C parameters in the shape S3 expects on the wire.
#[derive(Clone, PartialEq, Eq)]
pub struct CustomerKey {
    pub algorithm: String,
    /// Base64 of the raw key.
    pub key: String,
    /// Base64 of the MD5 digest of the raw key.
    pub key_md5: String,
}

impl CustomerKey {
    #[must_use]
    pub fn from_raw(algorithm: &str, raw_key: &str) -> Self {
        Self {
            algorithm: algorithm.to_string(),
            key: STANDARD.encode(raw_key.as_bytes()),
            key_md5: STANDARD.encode(Md5::digest(raw_key.as_bytes())),
        }
    }
}

// Never print key material.
impl std::fmt::Debug for CustomerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomerKey")
            .field("algorithm", &self.algorithm)
            .field("key", &"<redacted>")
            .field("key_md5", &self.key_md5)
            .finish()
    }
}

/// One object upload as handed to an [`ObjectStore`](super::ObjectStore).
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub bucket: String,
    pub key: String,
    pub content_type: Option<String>,
    pub body: Bytes,
    pub encryption: CustomerKey,
    pub part_size: u64,
    /// Keep already-uploaded parts when a multipart upload fails.
    pub leave_parts_on_error: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOutput {
    pub location: String,
    pub upload_id: Option<String>,
    pub e_tag: Option<String>,
    pub version_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub bucket: String,
    pub key: String,
    pub encryption: CustomerKey,
}

/// Bucket-level default encryption rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionPolicy {
    pub bucket: String,
    pub algorithm: String,
    pub kms_key_id: String,
}

/// A downloaded object on local disk. The handle is positioned at the start
/// of the file and is owned by the caller.
#[derive(Debug)]
pub struct DownloadedFile {
    pub path: PathBuf,
    pub file: tokio::fs::File,
    pub bytes: u64,
}

/// The file part extracted from a multipart form.
#[derive(Debug, Clone)]
pub struct FormFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}
