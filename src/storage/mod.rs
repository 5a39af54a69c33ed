//! Object storage client and its S3 backend

pub mod bucket;
pub mod models;
pub mod multipart;
pub mod s3;

pub use bucket::{BucketClient, ClientState};
pub use models::{
    CustomerKey, DownloadRequest, DownloadedFile, EncryptionPolicy, FormFile, UploadOutput,
    UploadRequest,
};
pub use s3::{MIN_PART_SIZE, ObjectStore, S3ObjectStore};
