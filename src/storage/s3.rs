use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::config::{BehaviorVersion, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    CompletedMultipartUpload, CompletedPart, ServerSideEncryption, ServerSideEncryptionByDefault,
    ServerSideEncryptionConfiguration, ServerSideEncryptionRule,
};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use super::models::{DownloadRequest, EncryptionPolicy, UploadOutput, UploadRequest};
use crate::errors::UtilError;

/// Smallest part S3 accepts for every part but the last.
pub const MIN_PART_SIZE: u64 = 5 * 1024 * 1024;

/// The operations the bucket client needs from an object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn upload(&self, request: UploadRequest) -> Result<UploadOutput, UtilError>;

    /// Streams the object into `sink`, returning the number of bytes written.
    async fn download(
        &self,
        request: &DownloadRequest,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<u64, UtilError>;

    async fn put_bucket_encryption(&self, policy: &EncryptionPolicy) -> Result<(), UtilError>;
}

#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: S3Client,
    region: String,
}

impl S3ObjectStore {
    #[must_use]
    pub fn new(client: S3Client, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }

    /// Opens a session for `region` using the default credential chain.
    pub async fn connect(region: &str) -> Self {
        let shared_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        Self::new(S3Client::new(&shared_config), region)
    }

    fn object_url(&self, bucket: &str, key: &str) -> String {
        format!("https://{bucket}.s3.{}.amazonaws.com/{key}", self.region)
    }

    async fn put_single(&self, request: UploadRequest) -> Result<UploadOutput, UtilError> {
        let output = self
            .client
            .put_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .set_content_type(request.content_type.clone())
            .body(ByteStream::from(request.body.clone()))
            .sse_customer_algorithm(&request.encryption.algorithm)
            .sse_customer_key(&request.encryption.key)
            .sse_customer_key_md5(&request.encryption.key_md5)
            .send()
            .await?;

        Ok(UploadOutput {
            location: self.object_url(&request.bucket, &request.key),
            upload_id: None,
            e_tag: output.e_tag().map(ToString::to_string),
            version_id: output.version_id().map(ToString::to_string),
        })
    }

    async fn put_multipart(
        &self,
        request: UploadRequest,
        part_size: usize,
    ) -> Result<UploadOutput, UtilError> {
        let created = self
            .client
            .create_multipart_upload()
            .bucket(&request.bucket)
            .key(&request.key)
            .set_content_type(request.content_type.clone())
            .sse_customer_algorithm(&request.encryption.algorithm)
            .sse_customer_key(&request.encryption.key)
            .sse_customer_key_md5(&request.encryption.key_md5)
            .send()
            .await?;
        let upload_id = created
            .upload_id()
            .ok_or_else(|| UtilError::AwsError("multipart upload returned no upload id".to_string()))?
            .to_string();

        let mut parts = Vec::new();
        let mut offset = 0;
        while offset < request.body.len() {
            let end = (offset + part_size).min(request.body.len());
            let part_number = i32::try_from(parts.len() + 1)
                .map_err(|_| UtilError::AwsError("too many upload parts".to_string()))?;

            let uploaded = self
                .client
                .upload_part()
                .bucket(&request.bucket)
                .key(&request.key)
                .upload_id(&upload_id)
                .part_number(part_number)
                .body(ByteStream::from(request.body.slice(offset..end)))
                .sse_customer_algorithm(&request.encryption.algorithm)
                .sse_customer_key(&request.encryption.key)
                .sse_customer_key_md5(&request.encryption.key_md5)
                .send()
                .await;

            match uploaded {
                Ok(output) => parts.push(
                    CompletedPart::builder()
                        .part_number(part_number)
                        .set_e_tag(output.e_tag().map(ToString::to_string))
                        .build(),
                ),
                Err(err) => {
                    self.after_failed_part(&request, &upload_id).await;
                    return Err(err.into());
                }
            }
            offset = end;
        }

        let completed = self
            .client
            .complete_multipart_upload()
            .bucket(&request.bucket)
            .key(&request.key)
            .upload_id(&upload_id)
            .multipart_upload(
                CompletedMultipartUpload::builder()
                    .set_parts(Some(parts))
                    .build(),
            )
            .send()
            .await?;

        Ok(UploadOutput {
            location: completed
                .location()
                .map_or_else(|| self.object_url(&request.bucket, &request.key), ToString::to_string),
            upload_id: Some(upload_id),
            e_tag: completed.e_tag().map(ToString::to_string),
            version_id: completed.version_id().map(ToString::to_string),
        })
    }

    async fn after_failed_part(&self, request: &UploadRequest, upload_id: &str) {
        if request.leave_parts_on_error {
            warn!(
                "Upload {} of {}/{} failed; uploaded parts left in place",
                upload_id, request.bucket, request.key
            );
            return;
        }
        if let Err(e) = self
            .client
            .abort_multipart_upload()
            .bucket(&request.bucket)
            .key(&request.key)
            .upload_id(upload_id)
            .send()
            .await
        {
            warn!("Failed to abort upload {}: {}", upload_id, e);
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn upload(&self, request: UploadRequest) -> Result<UploadOutput, UtilError> {
        let part_size = request.part_size.max(MIN_PART_SIZE);
        if (request.body.len() as u64) <= part_size {
            return self.put_single(request).await;
        }
        let part_size = usize::try_from(part_size).unwrap_or(usize::MAX);
        self.put_multipart(request, part_size).await
    }

    async fn download(
        &self,
        request: &DownloadRequest,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<u64, UtilError> {
        let mut output = self
            .client
            .get_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .sse_customer_algorithm(&request.encryption.algorithm)
            .sse_customer_key(&request.encryption.key)
            .sse_customer_key_md5(&request.encryption.key_md5)
            .send()
            .await?;

        let mut written = 0u64;
        while let Some(chunk) = output.body.try_next().await? {
            sink.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        sink.flush().await?;
        Ok(written)
    }

    async fn put_bucket_encryption(&self, policy: &EncryptionPolicy) -> Result<(), UtilError> {
        let default_encryption = ServerSideEncryptionByDefault::builder()
            .sse_algorithm(ServerSideEncryption::from(policy.algorithm.as_str()))
            .kms_master_key_id(&policy.kms_key_id)
            .build()?;
        let rule = ServerSideEncryptionRule::builder()
            .apply_server_side_encryption_by_default(default_encryption)
            .build();
        let configuration = ServerSideEncryptionConfiguration::builder()
            .rules(rule)
            .build()?;

        self.client
            .put_bucket_encryption()
            .bucket(&policy.bucket)
            .server_side_encryption_configuration(configuration)
            .send()
            .await?;
        info!(
            "Bucket {} now has {} encryption by default",
            policy.bucket, policy.algorithm
        );
        Ok(())
    }
}
