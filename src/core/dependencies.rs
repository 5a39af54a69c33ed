//! Builds ready-to-use clients out of a [`ServiceConfig`].

use aws_config::profile::ProfileFileCredentialsProvider;
use aws_sdk_dynamodb::config::{BehaviorVersion, Region};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use super::config::ServiceConfig;
use crate::clients::{KeyValueTable, QueueClient, TableBinding};
use crate::storage::{BucketClient, S3ObjectStore};

/// Shared credentials profile the factory resolves.
pub const CREDENTIALS_PROFILE: &str = "default";

impl ServiceConfig {
    /// Credentials from the local shared profile named `default`.
    #[must_use]
    pub fn generate_credentials(&self) -> ProfileFileCredentialsProvider {
        ProfileFileCredentialsProvider::builder()
            .profile_name(CREDENTIALS_PROFILE)
            .build()
    }

    /// Snapshot of the table coordinates for records of type `T`.
    #[must_use]
    pub fn table_binding<T>(&self) -> TableBinding {
        TableBinding {
            table: self.resolved_table_name(),
            search_param: self.search_param.clone(),
            region: self.region.clone(),
            record_type: std::any::type_name::<T>().to_string(),
        }
    }

    /// Builds the key-value wrapper for records of type `T`.
    ///
    /// The wrapper keeps its own copy of the table binding; later edits to
    /// this configuration are not seen by it.
    #[must_use]
    pub fn build_key_value_client<T>(&self) -> KeyValueTable<T>
    where
        T: Serialize + DeserializeOwned,
    {
        let binding = self.table_binding::<T>();
        let sdk_config = aws_sdk_dynamodb::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()))
            .credentials_provider(self.generate_credentials())
            .build();
        info!(
            "Key-value table {} bound for {}",
            binding.table, binding.record_type
        );
        KeyValueTable::new(aws_sdk_dynamodb::Client::from_conf(sdk_config), binding)
    }

    /// Builds the queue client with the broker URL already applied.
    #[must_use]
    pub fn build_queue_client(&self) -> QueueClient {
        let sdk_config = aws_sdk_sqs::config::Builder::new()
            .behavior_version(aws_sdk_sqs::config::BehaviorVersion::latest())
            .region(aws_sdk_sqs::config::Region::new(self.region.clone()))
            .credentials_provider(self.generate_credentials())
            .build();
        let mut client = QueueClient::new(aws_sdk_sqs::Client::from_conf(sdk_config));
        client.setup_url(self.broker_url.clone());
        client
    }

    /// Builds the storage client with the storage configuration attached.
    /// The session is opened separately by `init`.
    #[must_use]
    pub fn build_storage_client(&self) -> BucketClient<S3ObjectStore> {
        let mut client = BucketClient::new();
        client.set_configs(self.storage.clone());
        client
    }
}
