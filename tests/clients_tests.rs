use std::path::PathBuf;
use std::sync::Arc;

use aws_sdk_sqs::config::{BehaviorVersion, Region};
use platform_util::clients::QueueClient;
use platform_util::{Environment, ServiceConfig, StorageConfig, UtilError};
use serde_json::{Value, json};

fn service_config() -> ServiceConfig {
    ServiceConfig {
        environment: Environment::Uat,
        region: "eu-west-2".to_string(),
        table: "accounts".to_string(),
        search_param: "email".to_string(),
        broker_url: "https://sqs.eu-west-2.amazonaws.com/123456789012/signups".to_string(),
        port: 8080,
        storage: Arc::new(StorageConfig {
            region: "eu-west-2".to_string(),
            key: "0123456789abcdef0123456789abcdef".to_string(),
            download_location: PathBuf::from("/tmp"),
            bucket: "cv-uploads".to_string(),
            encryption_algorithm: "AES256".to_string(),
            part_size: 5 * 1024 * 1024,
        }),
    }
}

fn unbound_queue() -> QueueClient {
    let sdk_config = aws_sdk_sqs::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("eu-west-2"))
        .build();
    QueueClient::new(aws_sdk_sqs::Client::from_conf(sdk_config))
}

#[tokio::test]
async fn test_put_requires_search_attribute() {
    let table = service_config().build_key_value_client::<Value>();

    let err = table
        .put(&json!({ "name": "Ada", "plan": "pro" }))
        .await
        .unwrap_err();

    match err {
        UtilError::SerializationError(message) => {
            assert!(message.contains("email"), "unexpected message: {message}");
        }
        other => panic!("Unexpected error type: {other:?}"),
    }
}

#[tokio::test]
async fn test_put_rejects_non_object_records() {
    let table = service_config().build_key_value_client::<Value>();

    let err = table.put(&json!(["ada@example.com"])).await.unwrap_err();

    assert!(matches!(err, UtilError::SerializationError(_)));
}

#[tokio::test]
async fn test_queue_without_url_refuses_every_call() {
    let queue = unbound_queue();
    assert_eq!(queue.queue_url(), None);

    let err = queue.publish(&json!({ "id": 1 })).await.unwrap_err();
    assert!(matches!(err, UtilError::ConfigError(ref m) if m.contains("queue URL")));

    let err = queue.receive(5).await.unwrap_err();
    assert!(matches!(err, UtilError::ConfigError(_)));

    let err = queue.acknowledge("receipt-1").await.unwrap_err();
    assert!(matches!(err, UtilError::ConfigError(_)));
}

#[tokio::test]
async fn test_queue_with_empty_url_is_unbound() {
    let mut queue = unbound_queue();
    queue.setup_url("");

    let err = queue.publish(&json!({ "id": 1 })).await.unwrap_err();

    assert!(matches!(err, UtilError::ConfigError(_)));
    assert!(!err.is_fatal());
}
