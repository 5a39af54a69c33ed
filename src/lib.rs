/// Platform utilities - thin, configuration-driven wrappers around the
/// external systems our services talk to.
///
/// The crate provides:
/// 1. A client factory on [`ServiceConfig`] that turns one deployment's
///    settings into ready-to-use clients (S3 bucket, SQS queue, DynamoDB table)
/// 2. An object storage client with SSE-C uploads and downloads
/// 3. A one-shot HTTP request helper
/// 4. Random identifier generation
///
/// # Architecture
///
/// The system uses:
/// - aws-sdk-s3 / aws-sdk-sqs / aws-sdk-dynamodb for the managed services
/// - reqwest for outbound HTTP
/// - tracing for structured logs
/// - Tokio for async runtime
///
/// Libraries never terminate the process. Missing secrets surface as fatal
/// [`UtilError`] kinds and the host decides, usually via [`exit_on_fatal`].
///
/// # Example
///
/// ```no_run
/// use platform_util::core::config::ServiceConfig;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     platform_util::setup_logging();
///
///     let config = ServiceConfig::from_env()?;
///     config.log_env_configs();
///
///     let mut storage = config.build_storage_client();
///     platform_util::exit_on_fatal(storage.init().await)?;
///
///     let queue = config.build_queue_client();
///     let id = platform_util::new_identifier()?;
///     queue.publish(&serde_json::json!({ "id": id })).await?;
///
///     Ok(())
/// }
/// ```
// Module declarations
pub mod clients;
pub mod core;
pub mod errors;
pub mod storage;
pub mod transport;

pub use crate::core::config::{Environment, ServiceConfig, StorageConfig};
pub use crate::core::identifier::new_identifier;
pub use errors::{UtilError, exit_on_fatal, exit_on_fatal_with, handle_error, log_error};

/// Configure structured logging with JSON format.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration. The level comes from `RUST_LOG` when set.
/// Calling it again after a subscriber is installed is a no-op.
///
/// # Example
///
/// ```
/// platform_util::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;

    let default_level = if cfg!(feature = "debug-logs") { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
