use aws_sdk_sqs::Client as SqsClient;
use serde::Serialize;
use tracing::info;

use crate::errors::{UtilError, log_error};

/// Long-poll wait used by [`QueueClient::receive`].
const RECEIVE_WAIT_SECONDS: i32 = 10;

/// A message pulled from the queue, kept until it is acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub message_id: Option<String>,
    pub receipt_handle: String,
    pub body: String,
}

/// Queue client bound to one broker URL.
#[derive(Debug, Clone)]
pub struct QueueClient {
    client: SqsClient,
    queue_url: Option<String>,
}

impl QueueClient {
    #[must_use]
    pub fn new(client: SqsClient) -> Self {
        Self {
            client,
            queue_url: None,
        }
    }

    pub fn setup_url(&mut self, queue_url: impl Into<String>) {
        self.queue_url = Some(queue_url.into());
    }

    #[must_use]
    pub fn queue_url(&self) -> Option<&str> {
        self.queue_url.as_deref()
    }

    fn url(&self) -> Result<&str, UtilError> {
        self.queue_url()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| UtilError::ConfigError("queue URL not set".to_string()))
    }

    /// Sends `message` as a JSON body and returns the broker's message id.
    ///
    /// # Errors
    ///
    /// Returns an error if no URL is set, serialisation fails, or the send fails.
    pub async fn publish<T: Serialize + ?Sized>(&self, message: &T) -> Result<String, UtilError> {
        let queue_url = self.url()?;
        let message_body = serde_json::to_string(message)?;

        let output = self
            .client
            .send_message()
            .queue_url(queue_url)
            .message_body(message_body)
            .send()
            .await
            .map_err(UtilError::from)
            .inspect_err(log_error)?;

        let message_id = output.message_id().unwrap_or_default().to_string();
        info!("Published message {} to {}", message_id, queue_url);
        Ok(message_id)
    }

    /// Pulls up to `max_messages` messages (1 to 10).
    ///
    /// # Errors
    ///
    /// Returns an error if no URL is set or the receive call fails.
    pub async fn receive(&self, max_messages: i32) -> Result<Vec<ReceivedMessage>, UtilError> {
        let queue_url = self.url()?;
        let output = self
            .client
            .receive_message()
            .queue_url(queue_url)
            .max_number_of_messages(max_messages.clamp(1, 10))
            .wait_time_seconds(RECEIVE_WAIT_SECONDS)
            .send()
            .await
            .map_err(UtilError::from)
            .inspect_err(log_error)?;

        Ok(output
            .messages()
            .iter()
            .filter_map(|message| {
                Some(ReceivedMessage {
                    message_id: message.message_id().map(ToString::to_string),
                    receipt_handle: message.receipt_handle()?.to_string(),
                    body: message.body().unwrap_or_default().to_string(),
                })
            })
            .collect())
    }

    /// Deletes a received message so it is not redelivered.
    ///
    /// # Errors
    ///
    /// Returns an error if no URL is set or the delete call fails.
    pub async fn acknowledge(&self, receipt_handle: &str) -> Result<(), UtilError> {
        let queue_url = self.url()?;
        self.client
            .delete_message()
            .queue_url(queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(UtilError::from)
            .inspect_err(log_error)?;
        Ok(())
    }
}
