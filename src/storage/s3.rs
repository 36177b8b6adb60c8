use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::timeout::TimeoutConfig;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use tracing::info;

use super::ObjectStore;
use crate::core::config::AppConfig;
use crate::errors::ExportError;

const CREDENTIALS_PROVIDER_NAME: &str = "environment";

#[derive(Debug, Clone)]
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: &aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client: client.to_owned(),
            bucket: bucket.into(),
        }
    }

    /// Build a client from the exporter's own configuration. Uploads are not
    /// retried and share the HTTP timeout used for Slack.
    pub async fn from_config(config: &AppConfig) -> Self {
        let credentials = Credentials::new(
            config.aws_access_key_id.clone(),
            config.aws_secret_access_key.clone(),
            config.aws_session_token.clone(),
            None,
            CREDENTIALS_PROVIDER_NAME,
        );
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.aws_region.clone()))
            .credentials_provider(credentials)
            .retry_config(RetryConfig::disabled())
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(config.http_timeout)
                    .build(),
            )
            .load()
            .await;

        Self::new(&aws_sdk_s3::Client::new(&shared), config.s3_bucket.clone())
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ExportError> {
        let size = body.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                ExportError::TransportError(format!(
                    "s3 put_object s3://{}/{key}: {}",
                    self.bucket,
                    DisplayErrorContext(&e)
                ))
            })?;

        info!("Saved to S3: s3://{}/{} ({} bytes)", self.bucket, key, size);
        Ok(())
    }
}
