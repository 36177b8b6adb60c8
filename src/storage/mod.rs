pub mod s3;

use async_trait::async_trait;

use crate::errors::ExportError;

pub use s3::S3Store;

/// Write side of an export: a bucket that accepts whole objects.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Name of the destination bucket, for reporting.
    fn bucket(&self) -> &str;

    /// Store `body` under `key`, replacing any existing object.
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ExportError>;
}
