// Entry point for a single export run.

use slack_export::core::config::AppConfig;
use slack_export::errors::{Stage, StageError};
use slack_export::export::{ExportSettings, Exporter};
use slack_export::slack::SlackClient;
use slack_export::storage::S3Store;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    slack_export::setup_logging();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        StageError::new(Stage::Config, e)
    })?;
    info!(
        "Exporting channel {} to bucket {}",
        config.slack_channel_id, config.s3_bucket
    );

    let slack = SlackClient::with_base_url(
        config.slack_user_token.clone(),
        &config.slack_api_base_url,
        config.http_timeout,
    );
    let store = S3Store::from_config(&config).await;
    let exporter = Exporter::new(slack, store, ExportSettings::from(&config));

    let report = exporter.export().await?;
    info!(
        "Export complete: s3://{}/{} ({} messages, {} topics, {} bytes)",
        report.bucket, report.key, report.message_count, report.topic_count, report.bytes
    );

    Ok(())
}
