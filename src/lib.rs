//! slack-export - Copies a Slack channel's conversations into an S3 object.
//!
//! One run reads the history of a single channel (or one thread in it) with a
//! user-scoped Slack token, groups the messages into threads, and writes them
//! as one JSON document to a deterministic key in an S3 bucket.
//!
//! # Architecture
//!
//! The run is a straight line: authenticate, fetch, serialize, upload.
//! - `core::config` loads and checks the environment
//! - `slack` reads from the Slack Web API through [`slack::MessagingApi`]
//! - `features::collect` groups history into threads
//! - `export::serializer` builds the artifact and its key
//! - `storage` writes to S3 through [`storage::ObjectStore`]
//! - `export::exporter` drives the run and reports the failing stage
//!
//! # Example
//!
//! ```no_run
//! use slack_export::core::config::AppConfig;
//! use slack_export::export::{ExportSettings, Exporter};
//! use slack_export::slack::SlackClient;
//! use slack_export::storage::S3Store;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     slack_export::setup_logging();
//!
//!     let config = AppConfig::from_env()?;
//!     let slack = SlackClient::with_base_url(
//!         config.slack_user_token.clone(),
//!         &config.slack_api_base_url,
//!         config.http_timeout,
//!     );
//!     let store = S3Store::from_config(&config).await;
//!
//!     let report = Exporter::new(slack, store, ExportSettings::from(&config))
//!         .export()
//!         .await?;
//!     println!("wrote s3://{}/{}", report.bucket, report.key);
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod errors;
pub mod export;
pub mod features;
pub mod slack;
pub mod storage;
pub mod utils;

/// Configure structured JSON logging on stderr.
///
/// The level comes from `RUST_LOG` and defaults to `info`. Calling this more
/// than once keeps the first subscriber.
///
/// # Example
///
/// ```
/// slack_export::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_target(true)
        .with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
