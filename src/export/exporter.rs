use chrono_tz::Tz;
use tracing::{error, info, warn};

use super::serializer::{CONTENT_TYPE, artifact_key, build_artifact, encode};
use crate::core::config::AppConfig;
use crate::core::models::{CollectedThread, UserDirectory};
use crate::errors::{ExportError, Stage, StageError};
use crate::features::collect::{collect_channel, collect_thread};
use crate::slack::MessagingApi;
use crate::storage::ObjectStore;

/// What to export and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    pub channel_id: String,
    pub thread_ts: Option<String>,
    pub key_prefix: String,
    pub timezone: Tz,
}

impl From<&AppConfig> for ExportSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            channel_id: config.slack_channel_id.clone(),
            thread_ts: config.slack_thread_ts.clone(),
            key_prefix: config.s3_key_prefix.clone(),
            timezone: config.timezone,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub bucket: String,
    pub key: String,
    pub topic_count: usize,
    pub message_count: usize,
    pub bytes: usize,
}

/// Runs one export: authenticate, fetch, serialize, upload.
pub struct Exporter<M, S> {
    messaging: M,
    store: S,
    settings: ExportSettings,
}

impl<M, S> Exporter<M, S>
where
    M: MessagingApi,
    S: ObjectStore,
{
    pub fn new(messaging: M, store: S, settings: ExportSettings) -> Self {
        Self {
            messaging,
            store,
            settings,
        }
    }

    #[must_use]
    pub fn messaging(&self) -> &M {
        &self.messaging
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// # Errors
    ///
    /// Returns a [`StageError`] naming the step that failed. Nothing is
    /// uploaded unless every step before the upload succeeded.
    pub async fn export(&self) -> Result<ExportReport, StageError> {
        let result = self.run().await;
        if let Err(e) = &result {
            error!("Export of channel {} failed: {}", self.settings.channel_id, e);
        }
        result
    }

    async fn run(&self) -> Result<ExportReport, StageError> {
        let channel_id = self.settings.channel_id.as_str();
        let thread_ts = self.settings.thread_ts.as_deref();

        let identity = self
            .messaging
            .authenticate()
            .await
            .map_err(|e| StageError::new(Stage::Auth, e))?;
        if identity.is_bot() {
            return Err(StageError::new(
                Stage::Auth,
                ExportError::AuthenticationError(
                    "token acts as a bot user; a user token is required".to_string(),
                ),
            ));
        }
        info!(
            "Authenticated as user {} in team {}",
            identity.user_id,
            identity.team.as_deref().unwrap_or("unknown")
        );

        let fetch = |e: ExportError| StageError::new(Stage::Fetch, e);
        let channel = self
            .messaging
            .channel_info(channel_id)
            .await
            .map_err(fetch)?;
        let users = self.user_directory().await;
        let threads: Vec<CollectedThread> = match thread_ts {
            Some(ts) => vec![
                collect_thread(&self.messaging, channel_id, ts)
                    .await
                    .map_err(fetch)?,
            ],
            None => collect_channel(&self.messaging, channel_id)
                .await
                .map_err(fetch)?,
        };

        let artifact = build_artifact(
            &channel,
            thread_ts,
            &threads,
            &users,
            self.settings.timezone,
        );
        let body = encode(&artifact).map_err(|e| StageError::new(Stage::Serialize, e))?;
        let key = artifact_key(&self.settings.key_prefix, &channel.id, thread_ts);
        info!(
            "Serialized {} messages in {} topics from #{} ({} bytes)",
            artifact.message_count,
            artifact.topics.len(),
            channel.name,
            body.len()
        );

        let bytes = body.len();
        self.store
            .put_object(&key, body, CONTENT_TYPE)
            .await
            .map_err(|e| StageError::new(Stage::Upload, e))?;

        Ok(ExportReport {
            bucket: self.store.bucket().to_string(),
            key,
            topic_count: artifact.topics.len(),
            message_count: artifact.message_count,
            bytes,
        })
    }

    /// Name lookup is best effort: without it mentions and authors keep raw ids.
    async fn user_directory(&self) -> UserDirectory {
        match self.messaging.users().await {
            Ok(users) => {
                info!("Resolved {} user names", users.len());
                users
            }
            Err(e) => {
                warn!("Failed to fetch user list, keeping raw user ids: {}", e);
                UserDirectory::new()
            }
        }
    }
}
