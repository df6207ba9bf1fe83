//! Notification channel endpoints.

use super::types::{NotificationChannel, TelegramLink};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// `GET /notifications/channels/` - all configured channels.
    pub async fn list_channels(&self) -> Result<Vec<NotificationChannel>, ApiError> {
        self.get_json("/notifications/channels/").await
    }

    /// `DELETE /notifications/channels/{id}/`.
    pub async fn delete_channel(&self, id: u64) -> Result<(), ApiError> {
        self.delete(&format!("/notifications/channels/{}/", id)).await
    }

    /// `GET /notifications/telegram-link/` - one-time deep link used to
    /// connect Telegram out-of-band. Completion is only observable by
    /// re-fetching the channel list after the user returns.
    pub async fn telegram_connect_link(&self) -> Result<String, ApiError> {
        let link: TelegramLink = self.get_json("/notifications/telegram-link/").await?;
        Ok(link.link)
    }
}
