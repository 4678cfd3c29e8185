use std::collections::HashMap;
use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{ChatId, MessageId, UserId},
};
use tokio::sync::Mutex;

use crate::api::VideoInfo;

/// What a user is currently working with.
#[derive(Debug, Clone, Default)]
pub struct UserSession {
    pub video_url: Option<String>,
    pub current_video: Option<Arc<VideoInfo>>,
}

/// Ephemeral per-chat and per-user state, lost on restart.
#[derive(Default)]
pub struct SessionStore {
    /// Bot messages to delete on the next cleanup, in send order.
    messages: Mutex<HashMap<ChatId, Vec<MessageId>>>,
    users: Mutex<HashMap<UserId, UserSession>>,
}

impl SessionStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn remember_message(&self, chat_id: ChatId, message_id: MessageId) {
        self.messages
            .lock()
            .await
            .entry(chat_id)
            .or_default()
            .push(message_id);
    }

    pub async fn take_messages(&self, chat_id: ChatId) -> Vec<MessageId> {
        self.messages
            .lock()
            .await
            .remove(&chat_id)
            .unwrap_or_default()
    }

    /// A new link invalidates whatever video was picked before.
    pub async fn select_url(&self, user_id: UserId, url: String) {
        let mut users = self.users.lock().await;
        let session = users.entry(user_id).or_default();
        session.video_url = Some(url);
        session.current_video = None;
    }

    pub async fn select_video(&self, user_id: UserId, video: VideoInfo) {
        self.users
            .lock()
            .await
            .entry(user_id)
            .or_default()
            .current_video = Some(Arc::new(video));
    }

    pub async fn user(&self, user_id: UserId) -> UserSession {
        self.users
            .lock()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn forget_user(&self, user_id: UserId) {
        self.users.lock().await.remove(&user_id);
    }
}

/// Deletes the bot messages remembered for `chat_id` and, when given, the
/// user's own message. Deletion failures are logged and skipped.
pub async fn cleanup_messages(
    bot: &Bot,
    sessions: &SessionStore,
    chat_id: ChatId,
    user_message: Option<MessageId>,
) {
    for message_id in sessions.take_messages(chat_id).await {
        if let Err(e) = bot.delete_message(chat_id, message_id).await {
            log::error!("Error deleting message {}: {}", message_id.0, e);
        }
    }

    if let Some(message_id) = user_message {
        if let Err(e) = bot.delete_message(chat_id, message_id).await {
            log::error!("Error deleting user message {}: {}", message_id.0, e);
        }
    }
}
