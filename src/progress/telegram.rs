use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ParseMode},
};

use super::{
    poller::{ProgressScreen, ProgressView},
    render::{DOWNLOAD_BUTTON, render},
};
use crate::errors::{BotError, BotResult};

/// Shows progress by editing one chat message in place.
pub struct TelegramProgress {
    bot: Bot,
    chat_id: ChatId,
    message_id: MessageId,
    title: String,
}

impl TelegramProgress {
    pub fn new(bot: Bot, chat_id: ChatId, message_id: MessageId, title: impl Into<String>) -> Self {
        Self {
            bot,
            chat_id,
            message_id,
            title: title.into(),
        }
    }
}

fn keyboard_for(screen: &ProgressScreen) -> Option<InlineKeyboardMarkup> {
    match screen {
        ProgressScreen::Completed {
            download_url: Some(url),
        } => Some(InlineKeyboardMarkup::new([[InlineKeyboardButton::url(
            DOWNLOAD_BUTTON,
            url.clone(),
        )]])),
        _ => None,
    }
}

#[async_trait]
impl ProgressView for TelegramProgress {
    async fn show(&self, screen: &ProgressScreen) -> BotResult<()> {
        let text = render(screen, &self.title);
        let keyboard = keyboard_for(screen);

        // Video cards with a thumbnail are photos, so the caption goes first.
        let mut caption = self
            .bot
            .edit_message_caption(self.chat_id, self.message_id)
            .caption(text.clone())
            .parse_mode(ParseMode::Html);
        if let Some(keyboard) = keyboard.clone() {
            caption = caption.reply_markup(keyboard);
        }
        match caption.await.map_err(BotError::from) {
            Ok(_) => return Ok(()),
            Err(e) if e.is_message_not_modified() => return Ok(()),
            Err(e) => log::debug!("Caption edit failed, trying text: {}", e),
        }

        let mut edit = self
            .bot
            .edit_message_text(self.chat_id, self.message_id, text)
            .parse_mode(ParseMode::Html);
        if let Some(keyboard) = keyboard {
            edit = edit.reply_markup(keyboard);
        }
        match edit.await.map_err(BotError::from) {
            Ok(_) => Ok(()),
            Err(e) if e.is_message_not_modified() => Ok(()),
            Err(e) => Err(e),
        }
    }
}
