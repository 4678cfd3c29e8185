use std::sync::Arc;

use teloxide::prelude::*;

use crate::{errors::HandlerResult, session::SessionStore};

const INVALID_LINK_TEXT: &str = "❌ Некорректная ссылка!\n\n\
    Поддерживаемые сайты:\n\
    ▫️ YouTube\n\
    ▫️ Vimeo\n\
    ▫️ DailyMotion\n\
    ▫️ Facebook\n\
    ▫️ Instagram\n\
    ▫️ Twitter/X\n\
    ▫️ TikTok\n\n\
    Пожалуйста, отправьте корректную ссылку на видео.";

pub async fn invalid_link(bot: Bot, msg: Message, sessions: Arc<SessionStore>) -> HandlerResult {
    let reply = bot.send_message(msg.chat.id, INVALID_LINK_TEXT).await?;
    sessions.remember_message(msg.chat.id, reply.id).await;
    Ok(())
}
