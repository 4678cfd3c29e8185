use std::sync::Arc;

use teloxide::prelude::*;

use crate::{
    errors::HandlerResult,
    session::{SessionStore, cleanup_messages},
};

pub async fn cancel(bot: Bot, msg: Message, sessions: Arc<SessionStore>) -> HandlerResult {
    cleanup_messages(&bot, &sessions, msg.chat.id, Some(msg.id)).await;
    if let Some(user) = msg.from.as_ref() {
        sessions.forget_user(user.id).await;
    }

    let reply = bot
        .send_message(
            msg.chat.id,
            "Выбор видео сброшен. Отправь новую ссылку, когда будешь готов.",
        )
        .await?;
    sessions.remember_message(msg.chat.id, reply.id).await;
    Ok(())
}
