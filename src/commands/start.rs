use std::sync::Arc;

use teloxide::prelude::*;

use crate::{
    errors::HandlerResult,
    session::{SessionStore, cleanup_messages},
};

pub async fn start(bot: Bot, msg: Message, sessions: Arc<SessionStore>) -> HandlerResult {
    cleanup_messages(&bot, &sessions, msg.chat.id, None).await;

    let greeting = bot
        .send_message(
            msg.chat.id,
            "👋 Привет! Я бот для скачивания видео.\n\n\
            Просто отправь мне ссылку на видео, и я помогу тебе скачать его в нужном формате.",
        )
        .await?;
    sessions.remember_message(msg.chat.id, greeting.id).await;
    Ok(())
}
