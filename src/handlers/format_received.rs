use std::sync::Arc;

use teloxide::{prelude::*, types::MaybeInaccessibleMessage};

use super::video_card::{parse_format_callback, progress_title};
use crate::{
    api::{DownloadKind, VideoApi},
    errors::{BotError, HandlerResult},
    progress::{PollSettings, TelegramProgress, track_progress},
    session::SessionStore,
};

/// Handle format selection callback from the video card.
/// Callback format: format_<format_id> or format_audio
pub async fn format_received(
    bot: Bot,
    query: CallbackQuery,
    api: Arc<VideoApi>,
    sessions: Arc<SessionStore>,
    settings: Arc<PollSettings>,
) -> HandlerResult {
    bot.answer_callback_query(query.id.clone()).await?;

    let data = query
        .data
        .as_deref()
        .ok_or_else(|| BotError::general("No callback data"))?;
    let kind = parse_format_callback(data)
        .ok_or_else(|| BotError::general(format!("Invalid format callback: {}", data)))?;

    let message = query
        .message
        .as_ref()
        .ok_or_else(|| BotError::general("Couldn't find message"))?;
    let (chat_id, message_id) = match message {
        MaybeInaccessibleMessage::Inaccessible(m) => (m.chat.id, m.message_id),
        MaybeInaccessibleMessage::Regular(m) => (m.chat.id, m.id),
    };

    let session = sessions.user(query.from.id).await;
    let Some(video) = session.current_video else {
        let reply = bot
            .send_message(
                chat_id,
                "❌ Информация о видео устарела. Пожалуйста, отправьте ссылку снова.",
            )
            .await?;
        sessions.remember_message(chat_id, reply.id).await;
        return Ok(());
    };
    let Some(video_url) = session.video_url else {
        let reply = bot
            .send_message(
                chat_id,
                "❌ URL видео не найден. Пожалуйста, отправьте ссылку снова.",
            )
            .await?;
        sessions.remember_message(chat_id, reply.id).await;
        return Ok(());
    };

    let task_id = match api.start_task(&video_url, &kind).await {
        Ok(task_id) => task_id,
        Err(e) => {
            log::error!("Error creating download task for {}: {}", video_url, e);
            let reply = bot
                .send_message(chat_id, task_error_text(&e, &kind))
                .await?;
            sessions.remember_message(chat_id, reply.id).await;
            return Ok(());
        }
    };

    log::info!("Tracking task {} for {} ({:?})", task_id, video_url, kind);
    let view = TelegramProgress::new(
        bot.clone(),
        chat_id,
        message_id,
        progress_title(&video, &kind),
    );
    tokio::spawn(async move {
        let outcome = track_progress(api.as_ref(), &view, &task_id, &settings).await;
        log::info!("Task {} finished: {:?}", task_id, outcome);
    });

    Ok(())
}

fn task_error_text(err: &BotError, kind: &DownloadKind) -> String {
    let media = match kind {
        DownloadKind::Audio => "аудио",
        DownloadKind::Video { .. } => "видео",
    };
    match err {
        BotError::TaskRejected(reason) => format!("❌ Ошибка при создании задачи: {}", reason),
        BotError::TaskNotCreated => format!("❌ Не удалось создать задачу на скачивание {}.", media),
        BotError::FormatUnavailable => {
            format!("❌ Не удалось получить информацию о формате {}.", media)
        }
        other => format!(
            "❌ Произошла ошибка при создании задачи на скачивание.\nДетали ошибки: {}",
            other
        ),
    }
}
