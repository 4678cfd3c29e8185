use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{InputFile, ParseMode},
};
use url::Url;

use super::video_card::{VideoCard, format_keyboard};
use crate::{
    api::VideoApi,
    errors::{BotError, HandlerResult},
    session::{SessionStore, cleanup_messages},
};

pub async fn link_received(
    bot: Bot,
    msg: Message,
    api: Arc<VideoApi>,
    sessions: Arc<SessionStore>,
) -> HandlerResult {
    let url = msg
        .text()
        .ok_or_else(|| BotError::general("Text should be here. It's invalid state"))?
        .trim()
        .to_string();
    let user_id = msg
        .from
        .as_ref()
        .map(|u| u.id)
        .ok_or_else(|| BotError::general("Link message without a sender"))?;
    let chat_id = msg.chat.id;

    sessions.select_url(user_id, url.clone()).await;
    cleanup_messages(&bot, &sessions, chat_id, Some(msg.id)).await;

    let status_msg = bot
        .send_message(chat_id, "🔍 Получаю информацию о видео...")
        .await?;
    sessions.remember_message(chat_id, status_msg.id).await;

    let video = match api.video_info(&url).await {
        Ok(video) => video,
        Err(e) => {
            log::error!("Error processing video URL {}: {}", url, e);
            let error_msg = bot
                .send_message(
                    chat_id,
                    format!(
                        "❌ Произошла ошибка при получении информации о видео.\nДетали ошибки: {}",
                        e
                    ),
                )
                .await?;
            sessions.remember_message(chat_id, error_msg.id).await;
            return Ok(());
        }
    };

    cleanup_messages(&bot, &sessions, chat_id, None).await;

    let card = VideoCard::new(&video);
    let keyboard = format_keyboard(&video);
    let thumbnail = video.thumbnail.as_deref().and_then(|t| Url::parse(t).ok());

    let photo = match thumbnail {
        Some(thumbnail) => bot
            .send_photo(chat_id, InputFile::url(thumbnail))
            .caption(card.caption.clone())
            .parse_mode(ParseMode::Html)
            .reply_markup(keyboard.clone())
            .await
            .map_err(|e| log::warn!("Couldn't send thumbnail, falling back to text: {}", e))
            .ok(),
        None => None,
    };
    let card_msg = match photo {
        Some(sent) => sent,
        None => {
            bot.send_message(chat_id, card.caption.clone())
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboard)
                .await?
        }
    };
    sessions.remember_message(chat_id, card_msg.id).await;

    if let Some(details) = card.details {
        let details_msg = bot
            .send_message(chat_id, details)
            .parse_mode(ParseMode::Html)
            .await?;
        sessions.remember_message(chat_id, details_msg.id).await;
    }

    log::info!(
        "Video card sent for {} ({} formats)",
        url,
        video.video_formats.len()
    );
    sessions.select_video(user_id, video).await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use teloxide::types::{MessageId, UserId};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::test_helpers::{
        CHAT_ID, USER_ID, USER_MESSAGE_ID, bot_for, bot_message, bot_photo, mock_telegram,
        mock_telegram_error, telegram_calls, user_message,
    };

    const LINK: &str = "https://youtu.be/abc";
    const SENT_TEXT_ID: i32 = 100;
    const SENT_PHOTO_ID: i32 = 200;

    async fn mock_video_info(server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/combined-info"))
            .respond_with(response)
            .mount(server)
            .await;
    }

    async fn mock_chat(server: &MockServer) {
        mock_telegram(server, "deleteMessage", json!(true)).await;
        mock_telegram(server, "sendMessage", bot_message(SENT_TEXT_ID, "sent")).await;
    }

    fn video(thumbnail: Option<&str>, title: &str) -> Value {
        json!({
            "title": title,
            "author": "Someone",
            "description": "About the clip",
            "duration": 65,
            "thumbnail": thumbnail,
            "video_formats": [{"format_id": "18", "resolution": "640x360", "filesize_approx": 1000}]
        })
    }

    async fn receive_link(server: &MockServer, sessions: &Arc<SessionStore>) -> HandlerResult {
        let base = Url::parse(&server.uri()).unwrap();
        let api = Arc::new(VideoApi::new(base, "test-key", Duration::from_secs(5)).unwrap());
        link_received(bot_for(server), user_message(LINK), api, sessions.clone()).await
    }

    fn deleted_ids(calls: &[Value]) -> Vec<i64> {
        calls.iter().filter_map(|c| c["message_id"].as_i64()).collect()
    }

    #[tokio::test]
    async fn video_card_is_sent_as_photo_and_remembered() {
        let server = MockServer::start().await;
        mock_chat(&server).await;
        mock_telegram(&server, "sendPhoto", bot_photo(SENT_PHOTO_ID)).await;
        mock_video_info(
            &server,
            ResponseTemplate::new(200).set_body_json(video(Some("https://img.example.com/t.jpg"), "Clip")),
        )
        .await;
        let sessions = SessionStore::new();
        let chat = ChatId(CHAT_ID);
        sessions.remember_message(chat, MessageId(7)).await;

        receive_link(&server, &sessions).await.unwrap();

        let sent = telegram_calls(&server, "sendMessage").await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["text"], json!("🔍 Получаю информацию о видео..."));
        assert_eq!(telegram_calls(&server, "sendPhoto").await.len(), 1);
        // old card and the link itself first, then the status message
        assert_eq!(
            deleted_ids(&telegram_calls(&server, "deleteMessage").await),
            vec![7, USER_MESSAGE_ID as i64, SENT_TEXT_ID as i64]
        );
        assert_eq!(sessions.take_messages(chat).await, vec![MessageId(SENT_PHOTO_ID)]);

        let session = sessions.user(UserId(USER_ID)).await;
        assert_eq!(session.video_url.as_deref(), Some(LINK));
        assert_eq!(
            session.current_video.and_then(|v| v.title.clone()).as_deref(),
            Some("Clip")
        );
    }

    #[tokio::test]
    async fn long_card_without_thumbnail_is_split_into_text_messages() {
        let server = MockServer::start().await;
        mock_chat(&server).await;
        mock_video_info(
            &server,
            ResponseTemplate::new(200).set_body_json(video(None, &"Long title ".repeat(90))),
        )
        .await;
        let sessions = SessionStore::new();

        receive_link(&server, &sessions).await.unwrap();

        assert!(telegram_calls(&server, "sendPhoto").await.is_empty());
        let sent = telegram_calls(&server, "sendMessage").await;
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[1]["parse_mode"], json!("HTML"));
        let buttons = &sent[1]["reply_markup"]["inline_keyboard"];
        assert_eq!(buttons[0][0]["callback_data"], json!("format_18"));
        assert_eq!(buttons[1][0]["callback_data"], json!("format_audio"));
        assert!(sent[2]["text"].as_str().unwrap().contains("Someone"));
        assert_eq!(
            sessions.take_messages(ChatId(CHAT_ID)).await,
            vec![MessageId(SENT_TEXT_ID), MessageId(SENT_TEXT_ID)]
        );
    }

    #[tokio::test]
    async fn rejected_thumbnail_falls_back_to_text_card() {
        let server = MockServer::start().await;
        mock_chat(&server).await;
        mock_telegram_error(
            &server,
            "sendPhoto",
            "Bad Request: wrong file identifier/HTTP URL specified",
        )
        .await;
        mock_video_info(
            &server,
            ResponseTemplate::new(200).set_body_json(video(Some("https://img.example.com/t.jpg"), "Clip")),
        )
        .await;
        let sessions = SessionStore::new();

        receive_link(&server, &sessions).await.unwrap();

        let sent = telegram_calls(&server, "sendMessage").await;
        assert_eq!(sent.len(), 2);
        assert!(sent[1]["text"].as_str().unwrap().contains("<b>Clip</b>"));
        assert_eq!(
            sessions.take_messages(ChatId(CHAT_ID)).await,
            vec![MessageId(SENT_TEXT_ID)]
        );
        assert!(sessions.user(UserId(USER_ID)).await.current_video.is_some());
    }

    #[tokio::test]
    async fn lookup_failure_is_reported_and_remembered() {
        let server = MockServer::start().await;
        mock_chat(&server).await;
        mock_video_info(&server, ResponseTemplate::new(500).set_body_string("boom")).await;
        let sessions = SessionStore::new();

        receive_link(&server, &sessions).await.unwrap();

        let sent = telegram_calls(&server, "sendMessage").await;
        assert_eq!(sent.len(), 2);
        assert!(
            sent[1]["text"]
                .as_str()
                .unwrap()
                .contains("API вернул статус 500: boom")
        );
        // the status message stays next to the error until the next cleanup
        assert_eq!(
            deleted_ids(&telegram_calls(&server, "deleteMessage").await),
            vec![USER_MESSAGE_ID as i64]
        );
        assert_eq!(
            sessions.take_messages(ChatId(CHAT_ID)).await,
            vec![MessageId(SENT_TEXT_ID), MessageId(SENT_TEXT_ID)]
        );

        let session = sessions.user(UserId(USER_ID)).await;
        assert_eq!(session.video_url.as_deref(), Some(LINK));
        assert!(session.current_video.is_none());
    }
}
