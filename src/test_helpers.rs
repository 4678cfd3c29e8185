//! Fixtures for running handlers against a mocked Telegram Bot API.

use serde_json::{Value, json};
use teloxide::{
    Bot,
    types::{CallbackQuery, Message},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path_regex},
};

pub const CHAT_ID: i64 = 123456789;
pub const USER_ID: u64 = 555000111;
pub const USER_MESSAGE_ID: i32 = 1;
pub const CARD_MESSAGE_ID: i32 = 42;

pub const NOT_MODIFIED: &str = "Bad Request: message is not modified: specified new message content and reply markup are exactly the same as a current content and reply markup of the message";

pub fn bot_for(server: &MockServer) -> Bot {
    Bot::new("test_token_12345:ABCDEF").set_api_url(server.uri().parse().unwrap())
}

/// A text message sent by the bot.
pub fn bot_message(message_id: i32, text: &str) -> Value {
    json!({
        "message_id": message_id,
        "from": { "id": 987654321, "is_bot": true, "first_name": "TestBot", "username": "test_bot" },
        "chat": { "id": CHAT_ID, "type": "private", "first_name": "Test" },
        "date": 1735992000,
        "text": text
    })
}

pub fn bot_photo(message_id: i32) -> Value {
    json!({
        "message_id": message_id,
        "from": { "id": 987654321, "is_bot": true, "first_name": "TestBot" },
        "chat": { "id": CHAT_ID, "type": "private", "first_name": "Test" },
        "date": 1735992000,
        "photo": [{ "file_id": "photo_id", "file_unique_id": "uid", "width": 100, "height": 100 }]
    })
}

pub fn user_message(text: &str) -> Message {
    serde_json::from_value(json!({
        "message_id": USER_MESSAGE_ID,
        "date": 1735992000,
        "chat": { "id": CHAT_ID, "type": "private", "first_name": "Test", "username": "testuser" },
        "from": { "id": USER_ID, "is_bot": false, "first_name": "Test", "username": "testuser" },
        "text": text
    }))
    .expect("Failed to deserialize message")
}

/// A button press on the video card.
pub fn card_callback(data: &str) -> CallbackQuery {
    serde_json::from_value(json!({
        "id": "callback_123",
        "from": { "id": USER_ID, "is_bot": false, "first_name": "Test", "username": "testuser" },
        "message": bot_message(CARD_MESSAGE_ID, "Video card"),
        "chat_instance": "chat_instance_123",
        "data": data
    }))
    .expect("Failed to deserialize callback")
}

fn telegram_path(api_method: &str) -> wiremock::matchers::PathRegexMatcher {
    path_regex(format!("(?i)^/bot[^/]+/{}$", api_method))
}

/// Answers `api_method` successfully with `result`.
pub async fn mock_telegram(server: &MockServer, api_method: &str, result: Value) {
    Mock::given(method("POST"))
        .and(telegram_path(api_method))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": result })))
        .mount(server)
        .await;
}

/// Answers `api_method` with a Bot API error.
pub async fn mock_telegram_error(server: &MockServer, api_method: &str, description: &str) {
    Mock::given(method("POST"))
        .and(telegram_path(api_method))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "error_code": 400,
            "description": description
        })))
        .mount(server)
        .await;
}

/// JSON bodies of the calls made to `api_method`, in order. Multipart bodies
/// come back as `Value::Null`.
pub async fn telegram_calls(server: &MockServer, api_method: &str) -> Vec<Value> {
    let suffix = format!("/{}", api_method).to_lowercase();
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path().starts_with("/bot"))
        .filter(|request| request.url.path().to_lowercase().ends_with(&suffix))
        .map(|request| serde_json::from_slice(&request.body).unwrap_or(Value::Null))
        .collect()
}
