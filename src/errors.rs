use thiserror::Error;

/// Централизованная система ошибок для telegram бота
#[derive(Debug, Error)]
pub enum BotError {
    /// Ошибки конфигурации (переменные окружения)
    #[error("Ошибка конфигурации: {0}")]
    Config(String),
    /// Ошибки Telegram API
    #[error("Ошибка Telegram API: {0}")]
    Telegram(#[from] teloxide::RequestError),
    /// Сетевые ошибки при обращении к API видео
    #[error("Ошибка сети: {0}")]
    Http(#[from] reqwest::Error),
    /// API видео вернул неуспешный статус
    #[error("API вернул статус {status}: {body}")]
    Api { status: u16, body: String },
    /// API отказался создавать задачу
    #[error("Ошибка при создании задачи: {0}")]
    TaskRejected(String),
    /// API ответил форматом, но повторный запрос не вернул задачу
    #[error("Не удалось создать задачу на скачивание")]
    TaskNotCreated,
    /// API не вернул ни задачи, ни формата
    #[error("Не удалось получить информацию о формате")]
    FormatUnavailable,
    /// Ошибки парсинга данных
    #[error("Ошибка парсинга: {0}")]
    Parse(String),
    /// Общая ошибка с описанием
    #[error("{0}")]
    General(String),
}

impl From<url::ParseError> for BotError {
    fn from(err: url::ParseError) -> Self {
        BotError::Parse(format!("URL parsing error: {}", err))
    }
}

impl From<serde_json::Error> for BotError {
    fn from(err: serde_json::Error) -> Self {
        BotError::Parse(format!("JSON parsing error: {}", err))
    }
}

// Удобные методы для создания ошибок
impl BotError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self::General(msg.into())
    }

    /// Telegram refuses edits that would not change the message.
    pub fn is_message_not_modified(&self) -> bool {
        matches!(
            self,
            BotError::Telegram(teloxide::RequestError::Api(
                teloxide::ApiError::MessageNotModified
            ))
        )
    }
}

/// Результат операций бота
pub type BotResult<T> = Result<T, BotError>;

/// Результат для хендлеров
pub type HandlerResult = BotResult<()>;
