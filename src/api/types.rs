use serde::{Deserialize, Deserializer};

/// Accepts integers, floats and null for counters the API is loose about.
fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Option::<serde_json::Number>::deserialize(deserializer)?;
    Ok(number.and_then(|n| {
        n.as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
    }))
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Option::<serde_json::Number>::deserialize(deserializer)?;
    Ok(number.and_then(|n| n.as_f64()).unwrap_or(0.0))
}

/// Ids and messages may come back as strings or as bare numbers.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct VideoFormat {
    pub format_id: String,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub filesize: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub filesize_approx: Option<u64>,
}

/// Response of `/combined-info`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct VideoInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub duration: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub view_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub like_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub comment_count: Option<u64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub video_formats: Vec<VideoFormat>,
}

impl VideoInfo {
    pub fn format(&self, format_id: &str) -> Option<&VideoFormat> {
        self.video_formats.iter().find(|f| f.format_id == format_id)
    }

    /// Formats worth a button: both resolution and approximate size are known.
    pub fn selectable_formats(&self) -> impl Iterator<Item = &VideoFormat> {
        self.video_formats.iter().filter(|f| {
            f.resolution.as_deref().is_some_and(|r| !r.is_empty())
                && f.filesize_approx.is_some_and(|s| s > 0)
        })
    }
}

/// What the user picked on the video card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadKind {
    Video { format_id: String },
    Audio,
}

/// Response of the task-creation endpoints.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TaskCreated {
    #[serde(default, deserialize_with = "lenient_string")]
    pub task_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TaskStatus {
    #[default]
    Pending,
    Processing,
    Downloading,
    Completed,
    Error,
    Other(String),
}

impl From<String> for TaskStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => Self::Pending,
            "processing" => Self::Processing,
            "downloading" => Self::Downloading,
            "completed" => Self::Completed,
            "error" => Self::Error,
            _ => Self::Other(value),
        }
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?
            .map(TaskStatus::from)
            .unwrap_or_default())
    }
}

impl TaskStatus {
    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "Ожидание...",
            Self::Processing => "Обработка...",
            Self::Downloading => "Скачивание...",
            Self::Completed => "Завершено",
            Self::Error => "Ошибка",
            Self::Other(raw) => raw,
        }
    }
}

/// Response of `/download/{task_id}`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TaskInfo {
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub progress: f64,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
