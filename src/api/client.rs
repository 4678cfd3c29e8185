use std::time::Duration;

use log::{debug, info, warn};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use super::types::{DownloadKind, TaskCreated, TaskInfo, VideoInfo};
use crate::errors::{BotError, BotResult};

const API_KEY_HEADER: &str = "X-API-Key";

/// Client for the remote video-processing API.
#[derive(Clone)]
pub struct VideoApi {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl VideoApi {
    pub fn new(mut base_url: Url, api_key: impl Into<String>, timeout: Duration) -> BotResult<Self> {
        // Url::join replaces the last segment unless the path ends with a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Title, author, counters and available formats of a video.
    pub async fn video_info(&self, video_url: &str) -> BotResult<VideoInfo> {
        let endpoint = self.base_url.join("combined-info")?;
        info!("Requesting video info for {}", video_url);

        let (status, body) = self.get(endpoint, &[("url", video_url)]).await?;
        if status != StatusCode::OK {
            warn!("Video info request failed with {}: {}", status, body);
            return Err(BotError::Api {
                status: status.as_u16(),
                body,
            });
        }
        decode(&body)
    }

    pub async fn create_download(&self, video_url: &str, format_id: &str) -> BotResult<TaskCreated> {
        let endpoint = self.base_url.join("download")?;
        let (status, body) = self
            .get(endpoint, &[("url", video_url), ("format", format_id)])
            .await?;
        creation_response(status, body)
    }

    pub async fn create_audio_download(&self, video_url: &str) -> BotResult<TaskCreated> {
        let endpoint = self.base_url.join("audio/download")?;
        let (status, body) = self
            .get(endpoint, &[("url", video_url), ("convert_to_mp3", "true")])
            .await?;
        creation_response(status, body)
    }

    /// Creates a task for `kind` and returns its id.
    ///
    /// The API sometimes answers with a resolved format instead of a task;
    /// in that case a single follow-up `/download` request is made with it.
    pub async fn start_task(&self, video_url: &str, kind: &DownloadKind) -> BotResult<String> {
        let created = match kind {
            DownloadKind::Video { format_id } => self.create_download(video_url, format_id).await?,
            DownloadKind::Audio => self.create_audio_download(video_url).await?,
        };
        info!("Download task response for {:?}: {:?}", kind, created);

        if let Some(task_id) = created.task_id {
            return Ok(task_id);
        }
        if let Some(error) = created.error {
            return Err(BotError::TaskRejected(error));
        }

        let format_id = created
            .format
            .filter(|f| !f.is_empty())
            .ok_or(BotError::FormatUnavailable)?;

        debug!("Retrying task creation with resolved format {}", format_id);
        self.create_download(video_url, &format_id)
            .await?
            .task_id
            .ok_or(BotError::TaskNotCreated)
    }

    pub async fn task_status(&self, task_id: &str) -> BotResult<TaskInfo> {
        let mut endpoint = self.base_url.join("download")?;
        endpoint
            .path_segments_mut()
            .map_err(|_| BotError::general("API base URL cannot carry a path"))?
            .push(task_id);

        let (status, body) = self.get(endpoint, &[]).await?;
        if status != StatusCode::OK {
            return Err(BotError::Api {
                status: status.as_u16(),
                body,
            });
        }
        decode(&body)
    }

    async fn get(&self, endpoint: Url, query: &[(&str, &str)]) -> BotResult<(StatusCode, String)> {
        debug!("GET {}", endpoint);
        let response = self
            .client
            .get(endpoint)
            .query(query)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> BotResult<T> {
    Ok(serde_json::from_str(body)?)
}

/// Creation endpoints report refusals in the body, sometimes with a non-200 status.
fn creation_response(status: StatusCode, body: String) -> BotResult<TaskCreated> {
    let parsed = serde_json::from_str::<TaskCreated>(&body);
    if status.is_success() {
        return Ok(parsed?);
    }
    match parsed {
        Ok(created) if created.error.is_some() => Ok(created),
        _ => Err(BotError::Api {
            status: status.as_u16(),
            body,
        }),
    }
}
