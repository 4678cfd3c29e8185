use teloxide::{
    types::{InlineKeyboardButton, InlineKeyboardMarkup},
    utils::html,
};

use crate::{
    api::{DownloadKind, VideoInfo},
    utils::{QualityTier, format_count, format_duration, format_size, truncate_description},
};

pub const FORMAT_CALLBACK_PREFIX: &str = "format_";
const AUDIO_CALLBACK: &str = "format_audio";
/// Telegram rejects buttons with longer callback data.
const MAX_CALLBACK_BYTES: usize = 64;
/// Telegram limit for media captions.
const MAX_CAPTION_CHARS: usize = 1024;

pub fn parse_format_callback(data: &str) -> Option<DownloadKind> {
    if data == AUDIO_CALLBACK {
        return Some(DownloadKind::Audio);
    }
    data.strip_prefix(FORMAT_CALLBACK_PREFIX)
        .filter(|id| !id.is_empty())
        .map(|id| DownloadKind::Video {
            format_id: id.to_string(),
        })
}

/// One button per downloadable format plus the audio button.
pub fn format_keyboard(video: &VideoInfo) -> InlineKeyboardMarkup {
    let mut keyboard = InlineKeyboardMarkup::default();

    for format in video.selectable_formats() {
        let callback = format!("{}{}", FORMAT_CALLBACK_PREFIX, format.format_id);
        if callback.len() > MAX_CALLBACK_BYTES {
            log::warn!("Skipping format with oversized id {}", format.format_id);
            continue;
        }
        let resolution = format.resolution.as_deref().unwrap_or_default();
        let size = format_size(format.filesize_approx.unwrap_or_default());
        let label = format!("{} ({})", QualityTier::from_resolution(resolution), size);
        keyboard = keyboard.append_row([InlineKeyboardButton::callback(label, callback)]);
    }

    keyboard.append_row([InlineKeyboardButton::callback("🎵 Аудио", AUDIO_CALLBACK)])
}

/// Caption for the video message and, when the full text does not fit a
/// caption, a follow-up message with the author and description.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoCard {
    pub caption: String,
    pub details: Option<String>,
}

impl VideoCard {
    pub fn new(video: &VideoInfo) -> Self {
        let title = html::escape(video.title.as_deref().unwrap_or("Без названия"));
        let author = html::escape(video.author.as_deref().unwrap_or("Неизвестен"));
        let description = video
            .description
            .as_deref()
            .map(truncate_description)
            .unwrap_or_default();

        let stats = format!(
            "⏳ {} | 👍 {} | 👁 {} | 💬 {}",
            format_duration(video.duration.unwrap_or_default()),
            format_count(video.like_count.unwrap_or_default()),
            format_count(video.view_count.unwrap_or_default()),
            format_count(video.comment_count.unwrap_or_default()),
        );

        let mut about = format!("Автор: <b>{}</b>", author);
        if !description.trim().is_empty() {
            about.push_str(&format!("\n\nОписание:\n<i>{}</i>", html::escape(&description)));
        }

        let full = format!("<b>{}</b>\n\n{}\n\n{}", title, about, stats);
        if full.chars().count() <= MAX_CAPTION_CHARS {
            return Self {
                caption: full,
                details: None,
            };
        }

        Self {
            caption: format!("<b>{}</b>\n\n{}", title, stats),
            details: Some(about),
        }
    }
}

/// Title shown while a task is tracked.
pub fn progress_title(video: &VideoInfo, kind: &DownloadKind) -> String {
    match kind {
        DownloadKind::Audio => {
            format!("{} (Аудио)", video.title.as_deref().unwrap_or("Аудио"))
        }
        DownloadKind::Video { format_id } => {
            let title = video.title.as_deref().unwrap_or("Видео");
            match video.format(format_id).and_then(|f| f.resolution.as_deref()) {
                Some(resolution) if !resolution.is_empty() => format!("{} ({})", title, resolution),
                _ => title.to_string(),
            }
        }
    }
}
