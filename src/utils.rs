use once_cell::sync::Lazy;
use regex::Regex;
use strum::Display;

/// Sites the video API knows how to fetch from.
pub const SUPPORTED_DOMAINS: [&str; 11] = [
    "youtube.com",
    "youtu.be",
    "vimeo.com",
    "dailymotion.com",
    "facebook.com",
    "fb.watch",
    "instagram.com",
    "twitter.com",
    "x.com",
    "tiktok.com",
    "vm.tiktok.com",
];

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^https?://(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+[A-Z]{2,6}\.?|localhost|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})(?::\d+)?(?:/?|[/?]\S+)$",
    )
    .expect("url regex is valid")
});

pub fn is_supported_video_link(text: &str) -> bool {
    let url = text.trim();
    if !URL_RE.is_match(url) {
        return false;
    }

    let url = url.to_lowercase();
    SUPPORTED_DOMAINS.iter().any(|domain| url.contains(domain))
}

const PROGRESS_CELLS: usize = 12;
const PERCENT_PER_CELL: f64 = 8.33;

/// 12-cell bar, e.g. `▓▓▓▓▓▓░░░░░░` for 50%.
pub fn progress_bar(progress: f64) -> String {
    let filled = if progress.is_finite() && progress > 0.0 {
        ((progress / PERCENT_PER_CELL) as usize).min(PROGRESS_CELLS)
    } else {
        0
    };
    format!(
        "{}{}",
        "▓".repeat(filled),
        "░".repeat(PROGRESS_CELLS - filled)
    )
}

/// Approximate human size: `~1.5 MB`.
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("~{:.1} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("~{:.1} TB", size)
}

/// `m:ss`, minutes are not folded into hours.
pub fn format_duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Thousands separated with commas: `1,234,567`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

const DESCRIPTION_LIMIT: usize = 300;

pub fn truncate_description(text: &str) -> String {
    if text.chars().count() <= DESCRIPTION_LIMIT {
        return text.to_string();
    }
    let head: String = text.chars().take(DESCRIPTION_LIMIT - 3).collect();
    format!("{}...", head)
}

/// Button label for a video format, picked by resolution.
#[derive(Display, Debug, Clone, Copy, PartialEq)]
pub enum QualityTier {
    #[strum(to_string = "📼 SD")]
    Sd,
    #[strum(to_string = "📺 HD")]
    Hd,
    #[strum(to_string = "🖥 FullHD")]
    FullHd,
    #[strum(to_string = "🎮 2K")]
    TwoK,
    #[strum(to_string = "📱 4K")]
    FourK,
    #[strum(to_string = "🖥 4K UHD")]
    FourKUhd,
    #[strum(to_string = "🎥")]
    Other,
}

impl QualityTier {
    pub fn from_resolution(resolution: &str) -> Self {
        if resolution.contains("480") || resolution.contains("360") {
            Self::Sd
        } else if resolution.contains("720") {
            Self::Hd
        } else if resolution.contains("1080") {
            Self::FullHd
        } else if resolution.contains("1440") {
            Self::TwoK
        } else if resolution.contains("2160") {
            Self::FourK
        } else if resolution.contains("3840") {
            Self::FourKUhd
        } else {
            Self::Other
        }
    }
}
