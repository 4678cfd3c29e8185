mod client;
pub mod types;

pub use client::VideoApi;
pub use types::{DownloadKind, TaskInfo, TaskStatus, VideoInfo};
