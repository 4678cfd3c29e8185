mod poller;
mod render;
mod telegram;

pub use poller::{PollSettings, track_progress};
pub use telegram::TelegramProgress;
