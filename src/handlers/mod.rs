mod format_received;
mod invalid_link;
mod link_received;
mod video_card;

pub use format_received::format_received;
pub use invalid_link::invalid_link;
pub use link_received::link_received;
pub use video_card::FORMAT_CALLBACK_PREFIX;
