use teloxide::{dispatching::UpdateHandler, prelude::*, utils::command::BotCommands};

use crate::{
    commands::*,
    errors::BotError,
    handlers::{FORMAT_CALLBACK_PREFIX, format_received, invalid_link, link_received},
    utils::is_supported_video_link,
};

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    /// Show start message
    Start,
    /// Forget the selected video.
    Cancel,
}

pub fn schema() -> UpdateHandler<BotError> {
    use dptree::case;

    dptree::entry()
        .branch(
            // Filter for messages
            Update::filter_message()
                .branch(
                    // Filter for commands
                    teloxide::filter_command::<Command, _>()
                        .branch(case![Command::Start].endpoint(start))
                        .branch(case![Command::Cancel].endpoint(cancel)),
                )
                // Filter for the supported video links
                .branch(
                    Message::filter_text()
                        .filter(|text: String| is_supported_video_link(&text))
                        .endpoint(link_received),
                )
                // Anything else that is not a command
                .branch(
                    Message::filter_text()
                        .filter(|text: String| !text.starts_with('/'))
                        .endpoint(invalid_link),
                ),
        )
        .branch(
            Update::filter_callback_query()
                .filter(|query: CallbackQuery| {
                    query
                        .data
                        .as_deref()
                        .is_some_and(|data| data.starts_with(FORMAT_CALLBACK_PREFIX))
                })
                .endpoint(format_received),
        )
}
