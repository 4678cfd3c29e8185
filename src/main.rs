mod api;
mod commands;
mod config;
mod errors;
mod handlers;
mod progress;
mod schema;
mod session;
#[cfg(test)]
mod test_helpers;
mod utils;

use std::sync::Arc;

use teloxide::{prelude::*, utils::command::BotCommands};

use crate::{
    api::VideoApi,
    config::Config,
    progress::PollSettings,
    schema::{Command, schema},
    session::SessionStore,
};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    pretty_env_logger::init();
    log::info!("Starting video link bot...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return;
        }
    };
    log::debug!("Loaded {:?}", config);

    let api = match VideoApi::new(
        config.api_base_url.clone(),
        config.api_key.clone(),
        config.api_timeout,
    ) {
        Ok(api) => Arc::new(api),
        Err(e) => {
            log::error!("Failed to build video API client: {}", e);
            return;
        }
    };

    let bot = Bot::new(config.telegram_token.clone());
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        log::warn!("Couldn't register bot commands: {}", e);
    }
    let sessions = SessionStore::new();
    let poll_settings = Arc::new(PollSettings::from_config(&config));
    log::info!("Video API client ready for {}", config.api_base_url);

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![api, sessions, poll_settings])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
