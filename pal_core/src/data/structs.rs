use std::sync::atomic::AtomicBool;
use std::time::Instant;

use pal_starboard::Starboard;

use crate::config::BotConfig;
use crate::data::database::Database;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type PrefixContext<'a> = poise::PrefixContext<'a, Data, Error>;
pub type FrameworkContext<'a> = poise::FrameworkContext<'a, Data, Error>;
pub type Command = poise::Command<Data, Error>;

pub struct Data {
    /// If the bots startup has been handled in the `on_ready` event.
    pub has_started: AtomicBool,
    /// Time the bot started.
    pub time_started: Instant,
    /// Wrapper for the bots database with helper functions.
    pub database: Database,
    /// Http client.
    pub reqwest: reqwest::Client,
    pub config: BotConfig,
    /// Per guild locks and pending deletions for the starboard.
    pub starboard: Starboard,
}

impl Data {
    #[must_use]
    pub fn new(config: BotConfig, database: Database) -> Self {
        Data {
            has_started: AtomicBool::new(false),
            time_started: Instant::now(),
            database,
            reqwest: reqwest::Client::new(),
            config,
            starboard: Starboard::new(),
        }
    }

    /// Whether `user_id` is one of the configured bot owners.
    #[must_use]
    pub fn is_owner(&self, user_id: poise::serenity_prelude::UserId) -> bool {
        self.config.owners.contains(&user_id)
    }
}

