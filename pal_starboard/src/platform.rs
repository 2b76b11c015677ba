use serenity::all::{ChannelId, GuildId, MessageId, UserId};

use crate::model::{ChannelInfo, RenderedEntry, SourceMessage};

#[derive(Debug)]
pub enum PlatformError {
    /// The message or channel no longer exists.
    NotFound,
    Discord(serenity::Error),
    Http(reqwest::Error),
}

impl PlatformError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, PlatformError::NotFound)
    }
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            PlatformError::NotFound => write!(f, "Unknown message or channel."),
            PlatformError::Discord(ref e) => write!(f, "{e}"),
            PlatformError::Http(ref e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for PlatformError {}

impl From<serenity::Error> for PlatformError {
    fn from(error: serenity::Error) -> Self {
        if let serenity::Error::Http(http) = &error {
            if http.status_code().is_some_and(|s| s.as_u16() == 404) {
                return PlatformError::NotFound;
            }
        }

        PlatformError::Discord(error)
    }
}

impl From<reqwest::Error> for PlatformError {
    fn from(error: reqwest::Error) -> Self {
        PlatformError::Http(error)
    }
}

/// The chat platform as seen by the starboard.
///
/// Lookups answer from the gateway cache and never suspend; everything else
/// goes over HTTP.
#[serenity::async_trait]
pub trait StarboardPlatform: Send + Sync {
    fn channel(&self, guild_id: GuildId, channel_id: ChannelId) -> Option<ChannelInfo>;

    /// Whether the bot may post in `channel_id`.
    fn can_send(&self, guild_id: GuildId, channel_id: ChannelId) -> bool;

    fn has_member(&self, guild_id: GuildId, user_id: UserId) -> bool;

    /// Largest upload the guild accepts, in bytes.
    fn upload_limit(&self, guild_id: GuildId) -> u64;

    async fn fetch_message(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<SourceMessage, PlatformError>;

    async fn send_entry(
        &self,
        channel_id: ChannelId,
        entry: &RenderedEntry,
    ) -> Result<MessageId, PlatformError>;

    /// Replaces the content of a posted entry, leaving its embed alone.
    async fn edit_entry(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        content: &str,
    ) -> Result<(), PlatformError>;

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), PlatformError>;

    /// Body of a web page, `None` when the server did not answer 200.
    async fn fetch_page(&self, url: &str) -> Result<Option<String>, PlatformError>;

    async fn download(&self, url: &str) -> Result<Vec<u8>, PlatformError>;
}
