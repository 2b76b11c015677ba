use serenity::all::{ChannelId, GuildId, MessageId};

use crate::model::{StarboardConfig, StarboardMessage};
use crate::Error;

/// Persistence for starboard configuration and posted entries.
#[serenity::async_trait]
pub trait StarboardStore: Send + Sync {
    async fn starboard_for_emoji(
        &self,
        guild_id: GuildId,
        emoji: &str,
    ) -> Result<Option<StarboardConfig>, Error>;

    async fn starboard_message(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: &str,
    ) -> Result<Option<MessageId>, Error>;

    /// Inserts the record, replacing the entry id if one already exists.
    async fn upsert_starboard_message(&self, record: &StarboardMessage) -> Result<(), Error>;

    async fn delete_by_starboard_message(
        &self,
        guild_id: GuildId,
        starboard_message_id: MessageId,
    ) -> Result<(), Error>;

    /// Deletes and returns the records of a source message, for one emoji or
    /// for all of them.
    async fn take_starboard_messages(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: Option<&str>,
    ) -> Result<Vec<StarboardMessage>, Error>;

    /// Deletes and returns every record whose source message or entry is in
    /// `message_ids`.
    async fn delete_for_messages(
        &self,
        guild_id: GuildId,
        message_ids: &[MessageId],
    ) -> Result<Vec<StarboardMessage>, Error>;

    /// Deletes every starboard posting into `channel_id`, returning how many.
    async fn delete_starboards_in(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<u64, Error>;
}
