use pal_core::data::structs::{Data, Error};
use poise::serenity_prelude::{ChannelId, GuildId};

/// Handles both channels and threads, either can hold a starboard.
pub async fn channel_delete(
    guild_id: GuildId,
    channel_id: ChannelId,
    data: &Data,
) -> Result<(), Error> {
    data.starboard
        .channel_deleted(&data.database, guild_id, channel_id)
        .await;
    Ok(())
}
