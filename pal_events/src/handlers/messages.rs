use pal_core::data::structs::{Data, Error};
use pal_starboard::discord::SerenityPlatform;
use poise::serenity_prelude::{self as serenity, ChannelId, GuildId, MessageId};

pub async fn message_delete(
    ctx: &serenity::Context,
    channel_id: ChannelId,
    message_ids: &[MessageId],
    guild_id: Option<GuildId>,
    data: &Data,
) -> Result<(), Error> {
    let Some(guild_id) = guild_id else {
        return Ok(());
    };

    tracing::debug!(
        "{} message(s) deleted in {channel_id} ({guild_id})",
        message_ids.len()
    );

    let platform = SerenityPlatform::new(ctx, &data.reqwest);
    data.starboard
        .messages_deleted(&platform, &data.database, guild_id, message_ids)
        .await;
    Ok(())
}
