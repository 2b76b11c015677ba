use pal_core::data::structs::{Data, Error};
use pal_starboard::discord::{guild_of_channel, SerenityPlatform};
use pal_starboard::{ClearEvent, ReactionEvent, ReactionKind};
use poise::serenity_prelude::{self as serenity, ChannelId, MessageId, Reaction};

pub async fn reaction_add(
    ctx: &serenity::Context,
    reaction: &Reaction,
    data: &Data,
) -> Result<(), Error> {
    handle_reaction(ctx, ReactionKind::Star, reaction, data).await;
    Ok(())
}

pub async fn reaction_remove(
    ctx: &serenity::Context,
    reaction: &Reaction,
    data: &Data,
) -> Result<(), Error> {
    handle_reaction(ctx, ReactionKind::Unstar, reaction, data).await;
    Ok(())
}

async fn handle_reaction(
    ctx: &serenity::Context,
    kind: ReactionKind,
    reaction: &Reaction,
    data: &Data,
) {
    let Some(event) = ReactionEvent::from_reaction(kind, reaction) else {
        return;
    };

    // the bot's own reactions never count.
    if event.user_id == ctx.cache.current_user().id {
        return;
    }

    let platform = SerenityPlatform::new(ctx, &data.reqwest);
    data.starboard
        .reaction(&platform, &data.database, &event)
        .await;
}

pub async fn reaction_remove_emoji(
    ctx: &serenity::Context,
    reaction: &Reaction,
    data: &Data,
) -> Result<(), Error> {
    let Some(event) = ClearEvent::from_reaction(reaction) else {
        return Ok(());
    };

    let platform = SerenityPlatform::new(ctx, &data.reqwest);
    data.starboard
        .reactions_cleared(&platform, &data.database, &event)
        .await;
    Ok(())
}

pub async fn reaction_remove_all(
    ctx: &serenity::Context,
    channel_id: ChannelId,
    message_id: MessageId,
    data: &Data,
) -> Result<(), Error> {
    // the event carries no guild, the cache knows it for guild channels.
    let Some(guild_id) = guild_of_channel(&ctx.cache, channel_id) else {
        return Ok(());
    };

    let event = ClearEvent {
        guild_id,
        channel_id,
        message_id,
        emoji: None,
    };

    let platform = SerenityPlatform::new(ctx, &data.reqwest);
    data.starboard
        .reactions_cleared(&platform, &data.database, &event)
        .await;
    Ok(())
}
