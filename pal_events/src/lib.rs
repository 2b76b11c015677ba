#![warn(clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::wildcard_imports,
    clippy::module_name_repetitions,
    clippy::unused_async
)]

use pal_core::data::structs::{Data, Error, FrameworkContext};
use poise::serenity_prelude::{self as serenity, FullEvent};

pub mod handlers;
use handlers::*;

pub async fn event_handler(
    ctx: &serenity::Context,
    event: &FullEvent,
    _framework: FrameworkContext<'_>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        FullEvent::ReactionAdd { add_reaction, .. } => {
            reactions::reaction_add(ctx, add_reaction, data).await?;
        }
        FullEvent::ReactionRemove {
            removed_reaction, ..
        } => {
            reactions::reaction_remove(ctx, removed_reaction, data).await?;
        }
        FullEvent::ReactionRemoveEmoji {
            removed_reactions, ..
        } => {
            reactions::reaction_remove_emoji(ctx, removed_reactions, data).await?;
        }
        FullEvent::ReactionRemoveAll {
            channel_id,
            removed_from_message_id,
            ..
        } => {
            reactions::reaction_remove_all(ctx, *channel_id, *removed_from_message_id, data)
                .await?;
        }
        FullEvent::MessageDelete {
            channel_id,
            deleted_message_id,
            guild_id,
            ..
        } => {
            messages::message_delete(ctx, *channel_id, &[*deleted_message_id], *guild_id, data)
                .await?;
        }
        FullEvent::MessageDeleteBulk {
            channel_id,
            multiple_deleted_messages_ids,
            guild_id,
            ..
        } => {
            messages::message_delete(
                ctx,
                *channel_id,
                multiple_deleted_messages_ids,
                *guild_id,
                data,
            )
            .await?;
        }
        FullEvent::ChannelDelete { channel, .. } => {
            channels::channel_delete(channel.guild_id, channel.id, data).await?;
        }
        FullEvent::ThreadDelete { thread, .. } => {
            channels::channel_delete(thread.guild_id, thread.id, data).await?;
        }
        FullEvent::GuildCreate { guild, is_new, .. } => {
            guilds::guild_create(ctx, guild, *is_new).await?;
        }
        FullEvent::GuildDelete {
            incomplete, full, ..
        } => {
            guilds::guild_delete(ctx, incomplete, full.as_ref(), data).await?;
        }
        FullEvent::Ready { data_about_bot, .. } => {
            misc::ready(ctx, data_about_bot, data).await?;
        }
        _ => {}
    }
    Ok(())
}
