use std::time::Duration;

use pal_core::data::structs::{Context, Error};
use poise::serenity_prelude::Permissions;
use poise::CreateReply;

pub async fn handle_cooldown(remaining_cooldown: Duration, ctx: Context<'_>) -> Result<(), Error> {
    let msg = format!(
        "You're too fast. Please wait {} seconds before retrying",
        remaining_cooldown.as_secs()
    );
    ctx.send(CreateReply::default().content(msg).ephemeral(true))
        .await?;

    Ok(())
}

/// The bot's permissions in the channel a command was invoked in.
pub fn bot_permissions(ctx: Context<'_>) -> Result<Permissions, Error> {
    if let poise::Context::Application(actx) = ctx {
        return actx
            .interaction
            .app_permissions
            .ok_or_else(|| "Interaction carried no permissions.".into());
    }

    prefix_bot_perms(ctx)
}

fn prefix_bot_perms(ctx: Context<'_>) -> Result<Permissions, Error> {
    let Some(guild) = ctx.guild() else {
        return Err("Could not retrieve guild from cache.".into());
    };

    let channel_id = ctx.channel_id();
    let (channel, is_thread) = if let Some(channel) = guild.channels.get(&channel_id) {
        (channel, false)
    } else {
        let parent = guild
            .threads
            .iter()
            .find(|t| t.id == channel_id)
            .and_then(|t| t.parent_id)
            .and_then(|parent_id| guild.channels.get(&parent_id))
            .ok_or("Could not retrieve channel from cache.")?;

        (parent, true)
    };

    let bot_id = ctx.serenity_context().cache.current_user().id;
    let Some(member) = guild.members.get(&bot_id) else {
        return Err("Could not retrieve the bot member from cache.".into());
    };

    let mut permissions = guild.user_permissions_in(channel, member);

    if is_thread && permissions.send_messages_in_threads() {
        permissions |= Permissions::SEND_MESSAGES;
    }

    Ok(permissions)
}
