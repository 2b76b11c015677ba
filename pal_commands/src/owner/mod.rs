mod database;

use crate::{Context, Error};

use pal_core::emojis::Checkmark;
use poise::serenity_prelude as serenity;

/// Stop a user from running commands.
#[poise::command(
    prefix_command,
    category = "Owner",
    owners_only,
    hide_in_help,
    subcommands("blacklist_add", "blacklist_remove"),
    subcommand_required
)]
pub async fn blacklist(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

#[poise::command(
    rename = "add",
    prefix_command,
    category = "Owner",
    owners_only,
    hide_in_help
)]
pub async fn blacklist_add(
    ctx: Context<'_>,
    user: serenity::User,
    #[rest] reason: Option<String>,
) -> Result<(), Error> {
    let added = ctx
        .data()
        .database
        .blacklist_user(user.id, reason.as_deref())
        .await?;

    if added {
        tracing::info!("{} blacklisted {} ({})", ctx.author().id, user.tag(), user.id);
        acknowledge(ctx).await?;
    } else {
        ctx.say(format!("{} is already blacklisted.", user.tag()))
            .await?;
    }

    Ok(())
}

#[poise::command(
    rename = "remove",
    prefix_command,
    category = "Owner",
    owners_only,
    hide_in_help
)]
pub async fn blacklist_remove(ctx: Context<'_>, user: serenity::User) -> Result<(), Error> {
    if ctx.data().database.unblacklist_user(user.id).await? {
        tracing::info!("{} unblacklisted {} ({})", ctx.author().id, user.tag(), user.id);
        acknowledge(ctx).await?;
    } else {
        ctx.say(format!("{} is not blacklisted.", user.tag()))
            .await?;
    }

    Ok(())
}

/// Register or unregister application commands.
#[poise::command(prefix_command, category = "Owner", owners_only, hide_in_help)]
pub async fn register(ctx: Context<'_>) -> Result<(), Error> {
    poise::builtins::register_application_commands_buttons(ctx).await?;
    Ok(())
}

async fn acknowledge(ctx: Context<'_>) -> Result<(), Error> {
    match ctx {
        poise::Context::Prefix(pctx) => {
            pctx.msg.react(ctx.http(), Checkmark::reaction()).await?;
        }
        poise::Context::Application(_) => {
            ctx.say(Checkmark::STR).await?;
        }
    }
    Ok(())
}

#[must_use]
pub fn commands() -> [crate::Command; 3] {
    [blacklist(), register(), database::dbstats()]
}
