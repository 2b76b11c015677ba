use crate::{Context, Error};

use pal_core::config::normalize_prefix;

/// View the prefix of this server.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Configuration",
    subcommands("set", "reset"),
    subcommand_required = false
)]
pub async fn prefix(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let prefix = match ctx.data().database.get_prefix(guild_id).await? {
        Some(prefix) => prefix,
        None => ctx.data().config.prefix.clone(),
    };

    ctx.say(format!("The prefix here is `{prefix}`")).await?;
    Ok(())
}

/// Set a custom prefix for this server.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Configuration",
    required_permissions = "MANAGE_GUILD",
    aliases("add")
)]
pub async fn set(
    ctx: Context<'_>,
    #[description = "The new prefix"] prefix: String,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let prefix = match normalize_prefix(&prefix) {
        Ok(prefix) => prefix,
        Err(e) => {
            ctx.say(e.to_string()).await?;
            return Ok(());
        }
    };

    ctx.data()
        .database
        .set_prefix(guild_id, Some(&prefix))
        .await?;

    ctx.say(format!("Set the prefix to `{prefix}`")).await?;
    Ok(())
}

/// Go back to the default prefix.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Configuration",
    required_permissions = "MANAGE_GUILD",
    aliases("remove", "default")
)]
pub async fn reset(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    ctx.data().database.set_prefix(guild_id, None).await?;

    ctx.say(format!(
        "Reset the prefix to `{}`",
        ctx.data().config.prefix
    ))
    .await?;
    Ok(())
}

#[must_use]
pub fn commands() -> [crate::Command; 1] {
    [prefix()]
}
