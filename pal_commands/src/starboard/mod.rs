mod args;

pub use args::{
    parse_colour, parse_emoji_arg, parse_threshold, parse_toggle, ColourError, ThresholdError,
};

use crate::{Context, Error};

use itertools::Itertools;
use pal_starboard::discord::channel_kind;
use pal_starboard::model::{ChannelKind, StarboardConfig};
use poise::serenity_prelude::{self as serenity, ReactionType};

const PER_PAGE: usize = 10;

/// Save popular messages to a designated channel.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Starboard",
    required_permissions = "MANAGE_GUILD",
    aliases("board", "star", "sb"),
    subcommands("add", "remove", "list", "selfstar", "color"),
    subcommand_required = false
)]
pub async fn starboard(ctx: Context<'_>) -> Result<(), Error> {
    poise::builtins::help(
        ctx,
        Some("starboard"),
        poise::builtins::HelpConfiguration::default(),
    )
    .await?;
    Ok(())
}

/// Add a starboard for a channel.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Starboard",
    required_permissions = "MANAGE_GUILD",
    aliases("create")
)]
pub async fn add(
    ctx: Context<'_>,
    #[description = "Channel to post starred messages in"] channel: serenity::GuildChannel,
    #[description = "Emoji to count"] emoji: String,
    #[description = "Reactions needed, `4` or `--threshold 4`"]
    #[rest]
    options: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    if channel_kind(channel.kind) == ChannelKind::Other {
        ctx.say("Starboards can only post in text channels and threads.")
            .await?;
        return Ok(());
    }

    let Some(emoji) = parse_emoji_arg(&emoji) else {
        ctx.say(format!("**{emoji}** is not a valid emoji")).await?;
        return Ok(());
    };

    let threshold = match parse_threshold(options.as_deref()) {
        Ok(threshold) => threshold,
        Err(e) => {
            ctx.say(e.to_string()).await?;
            return Ok(());
        }
    };

    // reacting proves the bot can actually use a custom emoji.
    if let poise::Context::Prefix(pctx) = ctx {
        let reaction = ReactionType::try_from(emoji.as_str())?;
        if pctx.msg.react(ctx.http(), reaction).await.is_err() {
            ctx.say(format!("**{emoji}** is not a valid emoji")).await?;
            return Ok(());
        }
    }

    let config = StarboardConfig {
        guild_id,
        channel_id: channel.id,
        emoji,
        threshold,
        self_star: true,
        colour: None,
    };

    if !ctx.data().database.add_starboard(&config).await? {
        ctx.say(format!(
            "There is already a **starboard** using **{}**",
            config.emoji
        ))
        .await?;
        return Ok(());
    }

    tracing::info!(
        "Added a {} starboard for {} in {guild_id} (threshold {threshold})",
        config.emoji,
        channel.id
    );

    ctx.say(format!(
        "Added a **starboard** for <#{}> using **{}** (threshold: `{threshold}`)",
        channel.id, config.emoji
    ))
    .await?;

    Ok(())
}

/// Remove a starboard from a channel.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Starboard",
    required_permissions = "MANAGE_GUILD",
    aliases("delete", "del", "rm")
)]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "Channel the starboard posts in"] channel: serenity::GuildChannel,
    #[description = "Emoji of the starboard"] emoji: String,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let emoji = parse_emoji_arg(&emoji).unwrap_or(emoji);
    let removed = ctx
        .data()
        .database
        .remove_starboard(guild_id, channel.id, &emoji)
        .await?;

    if removed {
        ctx.say(format!(
            "Removed the **starboard** for <#{}> using **{emoji}**",
            channel.id
        ))
        .await?;
    } else {
        ctx.say(format!("There isn't a **starboard** using **{emoji}**"))
            .await?;
    }

    Ok(())
}

/// Render the starboards of a guild into pages for `paginate`.
fn list_pages(configs: &[StarboardConfig]) -> Vec<String> {
    configs
        .iter()
        .map(|c| {
            let mut line = format!(
                "<#{}> - **{}** (threshold: `{}`)",
                c.channel_id, c.emoji, c.threshold
            );
            if !c.self_star {
                line.push_str(" no self stars");
            }
            line
        })
        .chunks(PER_PAGE)
        .into_iter()
        .map(|mut page| page.join("\n"))
        .collect()
}

/// View all starboards.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Starboard",
    required_permissions = "MANAGE_GUILD",
    aliases("show", "all")
)]
pub async fn list(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let configs = ctx.data().database.starboards(guild_id).await?;
    if configs.is_empty() {
        ctx.say("No **starboards** have been set up").await?;
        return Ok(());
    }

    let pages = list_pages(&configs);
    let pages = pages.iter().map(String::as_str).collect::<Vec<_>>();
    poise::builtins::paginate(ctx, &pages).await?;

    Ok(())
}

/// Allow or forbid authors starring their own messages.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Starboard",
    required_permissions = "MANAGE_GUILD",
    aliases("self-star", "self_star")
)]
pub async fn selfstar(
    ctx: Context<'_>,
    #[description = "Channel the starboard posts in"] channel: serenity::GuildChannel,
    #[description = "Emoji of the starboard"] emoji: String,
    #[description = "on or off"] enabled: String,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let Some(enabled) = parse_toggle(&enabled) else {
        ctx.say(format!("`{enabled}` is not `on` or `off`")).await?;
        return Ok(());
    };

    let emoji = parse_emoji_arg(&emoji).unwrap_or(emoji);
    let updated = ctx
        .data()
        .database
        .set_self_star(guild_id, channel.id, &emoji, enabled)
        .await?;

    if !updated {
        ctx.say(format!("There isn't a **starboard** using **{emoji}**"))
            .await?;
        return Ok(());
    }

    let state = if enabled { "now count" } else { "no longer count" };
    ctx.say(format!(
        "Self stars {state} towards the **{emoji}** starboard"
    ))
    .await?;

    Ok(())
}

/// Set the embed colour of a starboard's posts.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Starboard",
    required_permissions = "MANAGE_GUILD",
    aliases("colour")
)]
pub async fn color(
    ctx: Context<'_>,
    #[description = "Channel the starboard posts in"] channel: serenity::GuildChannel,
    #[description = "Emoji of the starboard"] emoji: String,
    #[description = "Hex colour, or none"] colour: String,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let colour = match parse_colour(&colour) {
        Ok(colour) => colour,
        Err(e) => {
            ctx.say(e.to_string()).await?;
            return Ok(());
        }
    };

    let emoji = parse_emoji_arg(&emoji).unwrap_or(emoji);
    let updated = ctx
        .data()
        .database
        .set_colour(guild_id, channel.id, &emoji, colour)
        .await?;

    if !updated {
        ctx.say(format!("There isn't a **starboard** using **{emoji}**"))
            .await?;
        return Ok(());
    }

    let message = match colour {
        Some(colour) => format!("The **{emoji}** starboard now uses `#{colour:06x}`"),
        None => format!("The **{emoji}** starboard now uses the default colour"),
    };
    ctx.say(message).await?;

    Ok(())
}

#[must_use]
pub fn commands() -> [crate::Command; 1] {
    [starboard()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use poise::serenity_prelude::{ChannelId, GuildId};

    fn config(channel: u64, emoji: &str) -> StarboardConfig {
        StarboardConfig {
            guild_id: GuildId::new(1),
            channel_id: ChannelId::new(channel),
            emoji: emoji.to_owned(),
            threshold: 3,
            self_star: true,
            colour: None,
        }
    }

    #[test]
    fn list_is_paged() {
        let configs = (1..=23).map(|i| config(i, "⭐")).collect::<Vec<_>>();
        let pages = list_pages(&configs);

        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].lines().count(), 10);
        assert_eq!(pages[2].lines().count(), 3);
        assert_eq!(
            pages[0].lines().next(),
            Some("<#1> - **⭐** (threshold: `3`)")
        );
    }

    #[test]
    fn list_marks_boards_without_self_stars() {
        let mut strict = config(5, "🤡");
        strict.self_star = false;

        let pages = list_pages(&[strict]);
        assert_eq!(pages, vec!["<#5> - **🤡** (threshold: `3`) no self stars"]);
    }
}
