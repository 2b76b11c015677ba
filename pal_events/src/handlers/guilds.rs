use pal_core::data::structs::{Data, Error};
use poise::serenity_prelude::{self as serenity, Guild, UnavailableGuild};

pub async fn guild_create(
    ctx: &serenity::Context,
    guild: &Guild,
    is_new: Option<bool>,
) -> Result<(), Error> {
    if let Some(true) = is_new {
        tracing::info!(
            "Joined {} (ID:{})! Now in {} guild(s)",
            guild.name,
            guild.id,
            ctx.cache.guilds().len()
        );
    }
    Ok(())
}

pub async fn guild_delete(
    ctx: &serenity::Context,
    incomplete: &UnavailableGuild,
    full: Option<&Guild>,
    data: &Data,
) -> Result<(), Error> {
    // an outage, not a removal.
    if incomplete.unavailable {
        return Ok(());
    }

    data.database.forget_guild(incomplete.id);

    let name = full.map_or("an uncached guild", |g| g.name.as_str());
    tracing::info!(
        "Left {name} (ID:{})! Now in {} guild(s)",
        incomplete.id,
        ctx.cache.guilds().len()
    );
    Ok(())
}
