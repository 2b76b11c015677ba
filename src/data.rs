use pal_core::config::BotConfig;
use pal_core::data::database::Database;
use pal_core::data::structs::{Data, Error};

pub async fn setup(config: BotConfig) -> Result<Data, Error> {
    let database = Database::connect(&config.database_url, config.max_connections).await?;
    tracing::info!("Connected to the database");

    Ok(Data::new(config, database))
}

/// The guild's own prefix, or the default one in DMs and unconfigured guilds.
pub async fn dynamic_prefix(
    ctx: poise::PartialContext<'_, Data, Error>,
) -> Result<Option<String>, Error> {
    let data = ctx.data;
    let Some(guild_id) = ctx.guild_id else {
        return Ok(Some(data.config.prefix.clone()));
    };

    match data.database.get_prefix(guild_id).await {
        Ok(Some(prefix)) => Ok(Some(prefix)),
        Ok(None) => Ok(Some(data.config.prefix.clone())),
        Err(e) => {
            tracing::warn!("Failed to get prefix for {guild_id}: {e}");
            Ok(Some(data.config.prefix.clone()))
        }
    }
}
