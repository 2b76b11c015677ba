use crate::{Context, Error};

use poise::serenity_prelude::{self as serenity, CreateEmbedFooter};
use sqlx::{query, Pool, Postgres, Row};
use std::fmt::Write;

#[poise::command(
    rename = "dbstats",
    aliases("db-stats", "db-info"),
    prefix_command,
    category = "Owner",
    owners_only,
    hide_in_help
)]
pub async fn dbstats(ctx: Context<'_>) -> Result<(), Error> {
    let db_pool = &ctx.data().database.db;

    let starboard_tables = [("starboard", "emoji"), ("starboard_messages", "message_id")];
    let misc_tables = [("config", "guild_id"), ("blacklist", "user_id")];

    let mut embed = serenity::CreateEmbed::default().title("Database Stats");

    let (Ok(starboard_info), Ok(misc_info)) = tokio::join!(
        query_table_info(db_pool, &starboard_tables),
        query_table_info(db_pool, &misc_tables),
    ) else {
        ctx.say("Failed to query information.").await?;
        return Ok(());
    };

    embed = embed.field("Starboard", starboard_info, true);
    embed = embed.field("Miscellaneous", misc_info, true);

    let row = query("SELECT pg_database_size(current_database())")
        .fetch_one(db_pool)
        .await?;
    let db_size_bytes: i64 = row.get(0);
    let db_size = format!("{:.2} MB", db_size_bytes as f64 / (1024.0 * 1024.0));

    embed = embed.footer(CreateEmbedFooter::new(format!("Database size: {db_size}")));
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

async fn query_table_info(
    db_pool: &Pool<Postgres>,
    tables: &[(&str, &str)],
) -> Result<String, Error> {
    let mut info = String::new();

    for (table_name, column) in tables {
        let sql_query = format!("SELECT COUNT({column}) FROM {table_name}");
        let row = query(&sql_query).fetch_one(db_pool).await?;

        let count: i64 = row.get(0);

        writeln!(info, "**{table_name}**\n{count}")?;
    }

    Ok(info)
}
