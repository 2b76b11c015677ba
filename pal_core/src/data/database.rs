use dashmap::{DashMap, DashSet};
use sqlx::postgres::{PgPool, PgPoolOptions};

use pal_starboard::model::StarboardConfig;
use poise::serenity_prelude::{ChannelId, GuildId, UserId};

use crate::data::structs::Error;

/// The postgres pool and the caches kept in front of it.
pub struct Database {
    pub db: PgPool,
    /// Custom guild prefixes, `None` when the guild uses the default.
    prefixes: DashMap<GuildId, Option<String>>,
    blacklist: DashSet<UserId>,
}

#[derive(sqlx::FromRow)]
pub(crate) struct StarboardRow {
    pub guild_id: i64,
    pub channel_id: i64,
    pub emoji: String,
    pub threshold: i32,
    pub self_star: bool,
    pub color: Option<i32>,
}

impl From<StarboardRow> for StarboardConfig {
    fn from(row: StarboardRow) -> Self {
        StarboardConfig {
            guild_id: GuildId::new(row.guild_id as u64),
            channel_id: ChannelId::new(row.channel_id as u64),
            emoji: row.emoji,
            threshold: row.threshold,
            self_star: row.self_star,
            colour: row.color.map(|c| c as u32),
        }
    }
}

impl Database {
    /// Connects, runs pending migrations and warms the blacklist cache.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, Error> {
        let db = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        sqlx::migrate!("../migrations").run(&db).await?;
        tracing::info!("Database migrations are up to date");

        let blacklisted: Vec<(i64,)> = sqlx::query_as("SELECT user_id FROM blacklist")
            .fetch_all(&db)
            .await?;

        let blacklist = DashSet::new();
        for (user_id,) in blacklisted {
            blacklist.insert(UserId::new(user_id as u64));
        }
        tracing::info!("Loaded {} blacklisted user(s)", blacklist.len());

        Ok(Database {
            db,
            prefixes: DashMap::new(),
            blacklist,
        })
    }

    pub async fn get_prefix(&self, guild_id: GuildId) -> Result<Option<String>, Error> {
        if let Some(cached) = self.prefixes.get(&guild_id) {
            return Ok(cached.clone());
        }

        let prefix: Option<(Option<String>,)> =
            sqlx::query_as("SELECT prefix FROM config WHERE guild_id = $1")
                .bind(i64::from(guild_id))
                .fetch_optional(&self.db)
                .await?;

        let prefix = prefix.and_then(|(p,)| p);
        tracing::debug!("Cached prefix {prefix:?} for {guild_id}");
        self.prefixes.insert(guild_id, prefix.clone());
        Ok(prefix)
    }

    /// Sets the guild prefix, `None` resets it to the default.
    pub async fn set_prefix(&self, guild_id: GuildId, prefix: Option<&str>) -> Result<(), Error> {
        sqlx::query(
            "INSERT INTO config (guild_id, prefix) VALUES ($1, $2)
            ON CONFLICT (guild_id) DO UPDATE SET prefix = $2",
        )
        .bind(i64::from(guild_id))
        .bind(prefix)
        .execute(&self.db)
        .await?;

        self.prefixes.insert(guild_id, prefix.map(ToOwned::to_owned));
        Ok(())
    }

    #[must_use]
    pub fn is_blacklisted(&self, user_id: UserId) -> bool {
        self.blacklist.contains(&user_id)
    }

    /// Returns false if the user was already blacklisted.
    pub async fn blacklist_user(&self, user_id: UserId, reason: Option<&str>) -> Result<bool, Error> {
        let result = sqlx::query(
            "INSERT INTO blacklist (user_id, reason) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(i64::from(user_id))
        .bind(reason)
        .execute(&self.db)
        .await?;

        self.blacklist.insert(user_id);
        tracing::info!("Blacklisted {user_id}");
        Ok(result.rows_affected() > 0)
    }

    pub async fn unblacklist_user(&self, user_id: UserId) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM blacklist WHERE user_id = $1")
            .bind(i64::from(user_id))
            .execute(&self.db)
            .await?;

        self.blacklist.remove(&user_id);
        Ok(result.rows_affected() > 0)
    }

    /// Returns false if the guild already has a starboard for this emoji.
    pub async fn add_starboard(&self, config: &StarboardConfig) -> Result<bool, Error> {
        let result = sqlx::query(
            "INSERT INTO starboard (guild_id, channel_id, emoji, threshold, self_star, color)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (guild_id, emoji) DO NOTHING",
        )
        .bind(i64::from(config.guild_id))
        .bind(i64::from(config.channel_id))
        .bind(&config.emoji)
        .bind(config.threshold)
        .bind(config.self_star)
        .bind(config.colour.map(|c| c as i32))
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn remove_starboard(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        emoji: &str,
    ) -> Result<bool, Error> {
        let result = sqlx::query(
            "DELETE FROM starboard WHERE guild_id = $1 AND channel_id = $2 AND emoji = $3",
        )
        .bind(i64::from(guild_id))
        .bind(i64::from(channel_id))
        .bind(emoji)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn starboards(&self, guild_id: GuildId) -> Result<Vec<StarboardConfig>, Error> {
        let rows: Vec<StarboardRow> = sqlx::query_as(
            "SELECT guild_id, channel_id, emoji, threshold, self_star, color
            FROM starboard WHERE guild_id = $1 ORDER BY emoji",
        )
        .bind(i64::from(guild_id))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(StarboardConfig::from).collect())
    }

    pub async fn set_self_star(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        emoji: &str,
        self_star: bool,
    ) -> Result<bool, Error> {
        let result = sqlx::query(
            "UPDATE starboard SET self_star = $4
            WHERE guild_id = $1 AND channel_id = $2 AND emoji = $3",
        )
        .bind(i64::from(guild_id))
        .bind(i64::from(channel_id))
        .bind(emoji)
        .bind(self_star)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn set_colour(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        emoji: &str,
        colour: Option<u32>,
    ) -> Result<bool, Error> {
        let result = sqlx::query(
            "UPDATE starboard SET color = $4
            WHERE guild_id = $1 AND channel_id = $2 AND emoji = $3",
        )
        .bind(i64::from(guild_id))
        .bind(i64::from(channel_id))
        .bind(emoji)
        .bind(colour.map(|c| c as i32))
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Drops cached state for a guild the bot left.
    pub fn forget_guild(&self, guild_id: GuildId) {
        self.prefixes.remove(&guild_id);
    }
}
