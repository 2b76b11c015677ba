use pal_starboard::model::{StarboardConfig, StarboardMessage};
use pal_starboard::StarboardStore;
use poise::serenity_prelude::{ChannelId, GuildId, MessageId};

use crate::data::database::{Database, StarboardRow};
use crate::data::structs::Error;

#[derive(sqlx::FromRow)]
struct StarboardMessageRow {
    guild_id: i64,
    channel_id: i64,
    message_id: i64,
    emoji: String,
    starboard_message_id: i64,
}

impl From<StarboardMessageRow> for StarboardMessage {
    fn from(row: StarboardMessageRow) -> Self {
        StarboardMessage {
            guild_id: GuildId::new(row.guild_id as u64),
            channel_id: ChannelId::new(row.channel_id as u64),
            message_id: MessageId::new(row.message_id as u64),
            emoji: row.emoji,
            starboard_message_id: MessageId::new(row.starboard_message_id as u64),
        }
    }
}

#[serenity::async_trait]
impl StarboardStore for Database {
    async fn starboard_for_emoji(
        &self,
        guild_id: GuildId,
        emoji: &str,
    ) -> Result<Option<StarboardConfig>, Error> {
        let row: Option<StarboardRow> = sqlx::query_as(
            "SELECT guild_id, channel_id, emoji, threshold, self_star, color
            FROM starboard WHERE guild_id = $1 AND emoji = $2",
        )
        .bind(i64::from(guild_id))
        .bind(emoji)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(StarboardConfig::from))
    }

    async fn starboard_message(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: &str,
    ) -> Result<Option<MessageId>, Error> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT starboard_message_id FROM starboard_messages
            WHERE guild_id = $1 AND channel_id = $2 AND message_id = $3 AND emoji = $4",
        )
        .bind(i64::from(guild_id))
        .bind(i64::from(channel_id))
        .bind(i64::from(message_id))
        .bind(emoji)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(|(id,)| MessageId::new(id as u64)))
    }

    async fn upsert_starboard_message(&self, record: &StarboardMessage) -> Result<(), Error> {
        sqlx::query(
            "INSERT INTO starboard_messages
            (guild_id, channel_id, message_id, emoji, starboard_message_id)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (guild_id, channel_id, message_id, emoji)
            DO UPDATE SET starboard_message_id = $5",
        )
        .bind(i64::from(record.guild_id))
        .bind(i64::from(record.channel_id))
        .bind(i64::from(record.message_id))
        .bind(&record.emoji)
        .bind(i64::from(record.starboard_message_id))
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn delete_by_starboard_message(
        &self,
        guild_id: GuildId,
        starboard_message_id: MessageId,
    ) -> Result<(), Error> {
        sqlx::query(
            "DELETE FROM starboard_messages WHERE guild_id = $1 AND starboard_message_id = $2",
        )
        .bind(i64::from(guild_id))
        .bind(i64::from(starboard_message_id))
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn take_starboard_messages(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: Option<&str>,
    ) -> Result<Vec<StarboardMessage>, Error> {
        let rows: Vec<StarboardMessageRow> = sqlx::query_as(
            "DELETE FROM starboard_messages
            WHERE guild_id = $1 AND channel_id = $2 AND message_id = $3
            AND ($4::TEXT IS NULL OR emoji = $4)
            RETURNING guild_id, channel_id, message_id, emoji, starboard_message_id",
        )
        .bind(i64::from(guild_id))
        .bind(i64::from(channel_id))
        .bind(i64::from(message_id))
        .bind(emoji)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(StarboardMessage::from).collect())
    }

    async fn delete_for_messages(
        &self,
        guild_id: GuildId,
        message_ids: &[MessageId],
    ) -> Result<Vec<StarboardMessage>, Error> {
        let ids = message_ids
            .iter()
            .map(|id| i64::from(*id))
            .collect::<Vec<_>>();

        let rows: Vec<StarboardMessageRow> = sqlx::query_as(
            "DELETE FROM starboard_messages
            WHERE guild_id = $1
            AND (message_id = ANY($2) OR starboard_message_id = ANY($2))
            RETURNING guild_id, channel_id, message_id, emoji, starboard_message_id",
        )
        .bind(i64::from(guild_id))
        .bind(ids)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(StarboardMessage::from).collect())
    }

    async fn delete_starboards_in(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<u64, Error> {
        // entries of these starboards go with them through the foreign key.
        let result = sqlx::query("DELETE FROM starboard WHERE guild_id = $1 AND channel_id = $2")
            .bind(i64::from(guild_id))
            .bind(i64::from(channel_id))
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected())
    }
}
