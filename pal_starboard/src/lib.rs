#![warn(clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation
)]

pub mod discord;
mod handler;
pub mod locks;
pub mod model;
pub mod pending;
pub mod platform;
pub mod render;
pub mod store;

#[cfg(test)]
mod testing;

use serenity::all::{ChannelId, GuildId, MessageId, UserId};

pub use handler::{Outcome, Skip};
use handler::Starring;
use locks::GuildLocks;
use model::{ChannelKind, StarboardMessage};
use pending::PendingDeletions;
pub use platform::{PlatformError, StarboardPlatform};
pub use store::StarboardStore;

pub type Error = Box<dyn std::error::Error + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReactionKind {
    Star,
    Unstar,
}

/// A reaction added to or removed from a guild message.
#[derive(Clone, Debug)]
pub struct ReactionEvent {
    pub kind: ReactionKind,
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub user_id: UserId,
    pub emoji: String,
    /// Whether the gateway sent the reacting member along.
    pub member_in_payload: bool,
}

/// Reactions cleared from a message, for one emoji or all of them.
#[derive(Clone, Debug)]
pub struct ClearEvent {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub emoji: Option<String>,
}

/// Turns gateway events into starboard posts, edits and removals.
#[derive(Default)]
pub struct Starboard {
    locks: GuildLocks,
    pending: PendingDeletions,
}

impl Starboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn pending(&self) -> &PendingDeletions {
        &self.pending
    }

    /// Handles a reaction, logging and discarding any failure.
    pub async fn reaction<P, S>(&self, platform: &P, store: &S, event: &ReactionEvent)
    where
        P: StarboardPlatform + ?Sized,
        S: StarboardStore + ?Sized,
    {
        match self.try_reaction(platform, store, event).await {
            Ok(Outcome::Skipped(reason)) => {
                tracing::debug!("Starboard ignored reaction on {}: {reason:?}", event.message_id);
            }
            Ok(outcome) => tracing::debug!("Starboard reaction on {}: {outcome:?}", event.message_id),
            Err(e) => tracing::warn!(
                "Error handling starboard reaction on {}: {e}",
                event.message_id
            ),
        }
    }

    pub async fn try_reaction<P, S>(
        &self,
        platform: &P,
        store: &S,
        event: &ReactionEvent,
    ) -> Result<Outcome, Error>
    where
        P: StarboardPlatform + ?Sized,
        S: StarboardStore + ?Sized,
    {
        let guild_id = event.guild_id;

        let Some(source) = platform
            .channel(guild_id, event.channel_id)
            .filter(|c| c.kind == ChannelKind::Text)
        else {
            return Ok(Outcome::Skipped(Skip::NotTextChannel));
        };

        let Some(config) = store.starboard_for_emoji(guild_id, &event.emoji).await? else {
            return Ok(Outcome::Skipped(Skip::NoStarboard));
        };

        let Some(target) = platform
            .channel(guild_id, config.channel_id)
            .filter(|c| c.kind != ChannelKind::Other)
        else {
            return Ok(Outcome::Skipped(Skip::UnknownTarget));
        };

        if source.id == target.id {
            return Ok(Outcome::Skipped(Skip::SameChannel));
        }

        if !platform.can_send(guild_id, target.id) {
            return Ok(Outcome::Skipped(Skip::CannotSend));
        }

        if !event.member_in_payload && !platform.has_member(guild_id, event.user_id) {
            return Ok(Outcome::Skipped(Skip::UnknownMember));
        }

        let starring = Starring {
            config: &config,
            source: &source,
            target: &target,
            user_id: event.user_id,
            message_id: event.message_id,
        };

        let lock = self.locks.lock_for(guild_id);
        let _guard = lock.lock().await;

        match event.kind {
            ReactionKind::Star => handler::star(platform, store, &starring).await,
            ReactionKind::Unstar => {
                handler::unstar(platform, store, &self.pending, &starring).await
            }
        }
    }

    pub async fn reactions_cleared<P, S>(&self, platform: &P, store: &S, event: &ClearEvent)
    where
        P: StarboardPlatform + ?Sized,
        S: StarboardStore + ?Sized,
    {
        if let Err(e) = self.try_reactions_cleared(platform, store, event).await {
            tracing::warn!(
                "Error handling cleared reactions on {}: {e}",
                event.message_id
            );
        }
    }

    /// Removes the entries of a message whose reactions were cleared,
    /// returning how many records were dropped.
    pub async fn try_reactions_cleared<P, S>(
        &self,
        platform: &P,
        store: &S,
        event: &ClearEvent,
    ) -> Result<usize, Error>
    where
        P: StarboardPlatform + ?Sized,
        S: StarboardStore + ?Sized,
    {
        if platform
            .channel(event.guild_id, event.channel_id)
            .map_or(true, |c| c.kind != ChannelKind::Text)
        {
            return Ok(0);
        }

        let lock = self.locks.lock_for(event.guild_id);
        let _guard = lock.lock().await;

        let records = store
            .take_starboard_messages(
                event.guild_id,
                event.channel_id,
                event.message_id,
                event.emoji.as_deref(),
            )
            .await?;

        self.remove_entries(platform, store, event.guild_id, &records)
            .await;

        Ok(records.len())
    }

    pub async fn messages_deleted<P, S>(
        &self,
        platform: &P,
        store: &S,
        guild_id: GuildId,
        message_ids: &[MessageId],
    ) where
        P: StarboardPlatform + ?Sized,
        S: StarboardStore + ?Sized,
    {
        if let Err(e) = self
            .try_messages_deleted(platform, store, guild_id, message_ids)
            .await
        {
            tracing::warn!("Error handling deleted messages in {guild_id}: {e}");
        }
    }

    /// Drops the records of deleted source messages and deleted entries.
    ///
    /// Ids the bot deleted itself are skipped one by one, so a bulk delete
    /// that only partly overlaps is still handled for the rest. Entries whose
    /// source message went away are deleted as well.
    pub async fn try_messages_deleted<P, S>(
        &self,
        platform: &P,
        store: &S,
        guild_id: GuildId,
        message_ids: &[MessageId],
    ) -> Result<usize, Error>
    where
        P: StarboardPlatform + ?Sized,
        S: StarboardStore + ?Sized,
    {
        let deleted = self.pending.take_unmarked(message_ids);
        if deleted.is_empty() {
            return Ok(0);
        }

        let lock = self.locks.lock_for(guild_id);
        let _guard = lock.lock().await;

        let records = store.delete_for_messages(guild_id, &deleted).await?;

        let orphans = records
            .iter()
            .filter(|r| {
                deleted.contains(&r.message_id) && !deleted.contains(&r.starboard_message_id)
            })
            .cloned()
            .collect::<Vec<_>>();

        self.remove_entries(platform, store, guild_id, &orphans)
            .await;

        Ok(records.len())
    }

    /// Drops every starboard that posts into a deleted channel.
    pub async fn channel_deleted<S>(&self, store: &S, guild_id: GuildId, channel_id: ChannelId)
    where
        S: StarboardStore + ?Sized,
    {
        match store.delete_starboards_in(guild_id, channel_id).await {
            Ok(0) => {}
            Ok(removed) => tracing::info!(
                "Removed {removed} starboard(s) for deleted channel {channel_id} in {guild_id}"
            ),
            Err(e) => tracing::warn!("Error removing starboards for {channel_id}: {e}"),
        }
    }

    /// Deletes the posted entries of records that were already dropped.
    async fn remove_entries<P, S>(
        &self,
        platform: &P,
        store: &S,
        guild_id: GuildId,
        records: &[StarboardMessage],
    ) where
        P: StarboardPlatform + ?Sized,
        S: StarboardStore + ?Sized,
    {
        for record in records {
            // the records are gone already, so keep going for the rest.
            let config = match store.starboard_for_emoji(guild_id, &record.emoji).await {
                Ok(Some(config)) => config,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(
                        "Error looking up the {} starboard in {guild_id}: {e}",
                        record.emoji
                    );
                    continue;
                }
            };

            let entry_id = record.starboard_message_id;
            self.pending.mark(entry_id);
            if let Err(e) = platform.delete_message(config.channel_id, entry_id).await {
                self.pending.take(entry_id);
                tracing::debug!("Could not delete starboard entry {entry_id}: {e}");
            }
        }
    }
}
