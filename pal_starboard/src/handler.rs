use serenity::all::{MessageId, UserId};

use crate::model::{ChannelInfo, MessageKind, StarboardConfig, StarboardMessage};
use crate::pending::PendingDeletions;
use crate::platform::StarboardPlatform;
use crate::render::{entry_content, render_entry};
use crate::store::StarboardStore;
use crate::Error;

/// Why a reaction did not change the starboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Skip {
    NotTextChannel,
    NoStarboard,
    UnknownTarget,
    SameChannel,
    CannotSend,
    UnknownMember,
    Nsfw,
    MessageUnavailable,
    SelfStar,
    NotStarrable,
    NoReaction,
    BelowThreshold,
    NotPosted,
    EditFailed,
    SendFailed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Posted(MessageId),
    Edited(MessageId),
    /// The entry was deleted because its reaction is gone.
    Removed(MessageId),
    /// The entry had been deleted by someone else, its record was dropped.
    Stale(MessageId),
    Skipped(Skip),
}

/// Everything resolved about a reaction before the guild lock is taken.
pub(crate) struct Starring<'a> {
    pub config: &'a StarboardConfig,
    pub source: &'a ChannelInfo,
    pub target: &'a ChannelInfo,
    pub user_id: UserId,
    pub message_id: MessageId,
}

fn below_threshold(count: u64, threshold: i32) -> bool {
    count < u64::try_from(threshold).unwrap_or(0)
}

pub(crate) async fn star<P, S>(
    platform: &P,
    store: &S,
    starring: &Starring<'_>,
) -> Result<Outcome, Error>
where
    P: StarboardPlatform + ?Sized,
    S: StarboardStore + ?Sized,
{
    let Starring {
        config,
        source,
        target,
        user_id,
        message_id,
    } = *starring;

    if source.nsfw && !target.nsfw {
        return Ok(Outcome::Skipped(Skip::Nsfw));
    }

    let message = match platform
        .fetch_message(config.guild_id, source.id, message_id)
        .await
    {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!("Could not fetch starred message {message_id}: {e}");
            return Ok(Outcome::Skipped(Skip::MessageUnavailable));
        }
    };

    if message.author.id == user_id && !config.self_star {
        return Ok(Outcome::Skipped(Skip::SelfStar));
    }

    if (message.content.is_empty() && message.attachments.is_empty())
        || message.kind == MessageKind::System
    {
        return Ok(Outcome::Skipped(Skip::NotStarrable));
    }

    let Some(reaction) = message.reaction(&config.emoji) else {
        return Ok(Outcome::Skipped(Skip::NoReaction));
    };

    if below_threshold(reaction.count, config.threshold) {
        return Ok(Outcome::Skipped(Skip::BelowThreshold));
    }

    let existing = store
        .starboard_message(config.guild_id, source.id, message.id, &config.emoji)
        .await?;

    if let Some(entry_id) = existing {
        let content = entry_content(&reaction.emoji, reaction.count);
        match platform.edit_entry(target.id, entry_id, &content).await {
            Ok(()) => return Ok(Outcome::Edited(entry_id)),
            Err(e) if e.is_not_found() => {
                store
                    .delete_by_starboard_message(config.guild_id, entry_id)
                    .await?;
            }
            Err(e) => {
                tracing::warn!("Failed to edit starboard entry {entry_id}: {e}");
                return Ok(Outcome::Skipped(Skip::EditFailed));
            }
        }
    }

    let entry = render_entry(platform, config, reaction, &message).await;
    let posted = match platform.send_entry(target.id, &entry).await {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Failed to post starboard entry in {}: {e}", target.id);
            return Ok(Outcome::Skipped(Skip::SendFailed));
        }
    };

    store
        .upsert_starboard_message(&StarboardMessage {
            guild_id: config.guild_id,
            channel_id: source.id,
            message_id: message.id,
            emoji: config.emoji.clone(),
            starboard_message_id: posted,
        })
        .await?;

    tracing::info!(
        "Posted {} to the {} starboard in {} ({} reactions)",
        message.id,
        config.emoji,
        config.guild_id,
        reaction.count
    );

    Ok(Outcome::Posted(posted))
}

pub(crate) async fn unstar<P, S>(
    platform: &P,
    store: &S,
    pending: &PendingDeletions,
    starring: &Starring<'_>,
) -> Result<Outcome, Error>
where
    P: StarboardPlatform + ?Sized,
    S: StarboardStore + ?Sized,
{
    let Starring {
        config,
        source,
        target,
        message_id,
        ..
    } = *starring;

    let Some(entry_id) = store
        .starboard_message(config.guild_id, source.id, message_id, &config.emoji)
        .await?
    else {
        return Ok(Outcome::Skipped(Skip::NotPosted));
    };

    let message = match platform
        .fetch_message(config.guild_id, source.id, message_id)
        .await
    {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!("Could not fetch unstarred message {message_id}: {e}");
            return Ok(Outcome::Skipped(Skip::MessageUnavailable));
        }
    };

    let Some(reaction) = message.reaction(&config.emoji).filter(|r| r.count > 0) else {
        pending.mark(entry_id);
        if let Err(e) = platform.delete_message(target.id, entry_id).await {
            pending.take(entry_id);
            tracing::debug!("Could not delete starboard entry {entry_id}: {e}");
        }

        store
            .delete_by_starboard_message(config.guild_id, entry_id)
            .await?;

        tracing::info!(
            "Removed {message_id} from the {} starboard in {}",
            config.emoji,
            config.guild_id
        );
        return Ok(Outcome::Removed(entry_id));
    };

    let content = entry_content(&reaction.emoji, reaction.count);
    match platform.edit_entry(target.id, entry_id, &content).await {
        Ok(()) => Ok(Outcome::Edited(entry_id)),
        Err(e) if e.is_not_found() => {
            store
                .delete_by_starboard_message(config.guild_id, entry_id)
                .await?;
            Ok(Outcome::Stale(entry_id))
        }
        Err(e) => {
            tracing::warn!("Failed to edit starboard entry {entry_id}: {e}");
            Ok(Outcome::Skipped(Skip::EditFailed))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::below_threshold;

    #[test]
    fn threshold_is_inclusive() {
        assert!(below_threshold(2, 3));
        assert!(!below_threshold(3, 3));
        assert!(!below_threshold(4, 3));
        assert!(!below_threshold(0, -1));
    }
}
