//! The serenity side of the starboard: cache lookups, HTTP and conversions
//! between gateway models and starboard snapshots.

use serenity::all::{
    Cache, ChannelId, ChannelType, Context, CreateAllowedMentions, CreateAttachment, CreateEmbed,
    CreateEmbedAuthor, CreateEmbedFooter, CreateMessage, EditMessage, Embed, Guild, GuildChannel,
    GuildId, Message, MessageId, MessageType, Permissions, PremiumTier, Reaction, User, UserId,
};

use crate::model::{
    jump_url, Attachment, Author, ChannelInfo, ChannelKind, EmbedAuthor, EmbedData, EmbedField,
    EmbedFooter, MessageKind, ReactionCount, RenderedEntry, ReplyContext, SourceMessage,
};
use crate::platform::{PlatformError, StarboardPlatform};
use crate::{ClearEvent, ReactionEvent, ReactionKind};

const MIB: u64 = 1024 * 1024;

pub struct SerenityPlatform<'a> {
    ctx: &'a Context,
    reqwest: &'a reqwest::Client,
}

impl<'a> SerenityPlatform<'a> {
    #[must_use]
    pub fn new(ctx: &'a Context, reqwest: &'a reqwest::Client) -> Self {
        Self { ctx, reqwest }
    }

    fn display_name(&self, guild_id: GuildId, user: &User) -> String {
        self.ctx
            .cache
            .guild(guild_id)
            .and_then(|g| member_nick(&g, user.id))
            .or_else(|| user.global_name.clone())
            .unwrap_or_else(|| user.name.clone())
    }

    fn channel_name(&self, guild_id: GuildId, channel_id: ChannelId) -> String {
        self.ctx
            .cache
            .guild(guild_id)
            .and_then(|g| guild_channel(&g, channel_id).map(|c| c.name.clone()))
            .unwrap_or_else(|| "unknown".to_owned())
    }

    fn source_message(&self, guild_id: GuildId, message: Message) -> SourceMessage {
        let reply = message
            .referenced_message
            .as_deref()
            .map(|replied| ReplyContext {
                author_name: self.display_name(guild_id, &replied.author),
                jump_url: jump_url(guild_id, replied.channel_id, replied.id),
            });

        SourceMessage {
            id: message.id,
            channel_id: message.channel_id,
            channel_name: self.channel_name(guild_id, message.channel_id),
            guild_id,
            author: Author {
                id: message.author.id,
                display_name: self.display_name(guild_id, &message.author),
                avatar_url: message.author.face(),
            },
            kind: message_kind(message.kind),
            attachments: message
                .attachments
                .into_iter()
                .map(|a| Attachment {
                    filename: a.filename,
                    url: a.url,
                    size: a.size,
                })
                .collect(),
            embeds: message.embeds.into_iter().map(embed_data).collect(),
            reactions: message
                .reactions
                .into_iter()
                .map(|r| ReactionCount {
                    emoji: r.reaction_type.to_string(),
                    count: r.count,
                })
                .collect(),
            reply,
            content: message.content,
            timestamp: message.timestamp,
        }
    }
}

fn guild_channel(guild: &Guild, channel_id: ChannelId) -> Option<&GuildChannel> {
    guild
        .channels
        .get(&channel_id)
        .or_else(|| guild.threads.iter().find(|t| t.id == channel_id))
}

fn member_nick(guild: &Guild, user_id: UserId) -> Option<String> {
    guild.members.get(&user_id).and_then(|m| m.nick.clone())
}

/// Finds the cached guild owning `channel_id`, threads included.
#[must_use]
pub fn guild_of_channel(cache: &Cache, channel_id: ChannelId) -> Option<GuildId> {
    cache.guilds().into_iter().find(|guild_id| {
        cache
            .guild(*guild_id)
            .is_some_and(|g| guild_channel(&g, channel_id).is_some())
    })
}

#[must_use]
pub fn channel_kind(kind: ChannelType) -> ChannelKind {
    match kind {
        ChannelType::Text | ChannelType::News => ChannelKind::Text,
        ChannelType::PublicThread | ChannelType::PrivateThread | ChannelType::NewsThread => {
            ChannelKind::Thread
        }
        _ => ChannelKind::Other,
    }
}

#[must_use]
pub fn message_kind(kind: MessageType) -> MessageKind {
    match kind {
        MessageType::Regular | MessageType::ChatInputCommand | MessageType::ContextMenuCommand => {
            MessageKind::Default
        }
        MessageType::InlineReply => MessageKind::Reply,
        _ => MessageKind::System,
    }
}

#[must_use]
pub fn upload_limit(tier: PremiumTier) -> u64 {
    match tier {
        PremiumTier::Tier2 => 50 * MIB,
        PremiumTier::Tier3 => 100 * MIB,
        _ => 25 * MIB,
    }
}

fn embed_data(embed: Embed) -> EmbedData {
    EmbedData {
        kind: embed.kind,
        title: embed.title,
        url: embed.url,
        description: embed.description,
        colour: embed.colour.map(|c| c.0),
        author: embed.author.map(|a| EmbedAuthor {
            name: a.name,
            url: a.url,
            icon_url: a.icon_url,
        }),
        image: embed.image.map(|i| i.url),
        thumbnail: embed.thumbnail.map(|t| t.url),
        fields: embed
            .fields
            .into_iter()
            .map(|f| EmbedField {
                name: f.name,
                value: f.value,
                inline: f.inline,
            })
            .collect(),
        footer: embed.footer.map(|f| EmbedFooter {
            text: f.text,
            icon_url: f.icon_url,
        }),
        timestamp: embed.timestamp,
    }
}

fn create_embed(embed: &EmbedData) -> CreateEmbed {
    let mut builder = CreateEmbed::new();

    if let Some(title) = &embed.title {
        builder = builder.title(title);
    }
    if let Some(url) = &embed.url {
        builder = builder.url(url);
    }
    if let Some(description) = &embed.description {
        builder = builder.description(description);
    }
    if let Some(colour) = embed.colour {
        builder = builder.colour(colour);
    }
    if let Some(author) = &embed.author {
        let mut create = CreateEmbedAuthor::new(&author.name);
        if let Some(url) = &author.url {
            create = create.url(url);
        }
        if let Some(icon_url) = &author.icon_url {
            create = create.icon_url(icon_url);
        }
        builder = builder.author(create);
    }
    if let Some(image) = &embed.image {
        builder = builder.image(image);
    }
    if let Some(thumbnail) = &embed.thumbnail {
        builder = builder.thumbnail(thumbnail);
    }
    for field in &embed.fields {
        builder = builder.field(&field.name, &field.value, field.inline);
    }
    if let Some(footer) = &embed.footer {
        let mut create = CreateEmbedFooter::new(&footer.text);
        if let Some(icon_url) = &footer.icon_url {
            create = create.icon_url(icon_url);
        }
        builder = builder.footer(create);
    }
    if let Some(timestamp) = embed.timestamp {
        builder = builder.timestamp(timestamp);
    }

    builder
}

#[serenity::async_trait]
impl StarboardPlatform for SerenityPlatform<'_> {
    fn channel(&self, guild_id: GuildId, channel_id: ChannelId) -> Option<ChannelInfo> {
        let guild = self.ctx.cache.guild(guild_id)?;
        let channel = guild_channel(&guild, channel_id)?;
        let kind = channel_kind(channel.kind);

        // threads carry no nsfw flag of their own.
        let nsfw = match kind {
            ChannelKind::Thread => channel
                .parent_id
                .and_then(|parent| guild.channels.get(&parent))
                .is_some_and(|parent| parent.nsfw),
            _ => channel.nsfw,
        };

        Some(ChannelInfo {
            id: channel_id,
            kind,
            nsfw,
        })
    }

    fn can_send(&self, guild_id: GuildId, channel_id: ChannelId) -> bool {
        let bot_id = self.ctx.cache.current_user().id;
        let Some(guild) = self.ctx.cache.guild(guild_id) else {
            return false;
        };
        let Some(member) = guild.members.get(&bot_id) else {
            return false;
        };
        let Some(channel) = guild_channel(&guild, channel_id) else {
            return false;
        };

        let (channel, send) = match channel_kind(channel.kind) {
            ChannelKind::Thread => match channel.parent_id.and_then(|p| guild.channels.get(&p)) {
                Some(parent) => (parent, Permissions::SEND_MESSAGES_IN_THREADS),
                None => return false,
            },
            _ => (channel, Permissions::SEND_MESSAGES),
        };

        guild
            .user_permissions_in(channel, member)
            .contains(Permissions::VIEW_CHANNEL | Permissions::EMBED_LINKS | send)
    }

    fn has_member(&self, guild_id: GuildId, user_id: UserId) -> bool {
        self.ctx
            .cache
            .guild(guild_id)
            .is_some_and(|g| g.members.contains_key(&user_id))
    }

    fn upload_limit(&self, guild_id: GuildId) -> u64 {
        self.ctx
            .cache
            .guild(guild_id)
            .map_or(25 * MIB, |g| upload_limit(g.premium_tier))
    }

    async fn fetch_message(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<SourceMessage, PlatformError> {
        let message = self.ctx.http.get_message(channel_id, message_id).await?;
        Ok(self.source_message(guild_id, message))
    }

    async fn send_entry(
        &self,
        channel_id: ChannelId,
        entry: &RenderedEntry,
    ) -> Result<MessageId, PlatformError> {
        let files = entry
            .files
            .iter()
            .map(|f| CreateAttachment::bytes(f.data.clone(), f.filename.clone()));

        let builder = CreateMessage::new()
            .content(&entry.content)
            .embed(create_embed(&entry.embed))
            .add_files(files)
            .allowed_mentions(CreateAllowedMentions::new());

        let message = channel_id.send_message(&self.ctx.http, builder).await?;
        Ok(message.id)
    }

    async fn edit_entry(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        content: &str,
    ) -> Result<(), PlatformError> {
        channel_id
            .edit_message(&self.ctx.http, message_id, EditMessage::new().content(content))
            .await?;
        Ok(())
    }

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), PlatformError> {
        channel_id
            .delete_message(&self.ctx.http, message_id)
            .await?;
        Ok(())
    }

    async fn fetch_page(&self, url: &str) -> Result<Option<String>, PlatformError> {
        let response = self.reqwest.get(url).send().await?;
        if response.status() != reqwest::StatusCode::OK {
            return Ok(None);
        }

        Ok(Some(response.text().await?))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, PlatformError> {
        let response = self.reqwest.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

impl ReactionEvent {
    /// `None` for reactions outside guilds or without a user.
    #[must_use]
    pub fn from_reaction(kind: ReactionKind, reaction: &Reaction) -> Option<Self> {
        Some(Self {
            kind,
            guild_id: reaction.guild_id?,
            channel_id: reaction.channel_id,
            message_id: reaction.message_id,
            user_id: reaction.user_id?,
            emoji: reaction.emoji.to_string(),
            member_in_payload: reaction.member.is_some(),
        })
    }
}

impl ClearEvent {
    /// A single emoji removed from a message, `None` outside guilds.
    #[must_use]
    pub fn from_reaction(reaction: &Reaction) -> Option<Self> {
        Some(Self {
            guild_id: reaction.guild_id?,
            channel_id: reaction.channel_id,
            message_id: reaction.message_id,
            emoji: Some(reaction.emoji.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serenity::all::Member;

    #[test]
    fn channel_types_map_to_kinds() {
        assert_eq!(channel_kind(ChannelType::Text), ChannelKind::Text);
        assert_eq!(channel_kind(ChannelType::News), ChannelKind::Text);
        assert_eq!(channel_kind(ChannelType::PublicThread), ChannelKind::Thread);
        assert_eq!(channel_kind(ChannelType::PrivateThread), ChannelKind::Thread);
        assert_eq!(channel_kind(ChannelType::Voice), ChannelKind::Other);
        assert_eq!(channel_kind(ChannelType::Forum), ChannelKind::Other);
    }

    #[test]
    fn only_regular_messages_and_replies_are_user_content() {
        assert_eq!(message_kind(MessageType::Regular), MessageKind::Default);
        assert_eq!(message_kind(MessageType::InlineReply), MessageKind::Reply);
        assert_eq!(message_kind(MessageType::MemberJoin), MessageKind::System);
        assert_eq!(message_kind(MessageType::PinsAdd), MessageKind::System);
    }

    #[test]
    fn boosted_guilds_accept_larger_uploads() {
        assert_eq!(upload_limit(PremiumTier::Tier0), 25 * MIB);
        assert_eq!(upload_limit(PremiumTier::Tier1), 25 * MIB);
        assert_eq!(upload_limit(PremiumTier::Tier2), 50 * MIB);
        assert_eq!(upload_limit(PremiumTier::Tier3), 100 * MIB);
    }

    fn channel(id: u64, kind: ChannelType) -> GuildChannel {
        let mut channel = GuildChannel::default();
        channel.id = ChannelId::new(id);
        channel.kind = kind;
        channel
    }

    #[test]
    fn guild_channels_include_threads() {
        let mut guild = Guild::default();
        guild
            .channels
            .insert(ChannelId::new(10), channel(10, ChannelType::Text));
        guild.threads.push(channel(11, ChannelType::PublicThread));

        assert_eq!(
            guild_channel(&guild, ChannelId::new(10)).map(|c| c.kind),
            Some(ChannelType::Text)
        );
        assert_eq!(
            guild_channel(&guild, ChannelId::new(11)).map(|c| c.kind),
            Some(ChannelType::PublicThread)
        );
        assert!(guild_channel(&guild, ChannelId::new(12)).is_none());
    }

    #[test]
    fn nicknames_come_from_cached_members() {
        let mut guild = Guild::default();
        let mut member = Member::default();
        member.user.id = UserId::new(5);
        member.nick = Some("stargazer".to_owned());
        guild.members.insert(member.user.id, member);

        assert_eq!(
            member_nick(&guild, UserId::new(5)).as_deref(),
            Some("stargazer")
        );
        assert_eq!(member_nick(&guild, UserId::new(6)), None);
    }

    #[test]
    fn uncached_channels_have_no_guild() {
        let cache = Cache::new();
        assert_eq!(guild_of_channel(&cache, ChannelId::new(10)), None);
    }
}
