use serenity::all::{ChannelId, GuildId, MessageId, Timestamp, UserId};

/// The default star, the only emoji that gets tiered by count.
pub const STAR: &str = "⭐";

/// A starboard configured for one emoji in a guild.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StarboardConfig {
    pub guild_id: GuildId,
    /// The channel entries are posted to.
    pub channel_id: ChannelId,
    pub emoji: String,
    pub threshold: i32,
    /// Whether the author's own reaction counts towards posting.
    pub self_star: bool,
    pub colour: Option<u32>,
}

/// Links a source message to the entry posted for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StarboardMessage {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub emoji: String,
    pub starboard_message_id: MessageId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelKind {
    /// Text and announcement channels.
    Text,
    Thread,
    Other,
}

/// What the dispatcher needs to know about a cached channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelInfo {
    pub id: ChannelId,
    pub kind: ChannelKind,
    pub nsfw: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Default,
    Reply,
    /// Joins, pins, boosts and every other system message.
    System,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Author {
    pub id: UserId,
    pub display_name: String,
    pub avatar_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub url: String,
    pub size: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReactionCount {
    pub emoji: String,
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplyContext {
    pub author_name: String,
    pub jump_url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmbedAuthor {
    pub name: String,
    pub url: Option<String>,
    pub icon_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbedFooter {
    pub text: String,
    pub icon_url: Option<String>,
}

/// Plain embed data, read from a source message and written to an entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmbedData {
    /// The embed type Discord reports, `rich`, `image`, `gifv` and so on.
    pub kind: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub colour: Option<u32>,
    pub author: Option<EmbedAuthor>,
    pub image: Option<String>,
    pub thumbnail: Option<String>,
    pub fields: Vec<EmbedField>,
    pub footer: Option<EmbedFooter>,
    pub timestamp: Option<Timestamp>,
}

impl EmbedData {
    /// `image` and `gifv` embeds are link previews of a single piece of media.
    #[must_use]
    pub fn is_media(&self) -> bool {
        matches!(self.kind.as_deref(), Some("image" | "gifv"))
    }
}

/// A snapshot of a source message, taken when a reaction is handled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceMessage {
    pub id: MessageId,
    pub channel_id: ChannelId,
    pub channel_name: String,
    pub guild_id: GuildId,
    pub author: Author,
    pub content: String,
    pub kind: MessageKind,
    pub attachments: Vec<Attachment>,
    pub embeds: Vec<EmbedData>,
    pub reactions: Vec<ReactionCount>,
    pub reply: Option<ReplyContext>,
    pub timestamp: Timestamp,
}

impl SourceMessage {
    #[must_use]
    pub fn jump_url(&self) -> String {
        jump_url(self.guild_id, self.channel_id, self.id)
    }

    #[must_use]
    pub fn reaction(&self, emoji: &str) -> Option<&ReactionCount> {
        self.reactions.iter().find(|r| r.emoji == emoji)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Everything posted to the starboard channel for one source message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedEntry {
    pub content: String,
    pub embed: EmbedData,
    pub files: Vec<EntryFile>,
}

#[must_use]
pub fn jump_url(guild_id: GuildId, channel_id: ChannelId, message_id: MessageId) -> String {
    format!("https://discord.com/channels/{guild_id}/{channel_id}/{message_id}")
}
