//! Scripted platform and in-memory store for exercising the starboard.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;
use serenity::all::{ChannelId, GuildId, MessageId, Timestamp, UserId};

use crate::model::{
    Author, ChannelInfo, ChannelKind, MessageKind, ReactionCount, RenderedEntry, SourceMessage,
    StarboardConfig, StarboardMessage, STAR,
};
use crate::platform::{PlatformError, StarboardPlatform};
use crate::store::StarboardStore;
use crate::Error;

pub const GUILD: GuildId = GuildId::new(1);
pub const GENERAL: ChannelId = ChannelId::new(10);
pub const STARBOARD: ChannelId = ChannelId::new(20);
pub const AUTHOR: UserId = UserId::new(500);
pub const REACTOR: UserId = UserId::new(600);

pub fn config(threshold: i32) -> StarboardConfig {
    StarboardConfig {
        guild_id: GUILD,
        channel_id: STARBOARD,
        emoji: STAR.to_owned(),
        threshold,
        self_star: true,
        colour: None,
    }
}

pub fn source_message(id: u64, content: &str) -> SourceMessage {
    SourceMessage {
        id: MessageId::new(id),
        channel_id: GENERAL,
        channel_name: "general".to_owned(),
        guild_id: GUILD,
        author: Author {
            id: AUTHOR,
            display_name: "starry".to_owned(),
            avatar_url: "https://cdn.discordapp.com/embed/avatars/0.png".to_owned(),
        },
        content: content.to_owned(),
        kind: MessageKind::Default,
        attachments: Vec::new(),
        embeds: Vec::new(),
        reactions: Vec::new(),
        reply: None,
        timestamp: Timestamp::from_unix_timestamp(1_700_000_000).unwrap(),
    }
}

/// A posted starboard entry as the fake platform remembers it.
#[derive(Clone, Debug)]
pub struct Posted {
    pub channel_id: ChannelId,
    pub entry: RenderedEntry,
}

pub struct FakePlatform {
    channels: HashMap<ChannelId, ChannelInfo>,
    no_send: HashSet<ChannelId>,
    members: HashSet<UserId>,
    pages: HashMap<String, String>,
    downloads: HashMap<String, Vec<u8>>,
    upload_limit: u64,
    messages: Mutex<HashMap<MessageId, SourceMessage>>,
    posted: Mutex<HashMap<MessageId, Posted>>,
    sends: AtomicU64,
    edits: AtomicU64,
    deletes: Mutex<Vec<MessageId>>,
    next_id: AtomicU64,
    fail_sends: AtomicBool,
    fail_edits: AtomicBool,
}

impl FakePlatform {
    pub fn new() -> Self {
        FakePlatform {
            channels: HashMap::new(),
            no_send: HashSet::new(),
            members: HashSet::new(),
            pages: HashMap::new(),
            downloads: HashMap::new(),
            upload_limit: 25 * 1024 * 1024,
            messages: Mutex::new(HashMap::new()),
            posted: Mutex::new(HashMap::new()),
            sends: AtomicU64::new(0),
            edits: AtomicU64::new(0),
            deletes: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(9000),
            fail_sends: AtomicBool::new(false),
            fail_edits: AtomicBool::new(false),
        }
    }

    /// `#general` and `#starboard`, both sfw, with both users cached.
    pub fn guild() -> Self {
        FakePlatform::new()
            .with_channel(GENERAL, ChannelKind::Text, false)
            .with_channel(STARBOARD, ChannelKind::Text, false)
            .with_member(AUTHOR)
            .with_member(REACTOR)
    }

    pub fn with_channel(mut self, id: ChannelId, kind: ChannelKind, nsfw: bool) -> Self {
        self.channels.insert(id, ChannelInfo { id, kind, nsfw });
        self
    }

    pub fn with_member(mut self, user_id: UserId) -> Self {
        self.members.insert(user_id);
        self
    }

    pub fn without_send(mut self, channel_id: ChannelId) -> Self {
        self.no_send.insert(channel_id);
        self
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_owned(), body.to_owned());
        self
    }

    pub fn with_download(mut self, url: &str, data: Vec<u8>) -> Self {
        self.downloads.insert(url.to_owned(), data);
        self
    }

    pub fn with_upload_limit(mut self, limit: u64) -> Self {
        self.upload_limit = limit;
        self
    }

    pub fn put_message(&self, message: SourceMessage) {
        self.messages.lock().insert(message.id, message);
    }

    /// Sets the reaction count for `emoji`, removing the reaction at zero.
    pub fn set_reaction(&self, message_id: MessageId, emoji: &str, count: u64) {
        let mut messages = self.messages.lock();
        let message = messages.get_mut(&message_id).expect("message exists");
        message.reactions.retain(|r| r.emoji != emoji);
        if count > 0 {
            message.reactions.push(ReactionCount {
                emoji: emoji.to_owned(),
                count,
            });
        }
    }

    pub fn forget_message(&self, message_id: MessageId) {
        self.messages.lock().remove(&message_id);
    }

    /// Deletes a posted entry behind the bot's back.
    pub fn remove_posted(&self, message_id: MessageId) {
        self.posted.lock().remove(&message_id);
    }

    pub fn fail_sends(&self) {
        self.fail_sends.store(true, Ordering::SeqCst);
    }

    /// Makes every edit fail the way a rate limited request does.
    pub fn fail_edits(&self) {
        self.fail_edits.store(true, Ordering::SeqCst);
    }

    pub fn posted(&self) -> HashMap<MessageId, Posted> {
        self.posted.lock().clone()
    }

    pub fn content_of(&self, message_id: MessageId) -> Option<String> {
        self.posted
            .lock()
            .get(&message_id)
            .map(|p| p.entry.content.clone())
    }

    pub fn sends(&self) -> u64 {
        self.sends.load(Ordering::SeqCst)
    }

    pub fn edits(&self) -> u64 {
        self.edits.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> Vec<MessageId> {
        self.deletes.lock().clone()
    }
}

#[serenity::async_trait]
impl StarboardPlatform for FakePlatform {
    fn channel(&self, _guild_id: GuildId, channel_id: ChannelId) -> Option<ChannelInfo> {
        self.channels.get(&channel_id).cloned()
    }

    fn can_send(&self, _guild_id: GuildId, channel_id: ChannelId) -> bool {
        !self.no_send.contains(&channel_id)
    }

    fn has_member(&self, _guild_id: GuildId, user_id: UserId) -> bool {
        self.members.contains(&user_id)
    }

    fn upload_limit(&self, _guild_id: GuildId) -> u64 {
        self.upload_limit
    }

    async fn fetch_message(
        &self,
        _guild_id: GuildId,
        _channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<SourceMessage, PlatformError> {
        // let other tasks in, like a real request would.
        tokio::task::yield_now().await;
        self.messages
            .lock()
            .get(&message_id)
            .cloned()
            .ok_or(PlatformError::NotFound)
    }

    async fn send_entry(
        &self,
        channel_id: ChannelId,
        entry: &RenderedEntry,
    ) -> Result<MessageId, PlatformError> {
        tokio::task::yield_now().await;
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(PlatformError::Discord(serenity::Error::Other(
                "Missing Permissions",
            )));
        }

        let id = MessageId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.sends.fetch_add(1, Ordering::SeqCst);
        self.posted.lock().insert(
            id,
            Posted {
                channel_id,
                entry: entry.clone(),
            },
        );
        Ok(id)
    }

    async fn edit_entry(
        &self,
        _channel_id: ChannelId,
        message_id: MessageId,
        content: &str,
    ) -> Result<(), PlatformError> {
        tokio::task::yield_now().await;
        if self.fail_edits.load(Ordering::SeqCst) {
            return Err(PlatformError::Discord(serenity::Error::Other(
                "You are being rate limited",
            )));
        }

        let mut posted = self.posted.lock();
        let entry = posted.get_mut(&message_id).ok_or(PlatformError::NotFound)?;
        entry.entry.content = content.to_owned();
        self.edits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete_message(
        &self,
        _channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), PlatformError> {
        tokio::task::yield_now().await;
        self.deletes.lock().push(message_id);
        self.posted
            .lock()
            .remove(&message_id)
            .map(|_| ())
            .ok_or(PlatformError::NotFound)
    }

    async fn fetch_page(&self, url: &str) -> Result<Option<String>, PlatformError> {
        Ok(self.pages.get(url).cloned())
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, PlatformError> {
        self.downloads.get(url).cloned().ok_or(PlatformError::NotFound)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub configs: Mutex<Vec<StarboardConfig>>,
    pub messages: Mutex<Vec<StarboardMessage>>,
    /// Config lookups for this emoji fail.
    pub broken_emoji: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn with_config(config: StarboardConfig) -> Self {
        let store = MemoryStore::default();
        store.configs.lock().push(config);
        store
    }

    pub fn records(&self) -> Vec<StarboardMessage> {
        self.messages.lock().clone()
    }
}

#[serenity::async_trait]
impl StarboardStore for MemoryStore {
    async fn starboard_for_emoji(
        &self,
        guild_id: GuildId,
        emoji: &str,
    ) -> Result<Option<StarboardConfig>, Error> {
        if self.broken_emoji.lock().as_deref() == Some(emoji) {
            return Err("connection reset".into());
        }

        Ok(self
            .configs
            .lock()
            .iter()
            .find(|c| c.guild_id == guild_id && c.emoji == emoji)
            .cloned())
    }

    async fn starboard_message(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: &str,
    ) -> Result<Option<MessageId>, Error> {
        tokio::task::yield_now().await;
        Ok(self
            .messages
            .lock()
            .iter()
            .find(|m| {
                m.guild_id == guild_id
                    && m.channel_id == channel_id
                    && m.message_id == message_id
                    && m.emoji == emoji
            })
            .map(|m| m.starboard_message_id))
    }

    async fn upsert_starboard_message(&self, record: &StarboardMessage) -> Result<(), Error> {
        let mut messages = self.messages.lock();
        if let Some(existing) = messages.iter_mut().find(|m| {
            m.guild_id == record.guild_id
                && m.channel_id == record.channel_id
                && m.message_id == record.message_id
                && m.emoji == record.emoji
        }) {
            existing.starboard_message_id = record.starboard_message_id;
        } else {
            messages.push(record.clone());
        }
        Ok(())
    }

    async fn delete_by_starboard_message(
        &self,
        guild_id: GuildId,
        starboard_message_id: MessageId,
    ) -> Result<(), Error> {
        self.messages.lock().retain(|m| {
            !(m.guild_id == guild_id && m.starboard_message_id == starboard_message_id)
        });
        Ok(())
    }

    async fn take_starboard_messages(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: Option<&str>,
    ) -> Result<Vec<StarboardMessage>, Error> {
        let mut messages = self.messages.lock();
        let (taken, kept): (Vec<_>, Vec<_>) = messages.drain(..).partition(|m| {
            m.guild_id == guild_id
                && m.channel_id == channel_id
                && m.message_id == message_id
                && emoji.map_or(true, |e| m.emoji == e)
        });
        *messages = kept;
        Ok(taken)
    }

    async fn delete_for_messages(
        &self,
        guild_id: GuildId,
        message_ids: &[MessageId],
    ) -> Result<Vec<StarboardMessage>, Error> {
        let mut messages = self.messages.lock();
        let (taken, kept): (Vec<_>, Vec<_>) = messages.drain(..).partition(|m| {
            m.guild_id == guild_id
                && (message_ids.contains(&m.message_id)
                    || message_ids.contains(&m.starboard_message_id))
        });
        *messages = kept;
        Ok(taken)
    }

    async fn delete_starboards_in(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<u64, Error> {
        let mut configs = self.configs.lock();
        let before = configs.len();
        configs.retain(|c| !(c.guild_id == guild_id && c.channel_id == channel_id));
        Ok((before - configs.len()) as u64)
    }
}
