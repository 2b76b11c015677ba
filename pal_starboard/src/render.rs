use std::sync::LazyLock;

use regex::Regex;

use crate::model::{
    EmbedAuthor, EmbedData, EmbedField, EntryFile, ReactionCount, RenderedEntry, SourceMessage,
    StarboardConfig, STAR,
};
use crate::platform::StarboardPlatform;

/// Longest description Discord accepts on an embed.
pub const MAX_DESC: usize = 4096;
/// Most fields Discord accepts on an embed.
pub const MAX_FIELDS: usize = 25;

static TENOR_GIF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://(?:c|media\d*)\.tenor\.com/[^\s"'<>()]+?\.gif\b"#).unwrap()
});

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AttachmentKind {
    Image,
    Media,
    Other,
}

fn attachment_kind(filename: &str) -> AttachmentKind {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("png" | "jpg" | "jpeg" | "gif" | "webp") => AttachmentKind::Image,
        Some("mp4" | "mov" | "webm" | "mp3" | "ogg" | "wav") => AttachmentKind::Media,
        _ => AttachmentKind::Other,
    }
}

/// The emoji shown next to the count. Only the default star escalates.
#[must_use]
pub fn tiered_emoji(emoji: &str, count: u64) -> &str {
    if emoji != STAR {
        return emoji;
    }

    match count {
        0..=4 => STAR,
        5..=9 => "🌟",
        10..=24 => "💫",
        _ => "✨",
    }
}

/// Formats `count` with thousands separators.
#[must_use]
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

#[must_use]
pub fn entry_content(emoji: &str, count: u64) -> String {
    format!("{} **#{}**", tiered_emoji(emoji, count), format_count(count))
}

/// Cuts `text` to at most `max` characters, ending in an ellipsis when cut.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_owned();
    }

    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Finds the direct gif behind a tenor page.
#[must_use]
pub fn extract_tenor_gif(page: &str) -> Option<&str> {
    TENOR_GIF.find(page).map(|m| m.as_str())
}

async fn media_image<P>(platform: &P, media: &EmbedData, url: &str) -> Option<String>
where
    P: StarboardPlatform + ?Sized,
{
    if media.kind.as_deref() == Some("image") {
        return Some(url.to_owned());
    }

    match platform.fetch_page(url).await {
        Ok(Some(page)) => {
            if let Some(gif) = extract_tenor_gif(&page) {
                return Some(gif.to_owned());
            }
        }
        Ok(None) => {}
        Err(e) => tracing::debug!("Could not fetch gif page {url}: {e}"),
    }

    media.thumbnail.clone()
}

/// Builds the starboard post for `message`.
pub async fn render_entry<P>(
    platform: &P,
    config: &StarboardConfig,
    reaction: &ReactionCount,
    message: &SourceMessage,
) -> RenderedEntry
where
    P: StarboardPlatform + ?Sized,
{
    let first = message.embeds.first();
    let mut embed = match first {
        Some(seed) if !seed.is_media() => seed.clone(),
        _ => EmbedData {
            colour: config.colour,
            ..EmbedData::default()
        },
    };

    let jump_url = message.jump_url();
    embed.author = Some(EmbedAuthor {
        name: message.author.display_name.clone(),
        url: Some(jump_url.clone()),
        icon_url: Some(message.author.avatar_url.clone()),
    });

    let mut description = [Some(message.content.as_str()), embed.description.as_deref()]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if let Some(media) = first.filter(|e| e.is_media()) {
        if let Some(url) = &media.url {
            description = description.replace(url.as_str(), "").trim().to_owned();
            embed.image = media_image(platform, media, url).await;
        }
    }

    let limit = platform.upload_limit(message.guild_id);
    let mut files = Vec::new();
    for attachment in &message.attachments {
        match attachment_kind(&attachment.filename) {
            AttachmentKind::Image => embed.image = Some(attachment.url.clone()),
            AttachmentKind::Media if u64::from(attachment.size) <= limit => {
                match platform.download(&attachment.url).await {
                    Ok(data) => files.push(EntryFile {
                        filename: attachment.filename.clone(),
                        data,
                    }),
                    Err(e) => tracing::warn!("Failed to download {}: {e}", attachment.filename),
                }
            }
            _ => {}
        }
    }

    embed.description = (!description.is_empty()).then(|| truncate(&description, MAX_DESC));

    // room for the reply and channel fields pushed below.
    let appended = 1 + usize::from(message.reply.is_some());
    embed.fields.truncate(MAX_FIELDS - appended);

    if let Some(reply) = &message.reply {
        embed.fields.push(EmbedField {
            name: format!("**Replying to {}**", reply.author_name),
            value: format!("[Jump to reply]({})", reply.jump_url),
            inline: false,
        });
    }

    embed.fields.push(EmbedField {
        name: format!("**#{}**", message.channel_name),
        value: format!("[Jump to message]({jump_url})"),
        inline: false,
    });
    embed.timestamp = Some(message.timestamp);

    RenderedEntry {
        content: entry_content(&reaction.emoji, reaction.count),
        embed,
        files,
    }
}
