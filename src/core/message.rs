//! Message model handed to the layout layer.
//!
//! A [`Message`] is immutable once it reaches the layout code. Its content is
//! a [`MessageKind`], a tagged union whose discriminant ([`KindTag`]) picks
//! the sizing functions and the cell renderer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::font::FontStyle;
use crate::core::geometry::Size;
use crate::core::media::{AudioItem, ContactItem, LinkPreview, LocationItem, MediaItem};
use crate::core::member::Member;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sender {
    pub id: String,
    pub display_name: String,
}

impl Sender {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageKind {
    Text {
        text: String,
    },
    /// Text rendered with a specific face.
    AttributedText {
        text: String,
        #[serde(default)]
        font: FontStyle,
    },
    Emoji {
        text: String,
    },
    Photo {
        #[serde(default)]
        caption: String,
        media: MediaItem,
    },
    Video {
        #[serde(default)]
        caption: String,
        media: MediaItem,
    },
    Gif {
        #[serde(default)]
        caption: String,
        media: MediaItem,
    },
    Audio {
        audio: AudioItem,
        #[serde(default)]
        caption: String,
    },
    File {
        #[serde(default)]
        caption: String,
        media: MediaItem,
    },
    Contact {
        contact: ContactItem,
    },
    Location {
        location: LocationItem,
    },
    LinkPreview {
        preview: LinkPreview,
    },
    /// Section header spanning the whole cell, like a date separator.
    Header {
        text: String,
        #[serde(default)]
        additional_height: f32,
    },
    /// Host-drawn content with a declared size.
    Custom {
        size: Size,
        #[serde(default)]
        payload: serde_json::Value,
    },
}

/// Field-less discriminant of [`MessageKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindTag {
    Text,
    AttributedText,
    Emoji,
    Photo,
    Video,
    Gif,
    Audio,
    File,
    Contact,
    Location,
    LinkPreview,
    Header,
    Custom,
}

impl KindTag {
    pub fn is_media(self) -> bool {
        matches!(self, KindTag::Photo | KindTag::Video | KindTag::Gif)
    }
}

impl MessageKind {
    pub fn tag(&self) -> KindTag {
        match self {
            MessageKind::Text { .. } => KindTag::Text,
            MessageKind::AttributedText { .. } => KindTag::AttributedText,
            MessageKind::Emoji { .. } => KindTag::Emoji,
            MessageKind::Photo { .. } => KindTag::Photo,
            MessageKind::Video { .. } => KindTag::Video,
            MessageKind::Gif { .. } => KindTag::Gif,
            MessageKind::Audio { .. } => KindTag::Audio,
            MessageKind::File { .. } => KindTag::File,
            MessageKind::Contact { .. } => KindTag::Contact,
            MessageKind::Location { .. } => KindTag::Location,
            MessageKind::LinkPreview { .. } => KindTag::LinkPreview,
            MessageKind::Header { .. } => KindTag::Header,
            MessageKind::Custom { .. } => KindTag::Custom,
        }
    }

    /// The body text or caption, if the kind carries one.
    pub fn text(&self) -> Option<&str> {
        match self {
            MessageKind::Text { text }
            | MessageKind::AttributedText { text, .. }
            | MessageKind::Emoji { text }
            | MessageKind::Header { text, .. } => Some(text),
            MessageKind::Photo { caption, .. }
            | MessageKind::Video { caption, .. }
            | MessageKind::Gif { caption, .. }
            | MessageKind::Audio { caption, .. }
            | MessageKind::File { caption, .. } => Some(caption),
            MessageKind::LinkPreview { preview } => preview.text.as_deref(),
            MessageKind::Contact { .. }
            | MessageKind::Location { .. }
            | MessageKind::Custom { .. } => None,
        }
    }

    pub fn media(&self) -> Option<&MediaItem> {
        match self {
            MessageKind::Photo { media, .. }
            | MessageKind::Video { media, .. }
            | MessageKind::Gif { media, .. }
            | MessageKind::File { media, .. } => Some(media),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub sender: Sender,
    pub sent_at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: MessageKind,
    /// Internal notes are only visible to the team and get their own background.
    #[serde(default)]
    pub is_internal: bool,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub edited: bool,
}

impl Message {
    pub fn new(sender: Sender, sent_at: DateTime<Utc>, kind: MessageKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            sent_at,
            kind,
            is_internal: false,
            members: Vec::new(),
            edited: false,
        }
    }

    pub fn text(sender: Sender, sent_at: DateTime<Utc>, text: impl Into<String>) -> Self {
        Self::new(sender, sent_at, MessageKind::Text { text: text.into() })
    }

    pub fn tag(&self) -> KindTag {
        self.kind.tag()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_decodes_flattened_kind() {
        let json = r#"{
            "sender": {"id": "u-1", "display_name": "Ada"},
            "sent_at": "2024-03-14T15:05:00Z",
            "kind": "photo",
            "caption": "look",
            "media": {"url": "https://cdn.test/cat.png"}
        }"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.tag(), KindTag::Photo);
        assert_eq!(message.kind.text(), Some("look"));
        assert_eq!(
            message.kind.media().map(|m| m.size),
            Some(crate::core::media::DEFAULT_MEDIA_SIZE)
        );
        assert!(!message.is_internal);
    }

    #[test]
    fn test_attributed_text_defaults_to_regular() {
        let json = r#"{
            "sender": {"id": "u-1", "display_name": "Ada"},
            "sent_at": "2024-03-14T15:05:00Z",
            "kind": "attributed_text",
            "text": "hi"
        }"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(
            message.kind,
            MessageKind::AttributedText {
                text: "hi".into(),
                font: FontStyle::Regular
            }
        );
    }

    #[test]
    fn test_serializes_kind_tag() {
        let sent_at = Utc.with_ymd_and_hms(2024, 3, 14, 15, 5, 0).unwrap();
        let message = Message::text(Sender::new("u-1", "Ada"), sent_at, "hello");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["kind"], "text");
        assert_eq!(value["text"], "hello");
    }

    #[test]
    fn test_text_accessor_per_kind() {
        let contact = MessageKind::Contact {
            contact: ContactItem {
                display_name: "Grace".into(),
                phone_numbers: vec![],
                emails: vec![],
            },
        };
        assert_eq!(contact.text(), None);
        let header = MessageKind::Header {
            text: "Today".into(),
            additional_height: 4.0,
        };
        assert_eq!(header.text(), Some("Today"));
        assert_eq!(header.tag(), KindTag::Header);
    }
}
