//! # Kind-Specific Sizing
//!
//! Each message kind gets a pair of pure functions: the widest its bubble
//! may be, and the bubble size given that width. [`sizing_for`] is the
//! dispatch table keyed by [`KindTag`].
//!
//! A sizing function handed a kind it does not handle panics. That can only
//! happen when the table is wired wrong.

use crate::core::geometry::{EdgeInsets, HorizontalEdgeInsets, Size};
use crate::core::message::{KindTag, Message, MessageKind};
use crate::layout::style::CalculatorConfig;
use crate::layout::text;

/// Everything a sizing function reads.
#[derive(Debug, Clone, Copy)]
pub struct SizingInput<'a> {
    pub message: &'a Message,
    pub config: &'a CalculatorConfig,
    pub item_width: f32,
    pub avatar_size: Size,
    pub container_padding: EdgeInsets,
    pub accessory_size: Size,
    pub accessory_padding: HorizontalEdgeInsets,
}

pub struct KindSizing {
    pub name: &'static str,
    pub max_width: fn(&SizingInput) -> f32,
    pub container_size: fn(&SizingInput) -> Size,
    /// Insets of the text inside the bubble.
    pub label_insets: fn(&CalculatorConfig) -> EdgeInsets,
}

pub static HEADER: KindSizing = KindSizing {
    name: "header",
    max_width: header_max_width,
    container_size: header_container_size,
    label_insets: |config| config.header_insets,
};

pub static MEDIA: KindSizing = KindSizing {
    name: "media",
    max_width: default_max_width,
    container_size: media_container_size,
    label_insets: |config| config.media_insets,
};

pub static TEXT: KindSizing = KindSizing {
    name: "text",
    max_width: default_max_width,
    container_size: text_container_size,
    label_insets: |config| config.text_insets,
};

pub static ATTACHMENT: KindSizing = KindSizing {
    name: "attachment",
    max_width: default_max_width,
    container_size: attachment_container_size,
    label_insets: |config| config.text_insets,
};

pub static CONTACT: KindSizing = KindSizing {
    name: "contact",
    max_width: default_max_width,
    container_size: contact_container_size,
    label_insets: |_| EdgeInsets::ZERO,
};

pub static LOCATION: KindSizing = KindSizing {
    name: "location",
    max_width: default_max_width,
    container_size: location_container_size,
    label_insets: |_| EdgeInsets::ZERO,
};

pub static LINK_PREVIEW: KindSizing = KindSizing {
    name: "link preview",
    max_width: default_max_width,
    container_size: link_preview_container_size,
    label_insets: |config| config.text_insets,
};

pub static CUSTOM: KindSizing = KindSizing {
    name: "custom",
    max_width: default_max_width,
    container_size: custom_container_size,
    label_insets: |_| EdgeInsets::ZERO,
};

pub fn sizing_for(tag: KindTag) -> &'static KindSizing {
    match tag {
        KindTag::Header => &HEADER,
        KindTag::Photo | KindTag::Video | KindTag::Gif => &MEDIA,
        KindTag::Text | KindTag::AttributedText | KindTag::Emoji => &TEXT,
        KindTag::File | KindTag::Audio => &ATTACHMENT,
        KindTag::Contact => &CONTACT,
        KindTag::Location => &LOCATION,
        KindTag::LinkPreview => &LINK_PREVIEW,
        KindTag::Custom => &CUSTOM,
    }
}

fn unhandled(sizing: &str, kind: &MessageKind) -> ! {
    panic!(
        "{sizing} sizing received unhandled message kind {:?}",
        kind.tag()
    )
}

/// Item width less avatar, container padding and accessory.
pub fn default_max_width(input: &SizingInput) -> f32 {
    input.item_width
        - input.avatar_size.width
        - input.container_padding.horizontal()
        - input.accessory_size.width
        - input.accessory_padding.horizontal()
}

/// Headers span the cell, so the avatar is not subtracted.
pub fn header_max_width(input: &SizingInput) -> f32 {
    input.item_width
        - input.container_padding.horizontal()
        - input.accessory_size.width
        - input.accessory_padding.horizontal()
        - input.config.metrics.header_width_inset
}

pub fn header_container_size(input: &SizingInput) -> Size {
    let MessageKind::Header {
        text,
        additional_height,
    } = &input.message.kind
    else {
        unhandled(HEADER.name, &input.message.kind)
    };
    let metrics = &input.config.metrics;
    let max_width = header_max_width(input);
    let measured = text::measure(text, max_width, metrics, 1.0);
    let height = if text.is_empty() {
        measured.height
    } else {
        measured.height + measured.height * metrics.header_height_factor + additional_height
    };
    let insets = input.config.header_insets;
    Size::new(max_width - insets.horizontal(), height + insets.vertical())
}

pub fn media_container_size(input: &SizingInput) -> Size {
    let caption = match &input.message.kind {
        MessageKind::Photo { caption, .. }
        | MessageKind::Video { caption, .. }
        | MessageKind::Gif { caption, .. } => caption,
        other => unhandled(MEDIA.name, other),
    };
    let metrics = &input.config.metrics;
    let max_width = default_max_width(input);
    let caption_height = text::measure(caption, max_width, metrics, 1.0).height;
    let insets = input.config.media_insets;
    Size::new(
        max_width + insets.horizontal(),
        caption_height + insets.vertical() + metrics.media_height,
    )
}

pub fn text_container_size(input: &SizingInput) -> Size {
    let metrics = &input.config.metrics;
    let (body, scale) = match &input.message.kind {
        MessageKind::Text { text } | MessageKind::AttributedText { text, .. } => (text, 1.0),
        MessageKind::Emoji { text } => (text, metrics.emoji_scale),
        other => unhandled(TEXT.name, other),
    };
    let insets = input.config.text_insets;
    let max_width = default_max_width(input) - insets.horizontal();
    let measured = text::measure(body, max_width, metrics, scale);
    Size::new(
        measured.width + insets.horizontal(),
        measured.height + insets.vertical(),
    )
}

pub fn attachment_container_size(input: &SizingInput) -> Size {
    let caption = match &input.message.kind {
        MessageKind::File { caption, .. } | MessageKind::Audio { caption, .. } => caption,
        other => unhandled(ATTACHMENT.name, other),
    };
    let metrics = &input.config.metrics;
    let max_width = default_max_width(input);
    let caption_height = text::measure(caption, max_width, metrics, 1.0).height;
    Size::new(max_width, caption_height + metrics.attachment_height)
}

pub fn contact_container_size(input: &SizingInput) -> Size {
    if !matches!(input.message.kind, MessageKind::Contact { .. }) {
        unhandled(CONTACT.name, &input.message.kind)
    }
    let fixed = input.config.metrics.contact_size;
    Size::new(fixed.width.min(default_max_width(input)), fixed.height)
}

pub fn location_container_size(input: &SizingInput) -> Size {
    if !matches!(input.message.kind, MessageKind::Location { .. }) {
        unhandled(LOCATION.name, &input.message.kind)
    }
    let fixed = input.config.metrics.location_size;
    Size::new(fixed.width.min(default_max_width(input)), fixed.height)
}

pub fn link_preview_container_size(input: &SizingInput) -> Size {
    let MessageKind::LinkPreview { preview } = &input.message.kind else {
        unhandled(LINK_PREVIEW.name, &input.message.kind)
    };
    let metrics = &input.config.metrics;
    let insets = input.config.text_insets;
    let max_width = default_max_width(input);
    let text_width = max_width - insets.horizontal();
    let measured: f32 = [
        preview.text.as_deref().unwrap_or(""),
        preview.title.as_deref().unwrap_or(""),
        preview.teaser.as_str(),
    ]
    .iter()
    .map(|part| text::measure(part, text_width, metrics, 1.0).height)
    .sum();
    let thumbnail = if preview.thumbnail_url.is_some() {
        metrics.link_thumbnail_height
    } else {
        0.0
    };
    Size::new(max_width, measured + thumbnail + insets.vertical())
}

pub fn custom_container_size(input: &SizingInput) -> Size {
    match &input.message.kind {
        MessageKind::Custom { size, .. } => *size,
        other => unhandled(CUSTOM.name, other),
    }
}
