//! Media payloads carried by message kinds.

use serde::{Deserialize, Serialize};

use crate::core::geometry::Size;
use crate::core::mime;

/// Display size for image-like media.
pub const DEFAULT_MEDIA_SIZE: Size = Size::new(312.0, 57.0);
/// Display size for `application/*` attachments (a compact file chip).
pub const FILE_CHIP_SIZE: Size = Size::new(120.0, 28.0);

/// What to show while an image is missing or failed to load.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placeholder {
    #[default]
    Photo,
    File,
    Video,
    /// A host-supplied glyph or short label.
    Custom(String),
}

impl Placeholder {
    pub fn glyph(&self) -> &str {
        match self {
            Placeholder::Photo => "▣",
            Placeholder::File => "▤",
            Placeholder::Video => "▶",
            Placeholder::Custom(label) => label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Where the full-size media lives.
    pub url: Option<String>,
    /// Fallback thumbnail when the full-size fetch fails.
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub placeholder: Placeholder,
    #[serde(default = "default_media_size")]
    pub size: Size,
}

fn default_media_size() -> Size {
    DEFAULT_MEDIA_SIZE
}

impl MediaItem {
    /// Builds an item for `url`, sizing it as a file chip when the URL points
    /// at an `application/*` document.
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let is_document = mime::is_application(mime::mime_for_url(&url))
            && mime::extension_of(&url).is_some();
        let (size, placeholder) = if is_document {
            (FILE_CHIP_SIZE, Placeholder::File)
        } else {
            (DEFAULT_MEDIA_SIZE, Placeholder::Photo)
        };
        let filename = url
            .split(['?', '#'])
            .next()
            .and_then(|path| path.rsplit('/').next())
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        Self {
            url: Some(url),
            thumbnail_url: None,
            filename,
            file_size: None,
            placeholder,
            size,
        }
    }

    pub fn with_thumbnail(mut self, thumbnail_url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(thumbnail_url.into());
        self
    }

    pub fn with_file_size(mut self, bytes: u64) -> Self {
        self.file_size = Some(bytes);
        self
    }

    pub fn mime(&self) -> &'static str {
        self.url
            .as_deref()
            .map(mime::mime_for_url)
            .unwrap_or("application/octet-stream")
    }

    /// Thumbnail candidates in fetch order. Presentation (`.smil`) files are
    /// never fetched as images.
    pub fn image_sources(&self) -> Vec<&str> {
        [self.url.as_deref(), self.thumbnail_url.as_deref()]
            .into_iter()
            .flatten()
            .filter(|url| mime::extension_of(url) != Some("smil"))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioItem {
    pub url: Option<String>,
    /// Duration in seconds.
    pub duration: f32,
    #[serde(default)]
    pub title: Option<String>,
}

impl AudioItem {
    /// `m:ss` duration label.
    pub fn duration_label(&self) -> String {
        let total = self.duration.max(0.0).round() as u64;
        format!("{}:{:02}", total / 60, total % 60)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactItem {
    pub display_name: String,
    #[serde(default)]
    pub phone_numbers: Vec<String>,
    #[serde(default)]
    pub emails: Vec<String>,
}

impl ContactItem {
    pub fn initials(&self) -> String {
        initials(&self.display_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationItem {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkPreview {
    #[serde(default)]
    pub text: Option<String>,
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub teaser: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// Up to two uppercase initials from a display name.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

/// Byte count as a short human-readable string (`512 B`, `1.5 KB`, `3.2 MB`).
pub fn readable_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["KB", "MB", "GB", "TB", "PB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_url_uses_default_size() {
        let item = MediaItem::from_url("https://cdn.test/p/cat.jpg");
        assert_eq!(item.size, DEFAULT_MEDIA_SIZE);
        assert_eq!(item.placeholder, Placeholder::Photo);
        assert_eq!(item.filename.as_deref(), Some("cat.jpg"));
    }

    #[test]
    fn test_document_url_uses_file_chip_size() {
        let item = MediaItem::from_url("https://cdn.test/files/report.pdf?token=1");
        assert_eq!(item.size, FILE_CHIP_SIZE);
        assert_eq!(item.placeholder, Placeholder::File);
        assert_eq!(item.filename.as_deref(), Some("report.pdf"));
    }

    #[test]
    fn test_image_sources_skip_smil() {
        let item = MediaItem::from_url("https://cdn.test/mms/slide.smil")
            .with_thumbnail("https://cdn.test/mms/thumb.png");
        assert_eq!(item.image_sources(), vec!["https://cdn.test/mms/thumb.png"]);
    }

    #[test]
    fn test_readable_size() {
        assert_eq!(readable_size(512), "512 B");
        assert_eq!(readable_size(1536), "1.5 KB");
        assert_eq!(readable_size(3 * 1024 * 1024 + 200 * 1024), "3.2 MB");
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("ada lovelace"), "AL");
        assert_eq!(initials("Grace Brewster Hopper"), "GB");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn test_audio_duration_label() {
        let item = AudioItem {
            url: None,
            duration: 75.4,
            title: None,
        };
        assert_eq!(item.duration_label(), "1:15");
    }
}
