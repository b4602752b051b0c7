//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashMap;
use std::io::Cursor;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::core::message::{Message, Sender};
use crate::core::thread::ThreadSource;
use crate::media::{FetchError, ImageFetcher};

pub fn me() -> Sender {
    Sender::new("me", "Me")
}

pub fn incoming() -> Sender {
    Sender::new("ada", "Ada")
}

/// `secs` after midnight UTC on 2024-03-14.
pub fn at(secs: i64) -> DateTime<Utc> {
    let base = Utc
        .with_ymd_and_hms(2024, 3, 14, 0, 0, 0)
        .single()
        .expect("valid base date");
    base + chrono::Duration::seconds(secs)
}

/// A thread whose labels are all one short line, or all absent.
pub struct LabelledThread {
    messages: Vec<Message>,
    labels: bool,
    current: Sender,
}

impl LabelledThread {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            labels: true,
            current: me(),
        }
    }

    pub fn bare(messages: Vec<Message>) -> Self {
        Self {
            labels: false,
            ..Self::new(messages)
        }
    }

    fn label(&self, index: usize, text: &str) -> Option<String> {
        (self.labels && index < self.messages.len()).then(|| text.to_string())
    }
}

impl ThreadSource for LabelledThread {
    fn len(&self) -> usize {
        self.messages.len()
    }

    fn message(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    fn current_sender(&self) -> &Sender {
        &self.current
    }

    fn cell_top_label(&self, index: usize) -> Option<String> {
        self.label(index, "Today")
    }

    fn cell_bottom_label(&self, index: usize) -> Option<String> {
        self.label(index, "note")
    }

    fn message_top_label(&self, index: usize) -> Option<String> {
        self.label(index, "Ada")
    }

    fn message_bottom_label(&self, index: usize) -> Option<String> {
        self.label(index, "Edited")
    }
}

/// Encodes a solid-colour PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 90]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

/// Serves canned responses keyed by URL. Unknown URLs fail with a 404.
#[derive(Default, Clone)]
pub struct StaticFetcher {
    responses: HashMap<String, Result<Vec<u8>, FetchError>>,
    delays: HashMap<String, Duration>,
}

impl StaticFetcher {
    pub fn with(mut self, url: &str, response: Result<Vec<u8>, FetchError>) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    pub fn delayed(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }
}

#[async_trait]
impl ImageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        self.responses
            .get(url)
            .cloned()
            .unwrap_or(Err(FetchError::Http { status: 404 }))
    }
}
