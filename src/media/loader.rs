//! # Image Loader
//!
//! Fetches and decodes message images off the UI thread and hands the
//! results back for the UI thread to apply.
//!
//! ## Two phases
//!
//! ```text
//!  UI thread                         tokio
//!  ─────────                         ─────
//!  request(slot) ── seq n ─────────► fetch ─► decode (spawn_blocking)
//!                                              │
//!  drain()/apply() ◄── ImageUpdate ────────────┘
//!     └─ drops the update unless n is still the slot's latest seq
//! ```
//!
//! A new request for a slot aborts the task it supersedes, and the sequence
//! check catches anything that was already in flight. Each source URL is
//! tried once, in order; when all fail the slot shows its placeholder.

use std::collections::HashMap;
use std::sync::Arc;

use image::DynamicImage;
use log::{debug, warn};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::AbortHandle;
use uuid::Uuid;

use crate::core::geometry::{Rect, Size};
use crate::core::media::{MediaItem, Placeholder};
use crate::media::crop::{self, FaceDetector, NoFaceDetector};
use crate::media::fetch::{FetchError, ImageFetcher};

/// Identifies one request. Only the latest token of a slot is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    pub slot: Uuid,
    pub seq: u64,
}

#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub image: Arc<DynamicImage>,
    pub source_url: String,
    /// Face-aware placement inside the target view, when faces were found.
    pub crop: Option<Rect>,
}

#[derive(Debug, Clone)]
pub enum ImageState {
    Loading,
    Ready(LoadedImage),
    Failed(Placeholder),
}

#[derive(Debug)]
pub struct ImageUpdate {
    token: RequestToken,
    placeholder: Placeholder,
    result: Result<LoadedImage, FetchError>,
}

impl ImageUpdate {
    pub fn token(&self) -> RequestToken {
        self.token
    }
}

pub struct ImageLoader {
    fetcher: Arc<dyn ImageFetcher>,
    detector: Arc<dyn FaceDetector>,
    focus_on_faces: bool,
    next_seq: u64,
    latest: HashMap<Uuid, u64>,
    tasks: HashMap<Uuid, AbortHandle>,
    states: HashMap<Uuid, ImageState>,
    tx: UnboundedSender<ImageUpdate>,
    rx: UnboundedReceiver<ImageUpdate>,
}

impl ImageLoader {
    pub fn new(fetcher: Arc<dyn ImageFetcher>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            fetcher,
            detector: Arc::new(NoFaceDetector),
            focus_on_faces: false,
            next_seq: 0,
            latest: HashMap::new(),
            tasks: HashMap::new(),
            states: HashMap::new(),
            tx,
            rx,
        }
    }

    pub fn with_face_detector(mut self, detector: Arc<dyn FaceDetector>) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_focus_on_faces(mut self, focus: bool) -> Self {
        self.focus_on_faces = focus;
        self
    }

    pub fn state(&self, slot: Uuid) -> Option<&ImageState> {
        self.states.get(&slot)
    }

    /// Starts loading `media` for `slot`, decoded to fit `target` pixels.
    /// Must be called from within a tokio runtime.
    pub fn request(&mut self, slot: Uuid, media: &MediaItem, target: (u32, u32)) -> RequestToken {
        self.next_seq += 1;
        let token = RequestToken {
            slot,
            seq: self.next_seq,
        };
        self.latest.insert(slot, token.seq);
        if let Some(previous) = self.tasks.remove(&slot) {
            previous.abort();
        }

        let sources: Vec<String> = media.image_sources().into_iter().map(String::from).collect();
        if sources.is_empty() {
            self.states
                .insert(slot, ImageState::Failed(media.placeholder.clone()));
            return token;
        }
        self.states.insert(slot, ImageState::Loading);

        let fetcher = Arc::clone(&self.fetcher);
        let detector = self.focus_on_faces.then(|| Arc::clone(&self.detector));
        let placeholder = media.placeholder.clone();
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let result = load_first(fetcher.as_ref(), &sources, target, detector).await;
            // The receiver lives as long as the loader.
            let _ = tx.send(ImageUpdate {
                token,
                placeholder,
                result,
            });
        });
        self.tasks.insert(slot, handle.abort_handle());
        token
    }

    /// Forgets `slot` and aborts its task.
    pub fn cancel(&mut self, slot: Uuid) {
        self.latest.remove(&slot);
        self.states.remove(&slot);
        if let Some(task) = self.tasks.remove(&slot) {
            task.abort();
        }
    }

    /// Applies `update` unless a newer request for its slot exists.
    pub fn apply(&mut self, update: ImageUpdate) -> bool {
        let ImageUpdate {
            token,
            placeholder,
            result,
        } = update;
        if self.latest.get(&token.slot) != Some(&token.seq) {
            debug!("Discarding stale image result {:?}", token);
            return false;
        }
        self.tasks.remove(&token.slot);
        let state = match result {
            Ok(loaded) => ImageState::Ready(loaded),
            Err(e) => {
                warn!("Image for {} unavailable: {e}", token.slot);
                ImageState::Failed(placeholder)
            }
        };
        self.states.insert(token.slot, state);
        true
    }

    /// Applies every update that has already arrived. Returns how many
    /// changed a slot.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(update) = self.rx.try_recv() {
            if self.apply(update) {
                applied += 1;
            }
        }
        applied
    }

    /// Waits for the next update without applying it.
    pub async fn next_update(&mut self) -> Option<ImageUpdate> {
        self.rx.recv().await
    }
}

async fn load_first(
    fetcher: &dyn ImageFetcher,
    sources: &[String],
    target: (u32, u32),
    detector: Option<Arc<dyn FaceDetector>>,
) -> Result<LoadedImage, FetchError> {
    let mut last_error = FetchError::Network("no image source".to_string());
    for url in sources {
        match load_one(fetcher, url, target, detector.clone()).await {
            Ok(loaded) => return Ok(loaded),
            Err(e) => {
                debug!("Image source {url} failed: {e}");
                last_error = e;
            }
        }
    }
    Err(last_error)
}

async fn load_one(
    fetcher: &dyn ImageFetcher,
    url: &str,
    target: (u32, u32),
    detector: Option<Arc<dyn FaceDetector>>,
) -> Result<LoadedImage, FetchError> {
    let bytes = fetcher.fetch(url).await?;
    let (image, crop) = tokio::task::spawn_blocking(move || {
        let image = decode(&bytes, target)?;
        let crop = detector.and_then(|detector| {
            let faces = detector.detect(&image);
            crop::face_focus(
                Size::new(image.width() as f32, image.height() as f32),
                Size::new(target.0 as f32, target.1 as f32),
                &faces,
            )
        });
        Ok::<_, FetchError>((image, crop))
    })
    .await
    .map_err(|e| FetchError::Decode(e.to_string()))??;

    Ok(LoadedImage {
        image: Arc::new(image),
        source_url: url.to_string(),
        crop,
    })
}

/// Decodes `bytes`, downsampling to fit within `target` when larger.
pub fn decode(bytes: &[u8], target: (u32, u32)) -> Result<DynamicImage, FetchError> {
    let image = image::load_from_memory(bytes).map_err(|e| FetchError::Decode(e.to_string()))?;
    let (width, height) = target;
    if width == 0 || height == 0 || (image.width() <= width && image.height() <= height) {
        return Ok(image);
    }
    Ok(image.thumbnail(width, height))
}
