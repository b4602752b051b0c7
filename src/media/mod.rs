//! # Image Pipeline
//!
//! Fetching, decoding and placing message images.
//!
//! - [`fetch`]: the [`ImageFetcher`] seam and its reqwest implementation
//! - [`loader`]: sequenced background loading with stale-result discard
//! - [`crop`]: face-aware aspect-fill placement
//! - [`fit`]: thumbnail geometry

pub mod crop;
pub mod fetch;
pub mod fit;
pub mod loader;

pub use crop::{FaceDetector, NoFaceDetector};
pub use fetch::{FetchError, HttpImageFetcher, ImageFetcher};
pub use loader::{ImageLoader, ImageState, ImageUpdate, LoadedImage, RequestToken};
