//! # Core Model
//!
//! The data the layout engine reads. No I/O beyond loading a thread or the
//! config file, and no UI.
//!
//! ## Modules
//!
//! - [`message`] and [`media`]: the message model and its payloads
//! - [`member`]: thread participants and mention highlighting
//! - [`thread`]: the [`ThreadSource`](thread::ThreadSource) seam and the
//!   in-memory thread
//! - [`geometry`], [`color`], [`font`]: value types shared with the renderer
//! - [`date_format`], [`mime`]: formatting and classification helpers
//! - [`config`]: layered configuration

pub mod color;
pub mod config;
pub mod date_format;
pub mod font;
pub mod geometry;
pub mod media;
pub mod member;
pub mod message;
pub mod mime;
pub mod thread;
