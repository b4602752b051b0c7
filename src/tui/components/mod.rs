//! # TUI Components
//!
//! - `TitleBar`: stateless status line, all props
//! - `MessageCell`: one message cell, drawn from its placed frames
//! - `ThreadView`: scrollable thread built on the flow layout; its
//!   persistent half is `ThreadViewState`
//!
//! Each component file holds its state types, events, rendering and tests.

mod title_bar;
pub use title_bar::TitleBar;

pub mod message_cell;
pub use message_cell::{CellLabels, MessageCell};
pub mod thread_view;
pub use thread_view::{ImageRequest, ThreadView, ThreadViewEvent, ThreadViewState};
