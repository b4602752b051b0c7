//! # Layout Engine
//!
//! Everything that turns messages into geometry. Nothing here draws.
//!
//! ```text
//!  ThreadSource ──► MessageSizeCalculator ──► LayoutAttributes ──► CellFrames
//!                        │  (kinds table)                         (hit_test)
//!                        ▼
//!                 MessagesFlowLayout (height cache, offsets)
//! ```
//!
//! ## Modules
//!
//! - [`metrics`] and [`style`]: the constants and per-direction styling
//! - [`calculator`] with [`kinds`]: cell sizes and attributes
//! - [`attributes`]: the immutable per-cell record and its builder
//! - [`cell`]: frames, hit-testing and tap dispatch
//! - [`flow`]: the vertical stack of cells and its cache

pub mod attributes;
pub mod calculator;
pub mod cell;
pub mod flow;
pub mod kinds;
pub mod metrics;
pub mod position;
pub mod style;
pub mod text;

pub use attributes::{LayoutAttributes, LayoutAttributesBuilder, LayoutError};
pub use calculator::MessageSizeCalculator;
pub use cell::{CellFrames, MessageCellDelegate, TapTarget, dispatch_tap, layout_cell};
pub use flow::{LayoutCache, MessagesFlowLayout};
pub use metrics::LayoutMetrics;
pub use position::{AccessoryPosition, AvatarPosition, HorizontalAnchor, VerticalAnchor};
pub use style::CalculatorConfig;
