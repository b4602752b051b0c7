//! Where the avatar and accessory view sit relative to the message.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalAnchor {
    CellLeading,
    CellTrailing,
    /// Leading for incoming messages, trailing for outgoing ones. Must be
    /// resolved before cell positioning.
    #[default]
    Natural,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAnchor {
    CellTop,
    #[default]
    MessageLabelTop,
    MessageTop,
    MessageCenter,
    MessageBottom,
    CellBottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AvatarPosition {
    pub horizontal: HorizontalAnchor,
    pub vertical: VerticalAnchor,
}

impl AvatarPosition {
    pub const fn new(horizontal: HorizontalAnchor, vertical: VerticalAnchor) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Natural position with the given vertical anchor.
    pub const fn vertical(vertical: VerticalAnchor) -> Self {
        Self::new(HorizontalAnchor::Natural, vertical)
    }

    /// Replaces `Natural` with the side matching the message direction.
    pub fn resolved(self, is_outgoing: bool) -> Self {
        let horizontal = match self.horizontal {
            HorizontalAnchor::Natural if is_outgoing => HorizontalAnchor::CellTrailing,
            HorizontalAnchor::Natural => HorizontalAnchor::CellLeading,
            fixed => fixed,
        };
        Self { horizontal, ..self }
    }
}

/// Vertical placement of the accessory view. Shares the avatar's anchors.
pub type AccessoryPosition = VerticalAnchor;
