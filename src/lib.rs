//! Colloquy library exports for testing

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::layout::CalculatorConfig;

pub mod core;
pub mod layout;
pub mod media;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// Unit system the layout engine measures in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricsPreset {
    /// Pixel-like points, scaled down to the terminal grid when drawn
    Points,
    /// One layout unit per terminal cell
    #[default]
    Cells,
}

impl MetricsPreset {
    pub fn calculator_config(self) -> CalculatorConfig {
        match self {
            MetricsPreset::Points => CalculatorConfig::points(),
            MetricsPreset::Cells => CalculatorConfig::cells(),
        }
    }

    pub fn next(self) -> Self {
        match self {
            MetricsPreset::Points => MetricsPreset::Cells,
            MetricsPreset::Cells => MetricsPreset::Points,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MetricsPreset::Points => "points",
            MetricsPreset::Cells => "cells",
        }
    }
}
