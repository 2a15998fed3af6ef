//! Configuration for buffers and visible windows.
//!
//! All types derive serde traits with defaults for every field, so a
//! partial JSON document (or an empty object) is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::data::buffer::{resolve_capacity, DEFAULT_CAPACITY};
use crate::data::window::{
    checked_size, ScrollingWindow, WindowModel, WrappingWindow, DEFAULT_WINDOW_SIZE,
};
use crate::error::{BufferError, Result};
use crate::model::{LiveDataModel, ModelKind};

// ─────────────────────────────────────────────────────────────────────────────
// Buffers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Rows per buffer. Values below the minimum fall back to the default.
    pub capacity: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl BufferConfig {
    /// Effective capacity after correcting unusable values.
    pub fn capacity(&self) -> usize {
        resolve_capacity(self.capacity).0
    }

    pub fn build(&self, kind: ModelKind) -> LiveDataModel {
        LiveDataModel::new(kind, self.capacity)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Windows
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowStyle {
    #[default]
    Scrolling,
    #[serde(alias = "sliding_pointer")]
    Wrapping,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub style: WindowStyle,
    /// Window length in primary units.
    pub size: f64,
    /// Shift of a scrolling window's right edge relative to the newest
    /// timestamp. Ignored by wrapping windows.
    pub x_range_offset: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            style: WindowStyle::Scrolling,
            size: DEFAULT_WINDOW_SIZE,
            x_range_offset: 0.0,
        }
    }
}

impl WindowConfig {
    /// Effective window length after correcting unusable values.
    pub fn size(&self) -> f64 {
        checked_size(self.size)
    }

    pub fn build(&self) -> WindowModel {
        match self.style {
            WindowStyle::Scrolling => {
                ScrollingWindow::with_offset(self.size, self.x_range_offset).into()
            }
            WindowStyle::Wrapping => WrappingWindow::new(self.size).into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Combined
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveConfig {
    pub buffer: BufferConfig,
    pub window: WindowConfig,
}

impl LiveConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that cannot be corrected.
    pub fn validate(&self) -> Result<()> {
        if !self.window.x_range_offset.is_finite() {
            return Err(BufferError::Config(format!(
                "x_range_offset must be finite, got {}",
                self.window.x_range_offset
            )));
        }
        Ok(())
    }
}
