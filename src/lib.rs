//! liveplot-core crate root: re-exports and module wiring.
//!
//! Data layer for live time-series plots: bounded, time-sorted sample
//! buffers and the windows that decide which part of them is visible.
//!
//! - `data`: sample buffers, buffer variants, boundary intersection, windows
//! - `model`: dispatch of data-source records into a buffer
//! - `sink`: data types and channels to feed records from other threads
//! - `sweep`: per-frame curve composition for scrolling and wrapping windows
//! - `config`: serde configuration for buffers and windows
//! - `plot`: egui_plot items (feature `egui`)

pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod sink;
pub mod sweep;

#[cfg(feature = "egui")]
pub mod plot;

// Public re-exports for a compact external API
pub use config::{BufferConfig, LiveConfig, WindowConfig, WindowStyle};
pub use data::bars::{Bar, BarBuffer, BarSlice, InjectionBar, InjectionBarBuffer, InjectionBarSlice};
pub use data::buffer::{BufferVariant, CapacityWarning, SortedSampleBuffer, DEFAULT_CAPACITY};
pub use data::curve::{CurveBuffer, CurveSlice};
pub use data::intersection::{intersect, linear_interpolate, search_sorted, Point, Side};
pub use data::items::{CurveData, ItemData, PointData, Validate};
pub use data::markers::{MarkerSlice, TimestampMarker, TimestampMarkerBuffer};
pub use data::sample::{Cell, Column, ColumnKind, Columns, Sample};
pub use data::window::{ScrollingWindow, TimeWindow, WindowModel, WrappingWindow};
pub use error::{BufferError, Result};
pub use model::{LiveDataModel, ModelKind};
pub use sink::{channel_items, UpdateSink};
pub use sweep::{Frame, ScrollingFrame, SweepFrame};
