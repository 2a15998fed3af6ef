//! Per-frame curve composition for the two window styles.
//!
//! In a wrapping window the newest cycle is drawn from the left edge up to
//! the newest timestamp, and the part of the previous cycle that has not
//! been overwritten yet is drawn to its right. Both pieces come from
//! separate buffer queries and are shifted into display coordinates.

use crate::data::buffer::BufferVariant;
use crate::data::curve::{CurveBuffer, CurveSlice};
use crate::data::intersection::{intersect, Point};
use crate::data::window::{ScrollingWindow, TimeWindow, WindowModel, WrappingWindow};

/// Curve pieces for one frame of a wrapping window, in display
/// coordinates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SweepFrame {
    /// Data of the running cycle, from the window start to the newest
    /// timestamp.
    pub current: CurveSlice,
    /// Data of the previous cycle that is still visible; empty during the
    /// first cycle.
    pub previous: CurveSlice,
    /// Curve value at the raw timestamp where the previous cycle ended, if
    /// real data surrounds it.
    pub boundary: Option<Point>,
}

impl SweepFrame {
    pub fn compose(buffer: &CurveBuffer, window: &WrappingWindow, last_timestamp: f64) -> Self {
        if !window.is_anchored() || buffer.is_empty() {
            return Self::default();
        }
        let (current_start, _) = window.current_cycle_range();
        let current = buffer
            .clipped_subset(current_start, last_timestamp)
            .shifted(window.current_cycle_offset());

        let previous = if window.cycle_number() > 0 {
            let (previous_start, previous_end) = window.previous_cycle_range();
            let start = previous_start.max(last_timestamp - window.size());
            buffer
                .clipped_subset(start, previous_end)
                .shifted(window.previous_cycle_offset())
        } else {
            CurveSlice::default()
        };

        let boundary = if window.cycle_number() > 0 {
            boundary_point(buffer, window.previous_cycle_end_timestamp())
        } else {
            None
        };

        Self {
            current,
            previous,
            boundary,
        }
    }

    /// The boundary value where the sweep joins the previous cycle.
    pub fn boundary_point(&self) -> Option<Point> {
        self.boundary
    }

    /// Both pieces as one polyline. A NaN row separates them, so a line
    /// renderer does not connect the newest point with the oldest one.
    pub fn polyline(&self) -> CurveSlice {
        let mut line = self.current.clone();
        if !self.current.is_empty() && !self.previous.is_empty() {
            line.x.push(f64::NAN);
            line.y.push(f64::NAN);
        }
        line.x.extend_from_slice(&self.previous.x);
        line.y.extend_from_slice(&self.previous.y);
        line
    }
}

/// Interpolated curve value at the raw timestamp `at`.
fn boundary_point(buffer: &CurveBuffer, at: f64) -> Option<Point> {
    let inner = buffer.buffer();
    intersect(inner.primary_values(), inner.secondary_floats(0), at)
        .ok()
        .and_then(|hit| hit.point)
}

/// Curve for one frame of a scrolling window.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScrollingFrame {
    pub curve: CurveSlice,
}

impl ScrollingFrame {
    pub fn compose(buffer: &CurveBuffer, window: &ScrollingWindow) -> Self {
        let (start, end) = window.active_range();
        Self {
            curve: buffer.clipped_subset(start, end),
        }
    }
}

/// Frame for either window style.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Scrolling(ScrollingFrame),
    Sweep(SweepFrame),
}

impl Frame {
    pub fn compose(buffer: &CurveBuffer, window: &WindowModel, last_timestamp: f64) -> Self {
        match window {
            WindowModel::Scrolling(w) => Frame::Scrolling(ScrollingFrame::compose(buffer, w)),
            WindowModel::Wrapping(w) => {
                Frame::Sweep(SweepFrame::compose(buffer, w, last_timestamp))
            }
        }
    }

    /// Single polyline to draw.
    pub fn polyline(&self) -> CurveSlice {
        match self {
            Frame::Scrolling(f) => f.curve.clone(),
            Frame::Sweep(f) => f.polyline(),
        }
    }
}
