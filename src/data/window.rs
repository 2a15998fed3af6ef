//! Visible time windows.
//!
//! A window is advanced once per frame with the newest timestamp and tells
//! the renderer which primary range of the buffers to show.
//!
//! * [`ScrollingWindow`]: the newest `size` units, sliding with time.
//! * [`WrappingWindow`]: a fixed `[start, end]` range in which the newest
//!   data is drawn over the oldest, like a sweeping oscilloscope pointer.
//!   Each pass over the range is a *cycle*; raw timestamps of cycle `n` are
//!   mapped into the display range by subtracting `n * size`.

use std::fmt;

/// Window length used when none (or an unusable one) is configured.
pub const DEFAULT_WINDOW_SIZE: f64 = 10.0;

/// Common interface of both window styles.
pub trait TimeWindow {
    /// Advance the window to `now`.
    fn update(&mut self, now: f64);

    /// Primary range `(start, end)` to display.
    fn active_range(&self) -> (f64, f64);

    /// Window length in primary units.
    fn size(&self) -> f64;
}

/// `size` if it is a usable window length, otherwise the default with a
/// warning.
pub(crate) fn checked_size(size: f64) -> f64 {
    if size.is_finite() && size > 0.0 {
        size
    } else {
        log::warn!(
            "window size {} is not a positive number; using {} instead",
            size,
            DEFAULT_WINDOW_SIZE
        );
        DEFAULT_WINDOW_SIZE
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollingWindow {
    size: f64,
    x_range_offset: f64,
    start: f64,
    end: f64,
}

impl ScrollingWindow {
    pub fn new(size: f64) -> Self {
        Self::with_offset(size, 0.0)
    }

    /// Window whose right edge sits `x_range_offset` after the newest
    /// timestamp (a negative offset hides the newest data).
    pub fn with_offset(size: f64, x_range_offset: f64) -> Self {
        Self {
            size: checked_size(size),
            x_range_offset,
            start: f64::NAN,
            end: f64::NAN,
        }
    }

    pub fn x_range_offset(&self) -> f64 {
        self.x_range_offset
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }
}

impl Default for ScrollingWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

impl TimeWindow for ScrollingWindow {
    fn update(&mut self, now: f64) {
        self.start = now - self.size + self.x_range_offset;
        self.end = now + self.x_range_offset;
    }

    fn active_range(&self) -> (f64, f64) {
        (self.start, self.end)
    }

    fn size(&self) -> f64 {
        self.size
    }
}

/// Sweeping window ("sliding pointer").
///
/// Unanchored until the first [`TimeWindow::update`]; that call fixes
/// `start` at the given time. The cycle number never decreases, so a late
/// timestamp does not move the window back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrappingWindow {
    size: f64,
    start: f64,
    end: f64,
    cycle: u64,
    anchored: bool,
}

impl WrappingWindow {
    pub fn new(size: f64) -> Self {
        Self {
            size: checked_size(size),
            start: f64::NAN,
            end: f64::NAN,
            cycle: 0,
            anchored: false,
        }
    }

    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    /// Number of completed passes over the window since anchoring.
    pub fn cycle_number(&self) -> u64 {
        self.cycle
    }

    fn shifted_by(&self, cycles: f64) -> (f64, f64) {
        (self.start + cycles * self.size, self.end + cycles * self.size)
    }

    /// Raw timestamps covered by the current cycle.
    pub fn current_cycle_range(&self) -> (f64, f64) {
        self.shifted_by(self.cycle as f64)
    }

    /// Raw timestamps covered by the previous cycle. Before the first
    /// wrap this lies entirely before `start`.
    pub fn previous_cycle_range(&self) -> (f64, f64) {
        self.shifted_by(self.cycle as f64 - 1.0)
    }

    pub fn current_cycle_offset(&self) -> f64 {
        self.size * self.cycle as f64
    }

    pub fn previous_cycle_offset(&self) -> f64 {
        self.size * (self.cycle as f64 - 1.0)
    }

    /// Raw timestamp at which the previous cycle ended and the current one
    /// began.
    pub fn previous_cycle_end_timestamp(&self) -> f64 {
        self.previous_cycle_range().1
    }

    /// Display position of the raw timestamp `t` in the current cycle.
    pub fn x_pos(&self, t: f64) -> f64 {
        t - self.current_cycle_offset()
    }
}

impl Default for WrappingWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

impl TimeWindow for WrappingWindow {
    fn update(&mut self, now: f64) {
        if now.is_nan() {
            return;
        }
        if !self.anchored {
            self.start = now;
            self.end = now + self.size;
            self.anchored = true;
        }
        let passes = ((now - self.start) / self.size).floor();
        if passes > self.cycle as f64 {
            self.cycle = passes as u64;
        }
    }

    fn active_range(&self) -> (f64, f64) {
        (self.start, self.end)
    }

    fn size(&self) -> f64 {
        self.size
    }
}

/// Either window style, chosen at runtime from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowModel {
    Scrolling(ScrollingWindow),
    Wrapping(WrappingWindow),
}

impl WindowModel {
    pub fn as_wrapping(&self) -> Option<&WrappingWindow> {
        match self {
            WindowModel::Wrapping(w) => Some(w),
            WindowModel::Scrolling(_) => None,
        }
    }

    pub fn as_scrolling(&self) -> Option<&ScrollingWindow> {
        match self {
            WindowModel::Scrolling(w) => Some(w),
            WindowModel::Wrapping(_) => None,
        }
    }
}

impl Default for WindowModel {
    fn default() -> Self {
        WindowModel::Scrolling(ScrollingWindow::default())
    }
}

impl From<ScrollingWindow> for WindowModel {
    fn from(w: ScrollingWindow) -> Self {
        WindowModel::Scrolling(w)
    }
}

impl From<WrappingWindow> for WindowModel {
    fn from(w: WrappingWindow) -> Self {
        WindowModel::Wrapping(w)
    }
}

impl TimeWindow for WindowModel {
    fn update(&mut self, now: f64) {
        match self {
            WindowModel::Scrolling(w) => w.update(now),
            WindowModel::Wrapping(w) => w.update(now),
        }
    }

    fn active_range(&self) -> (f64, f64) {
        match self {
            WindowModel::Scrolling(w) => w.active_range(),
            WindowModel::Wrapping(w) => w.active_range(),
        }
    }

    fn size(&self) -> f64 {
        match self {
            WindowModel::Scrolling(w) => w.size(),
            WindowModel::Wrapping(w) => w.size(),
        }
    }
}

impl fmt::Display for WindowModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (start, end) = self.active_range();
        match self {
            WindowModel::Scrolling(_) => write!(f, "scrolling [{start}, {end}]"),
            WindowModel::Wrapping(w) => {
                write!(f, "wrapping [{start}, {end}] cycle {}", w.cycle_number())
            }
        }
    }
}
