//! Fixed-capacity buffer whose rows stay sorted by their primary value.
//!
//! One primary column (usually time) and any number of secondary columns
//! share the same indexing. Every column is allocated once with `capacity`
//! slots; the first `occupied` slots hold data, the rest is NaN padding.
//! Writes never reallocate: an out-of-order row is placed with an in-place
//! shift, and a full buffer evicts its oldest contiguous block.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Range;

use crate::data::intersection::{search_sorted, Side};
use crate::data::sample::{Cell, Column, ColumnKind, Columns, Sample};
use crate::error::{BufferError, Result};

/// Capacity used when none (or an unusable one) is requested.
pub const DEFAULT_CAPACITY: usize = 100_000;

/// Smallest capacity a buffer accepts.
pub const MIN_CAPACITY: usize = 3;

/// A requested capacity was replaced by [`DEFAULT_CAPACITY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityWarning {
    pub requested: usize,
    pub used: usize,
}

impl fmt::Display for CapacityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "requested buffer capacity {} is below the minimum of {}; using {} entries instead",
            self.requested, MIN_CAPACITY, self.used
        )
    }
}

/// Effective capacity for a request. `0` means "use the default" and is not
/// reported; other values below [`MIN_CAPACITY`] are corrected with a warning.
pub fn resolve_capacity(requested: usize) -> (usize, Option<CapacityWarning>) {
    match requested {
        0 => (DEFAULT_CAPACITY, None),
        n if n < MIN_CAPACITY => (
            DEFAULT_CAPACITY,
            Some(CapacityWarning {
                requested: n,
                used: DEFAULT_CAPACITY,
            }),
        ),
        n => (n, None),
    }
}

/// NaN-last ordering for the incoming batch sort.
fn nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

#[derive(Debug, Clone)]
pub struct SortedSampleBuffer {
    capacity: usize,
    layout: Vec<ColumnKind>,
    primary: Vec<f64>,
    secondary: Vec<Column>,
    occupied: usize,
    smallest_gap: f64,
}

impl SortedSampleBuffer {
    /// Create an empty buffer with one secondary column per `layout` entry.
    ///
    /// A capacity below [`MIN_CAPACITY`] falls back to [`DEFAULT_CAPACITY`]
    /// and logs a warning.
    pub fn new(capacity: usize, layout: &[ColumnKind]) -> Self {
        let (buffer, warning) = Self::with_capacity_report(capacity, layout);
        if let Some(w) = warning {
            log::warn!("{w}");
        }
        buffer
    }

    /// Like [`SortedSampleBuffer::new`], but hands the capacity correction
    /// back to the caller instead of logging it.
    pub fn with_capacity_report(
        capacity: usize,
        layout: &[ColumnKind],
    ) -> (Self, Option<CapacityWarning>) {
        let (capacity, warning) = resolve_capacity(capacity);
        let buffer = Self {
            capacity,
            layout: layout.to_vec(),
            primary: vec![f64::NAN; capacity],
            secondary: layout
                .iter()
                .map(|&kind| Column::padded(kind, capacity))
                .collect(),
            occupied: 0,
            smallest_gap: f64::INFINITY,
        };
        (buffer, warning)
    }

    pub fn layout(&self) -> &[ColumnKind] {
        &self.layout
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied
    }

    pub fn space_left(&self) -> usize {
        self.capacity - self.occupied
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Smallest distance observed between neighbouring primary values since
    /// the last reset; `+inf` while fewer than two values were seen.
    pub fn smallest_gap(&self) -> f64 {
        self.smallest_gap
    }

    /// Largest primary value that is not a gap.
    pub fn highest_non_nan_primary(&self) -> Option<f64> {
        self.primary[..self.occupied]
            .iter()
            .rev()
            .find(|x| !x.is_nan())
            .copied()
    }

    /// Clear every column back to padding.
    pub fn reset(&mut self) {
        self.primary.fill(f64::NAN);
        self.secondary.iter_mut().for_each(Column::clear);
        self.occupied = 0;
        self.smallest_gap = f64::INFINITY;
    }

    /// Insert a single row.
    pub fn insert_one(&mut self, primary: impl Into<Sample>, secondary: Vec<Cell>) -> Result<()> {
        if secondary.len() != self.layout.len() {
            return Err(BufferError::Arity {
                expected: self.layout.len(),
                actual: secondary.len(),
            });
        }
        let mut columns = Vec::with_capacity(secondary.len());
        for (column, (cell, &kind)) in secondary.into_iter().zip(&self.layout).enumerate() {
            if cell.kind() != kind {
                return Err(BufferError::ColumnType {
                    column,
                    expected: kind,
                });
            }
            let mut single = Column::padded(kind, 0);
            single.push(cell);
            columns.push(single);
        }
        self.insert_rows(vec![primary.into().raw()], columns);
        Ok(())
    }

    /// Insert a batch of rows. All columns must have the same length.
    ///
    /// The batch may be in any order; gap rows in a batch end up after the
    /// batch's real values. To place a line break at a specific position,
    /// insert it with [`SortedSampleBuffer::insert_one`].
    pub fn insert_many(&mut self, primary: &[f64], secondary: &[Column]) -> Result<()> {
        if secondary.len() != self.layout.len() {
            return Err(BufferError::Arity {
                expected: self.layout.len(),
                actual: secondary.len(),
            });
        }
        for (column, (values, &kind)) in secondary.iter().zip(&self.layout).enumerate() {
            if values.len() != primary.len() {
                return Err(BufferError::LengthMismatch {
                    expected: primary.len(),
                    actual: values.len(),
                });
            }
            if values.kind() != kind {
                return Err(BufferError::ColumnType {
                    column,
                    expected: kind,
                });
            }
        }
        self.insert_rows(primary.to_vec(), secondary.to_vec());
        Ok(())
    }

    /// Copies of all rows whose primary value lies in `[start, end]`, with
    /// all-gap rows at either edge removed. An edge row with a NaN primary
    /// value but a known float secondary value is kept.
    pub fn subset(&self, start: f64, end: f64) -> Columns {
        self.copy_rows(self.subset_range(start, end))
    }

    /// Copies of all occupied rows.
    pub fn full(&self) -> Columns {
        self.copy_rows(0..self.occupied)
    }

    /// Occupied part of the primary column.
    pub(crate) fn primary_values(&self) -> &[f64] {
        &self.primary[..self.occupied]
    }

    /// Occupied part of secondary column `index`.
    pub(crate) fn secondary_floats(&self, index: usize) -> &[f64] {
        self.secondary
            .get(index)
            .and_then(Column::as_floats)
            .map(|v| &v[..self.occupied])
            .unwrap_or(&[])
    }

    /// Row indices for `[start, end]`, trimmed of edge gap rows.
    pub(crate) fn subset_range(&self, start: f64, end: f64) -> Range<usize> {
        let xs = self.primary_values();
        let mut first = search_sorted(xs, start, Side::Left);
        let mut last = search_sorted(xs, end, Side::Right).max(first);
        while last > first && self.row_is_gap(last - 1) {
            last -= 1;
        }
        while first < last && self.row_is_gap(first) {
            first += 1;
        }
        first..last
    }

    pub(crate) fn copy_rows(&self, rows: Range<usize>) -> Columns {
        if rows.is_empty() {
            return Columns::empty(&self.layout);
        }
        Columns {
            primary: self.primary[rows.clone()].to_vec(),
            secondary: self
                .secondary
                .iter()
                .map(|c| c.copy_range(rows.clone()))
                .collect(),
        }
    }

    /// Primary and every float secondary value of `row` are NaN.
    fn row_is_gap(&self, row: usize) -> bool {
        self.primary[row].is_nan() && self.secondary.iter().all(|c| c.is_gap_at(row))
    }

    /// Shared pipeline for single and batch writes. Input is validated.
    fn insert_rows(&mut self, mut primary: Vec<f64>, mut secondary: Vec<Column>) {
        if primary.is_empty() {
            return;
        }
        // Two line breaks in a row would only produce animation artifacts.
        if primary.len() == 1
            && primary[0].is_nan()
            && secondary.iter().all(|c| c.is_gap_at(0))
            && self.occupied > 0
            && self.row_is_gap(self.occupied - 1)
        {
            log::trace!("dropping repeated gap row");
            return;
        }

        if primary.len() > 1 {
            let mut order: Vec<usize> = (0..primary.len()).collect();
            order.sort_by(|&a, &b| nan_last(primary[a], primary[b]));
            primary = order.iter().map(|&i| primary[i]).collect();
            secondary = secondary.iter().map(|c| c.permuted(&order)).collect();
        }

        let mut skip = 0;
        if primary.len() > self.space_left() {
            skip = self.make_room(&primary);
        }
        debug_assert!(primary.len() - skip <= self.space_left());

        for row in skip..primary.len() {
            let cells: Vec<Cell> = secondary.iter().map(|c| c.cell(row)).collect();
            self.sort_in(primary[row], cells);
        }
    }

    /// Evict the oldest rows so the sorted `incoming` batch fits. Returns how
    /// many leading incoming rows must be dropped because they would be
    /// older than everything that survives.
    fn make_room(&mut self, incoming: &[f64]) -> usize {
        let reserve = self.capacity.div_ceil(3);
        let mut evict = (reserve + incoming.len()).min(self.occupied);
        let mut skip = 0;
        if incoming.len() > self.capacity {
            skip = incoming.len() - self.capacity + reserve;
        }

        let mut oldest = if evict < self.capacity {
            self.primary[evict]
        } else {
            f64::NAN
        };
        if !oldest.is_nan() && oldest >= incoming[0] {
            // Keep older buffer rows instead of incoming rows that would be
            // sorted in before the new oldest entry anyway.
            while skip < incoming.len() && oldest > incoming[skip] && evict > 0 {
                evict -= 1;
                if !self.primary[evict].is_nan() {
                    oldest = self.primary[evict];
                }
                skip += 1;
            }
        }

        log::debug!(
            "buffer full: evicting {} of {} rows, dropping {} of {} incoming",
            evict,
            self.occupied,
            skip,
            incoming.len()
        );
        self.shift_left(evict);
        skip
    }

    fn shift_left(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        self.primary.rotate_left(count);
        let len = self.primary.len();
        self.primary[len - count..].fill(f64::NAN);
        for column in &mut self.secondary {
            column.shift_left(count);
        }
        self.occupied -= count;
    }

    /// Newest occupied row whose primary value is not NaN. Falls back to the
    /// first row (even if it is a gap) so the append check stays cheap.
    fn last_valid_index(&self) -> Option<usize> {
        if self.occupied == 0 {
            return None;
        }
        let mut i = self.occupied - 1;
        while i > 0 && self.primary[i].is_nan() {
            i -= 1;
        }
        Some(i)
    }

    /// Place one row at its sorted position. Requires a free slot.
    fn sort_in(&mut self, value: f64, cells: Vec<Cell>) {
        let next = self.occupied;
        let appends = match self.last_valid_index() {
            None => true,
            Some(i) => value.is_nan() || self.primary[i].is_nan() || value >= self.primary[i],
        };

        let distance = if appends {
            self.primary[next] = value;
            for (column, cell) in self.secondary.iter_mut().zip(cells) {
                column.set(next, cell);
            }
            if next == 0 {
                f64::INFINITY
            } else {
                value - self.primary[next - 1]
            }
        } else {
            let at = search_sorted(&self.primary[..next], value, Side::Right);
            self.primary[at..=next].rotate_right(1);
            self.primary[at] = value;
            for (column, cell) in self.secondary.iter_mut().zip(cells) {
                column.insert_shifting(at, next, cell);
            }
            let before = (at > 0).then(|| value - self.primary[at - 1]);
            let after = (at < next).then(|| self.primary[at + 1] - value);
            before
                .into_iter()
                .chain(after)
                .filter(|d| !d.is_nan())
                .fold(f64::INFINITY, f64::min)
        };

        self.occupied += 1;
        if distance < self.smallest_gap {
            self.smallest_gap = distance;
        }
    }
}

/// A [`SortedSampleBuffer`] with a fixed column layout and a typed read
/// result. Implemented by the curve, bar, injection-bar and marker buffers.
pub trait BufferVariant {
    /// Typed copy returned by reads.
    type Slice: From<Columns>;

    /// Secondary column layout.
    const LAYOUT: &'static [ColumnKind];

    fn buffer(&self) -> &SortedSampleBuffer;

    fn buffer_mut(&mut self) -> &mut SortedSampleBuffer;

    fn subset(&self, start: f64, end: f64) -> Self::Slice {
        self.buffer().subset(start, end).into()
    }

    fn full(&self) -> Self::Slice {
        self.buffer().full().into()
    }

    fn reset(&mut self) {
        self.buffer_mut().reset();
    }

    fn capacity(&self) -> usize {
        self.buffer().capacity()
    }

    fn occupied_count(&self) -> usize {
        self.buffer().occupied_count()
    }

    fn space_left(&self) -> usize {
        self.buffer().space_left()
    }

    fn is_empty(&self) -> bool {
        self.buffer().is_empty()
    }

    fn smallest_gap(&self) -> f64 {
        self.buffer().smallest_gap()
    }

    fn highest_non_nan_primary(&self) -> Option<f64> {
        self.buffer().highest_non_nan_primary()
    }
}
