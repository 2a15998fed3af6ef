//! Buffer for line graphs: primary = x, one secondary column = y.

use crate::data::buffer::{BufferVariant, SortedSampleBuffer};
use crate::data::intersection::{intersect, Point};
use crate::data::sample::{Cell, Column, ColumnKind, Columns, Sample};
use crate::error::Result;

/// Owned `(x, y)` copy of curve rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CurveSlice {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl CurveSlice {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn point(&self, index: usize) -> Option<Point> {
        Some(Point::new(*self.x.get(index)?, *self.y.get(index)?))
    }

    pub fn first(&self) -> Option<Point> {
        self.point(0)
    }

    pub fn last(&self) -> Option<Point> {
        self.point(self.len().checked_sub(1)?)
    }

    /// Subtract `offset` from every x value.
    pub fn shifted(mut self, offset: f64) -> Self {
        self.x.iter_mut().for_each(|x| *x -= offset);
        self
    }

    pub fn points(&self) -> Vec<[f64; 2]> {
        self.x.iter().zip(&self.y).map(|(&x, &y)| [x, y]).collect()
    }
}

impl From<Columns> for CurveSlice {
    fn from(columns: Columns) -> Self {
        let (x, mut rest) = columns.into_parts();
        Self { x, y: rest.floats() }
    }
}

#[derive(Debug, Clone)]
pub struct CurveBuffer {
    inner: SortedSampleBuffer,
}

impl CurveBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: SortedSampleBuffer::new(capacity, Self::LAYOUT),
        }
    }

    /// Append a point. A gap `x` inserts a line break.
    pub fn insert_one(&mut self, x: impl Into<Sample>, y: impl Into<Sample>) -> Result<()> {
        let y: Sample = y.into();
        self.inner.insert_one(x, vec![Cell::from(y)])
    }

    pub fn insert_many(&mut self, x: &[f64], y: &[f64]) -> Result<()> {
        self.inner.insert_many(x, &[Column::from(y)])
    }

    /// Like [`BufferVariant::subset`], but when real data straddles `start`
    /// or `end` a point interpolated exactly on that boundary is added, so
    /// the returned polyline reaches the window edges.
    ///
    /// Boundary points are computed on the copy only; the buffer is not
    /// modified. No point is synthesized across a line break.
    pub fn clipped_subset(&self, start: f64, end: f64) -> CurveSlice {
        let xs = self.inner.primary_values();
        let ys = self.inner.secondary_floats(0);
        let rows = self.inner.subset_range(start, end);

        let leading = if rows.start > 0 && rows.start < xs.len() && xs[rows.start] != start {
            boundary_point(xs, ys, rows.start - 1, start)
        } else {
            None
        };
        let trailing = if rows.end > 0 && rows.end < xs.len() && xs[rows.end - 1] != end {
            boundary_point(xs, ys, rows.end - 1, end)
        } else {
            None
        };

        let mut slice = CurveSlice::default();
        let extra = usize::from(leading.is_some()) + usize::from(trailing.is_some());
        slice.x.reserve(rows.len() + extra);
        slice.y.reserve(rows.len() + extra);
        if let Some(p) = leading {
            slice.x.push(p.x);
            slice.y.push(p.y);
        }
        slice.x.extend_from_slice(&xs[rows.clone()]);
        slice.y.extend_from_slice(&ys[rows]);
        if let Some(p) = trailing {
            slice.x.push(p.x);
            slice.y.push(p.y);
        }
        slice
    }
}

/// Crossing of the segment starting at row `before` with the line `x = at`.
fn boundary_point(xs: &[f64], ys: &[f64], before: usize, at: f64) -> Option<Point> {
    let segment = before..before + 2;
    let a = Point::new(xs[before], ys[before]);
    let b = Point::new(xs[before + 1], ys[before + 1]);
    if a.is_gap() || b.is_gap() {
        return None;
    }
    intersect(&xs[segment.clone()], &ys[segment], at)
        .ok()
        .and_then(|hit| hit.point)
}

impl BufferVariant for CurveBuffer {
    type Slice = CurveSlice;
    const LAYOUT: &'static [ColumnKind] = &[ColumnKind::Float];

    fn buffer(&self) -> &SortedSampleBuffer {
        &self.inner
    }

    fn buffer_mut(&mut self) -> &mut SortedSampleBuffer {
        &mut self.inner
    }
}
