//! Boundary intersection: gap-tolerant binary search over sorted primary
//! values and linear interpolation between two points.
//!
//! Primary columns are sorted, but may contain NaN rows anywhere (line
//! breaks) and always end in NaN padding. All searches here skip NaN
//! entries, so a NaN never compares smaller or larger than a real value;
//! a run of trailing NaNs simply sits "past the end".

use serde::Deserialize;

use crate::error::{BufferError, Result};

/// Which side of a run of equal values a search lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// First position whose value is `>= target`.
    Left,
    /// First position whose value is `> target`.
    Right,
}

/// A 2-D point. Either coordinate may be NaN for gap rows.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Either coordinate is NaN.
    pub fn is_gap(&self) -> bool {
        self.x.is_nan() || self.y.is_nan()
    }
}

impl From<[f64; 2]> for Point {
    fn from(p: [f64; 2]) -> Self {
        Self { x: p[0], y: p[1] }
    }
}

impl TryFrom<&[f64]> for Point {
    type Error = BufferError;

    fn try_from(coords: &[f64]) -> Result<Self> {
        match coords {
            [x, y] => Ok(Point::new(*x, *y)),
            other => Err(BufferError::MalformedPoint(format!(
                "expected 2 coordinates, got {}",
                other.len()
            ))),
        }
    }
}

/// Loosely typed point as it arrives from a record source (e.g. JSON),
/// where either coordinate may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct PointRecord {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl TryFrom<PointRecord> for Point {
    type Error = BufferError;

    fn try_from(record: PointRecord) -> Result<Self> {
        match (record.x, record.y) {
            (Some(x), Some(y)) => Ok(Point::new(x, y)),
            (None, _) => Err(BufferError::MalformedPoint("missing x".into())),
            (_, None) => Err(BufferError::MalformedPoint("missing y".into())),
        }
    }
}

/// Indices of the entries at-or-before and at-or-after a query position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Surrounding {
    /// `None` if the query precedes every entry.
    pub before: Option<usize>,
    /// `None` if the query follows every entry.
    pub after: Option<usize>,
}

impl Surrounding {
    /// The query hit an entry exactly.
    pub fn is_exact(&self) -> bool {
        self.before.is_some() && self.before == self.after
    }
}

/// Result of intersecting a polyline with a vertical line.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Intersection {
    pub last_before: Option<usize>,
    pub first_after: Option<usize>,
    /// `None` when the line does not cross the polyline.
    pub point: Option<Point>,
}

fn next_valid(values: &[f64], from: usize) -> Option<usize> {
    (from..values.len()).find(|&i| !values[i].is_nan())
}

fn prev_valid(values: &[f64], before: usize) -> Option<usize> {
    (0..before.min(values.len())).rev().find(|&i| !values[i].is_nan())
}

/// First position `p` such that the next non-NaN value at or after `p`
/// fails `pred` (or does not exist). `pred` must hold for a prefix of the
/// sorted non-NaN values.
///
/// The scan for a non-NaN value stays inside `mid..hi`, and every scanned
/// row leaves the search range afterwards. A search therefore visits each
/// row at most once: O(log n) plus the gap rows it steps over.
fn partition_valid(values: &[f64], pred: impl Fn(f64) -> bool) -> usize {
    let (mut lo, mut hi) = (0, values.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match (mid..hi).find(|&i| !values[i].is_nan()) {
            Some(j) if pred(values[j]) => lo = j + 1,
            _ => hi = mid,
        }
    }
    lo
}

/// NaN-aware `searchsorted`.
///
/// Returns the index of the first non-NaN entry that is `>= target`
/// ([`Side::Left`]) or `> target` ([`Side::Right`]). When no non-NaN entry
/// lies below the target the result is `0`; when every non-NaN entry lies
/// below it the result is `values.len()`.
pub fn search_sorted(values: &[f64], target: f64, side: Side) -> usize {
    let split = match side {
        Side::Left => partition_valid(values, |v| v < target),
        Side::Right => partition_valid(values, |v| v <= target),
    };
    if split == 0 {
        return 0;
    }
    next_valid(values, split).unwrap_or(values.len())
}

/// Locate the entries immediately surrounding `query`.
///
/// An exact hit yields `before == after`. NaN entries are skipped.
pub fn find_surrounding(sorted_xs: &[f64], query: f64) -> Surrounding {
    if query.is_nan() || next_valid(sorted_xs, 0).is_none() {
        return Surrounding::default();
    }
    let split = partition_valid(sorted_xs, |v| v < query);
    let after = next_valid(sorted_xs, split);
    if let Some(j) = after {
        if sorted_xs[j] == query {
            return Surrounding {
                before: Some(j),
                after: Some(j),
            };
        }
    }
    Surrounding {
        before: prev_valid(sorted_xs, split),
        after,
    }
}

/// Intersect the polyline `(x, y)` with the vertical line at `at_x`.
pub fn intersect(x: &[f64], y: &[f64], at_x: f64) -> Result<Intersection> {
    if x.len() != y.len() {
        return Err(BufferError::LengthMismatch {
            expected: x.len(),
            actual: y.len(),
        });
    }
    let Surrounding { before, after } = find_surrounding(x, at_x);
    let point = match (before, after) {
        (Some(b), Some(a)) => linear_interpolate(
            Point::new(x[b], y[b]),
            Point::new(x[a], y[a]),
            at_x,
        ),
        _ => None,
    };
    Ok(Intersection {
        last_before: before,
        first_after: after,
        point,
    })
}

/// Point on the segment `p1`–`p2` at `at_x`.
///
/// `p1.x <= p2.x` is expected; reversed input is swapped and logged, since
/// it points at a bug in the caller. Returns `None` when `at_x` lies
/// outside `[p1.x, p2.x]`. A vertical segment yields `p1`.
pub fn linear_interpolate(p1: Point, p2: Point, at_x: f64) -> Option<Point> {
    let (p1, p2) = if p2.x < p1.x {
        log::debug!(
            "interpolation points in wrong order: p1={:?}, p2={:?}, x={}",
            p1,
            p2,
            at_x
        );
        (p2, p1)
    } else {
        (p1, p2)
    };
    if at_x.is_nan() || p1.x.is_nan() || p2.x.is_nan() || at_x < p1.x || at_x > p2.x {
        log::debug!(
            "x={} not between interpolation points ({}, {})",
            at_x,
            p1.x,
            p2.x
        );
        return None;
    }
    if p1.x == p2.x {
        return Some(p1);
    }
    let ratio = (at_x - p1.x) / (p2.x - p1.x);
    Some(Point::new(at_x, p1.y + (p2.y - p1.y) * ratio))
}

/// [`linear_interpolate`] over loosely typed records.
pub fn interpolate_records(
    p1: PointRecord,
    p2: PointRecord,
    at_x: f64,
) -> Result<Option<Point>> {
    Ok(linear_interpolate(p1.try_into()?, p2.try_into()?, at_x))
}
