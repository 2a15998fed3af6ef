//! Sample values and the column storage shared by all buffers.
//!
//! NaN is the storage encoding for "no value". At the API boundary it is
//! surfaced as [`Sample::Gap`] so callers do not have to reason about the
//! sentinel; it is converted back to NaN only when written into a column.

use std::ops::Range;

/// Maximum number of characters kept for a text cell (labels, colors).
pub const LABEL_WIDTH: usize = 100;

/// A numeric value that may be missing.
///
/// In the primary column a gap marks an intentional break in line
/// continuity. In a secondary column it marks a value that is unknown at
/// that time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Sample {
    #[default]
    Gap,
    Value(f64),
}

impl Sample {
    /// Interpret a raw float, mapping NaN to [`Sample::Gap`].
    pub fn from_raw(raw: f64) -> Self {
        if raw.is_nan() {
            Sample::Gap
        } else {
            Sample::Value(raw)
        }
    }

    /// Storage representation: gaps become NaN.
    pub fn raw(self) -> f64 {
        match self {
            Sample::Gap => f64::NAN,
            Sample::Value(v) => v,
        }
    }

    pub fn is_gap(self) -> bool {
        self.raw().is_nan()
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Sample::Value(v) if !v.is_nan() => Some(v),
            _ => None,
        }
    }

    /// The value, or `fallback` for a gap.
    pub fn or(self, fallback: f64) -> f64 {
        self.value().unwrap_or(fallback)
    }
}

impl From<f64> for Sample {
    fn from(raw: f64) -> Self {
        Sample::from_raw(raw)
    }
}

impl From<Option<f64>> for Sample {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Sample::Gap, Sample::from_raw)
    }
}

/// Value type held by a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Float,
    Text,
}

/// One secondary value of a row.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Float(f64),
    Text(String),
}

impl Cell {
    pub fn kind(&self) -> ColumnKind {
        match self {
            Cell::Float(_) => ColumnKind::Float,
            Cell::Text(_) => ColumnKind::Text,
        }
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Float(v)
    }
}

impl From<Sample> for Cell {
    fn from(s: Sample) -> Self {
        Cell::Float(s.raw())
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

/// Truncate a text value to [`LABEL_WIDTH`] characters.
pub(crate) fn fixed_width(mut text: String) -> String {
    if let Some((idx, _)) = text.char_indices().nth(LABEL_WIDTH) {
        text.truncate(idx);
    }
    text
}

/// A column of secondary values.
///
/// Inside a buffer a column always has exactly `capacity` entries; unused
/// slots hold NaN (float) or the empty string (text). Copies handed out by
/// reads contain only the requested rows.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Float(Vec<f64>),
    Text(Vec<String>),
}

impl Column {
    pub(crate) fn padded(kind: ColumnKind, len: usize) -> Self {
        match kind {
            ColumnKind::Float => Column::Float(vec![f64::NAN; len]),
            ColumnKind::Text => Column::Text(vec![String::new(); len]),
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Float(_) => ColumnKind::Float,
            Column::Text(_) => ColumnKind::Text,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Float(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_floats(&self) -> Option<&[f64]> {
        match self {
            Column::Float(v) => Some(v),
            Column::Text(_) => None,
        }
    }

    pub fn as_texts(&self) -> Option<&[String]> {
        match self {
            Column::Text(v) => Some(v),
            Column::Float(_) => None,
        }
    }

    /// Owned value at `index`.
    pub fn cell(&self, index: usize) -> Cell {
        match self {
            Column::Float(v) => Cell::Float(v[index]),
            Column::Text(v) => Cell::Text(v[index].clone()),
        }
    }

    /// Owned copy of a row range.
    pub(crate) fn copy_range(&self, range: Range<usize>) -> Column {
        match self {
            Column::Float(v) => Column::Float(v[range].to_vec()),
            Column::Text(v) => Column::Text(v[range].to_vec()),
        }
    }

    /// Rows picked in the given order.
    pub(crate) fn permuted(&self, order: &[usize]) -> Column {
        match self {
            Column::Float(v) => Column::Float(order.iter().map(|&i| v[i]).collect()),
            Column::Text(v) => Column::Text(order.iter().map(|&i| v[i].clone()).collect()),
        }
    }

    pub(crate) fn is_gap_at(&self, index: usize) -> bool {
        match self {
            Column::Float(v) => v[index].is_nan(),
            Column::Text(_) => true,
        }
    }

    /// Overwrite slot `index`. The caller has checked the cell kind.
    pub(crate) fn set(&mut self, index: usize, cell: Cell) {
        match (self, cell) {
            (Column::Float(v), Cell::Float(x)) => v[index] = x,
            (Column::Text(v), Cell::Text(s)) => v[index] = fixed_width(s),
            (column, cell) => debug_assert!(
                false,
                "cell {:?} written into {:?} column",
                cell.kind(),
                column.kind()
            ),
        }
    }

    /// Insert at `index`, moving `[index, occupied)` one slot right.
    ///
    /// Requires `occupied < len`; the padding slot at `occupied` is consumed,
    /// so the column never grows.
    pub(crate) fn insert_shifting(&mut self, index: usize, occupied: usize, cell: Cell) {
        match self {
            Column::Float(v) => v[index..=occupied].rotate_right(1),
            Column::Text(v) => v[index..=occupied].rotate_right(1),
        }
        self.set(index, cell);
    }

    /// Drop the first `count` slots, padding the tail.
    pub(crate) fn shift_left(&mut self, count: usize) {
        match self {
            Column::Float(v) => {
                let count = count.min(v.len());
                v.rotate_left(count);
                let len = v.len();
                v[len - count..].fill(f64::NAN);
            }
            Column::Text(v) => {
                let count = count.min(v.len());
                v.rotate_left(count);
                let len = v.len();
                v[len - count..].iter_mut().for_each(String::clear);
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        match self {
            Column::Float(v) => v.fill(f64::NAN),
            Column::Text(v) => v.iter_mut().for_each(String::clear),
        }
    }

    pub(crate) fn push(&mut self, cell: Cell) {
        match (self, cell) {
            (Column::Float(v), Cell::Float(x)) => v.push(x),
            (Column::Text(v), Cell::Text(s)) => v.push(s),
            (column, cell) => debug_assert!(
                false,
                "cell {:?} pushed onto {:?} column",
                cell.kind(),
                column.kind()
            ),
        }
    }
}

impl From<Vec<f64>> for Column {
    fn from(v: Vec<f64>) -> Self {
        Column::Float(v)
    }
}

impl From<&[f64]> for Column {
    fn from(v: &[f64]) -> Self {
        Column::Float(v.to_vec())
    }
}

impl From<Vec<String>> for Column {
    fn from(v: Vec<String>) -> Self {
        Column::Text(v)
    }
}

impl From<&[String]> for Column {
    fn from(v: &[String]) -> Self {
        Column::Text(v.to_vec())
    }
}

impl From<&[&str]> for Column {
    fn from(v: &[&str]) -> Self {
        Column::Text(v.iter().map(|s| s.to_string()).collect())
    }
}

/// Owned result of a buffer read: the primary column plus every secondary
/// column, in the buffer's layout order.
#[derive(Debug, Clone, PartialEq)]
pub struct Columns {
    pub primary: Vec<f64>,
    pub secondary: Vec<Column>,
}

impl Columns {
    pub(crate) fn empty(layout: &[ColumnKind]) -> Self {
        Self {
            primary: Vec::new(),
            secondary: layout.iter().map(|&k| Column::padded(k, 0)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.primary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }

    /// Secondary float column `index`, or an empty slice for text/missing columns.
    pub fn floats(&self, index: usize) -> &[f64] {
        self.secondary
            .get(index)
            .and_then(Column::as_floats)
            .unwrap_or(&[])
    }

    /// Secondary text column `index`, or an empty slice for float/missing columns.
    pub fn texts(&self, index: usize) -> &[String] {
        self.secondary
            .get(index)
            .and_then(Column::as_texts)
            .unwrap_or(&[])
    }

    /// Primary values as gap-aware samples.
    pub fn primary_samples(&self) -> impl Iterator<Item = Sample> + '_ {
        self.primary.iter().map(|&x| Sample::from_raw(x))
    }

    /// `(x, y)` pairs of the primary column and secondary column `index`.
    pub fn points(&self, index: usize) -> Vec<[f64; 2]> {
        self.primary
            .iter()
            .zip(self.floats(index))
            .map(|(&x, &y)| [x, y])
            .collect()
    }

    /// Subtract `offset` from every primary value.
    pub fn shift_primary(&mut self, offset: f64) {
        self.primary.iter_mut().for_each(|x| *x -= offset);
    }
}

impl Columns {
    /// Split into the primary column and a cursor over the secondary ones.
    pub(crate) fn into_parts(self) -> (Vec<f64>, SecondaryParts) {
        (self.primary, SecondaryParts(self.secondary.into_iter()))
    }
}

/// Takes secondary columns off a [`Columns`] value in layout order.
pub(crate) struct SecondaryParts(std::vec::IntoIter<Column>);

impl SecondaryParts {
    pub(crate) fn floats(&mut self) -> Vec<f64> {
        match self.0.next() {
            Some(Column::Float(v)) => v,
            _ => Vec::new(),
        }
    }

    pub(crate) fn texts(&mut self) -> Vec<String> {
        match self.0.next() {
            Some(Column::Text(v)) => v,
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_maps_to_gap() {
        assert_eq!(Sample::from(f64::NAN), Sample::Gap);
        assert!(Sample::Gap.raw().is_nan());
        assert_eq!(Sample::from(Some(2.0)).value(), Some(2.0));
        assert_eq!(Sample::from(None).or(0.0), 0.0);
    }

    #[test]
    fn text_is_truncated_to_label_width() {
        let long = "x".repeat(LABEL_WIDTH + 20);
        assert_eq!(fixed_width(long).chars().count(), LABEL_WIDTH);
        assert_eq!(fixed_width("short".into()), "short");
    }

    #[test]
    fn insert_shifting_keeps_length() {
        let mut col = Column::Float(vec![1.0, 3.0, f64::NAN, f64::NAN]);
        col.insert_shifting(1, 2, Cell::Float(2.0));
        let v = col.as_floats().unwrap();
        assert_eq!(v.len(), 4);
        assert_eq!(&v[..3], &[1.0, 2.0, 3.0]);
        assert!(v[3].is_nan());
    }

    #[test]
    fn shift_left_pads_tail() {
        let mut col = Column::Text(vec!["a".into(), "b".into(), "c".into()]);
        col.shift_left(2);
        assert_eq!(col.as_texts().unwrap(), &["c".to_string(), String::new(), String::new()]);
    }
}
