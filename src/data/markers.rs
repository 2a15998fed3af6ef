//! Buffer for timestamp markers: vertical lines at `x` carrying a color and
//! a label. Markers have no y position.

use crate::data::buffer::{BufferVariant, SortedSampleBuffer};
use crate::data::sample::{Cell, Column, ColumnKind, Columns, Sample};
use crate::error::Result;

/// Color used for markers that do not specify one.
pub const DEFAULT_COLOR: &str = "#ffffff";

/// One marker row.
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampMarker {
    pub x: f64,
    pub color: String,
    pub label: String,
}

impl TimestampMarker {
    /// Marker at `x`; an empty `color` is replaced by [`DEFAULT_COLOR`].
    pub fn new(x: impl Into<Sample>, color: impl Into<String>, label: impl Into<String>) -> Self {
        let color = color.into();
        Self {
            x: x.into().raw(),
            color: if color.is_empty() {
                DEFAULT_COLOR.to_string()
            } else {
                color
            },
            label: label.into(),
        }
    }

    /// `color`, or [`DEFAULT_COLOR`] if it is empty.
    pub fn resolved_color(&self) -> &str {
        if self.color.is_empty() {
            DEFAULT_COLOR
        } else {
            &self.color
        }
    }
}

/// Owned `(x, color, label)` copy of marker rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarkerSlice {
    pub x: Vec<f64>,
    pub color: Vec<String>,
    pub label: Vec<String>,
}

impl MarkerSlice {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn markers(&self) -> impl Iterator<Item = TimestampMarker> + '_ {
        self.x
            .iter()
            .zip(&self.color)
            .zip(&self.label)
            .map(|((&x, color), label)| TimestampMarker {
                x,
                color: color.clone(),
                label: label.clone(),
            })
    }
}

impl From<Columns> for MarkerSlice {
    fn from(columns: Columns) -> Self {
        let (x, mut rest) = columns.into_parts();
        Self {
            x,
            color: rest.texts(),
            label: rest.texts(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TimestampMarkerBuffer {
    inner: SortedSampleBuffer,
}

impl TimestampMarkerBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: SortedSampleBuffer::new(capacity, Self::LAYOUT),
        }
    }

    pub fn insert_one(
        &mut self,
        x: impl Into<Sample>,
        color: impl Into<String>,
        label: impl Into<String>,
    ) -> Result<()> {
        self.inner
            .insert_one(x, vec![Cell::Text(color.into()), Cell::Text(label.into())])
    }

    pub fn insert_many<S: AsRef<str>>(
        &mut self,
        x: &[f64],
        colors: &[S],
        labels: &[S],
    ) -> Result<()> {
        let colors = Column::Text(colors.iter().map(|s| s.as_ref().to_string()).collect());
        let labels = Column::Text(labels.iter().map(|s| s.as_ref().to_string()).collect());
        self.inner.insert_many(x, &[colors, labels])
    }

    pub fn insert_marker(&mut self, marker: &TimestampMarker) -> Result<()> {
        self.insert_one(marker.x, marker.resolved_color(), marker.label.as_str())
    }
}

impl BufferVariant for TimestampMarkerBuffer {
    type Slice = MarkerSlice;
    const LAYOUT: &'static [ColumnKind] = &[ColumnKind::Text, ColumnKind::Text];

    fn buffer(&self) -> &SortedSampleBuffer {
        &self.inner
    }

    fn buffer_mut(&mut self) -> &mut SortedSampleBuffer {
        &mut self.inner
    }
}
