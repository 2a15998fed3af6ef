//! Buffers for bar graphs and injection bars.
//!
//! Both are plain [`SortedSampleBuffer`]s keyed by x. A bar stores its base
//! `y` and `height`; an injection bar is a vertical error-bar-like glyph
//! with a horizontal `width`, explicit `top`/`bottom` whiskers and a label.

use crate::data::buffer::{BufferVariant, SortedSampleBuffer};
use crate::data::sample::{Cell, Column, ColumnKind, Columns, Sample};
use crate::error::Result;

/// One bar. A gap `y` is read as a bar standing on `0.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub x: f64,
    pub y: f64,
    pub height: f64,
}

impl Bar {
    pub fn new(x: impl Into<Sample>, y: impl Into<Sample>, height: impl Into<Sample>) -> Self {
        Self {
            x: x.into().raw(),
            y: y.into().or(0.0),
            height: height.into().raw(),
        }
    }
}

/// One injection bar row. `top` and `bottom` are optional and resolve to
/// `y + height` and `y` when written to a buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct InjectionBar {
    pub x: f64,
    pub y: f64,
    pub height: f64,
    pub width: f64,
    pub top: Option<f64>,
    pub bottom: Option<f64>,
    pub label: String,
}

impl InjectionBar {
    /// Bar at `(x, y)` with unknown height and width and no label.
    pub fn new(x: impl Into<Sample>, y: impl Into<Sample>) -> Self {
        Self {
            x: x.into().raw(),
            y: y.into().raw(),
            height: f64::NAN,
            width: f64::NAN,
            top: None,
            bottom: None,
            label: String::new(),
        }
    }

    pub fn height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn top(mut self, top: f64) -> Self {
        self.top = Some(top);
        self
    }

    pub fn bottom(mut self, bottom: f64) -> Self {
        self.bottom = Some(bottom);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn resolved_top(&self) -> f64 {
        self.top.unwrap_or(self.y + self.height)
    }

    pub fn resolved_bottom(&self) -> f64 {
        self.bottom.unwrap_or(self.y)
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Float(self.y),
            Cell::Float(self.height),
            Cell::Float(self.width),
            Cell::Float(self.resolved_top()),
            Cell::Float(self.resolved_bottom()),
            Cell::Text(self.label.clone()),
        ]
    }
}

/// Owned `(x, y, height)` copy of bar rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BarSlice {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub height: Vec<f64>,
}

impl BarSlice {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn bars(&self) -> impl Iterator<Item = Bar> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.height)
            .map(|((&x, &y), &height)| Bar { x, y, height })
    }
}

impl From<Columns> for BarSlice {
    fn from(columns: Columns) -> Self {
        let (x, mut rest) = columns.into_parts();
        Self {
            x,
            y: rest.floats(),
            height: rest.floats(),
        }
    }
}

/// Owned `(x, y, height, width, top, bottom, label)` copy of injection bar
/// rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InjectionBarSlice {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub height: Vec<f64>,
    pub width: Vec<f64>,
    pub top: Vec<f64>,
    pub bottom: Vec<f64>,
    pub label: Vec<String>,
}

impl InjectionBarSlice {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn bar(&self, index: usize) -> Option<InjectionBar> {
        Some(InjectionBar {
            x: *self.x.get(index)?,
            y: *self.y.get(index)?,
            height: *self.height.get(index)?,
            width: *self.width.get(index)?,
            top: Some(*self.top.get(index)?),
            bottom: Some(*self.bottom.get(index)?),
            label: self.label.get(index)?.clone(),
        })
    }
}

impl From<Columns> for InjectionBarSlice {
    fn from(columns: Columns) -> Self {
        let (x, mut rest) = columns.into_parts();
        Self {
            x,
            y: rest.floats(),
            height: rest.floats(),
            width: rest.floats(),
            top: rest.floats(),
            bottom: rest.floats(),
            label: rest.texts(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BarBuffer {
    inner: SortedSampleBuffer,
}

impl BarBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: SortedSampleBuffer::new(capacity, Self::LAYOUT),
        }
    }

    pub fn insert_one(
        &mut self,
        x: impl Into<Sample>,
        y: impl Into<Sample>,
        height: impl Into<Sample>,
    ) -> Result<()> {
        let y: Sample = y.into();
        let height: Sample = height.into();
        self.inner
            .insert_one(x, vec![Cell::from(y), Cell::from(height)])
    }

    pub fn insert_many(&mut self, x: &[f64], y: &[f64], heights: &[f64]) -> Result<()> {
        self.inner
            .insert_many(x, &[Column::from(y), Column::from(heights)])
    }

    pub fn insert_bar(&mut self, bar: Bar) -> Result<()> {
        self.insert_one(bar.x, bar.y, bar.height)
    }
}

impl BufferVariant for BarBuffer {
    type Slice = BarSlice;
    const LAYOUT: &'static [ColumnKind] = &[ColumnKind::Float, ColumnKind::Float];

    fn buffer(&self) -> &SortedSampleBuffer {
        &self.inner
    }

    fn buffer_mut(&mut self) -> &mut SortedSampleBuffer {
        &mut self.inner
    }
}

#[derive(Debug, Clone)]
pub struct InjectionBarBuffer {
    inner: SortedSampleBuffer,
}

impl InjectionBarBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: SortedSampleBuffer::new(capacity, Self::LAYOUT),
        }
    }

    pub fn insert_one(&mut self, bar: &InjectionBar) -> Result<()> {
        self.inner.insert_one(bar.x, bar.cells())
    }

    pub fn insert_many(&mut self, bars: &[InjectionBar]) -> Result<()> {
        let x: Vec<f64> = bars.iter().map(|b| b.x).collect();
        let mut columns: Vec<Column> = Self::LAYOUT
            .iter()
            .map(|&kind| Column::padded(kind, 0))
            .collect();
        for bar in bars {
            for (column, cell) in columns.iter_mut().zip(bar.cells()) {
                column.push(cell);
            }
        }
        self.inner.insert_many(&x, &columns)
    }
}

impl BufferVariant for InjectionBarBuffer {
    type Slice = InjectionBarSlice;
    const LAYOUT: &'static [ColumnKind] = &[
        ColumnKind::Float,
        ColumnKind::Float,
        ColumnKind::Float,
        ColumnKind::Float,
        ColumnKind::Float,
        ColumnKind::Text,
    ];

    fn buffer(&self) -> &SortedSampleBuffer {
        &self.inner
    }

    fn buffer_mut(&mut self) -> &mut SortedSampleBuffer {
        &mut self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whiskers_default_to_bar_extent() {
        let bar = InjectionBar::new(1.0, 2.0).height(3.0);
        assert_eq!(bar.resolved_top(), 5.0);
        assert_eq!(bar.resolved_bottom(), 2.0);
        let bar = bar.top(10.0).bottom(-1.0);
        assert_eq!(bar.resolved_top(), 10.0);
        assert_eq!(bar.resolved_bottom(), -1.0);
    }

    #[test]
    fn gap_base_becomes_zero() {
        let bar = Bar::new(1.0, f64::NAN, 2.0);
        assert_eq!(bar.y, 0.0);
    }
}
