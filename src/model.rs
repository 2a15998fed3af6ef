//! Live data model: one buffer plus the dispatch from incoming records.
//!
//! Each plot item owns one model. Records arriving from a data source are
//! checked against the model's buffer type and validity rules and then
//! written; everything else is dropped with a single warning per model.

use std::sync::mpsc::Receiver;

use serde::{Deserialize, Serialize};

use crate::data::bars::{BarBuffer, InjectionBarBuffer};
use crate::data::buffer::{BufferVariant, SortedSampleBuffer};
use crate::data::curve::CurveBuffer;
use crate::data::items::{ItemData, Validate};
use crate::data::markers::TimestampMarkerBuffer;
use crate::data::sample::{Columns, Sample};
use crate::error::Result;

/// Which buffer a model holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModelKind {
    #[default]
    Curve,
    Bar,
    InjectionBar,
    TimestampMarker,
}

/// The buffer behind a [`LiveDataModel`].
#[derive(Debug, Clone)]
pub enum ModelBuffer {
    Curve(CurveBuffer),
    Bar(BarBuffer),
    InjectionBar(InjectionBarBuffer),
    TimestampMarker(TimestampMarkerBuffer),
}

impl ModelBuffer {
    pub fn new(kind: ModelKind, capacity: usize) -> Self {
        match kind {
            ModelKind::Curve => ModelBuffer::Curve(CurveBuffer::new(capacity)),
            ModelKind::Bar => ModelBuffer::Bar(BarBuffer::new(capacity)),
            ModelKind::InjectionBar => {
                ModelBuffer::InjectionBar(InjectionBarBuffer::new(capacity))
            }
            ModelKind::TimestampMarker => {
                ModelBuffer::TimestampMarker(TimestampMarkerBuffer::new(capacity))
            }
        }
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            ModelBuffer::Curve(_) => ModelKind::Curve,
            ModelBuffer::Bar(_) => ModelKind::Bar,
            ModelBuffer::InjectionBar(_) => ModelKind::InjectionBar,
            ModelBuffer::TimestampMarker(_) => ModelKind::TimestampMarker,
        }
    }

    /// Untyped view of the underlying buffer.
    pub fn samples(&self) -> &SortedSampleBuffer {
        match self {
            ModelBuffer::Curve(b) => b.buffer(),
            ModelBuffer::Bar(b) => b.buffer(),
            ModelBuffer::InjectionBar(b) => b.buffer(),
            ModelBuffer::TimestampMarker(b) => b.buffer(),
        }
    }

    fn samples_mut(&mut self) -> &mut SortedSampleBuffer {
        match self {
            ModelBuffer::Curve(b) => b.buffer_mut(),
            ModelBuffer::Bar(b) => b.buffer_mut(),
            ModelBuffer::InjectionBar(b) => b.buffer_mut(),
            ModelBuffer::TimestampMarker(b) => b.buffer_mut(),
        }
    }

    /// Write `data` if it fits this buffer. Returns `Ok(false)` when it
    /// does not; the record is not validated here.
    fn write(&mut self, data: ItemData) -> Result<bool> {
        match (self, data) {
            (ModelBuffer::Curve(b), ItemData::Point(p)) => b.insert_one(p.x, p.y)?,
            (ModelBuffer::Curve(b), ItemData::Curve(c)) => b.insert_many(&c.x, &c.y)?,
            (ModelBuffer::Bar(b), ItemData::Bar(bar)) => {
                b.insert_one(bar.x, Sample::from(bar.y).or(0.0), bar.height)?
            }
            (ModelBuffer::Bar(b), ItemData::Bars(bars)) => {
                let x: Vec<f64> = bars.iter().map(|bar| bar.x).collect();
                let y: Vec<f64> = bars
                    .iter()
                    .map(|bar| Sample::from(bar.y).or(0.0))
                    .collect();
                let heights: Vec<f64> = bars.iter().map(|bar| bar.height).collect();
                b.insert_many(&x, &y, &heights)?
            }
            (ModelBuffer::InjectionBar(b), ItemData::InjectionBar(bar)) => b.insert_one(&bar)?,
            (ModelBuffer::InjectionBar(b), ItemData::InjectionBars(bars)) => {
                b.insert_many(&bars)?
            }
            (ModelBuffer::TimestampMarker(b), ItemData::TimestampMarker(m)) => {
                b.insert_marker(&m)?
            }
            (ModelBuffer::TimestampMarker(b), ItemData::TimestampMarkers(markers)) => {
                let x: Vec<f64> = markers.iter().map(|m| m.x).collect();
                let colors: Vec<&str> = markers.iter().map(|m| m.resolved_color()).collect();
                let labels: Vec<&str> = markers.iter().map(|m| m.label.as_str()).collect();
                b.insert_many(&x, &colors, &labels)?
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// A buffer fed by a data source.
#[derive(Debug, Clone)]
pub struct LiveDataModel {
    buffer: ModelBuffer,
    warned: bool,
}

impl LiveDataModel {
    pub fn new(kind: ModelKind, capacity: usize) -> Self {
        Self {
            buffer: ModelBuffer::new(kind, capacity),
            warned: false,
        }
    }

    pub fn kind(&self) -> ModelKind {
        self.buffer.kind()
    }

    pub fn buffer(&self) -> &ModelBuffer {
        &self.buffer
    }

    pub fn as_curve(&self) -> Option<&CurveBuffer> {
        match &self.buffer {
            ModelBuffer::Curve(b) => Some(b),
            _ => None,
        }
    }

    /// Write one record from a data source.
    ///
    /// Returns `Ok(true)` if it was stored and `Ok(false)` if it does not
    /// fit this model or is invalid. A collection is stored only if every
    /// element is valid.
    pub fn handle(&mut self, data: ItemData) -> Result<bool> {
        let name = data.name();
        if !data.is_valid() {
            self.reject(name, "it is not valid");
            return Ok(false);
        }
        let stored = self.buffer.write(data)?;
        if !stored {
            self.reject(name, "it does not fit this model");
        }
        Ok(stored)
    }

    /// Handle every record waiting in `rx` without blocking. Returns how
    /// many were stored.
    pub fn drain(&mut self, rx: &Receiver<ItemData>) -> usize {
        let mut stored = 0;
        while let Ok(item) = rx.try_recv() {
            match self.handle(item) {
                Ok(true) => stored += 1,
                Ok(false) => {}
                Err(e) => log::warn!("dropping record: {e}"),
            }
        }
        stored
    }

    fn reject(&mut self, name: &str, reason: &str) {
        if !self.warned {
            log::warn!(
                "ignoring {} data for {:?} model because {}; further drops are not reported",
                name,
                self.kind(),
                reason
            );
            self.warned = true;
        }
    }

    pub fn full(&self) -> Columns {
        self.buffer.samples().full()
    }

    pub fn subset(&self, start: f64, end: f64) -> Columns {
        self.buffer.samples().subset(start, end)
    }

    pub fn smallest_gap(&self) -> f64 {
        self.buffer.samples().smallest_gap()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.samples().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buffer.samples().capacity()
    }

    pub fn occupied_count(&self) -> usize {
        self.buffer.samples().occupied_count()
    }

    pub fn highest_non_nan_primary(&self) -> Option<f64> {
        self.buffer.samples().highest_non_nan_primary()
    }

    pub fn reset(&mut self) {
        self.buffer.samples_mut().reset();
    }
}
