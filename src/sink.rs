//! Channel for feeding records from a data source into a live data model.
//!
//! Producers may live on any thread and hold a cloned [`UpdateSink`]. The
//! owning thread pulls everything that arrived since the last frame with
//! [`crate::model::LiveDataModel::drain`], so each buffer keeps a single
//! writer.

use std::sync::mpsc::{Receiver, SendError, Sender};

use crate::data::bars::{Bar, InjectionBar};
use crate::data::items::{CurveData, ItemData, PointData};
use crate::data::markers::TimestampMarker;

/// Convenience sender for data-source records.
#[derive(Clone)]
pub struct UpdateSink {
    tx: Sender<ItemData>,
}

impl UpdateSink {
    /// Send any record.
    pub fn send(&self, item: impl Into<ItemData>) -> Result<(), SendError<ItemData>> {
        self.tx.send(item.into())
    }

    /// Send a single curve point.
    #[inline]
    pub fn send_point(&self, x: f64, y: f64) -> Result<(), SendError<ItemData>> {
        self.send(PointData::new(x, y))
    }

    /// Send a line break for curves.
    #[inline]
    pub fn send_gap(&self) -> Result<(), SendError<ItemData>> {
        self.send(PointData::gap())
    }

    /// Send a chunk of curve points (more efficient than point-by-point).
    pub fn send_curve<X, Y>(&self, x: X, y: Y) -> Result<(), SendError<ItemData>>
    where
        X: Into<Vec<f64>>,
        Y: Into<Vec<f64>>,
    {
        self.send(CurveData::new(x.into(), y.into()))
    }

    #[inline]
    pub fn send_bar(&self, bar: Bar) -> Result<(), SendError<ItemData>> {
        self.send(bar)
    }

    pub fn send_bars<I>(&self, bars: I) -> Result<(), SendError<ItemData>>
    where
        I: Into<Vec<Bar>>,
    {
        self.send(ItemData::Bars(bars.into()))
    }

    #[inline]
    pub fn send_injection_bar(&self, bar: InjectionBar) -> Result<(), SendError<ItemData>> {
        self.send(bar)
    }

    pub fn send_injection_bars<I>(&self, bars: I) -> Result<(), SendError<ItemData>>
    where
        I: Into<Vec<InjectionBar>>,
    {
        self.send(ItemData::InjectionBars(bars.into()))
    }

    #[inline]
    pub fn send_marker(&self, marker: TimestampMarker) -> Result<(), SendError<ItemData>> {
        self.send(marker)
    }

    pub fn send_markers<I>(&self, markers: I) -> Result<(), SendError<ItemData>>
    where
        I: Into<Vec<TimestampMarker>>,
    {
        self.send(ItemData::TimestampMarkers(markers.into()))
    }
}

/// Create a new channel pair: `(UpdateSink, Receiver<ItemData>)`.
pub fn channel_items() -> (UpdateSink, Receiver<ItemData>) {
    let (tx, rx) = std::sync::mpsc::channel();
    (UpdateSink { tx }, rx)
}
