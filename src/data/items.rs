//! Records emitted by data sources, and the rules that decide whether a
//! record may be written to a buffer.
//!
//! A gap (NaN) is a legitimate value in most fields: a point whose
//! coordinates are both gaps is a line break. Records become invalid only
//! when a field that positions them is missing while another field still
//! carries data.

use std::fmt;

use crate::data::bars::{Bar, InjectionBar};
use crate::data::markers::TimestampMarker;
use crate::data::sample::Sample;

pub type BarData = Bar;
pub type InjectionBarData = InjectionBar;
pub type TimestampMarkerData = TimestampMarker;

pub type BarCollectionData = Vec<BarData>;
pub type InjectionBarCollectionData = Vec<InjectionBarData>;
pub type TimestampMarkerCollectionData = Vec<TimestampMarkerData>;

/// Validity check applied before a record reaches a buffer.
pub trait Validate {
    fn is_valid(&self) -> bool;
}

/// A single point of a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointData {
    pub x: f64,
    pub y: f64,
}

impl PointData {
    pub fn new(x: impl Into<Sample>, y: impl Into<Sample>) -> Self {
        Self {
            x: x.into().raw(),
            y: y.into().raw(),
        }
    }

    /// A line break: both coordinates are gaps.
    pub fn gap() -> Self {
        Self {
            x: f64::NAN,
            y: f64::NAN,
        }
    }
}

impl Validate for PointData {
    fn is_valid(&self) -> bool {
        !(self.x.is_nan() && !self.y.is_nan())
    }
}

/// Several points of a curve at once.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CurveData {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl CurveData {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        Self { x, y }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = PointData> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .map(|(&x, &y)| PointData { x, y })
    }
}

impl FromIterator<PointData> for CurveData {
    fn from_iter<I: IntoIterator<Item = PointData>>(iter: I) -> Self {
        let (x, y) = iter.into_iter().map(|p| (p.x, p.y)).unzip();
        Self { x, y }
    }
}

impl Validate for CurveData {
    fn is_valid(&self) -> bool {
        self.x.len() == self.y.len() && self.points().all(|p| p.is_valid())
    }
}

impl Validate for Bar {
    fn is_valid(&self) -> bool {
        !self.x.is_nan() && !self.height.is_nan()
    }
}

impl Validate for InjectionBar {
    fn is_valid(&self) -> bool {
        !self.x.is_nan() && !self.y.is_nan()
    }
}

impl Validate for TimestampMarker {
    fn is_valid(&self) -> bool {
        !self.x.is_nan()
    }
}

impl<T: Validate> Validate for [T] {
    fn is_valid(&self) -> bool {
        self.iter().all(Validate::is_valid)
    }
}

/// Any record a data source can emit.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemData {
    Point(PointData),
    Curve(CurveData),
    Bar(BarData),
    Bars(BarCollectionData),
    InjectionBar(InjectionBarData),
    InjectionBars(InjectionBarCollectionData),
    TimestampMarker(TimestampMarkerData),
    TimestampMarkers(TimestampMarkerCollectionData),
}

impl ItemData {
    pub fn name(&self) -> &'static str {
        match self {
            ItemData::Point(_) => "point",
            ItemData::Curve(_) => "curve",
            ItemData::Bar(_) => "bar",
            ItemData::Bars(_) => "bar collection",
            ItemData::InjectionBar(_) => "injection bar",
            ItemData::InjectionBars(_) => "injection bar collection",
            ItemData::TimestampMarker(_) => "timestamp marker",
            ItemData::TimestampMarkers(_) => "timestamp marker collection",
        }
    }
}

impl Validate for ItemData {
    fn is_valid(&self) -> bool {
        match self {
            ItemData::Point(p) => p.is_valid(),
            ItemData::Curve(c) => c.is_valid(),
            ItemData::Bar(b) => b.is_valid(),
            ItemData::Bars(b) => b.is_valid(),
            ItemData::InjectionBar(b) => b.is_valid(),
            ItemData::InjectionBars(b) => b.is_valid(),
            ItemData::TimestampMarker(m) => m.is_valid(),
            ItemData::TimestampMarkers(m) => m.is_valid(),
        }
    }
}

impl fmt::Display for ItemData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<PointData> for ItemData {
    fn from(p: PointData) -> Self {
        ItemData::Point(p)
    }
}

impl From<CurveData> for ItemData {
    fn from(c: CurveData) -> Self {
        ItemData::Curve(c)
    }
}

impl From<Bar> for ItemData {
    fn from(b: Bar) -> Self {
        ItemData::Bar(b)
    }
}

impl From<InjectionBar> for ItemData {
    fn from(b: InjectionBar) -> Self {
        ItemData::InjectionBar(b)
    }
}

impl From<TimestampMarker> for ItemData {
    fn from(m: TimestampMarker) -> Self {
        ItemData::TimestampMarker(m)
    }
}
