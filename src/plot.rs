//! egui_plot items built from buffer reads.
//!
//! Only converts data; painting, layout and interaction stay with the
//! caller's plot UI.

use egui::Color32;
use egui_plot::{Bar, BarChart, Line, PlotPoints, VLine};

use crate::data::bars::BarSlice;
use crate::data::curve::CurveSlice;
use crate::data::markers::{MarkerSlice, DEFAULT_COLOR};
use crate::sweep::SweepFrame;

/// Runs of consecutive real points. A row with a NaN `x` or `y` ends the
/// current run; empty runs are not returned.
pub fn line_runs(curve: &CurveSlice) -> Vec<Vec<[f64; 2]>> {
    let mut runs = Vec::new();
    let mut run: Vec<[f64; 2]> = Vec::new();
    for [x, y] in curve.points() {
        if x.is_nan() || y.is_nan() {
            if !run.is_empty() {
                runs.push(std::mem::take(&mut run));
            }
        } else {
            run.push([x, y]);
        }
    }
    if !run.is_empty() {
        runs.push(run);
    }
    runs
}

/// One line per run of a curve read, so gap rows show as breaks.
pub fn curve_lines(name: &str, curve: &CurveSlice) -> Vec<Line<'static>> {
    line_runs(curve)
        .into_iter()
        .map(|run| Line::new(name.to_string(), PlotPoints::from(run)))
        .collect()
}

/// Lines for a sweep. The two pieces are never joined, so the newest point
/// is not connected to the oldest one.
pub fn sweep_lines(name: &str, frame: &SweepFrame) -> Vec<Line<'static>> {
    curve_lines(name, &frame.polyline())
}

pub fn bar_chart(name: &str, bars: &BarSlice) -> BarChart {
    let bars: Vec<Bar> = bars
        .bars()
        .filter(|b| !b.x.is_nan() && !b.height.is_nan())
        .map(|b| Bar::new(b.x, b.height).base_offset(b.y))
        .collect();
    BarChart::new(name.to_string(), bars)
}

/// Parse a `#rrggbb` / `#rrggbbaa` color, falling back to the default
/// marker color.
pub fn marker_color(hex: &str) -> Color32 {
    match Color32::from_hex(hex) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("unusable marker color {hex:?} ({e:?}); using {DEFAULT_COLOR}");
            Color32::WHITE
        }
    }
}

pub fn marker_lines(markers: &MarkerSlice) -> Vec<VLine> {
    markers
        .markers()
        .filter(|m| !m.x.is_nan())
        .map(|m| VLine::new(m.label.clone(), m.x).color(marker_color(&m.color)))
        .collect()
}
