use std::thread;

use liveplot_core::{
    channel_items, Bar, CurveData, InjectionBar, ItemData, LiveDataModel, ModelKind, PointData,
    TimestampMarker,
};

const NAN: f64 = f64::NAN;

#[test]
fn curve_model_accepts_points_and_curves() {
    let mut model = LiveDataModel::new(ModelKind::Curve, 100);
    assert!(model.handle(PointData::new(1.0, 1.0).into()).unwrap());
    assert!(model
        .handle(CurveData::new(vec![2.0, 3.0], vec![4.0, 9.0]).into())
        .unwrap());
    assert!(model.handle(PointData::gap().into()).unwrap());
    assert_eq!(model.occupied_count(), 4);
    assert_eq!(model.highest_non_nan_primary(), Some(3.0));
}

#[test]
fn invalid_records_are_ignored() {
    let mut model = LiveDataModel::new(ModelKind::Curve, 100);
    assert!(!model.handle(PointData::new(NAN, 1.0).into()).unwrap());
    assert!(!model
        .handle(CurveData::new(vec![1.0, NAN], vec![1.0, 1.0]).into())
        .unwrap());
    assert!(!model
        .handle(CurveData::new(vec![1.0, 2.0], vec![1.0]).into())
        .unwrap());
    assert!(model.is_empty());
}

#[test]
fn records_for_other_models_are_ignored() {
    let mut model = LiveDataModel::new(ModelKind::TimestampMarker, 100);
    assert!(!model.handle(PointData::new(1.0, 1.0).into()).unwrap());
    assert!(!model.handle(Bar::new(1.0, 0.0, 1.0).into()).unwrap());
    assert!(model
        .handle(TimestampMarker::new(1.0, "#ff0000", "start").into())
        .unwrap());
    assert_eq!(model.occupied_count(), 1);
}

#[test]
fn bar_model_replaces_missing_base() {
    let mut model = LiveDataModel::new(ModelKind::Bar, 100);
    let bar = Bar {
        x: 1.0,
        y: NAN,
        height: 3.0,
    };
    assert!(model.handle(bar.into()).unwrap());
    assert!(model
        .handle(ItemData::Bars(vec![Bar {
            x: 2.0,
            y: NAN,
            height: 1.0
        }]))
        .unwrap());
    let full = model.full();
    assert_eq!(full.floats(0), &[0.0, 0.0]);
    assert_eq!(full.floats(1), &[3.0, 1.0]);
}

#[test]
fn collection_with_one_invalid_element_is_rejected() {
    let mut model = LiveDataModel::new(ModelKind::InjectionBar, 100);
    let bars = vec![InjectionBar::new(1.0, 1.0), InjectionBar::new(2.0, NAN)];
    assert!(!model.handle(ItemData::InjectionBars(bars)).unwrap());
    assert!(model.is_empty());
    assert!(model
        .handle(ItemData::InjectionBars(vec![InjectionBar::new(1.0, 1.0)]))
        .unwrap());
    assert_eq!(model.occupied_count(), 1);
}

#[test]
fn marker_collections_are_written_in_order() {
    let mut model = LiveDataModel::new(ModelKind::TimestampMarker, 100);
    let markers = vec![
        TimestampMarker::new(2.0, "", "b"),
        TimestampMarker::new(1.0, "#00ff00", "a"),
    ];
    assert!(model.handle(ItemData::TimestampMarkers(markers)).unwrap());
    let full = model.full();
    assert_eq!(full.primary, vec![1.0, 2.0]);
    assert_eq!(full.texts(0), &["#00ff00", "#ffffff"]);
    assert_eq!(full.texts(1), &["a", "b"]);
}

#[test]
fn reset_empties_the_model() {
    let mut model = LiveDataModel::new(ModelKind::Curve, 100);
    model.handle(PointData::new(1.0, 1.0).into()).unwrap();
    model.reset();
    assert!(model.is_empty());
    assert_eq!(model.smallest_gap(), f64::INFINITY);
    assert_eq!(model.capacity(), 100);
}

#[test]
fn drain_pulls_records_from_other_threads() {
    let (sink, rx) = channel_items();
    let producer = thread::spawn(move || {
        for i in 0..10 {
            let x = f64::from(i);
            sink.send_point(x, x * x).unwrap();
        }
        sink.send_gap().unwrap();
        sink.send_curve(vec![10.0, 11.0], vec![100.0, 121.0]).unwrap();
        sink.send_marker(TimestampMarker::new(12.0, "", "ignored"))
            .unwrap();
    });
    producer.join().unwrap();

    let mut model = LiveDataModel::new(ModelKind::Curve, 100);
    assert_eq!(model.drain(&rx), 12);
    assert_eq!(model.occupied_count(), 13);
    assert_eq!(model.subset(10.0, 11.0).floats(0), &[100.0, 121.0]);
    assert_eq!(model.drain(&rx), 0);
}
