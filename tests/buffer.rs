use liveplot_core::data::buffer::{SortedSampleBuffer, DEFAULT_CAPACITY};
use liveplot_core::{
    BarBuffer, BufferError, BufferVariant, Cell, Column, ColumnKind, CurveBuffer,
};
use std::collections::HashSet;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const NAN: f64 = f64::NAN;

fn assert_nan_eq(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert!(
            (a.is_nan() && e.is_nan()) || a == e,
            "{actual:?} vs {expected:?}"
        );
    }
}

fn assert_sorted_ignoring_gaps(xs: &[f64]) {
    let real: Vec<f64> = xs.iter().copied().filter(|x| !x.is_nan()).collect();
    assert!(
        real.windows(2).all(|w| w[0] <= w[1]),
        "primary column not sorted: {xs:?}"
    );
}

#[test]
fn out_of_order_rows_keep_columns_aligned() {
    let mut curve = CurveBuffer::new(10);
    curve.insert_one(1.0, 10.0).unwrap();
    curve.insert_one(3.0, 30.0).unwrap();
    curve.insert_one(2.0, 20.0).unwrap();
    let full = curve.full();
    assert_eq!(full.x, vec![1.0, 2.0, 3.0]);
    assert_eq!(full.y, vec![10.0, 20.0, 30.0]);
}

#[test]
fn unsorted_batch_is_sorted_before_insertion() {
    let mut curve = CurveBuffer::new(10);
    curve.insert_many(&[5.0, 1.0, 3.0], &[50.0, 10.0, 30.0]).unwrap();
    curve.insert_many(&[4.0, 2.0], &[40.0, 20.0]).unwrap();
    let full = curve.full();
    assert_eq!(full.x, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    assert_eq!(full.y, vec![10.0, 20.0, 30.0, 40.0, 50.0]);
    assert_eq!(curve.smallest_gap(), 1.0);
}

#[test]
fn gap_rows_of_a_batch_move_behind_its_values() {
    let mut curve = CurveBuffer::new(10);
    curve.insert_many(&[2.0, NAN, 1.0], &[2.0, NAN, 1.0]).unwrap();
    let full = curve.full();
    assert_nan_eq(&full.x, &[1.0, 2.0, NAN]);
    assert_nan_eq(&full.y, &[1.0, 2.0, NAN]);
}

#[test]
fn arity_error_leaves_buffer_untouched() {
    let mut buffer = SortedSampleBuffer::new(10, &[ColumnKind::Float, ColumnKind::Float]);
    let err = buffer.insert_one(1.0, vec![Cell::Float(1.0)]).unwrap_err();
    assert!(matches!(err, BufferError::Arity { expected: 2, actual: 1 }));
    assert!(buffer.is_empty());
}

#[test]
fn length_mismatch_is_rejected() {
    let mut buffer = SortedSampleBuffer::new(10, &[ColumnKind::Float]);
    let err = buffer
        .insert_many(&[1.0, 2.0], &[Column::from(vec![1.0])])
        .unwrap_err();
    assert!(matches!(
        err,
        BufferError::LengthMismatch {
            expected: 2,
            actual: 1
        }
    ));
    assert_eq!(buffer.occupied_count(), 0);
}

#[test]
fn wrong_cell_type_is_rejected() {
    let mut buffer = SortedSampleBuffer::new(10, &[ColumnKind::Float]);
    let err = buffer.insert_one(1.0, vec![Cell::from("label")]).unwrap_err();
    assert!(matches!(err, BufferError::ColumnType { column: 0, .. }));
}

#[test]
fn empty_batch_is_a_no_op() {
    let mut curve = CurveBuffer::new(10);
    curve.insert_many(&[], &[]).unwrap();
    assert!(curve.is_empty());
}

#[test]
fn repeated_gap_is_collapsed() {
    let mut curve = CurveBuffer::new(10);
    curve.insert_one(1.0, 1.0).unwrap();
    curve.insert_one(NAN, NAN).unwrap();
    assert_eq!(curve.occupied_count(), 2);
    curve.insert_one(NAN, NAN).unwrap();
    assert_eq!(curve.occupied_count(), 2);
    curve.insert_one(2.0, 2.0).unwrap();
    curve.insert_one(NAN, NAN).unwrap();
    assert_eq!(curve.occupied_count(), 4);
}

#[test]
fn gap_with_known_value_is_not_collapsed() {
    let mut curve = CurveBuffer::new(10);
    curve.insert_one(NAN, NAN).unwrap();
    curve.insert_one(NAN, 1.0).unwrap();
    assert_eq!(curve.occupied_count(), 2);
}

#[test]
fn values_after_gap_are_appended() {
    let mut curve = CurveBuffer::new(10);
    for x in [0.0, 1.0, 2.0, NAN, 3.0, 4.0] {
        curve.insert_one(x, x).unwrap();
    }
    assert_nan_eq(&curve.full().x, &[0.0, 1.0, 2.0, NAN, 3.0, 4.0]);
}

#[test]
fn subset_is_inclusive_and_trims_edge_gaps() {
    let mut curve = CurveBuffer::new(10);
    for x in [0.0, 1.0, 2.0, NAN, 3.0, 4.0] {
        curve.insert_one(x, x).unwrap();
    }
    assert_eq!(curve.subset(1.0, 2.0).x, vec![1.0, 2.0]);
    assert_eq!(curve.subset(1.5, 2.5).x, vec![2.0]);
    assert_eq!(curve.subset(2.5, 4.0).x, vec![3.0, 4.0]);
    assert_nan_eq(&curve.subset(1.0, 3.0).x, &[1.0, 2.0, NAN, 3.0]);
    assert!(curve.subset(10.0, 20.0).is_empty());
    assert!(curve.subset(-5.0, -1.0).is_empty());
}

#[test]
fn subset_keeps_edge_row_with_known_value() {
    let mut curve = CurveBuffer::new(10);
    curve.insert_one(1.0, 1.0).unwrap();
    curve.insert_one(NAN, 5.0).unwrap();
    assert_eq!(curve.full().len(), 2);

    let subset = curve.subset(0.0, 10.0);
    assert_nan_eq(&subset.x, &[1.0, NAN]);
    assert_eq!(subset.y, vec![1.0, 5.0]);

    let mut leading = CurveBuffer::new(10);
    leading.insert_one(NAN, 5.0).unwrap();
    leading.insert_one(1.0, 1.0).unwrap();
    let subset = leading.subset(0.0, 10.0);
    assert_nan_eq(&subset.x, &[NAN, 1.0]);
    assert_eq!(subset.y, vec![5.0, 1.0]);
}

#[test]
fn subset_still_trims_edge_gap_rows() {
    let mut curve = CurveBuffer::new(10);
    curve.insert_one(NAN, NAN).unwrap();
    curve.insert_one(1.0, 1.0).unwrap();
    curve.insert_one(NAN, NAN).unwrap();
    assert_eq!(curve.full().len(), 3);
    let subset = curve.subset(0.0, 10.0);
    assert_eq!(subset.x, vec![1.0]);
    assert_eq!(subset.y, vec![1.0]);
}

#[test]
fn bar_subset_keeps_edge_row_with_known_height() {
    let mut bars = BarBuffer::new(10);
    bars.insert_one(1.0, 0.0, 1.0).unwrap();
    bars.insert_one(NAN, NAN, 3.0).unwrap();
    let subset = bars.subset(0.0, 10.0);
    assert_eq!(subset.len(), 2);
    assert_nan_eq(&subset.x, &[1.0, NAN]);
    assert_eq!(subset.height, vec![1.0, 3.0]);
}

#[test]
fn subset_of_ascending_values_returns_them_all() {
    let mut curve = CurveBuffer::new(100);
    let xs: Vec<f64> = (0..50).map(|i| f64::from(i) * 0.5).collect();
    curve.insert_many(&xs, &xs).unwrap();
    let subset = curve.subset(xs[0], xs[xs.len() - 1]);
    assert_eq!(subset.x, xs);
    assert_eq!(subset.y, xs);
}

#[test]
fn reset_restores_empty_state() {
    let mut curve = CurveBuffer::new(10);
    curve.insert_many(&[0.0, 1.0, 1.5], &[0.0, 0.0, 0.0]).unwrap();
    assert_eq!(curve.smallest_gap(), 0.5);
    curve.reset();
    assert!(curve.is_empty());
    assert!(curve.full().is_empty());
    assert_eq!(curve.smallest_gap(), f64::INFINITY);
    assert_eq!(curve.space_left(), 10);
}

#[test]
fn highest_non_nan_primary_skips_trailing_gap() {
    let mut curve = CurveBuffer::new(10);
    assert_eq!(curve.highest_non_nan_primary(), None);
    curve.insert_one(1.0, 1.0).unwrap();
    curve.insert_one(2.0, 1.0).unwrap();
    curve.insert_one(NAN, NAN).unwrap();
    assert_eq!(curve.highest_non_nan_primary(), Some(2.0));
}

#[test]
fn invalid_capacity_falls_back_to_default() {
    let _ = env_logger::builder().is_test(true).try_init();
    assert_eq!(CurveBuffer::new(1).capacity(), DEFAULT_CAPACITY);
    assert_eq!(CurveBuffer::new(0).capacity(), DEFAULT_CAPACITY);
    assert_eq!(CurveBuffer::new(3).capacity(), 3);
}

#[test]
fn full_buffer_evicts_oldest_block() {
    let mut curve = CurveBuffer::new(6);
    let xs: Vec<f64> = (0..6).map(f64::from).collect();
    curve.insert_many(&xs, &xs).unwrap();
    assert_eq!(curve.space_left(), 0);
    curve.insert_one(6.0, 6.0).unwrap();
    // ceil(6 / 3) + 1 evicted
    assert_eq!(curve.full().x, vec![3.0, 4.0, 5.0, 6.0]);
}

#[test]
fn oversized_batch_into_nearly_full_buffer_keeps_newest() {
    let mut curve = CurveBuffer::new(10);
    let old: Vec<f64> = (0..9).map(f64::from).collect();
    curve.insert_many(&old, &old).unwrap();
    let incoming: Vec<f64> = (100..126).map(f64::from).collect();
    curve.insert_many(&incoming, &incoming).unwrap();
    // 26 - 10 + ceil(10 / 3) leading rows of the batch are dropped
    let expected: Vec<f64> = (120..126).map(f64::from).collect();
    let full = curve.full();
    assert_eq!(full.x, expected);
    assert_eq!(full.y, expected);
}

#[test]
fn older_batch_into_full_buffer_keeps_older_buffer_rows() {
    let mut curve = CurveBuffer::new(9);
    let xs: Vec<f64> = (0..9).map(|i| f64::from(i) * 10.0).collect();
    curve.insert_many(&xs, &xs).unwrap();
    curve.insert_many(&[1.0, 2.0], &[1.0, 2.0]).unwrap();
    // the batch is older than every surviving row, so it is dropped and
    // fewer rows are evicted
    assert_eq!(curve.full().x, vec![30.0, 40.0, 50.0, 60.0, 70.0, 80.0]);
}

/// Every batch is newer than the buffer content, so the buffer must always
/// hold a contiguous tail of everything written so far.
#[test]
fn random_newer_batches_keep_a_contiguous_tail() {
    let mut rng = StdRng::seed_from_u64(7);
    let capacity = 12;
    let mut curve = CurveBuffer::new(capacity);
    let mut written: Vec<f64> = Vec::new();
    let mut next = 0u32;
    for _ in 0..300 {
        let n = rng.gen_range(1..=30);
        let mut batch: Vec<f64> = (next..next + n).map(f64::from).collect();
        next += n;
        written.extend_from_slice(&batch);
        batch.shuffle(&mut rng);
        curve.insert_many(&batch, &batch).unwrap();

        let full = curve.full();
        assert!(full.len() <= capacity);
        assert!(!full.is_empty());
        assert_eq!(full.x, full.y);
        assert_eq!(full.x.as_slice(), &written[written.len() - full.len()..]);
    }
}

/// Checks one write against a reference model: the buffer keeps a suffix of
/// its previous real values plus a suffix of the sorted batch, and loses
/// nothing while there is room.
fn assert_keeps_newest(before: &[f64], batch: &[f64], after: &[f64], had_room: bool) {
    let mut batch: Vec<f64> = batch.iter().copied().filter(|x| !x.is_nan()).collect();
    batch.sort_by(f64::total_cmp);
    let old: HashSet<u64> = before.iter().map(|x| x.to_bits()).collect();
    let new: HashSet<u64> = batch.iter().map(|x| x.to_bits()).collect();

    let kept_from = |set: &HashSet<u64>| -> Vec<f64> {
        after
            .iter()
            .copied()
            .filter(|x| set.contains(&x.to_bits()))
            .collect()
    };
    let kept_old = kept_from(&old);
    let kept_new = kept_from(&new);
    assert_eq!(
        kept_old.len() + kept_new.len(),
        after.len(),
        "unknown or duplicated rows in {after:?}"
    );
    assert_eq!(
        kept_old.as_slice(),
        &before[before.len() - kept_old.len()..],
        "evicted rows are not the oldest ones"
    );
    assert_eq!(
        kept_new.as_slice(),
        &batch[batch.len() - kept_new.len()..],
        "dropped incoming rows are not the oldest ones"
    );
    if had_room {
        assert_eq!(
            after.len(),
            before.len() + batch.len(),
            "rows lost without eviction"
        );
    }
}

#[test]
fn random_inserts_keep_sort_and_capacity() {
    let mut rng = StdRng::seed_from_u64(42);
    let capacity = 50;
    let mut curve = CurveBuffer::new(capacity);
    // Unique values, so every surviving row can be traced back to its write.
    let mut pool: Vec<u32> = (0..200_000).collect();
    pool.shuffle(&mut rng);
    let mut next = || f64::from(pool.pop().unwrap());

    for _ in 0..2000 {
        let before: Vec<f64> = curve
            .full()
            .x
            .into_iter()
            .filter(|x| !x.is_nan())
            .collect();
        let occupied = curve.occupied_count();
        let batch: Vec<f64> = match rng.gen_range(0..10) {
            0 => vec![NAN],
            1..=6 => vec![next()],
            _ => (0..rng.gen_range(1..80)).map(|_| next()).collect(),
        };
        if batch.len() == 1 {
            curve.insert_one(batch[0], batch[0]).unwrap();
        } else {
            curve.insert_many(&batch, &batch).unwrap();
        }

        let full = curve.full();
        assert!(curve.occupied_count() <= capacity);
        assert_eq!(full.len(), curve.occupied_count());
        assert_sorted_ignoring_gaps(&full.x);
        assert_nan_eq(&full.x, &full.y);

        let after: Vec<f64> = full.x.iter().copied().filter(|x| !x.is_nan()).collect();
        let had_room = occupied + batch.len() <= capacity;
        assert_keeps_newest(&before, &batch, &after, had_room);
    }
}
