use pretty_assertions::assert_eq;
use proptest::prelude::*;

use polarplot::interpreter::range::{Range, DEFAULT_STEP};

fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Expected {expected:?} but got {actual:?}"
    );
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-12, "Expected {expected:?} but got {actual:?}");
    }
}

#[test]
fn default_step_excludes_end() {
    let values: Vec<f64> = Range::new(0.0, 0.05, None, false).collect();
    assert_close(&values, &[0.0, 0.01, 0.02, 0.03, 0.04]);
}

#[test]
fn default_step_includes_end() {
    let values: Vec<f64> = Range::new(0.0, 0.05, None, true).collect();
    assert_close(&values, &[0.0, 0.01, 0.02, 0.03, 0.04, 0.05]);
}

#[test]
fn explicit_descending_step() {
    let values: Vec<f64> = Range::new(5.0, 0.0, Some(-1.0), true).collect();
    assert_eq!(values, vec![5.0, 4.0, 3.0, 2.0, 1.0, 0.0]);
}

#[test]
fn default_step_follows_direction() {
    let values: Vec<f64> = Range::new(1.0, 0.0, None, false).take(3).collect();
    assert_close(&values, &[1.0, 1.0 - DEFAULT_STEP, 1.0 - 2.0 * DEFAULT_STEP]);
    assert!(Range::new(1.0, 0.0, None, false).all(|v| v > 0.0 && v <= 1.0));
}

#[test]
fn equal_bounds_yield_once() {
    assert_eq!(Range::new(2.0, 2.0, None, false).collect::<Vec<_>>(), vec![2.0]);
    assert_eq!(Range::new(2.0, 2.0, Some(0.0), true).collect::<Vec<_>>(), vec![2.0]);
    assert_eq!(Range::single(-3.5).collect::<Vec<_>>(), vec![-3.5]);
}

#[test]
fn unordered_bounds_yield_once() {
    assert_eq!(Range::new(0.0, f64::NAN, None, false).count(), 1);
}

#[test]
fn long_ranges_do_not_drift() {
    // 300 steps of 0.01 would overshoot the end with repeated addition.
    assert_eq!(Range::new(0.0, 3.0, None, false).count(), 300);
}

#[test]
fn ranges_are_lazy() {
    let values: Vec<f64> = Range::new(0.0, 1e12, Some(1.0), false).take(3).collect();
    assert_eq!(values, vec![0.0, 1.0, 2.0]);
}

fn expected_values(start: i32, end: i32, step: i32, inclusive: bool) -> Vec<f64> {
    if start == end {
        return vec![start as f64];
    }
    let mut values = Vec::new();
    let mut v = start;
    loop {
        let keep_going = match (start < end, inclusive) {
            (true, true) => v <= end,
            (true, false) => v < end,
            (false, true) => v >= end,
            (false, false) => v > end,
        };
        if !keep_going {
            break;
        }
        values.push(v as f64);
        v += step;
    }
    values
}

proptest! {
    #[test]
    fn integer_ranges_match_counting(
        start in -50i32..50,
        end in -50i32..50,
        magnitude in 1i32..7,
        inclusive in any::<bool>(),
    ) {
        let step = if end < start { -magnitude } else { magnitude };
        let values: Vec<f64> =
            Range::new(start as f64, end as f64, Some(step as f64), inclusive).collect();
        prop_assert_eq!(values, expected_values(start, end, step, inclusive));
    }
}
