//! Property tests for the extremum scan against a quadratic reference.

use chartscan::extrema::Extrema;
use proptest::prelude::*;

/// Reference implementation: strict comparison against every neighbor in
/// the full symmetric window.
fn naive(close: &[f64], window: usize, maxima: bool) -> Vec<usize> {
    let n = close.len();
    if window == 0 || n < 2 * window + 1 {
        return Vec::new();
    }
    (window..n - window)
        .filter(|&i| {
            (i - window..=i + window).filter(|&j| j != i).all(|j| {
                if maxima {
                    close[i] > close[j]
                } else {
                    close[i] < close[j]
                }
            })
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_matches_naive(
        close in prop::collection::vec(0.0f64..1000.0, 0..200),
        window in 1usize..10,
    ) {
        let extrema = Extrema::find(&close, window);
        prop_assert_eq!(&extrema.maxima, &naive(&close, window, true));
        prop_assert_eq!(&extrema.minima, &naive(&close, window, false));
    }

    #[test]
    fn prop_indices_ascending_and_interior(
        close in prop::collection::vec(0.0f64..1000.0, 0..200),
        window in 1usize..10,
    ) {
        let extrema = Extrema::find(&close, window);
        for list in [&extrema.maxima, &extrema.minima] {
            prop_assert!(list.windows(2).all(|pair| pair[0] < pair[1]));
            for &i in list {
                prop_assert!(i >= window);
                prop_assert!(i + window < close.len());
            }
        }
    }

    #[test]
    fn prop_maxima_minima_disjoint(
        close in prop::collection::vec(0.0f64..1000.0, 0..200),
        window in 1usize..10,
    ) {
        let extrema = Extrema::find(&close, window);
        for i in &extrema.maxima {
            prop_assert!(!extrema.minima.contains(i));
        }
    }

    #[test]
    fn prop_integer_series_with_ties(
        close in prop::collection::vec(0u8..8, 0..120),
        window in 1usize..6,
    ) {
        // Small integer alphabet forces frequent ties, the case the deque
        // has to get right
        let close: Vec<f64> = close.into_iter().map(f64::from).collect();
        let extrema = Extrema::find(&close, window);
        prop_assert_eq!(&extrema.maxima, &naive(&close, window, true));
        prop_assert_eq!(&extrema.minima, &naive(&close, window, false));
    }
}

#[test]
fn test_plateau_is_never_an_extremum() {
    // A flat top of width 3 at window 1: no index strictly dominates its
    // equal neighbor
    let close = [1.0, 5.0, 5.0, 5.0, 1.0];
    let extrema = Extrema::find(&close, 1);
    assert!(extrema.maxima.is_empty());
    assert_eq!(extrema.minima, vec![]);
}

#[test]
fn test_adjacent_extrema_at_window_one() {
    let close = [2.0, 1.0, 3.0, 1.0, 3.0, 2.0, 4.0, 0.0];
    let extrema = Extrema::find(&close, 1);
    assert_eq!(extrema.maxima, naive(&close, 1, true));
    assert_eq!(extrema.minima, naive(&close, 1, false));
}
