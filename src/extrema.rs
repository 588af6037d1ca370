//! Strict local extrema of a closing-price sequence.
//!
//! A point qualifies as an extremum only when it strictly dominates every
//! other value inside a symmetric window of half-width `window`, and only
//! when the full window fits inside the series. Ties with any neighbor
//! disqualify a candidate.

use std::collections::VecDeque;

/// Indices of strict local maxima and minima.
///
/// Both lists are strictly ascending and disjoint; no index appears in both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extrema {
    pub maxima: Vec<usize>,
    pub minima: Vec<usize>,
}

impl Extrema {
    /// Find all strict local extrema of `close` over a symmetric window of
    /// half-width `window`.
    ///
    /// A series shorter than `2 * window + 1`, or a zero window, has no
    /// complete neighborhoods and yields empty sets.
    pub fn find(close: &[f64], window: usize) -> Self {
        Self {
            maxima: strict_extrema(close, window, |a, b| a > b),
            minima: strict_extrema(close, window, |a, b| a < b),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.maxima.is_empty() && self.minima.is_empty()
    }
}

/// Single-pass monotonic-window scan, O(n).
///
/// `wins(a, b)` is the strict dominance order: `>` for maxima, `<` for
/// minima. Values equal to the current front survive in the deque, so a tie
/// anywhere in the window is visible when the center is judged: an earlier
/// equal value occupies the front, a later one sits right behind it.
fn strict_extrema(close: &[f64], window: usize, wins: impl Fn(f64, f64) -> bool) -> Vec<usize> {
    let n = close.len();
    let mut out = Vec::new();
    if window == 0 || n < 2 * window + 1 {
        return out;
    }

    let mut deque: VecDeque<usize> = VecDeque::new();
    for right in 0..n {
        while let Some(&back) = deque.back() {
            if wins(close[right], close[back]) {
                deque.pop_back();
            } else {
                break;
            }
        }
        deque.push_back(right);

        // The window centered at `right - window` is complete once `right`
        // reaches its far edge.
        if right < 2 * window {
            continue;
        }
        let center = right - window;

        while deque.front().is_some_and(|&front| front + 2 * window < right) {
            deque.pop_front();
        }

        let dominant = deque.front() == Some(&center)
            && deque
                .get(1)
                .map_or(true, |&runner_up| wins(close[center], close[runner_up]));
        if dominant {
            out.push(center);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Quadratic reference: strict comparison against every neighbor in the
    /// clipped window.
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

    #[test]
    fn test_single_spike() {
        let close = [1.0, 1.0, 1.0, 9.0, 1.0, 1.0, 1.0];
        let extrema = Extrema::find(&close, 3);
        assert_eq!(extrema.maxima, vec![3]);
        assert!(extrema.minima.is_empty());
    }

    #[test]
    fn test_spike_near_edge_not_reported() {
        // Spike at index 1 lacks a full left neighborhood for window 2
        let close = [1.0, 9.0, 1.0, 2.0, 1.5, 2.0, 1.0];
        let extrema = Extrema::find(&close, 2);
        assert!(!extrema.maxima.contains(&1));
    }

    #[test]
    fn test_tie_disqualifies() {
        // Two equal peaks within one window of each other: neither is strict
        let close = [1.0, 5.0, 5.0, 1.0];
        let extrema = Extrema::find(&close, 1);
        assert!(extrema.maxima.is_empty());

        let close = [5.0, 1.0, 1.0, 5.0];
        let extrema = Extrema::find(&close, 1);
        assert!(extrema.minima.is_empty());
    }

    #[test]
    fn test_alternating_series() {
        let close = [1.0, 3.0, 1.5, 4.0, 1.0, 3.5, 2.0];
        let extrema = Extrema::find(&close, 1);
        assert_eq!(extrema.maxima, vec![1, 3, 5]);
        assert_eq!(extrema.minima, vec![2, 4]);
    }

    #[test]
    fn test_short_series_is_empty() {
        let close = [1.0, 2.0, 3.0, 4.0];
        assert!(Extrema::find(&close, 2).is_empty());
        assert!(Extrema::find(&[], 1).is_empty());
        assert!(Extrema::find(&[1.0], 1).is_empty());
    }

    #[test]
    fn test_zero_window_is_empty() {
        let close = [1.0, 3.0, 1.0];
        assert!(Extrema::find(&close, 0).is_empty());
    }

    #[test]
    fn test_monotone_series_has_no_extrema() {
        let close: Vec<f64> = (0..50).map(|i| i as f64).collect();
        assert!(Extrema::find(&close, 5).is_empty());
    }

    #[test]
    fn test_matches_naive_on_fixed_series() {
        let close = [
            10.0, 12.0, 15.0, 12.0, 10.0, 9.0, 10.0, 15.1, 12.0, 10.0, 11.0, 11.0, 13.0, 8.0,
            9.5, 9.5, 14.0, 7.0,
        ];
        for window in 1..=5 {
            let extrema = Extrema::find(&close, window);
            assert_eq!(extrema.maxima, naive(&close, window, true), "w={window}");
            assert_eq!(extrema.minima, naive(&close, window, false), "w={window}");
        }
    }

    #[test]
    fn test_maxima_minima_disjoint() {
        let close: Vec<f64> = (0..100)
            .map(|i| ((i * 7919) % 101) as f64 * 0.5)
            .collect();
        let extrema = Extrema::find(&close, 3);
        for m in &extrema.maxima {
            assert!(!extrema.minima.contains(m));
        }
    }
}
