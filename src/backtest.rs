//! Forward-return reliability statistics for detected patterns.
//!
//! The evaluator replays a detection report against the series it came from:
//! for every evidence index with a full look-forward horizon ahead of it, the
//! signed fractional return over that horizon is collected, then aggregated
//! per pattern.

use crate::{validate_series, Horizon, Ohlcv, Pattern, Result, ScanReport};

/// Reliability statistics for one pattern
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct PatternStats {
    /// Number of evidence points the detection recorded
    pub count: usize,
    /// Fraction of qualifying forward returns that were strictly positive;
    /// 0.0 when no point had a full horizon ahead of it
    pub success_rate: f64,
    /// Mean signed fractional forward return over qualifying points;
    /// 0.0 when none qualify
    pub avg_return: f64,
}

/// Per-pattern statistics keyed by the fixed pattern vocabulary.
///
/// Serializes to a JSON object keyed by pattern display name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BacktestReport {
    stats: [PatternStats; 7],
}

impl BacktestReport {
    #[inline]
    pub fn get(&self, pattern: Pattern) -> &PatternStats {
        &self.stats[pattern as usize]
    }

    /// Iterate all patterns in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Pattern, &PatternStats)> {
        Pattern::ALL.into_iter().zip(self.stats.iter())
    }
}

impl serde::Serialize for BacktestReport {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = s.serialize_map(Some(self.stats.len()))?;
        for (pattern, stats) in self.iter() {
            map.serialize_entry(pattern.name(), stats)?;
        }
        map.end()
    }
}

/// Measure forward-return behavior of every detected pattern in `report`.
///
/// For each evidence index `p` with `p + horizon` still inside the series the
/// forward return is `(close[p + horizon] - close[p]) / close[p]`. Undetected
/// patterns keep zeroed statistics; detected patterns whose points all sit
/// within `horizon` bars of the series end keep their point count but zero
/// rates. The report is taken as supplied and never recomputed.
pub fn evaluate<T: Ohlcv>(
    bars: &[T],
    report: &ScanReport,
    horizon: Horizon,
) -> Result<BacktestReport> {
    validate_series(bars)?;
    let close: Vec<f64> = bars.iter().map(Ohlcv::close).collect();
    let steps = horizon.get();

    let mut out = BacktestReport::default();
    for (pattern, signal) in report.iter() {
        if !signal.detected {
            continue;
        }

        let returns: Vec<f64> = signal
            .points
            .iter()
            .filter(|&&p| p + steps < close.len())
            .map(|&p| (close[p + steps] - close[p]) / close[p])
            .collect();

        let (success_rate, avg_return) = if returns.is_empty() {
            (0.0, 0.0)
        } else {
            let wins = returns.iter().filter(|&&r| r > 0.0).count();
            (
                wins as f64 / returns.len() as f64,
                returns.iter().sum::<f64>() / returns.len() as f64,
            )
        };

        out.stats[pattern as usize] = PatternStats {
            count: signal.points.len(),
            success_rate,
            avg_return,
        };
    }

    Ok(out)
}
