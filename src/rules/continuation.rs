//! Continuation rules: Flag, Pennant, Triangle, Cup and Handle.

use super::{mean, std_pop, tail, PatternRule};
use crate::{Pattern, Tolerance};

impl_with_defaults!(FlagRule, PennantRule, TriangleRule, CupAndHandleRule);

// ============================================================
// FLAG
// ============================================================

/// Flag - a tight consolidation where the latest peak follows the latest
/// trough at a nearby level
#[derive(Debug, Clone)]
pub struct FlagRule {
    /// Maximum peak-to-trough span relative to the peak close
    pub consolidation_tolerance: Tolerance,
}

impl Default for FlagRule {
    fn default() -> Self {
        Self {
            consolidation_tolerance: Tolerance::new_const(0.05),
        }
    }
}

impl PatternRule for FlagRule {
    fn pattern(&self) -> Pattern {
        Pattern::Flag
    }

    fn evaluate(
        &self,
        close: &[f64],
        maxima: &[usize],
        minima: &[usize],
        scale: f64,
    ) -> Option<Vec<usize>> {
        if maxima.len() < 2 || minima.len() < 2 {
            return None;
        }
        let peak = *maxima.last()?;
        let trough = *minima.last()?;

        let tolerance = self.consolidation_tolerance.get() * scale;
        let tight = peak > trough && close[peak] - close[trough] < tolerance * close[peak];
        tight.then(|| vec![trough, peak])
    }
}

// ============================================================
// PENNANT
// ============================================================

/// Pennant - the peak-to-trough range narrows from one extrema pair to the
/// next
#[derive(Debug, Clone)]
pub struct PennantRule {
    /// Maximum span of the most recent peak/trough pair
    pub narrow_tolerance: Tolerance,
    /// Minimum span of the preceding peak/trough pair
    pub wide_tolerance: Tolerance,
}

impl Default for PennantRule {
    fn default() -> Self {
        Self {
            narrow_tolerance: Tolerance::new_const(0.03),
            wide_tolerance: Tolerance::new_const(0.05),
        }
    }
}

impl PatternRule for PennantRule {
    fn pattern(&self) -> Pattern {
        Pattern::Pennant
    }

    fn evaluate(
        &self,
        close: &[f64],
        maxima: &[usize],
        minima: &[usize],
        scale: f64,
    ) -> Option<Vec<usize>> {
        if maxima.len() < 3 || minima.len() < 3 {
            return None;
        }
        let [peak_prev, peak] = tail::<2>(maxima)?;
        let [trough_prev, trough] = tail::<2>(minima)?;

        let narrow = self.narrow_tolerance.get() * scale;
        let wide = self.wide_tolerance.get() * scale;
        let converging = close[peak] - close[trough] < narrow * close[peak]
            && close[peak_prev] - close[trough_prev] > wide * close[peak_prev];
        converging.then(|| vec![trough_prev, peak_prev, trough, peak])
    }
}

// ============================================================
// TRIANGLE
// ============================================================

/// Triangle - the last three peaks and the last three troughs each cluster
/// tightly around their own level
#[derive(Debug, Clone)]
pub struct TriangleRule {
    /// Maximum dispersion (population std over mean) of each cluster
    pub convergence_tolerance: Tolerance,
}

impl Default for TriangleRule {
    fn default() -> Self {
        Self {
            convergence_tolerance: Tolerance::new_const(0.02),
        }
    }
}

impl PatternRule for TriangleRule {
    fn pattern(&self) -> Pattern {
        Pattern::Triangle
    }

    fn evaluate(
        &self,
        close: &[f64],
        maxima: &[usize],
        minima: &[usize],
        scale: f64,
    ) -> Option<Vec<usize>> {
        let peak_idx = tail::<3>(maxima)?;
        let trough_idx = tail::<3>(minima)?;
        let highs = peak_idx.map(|i| close[i]);
        let lows = trough_idx.map(|i| close[i]);

        let tolerance = self.convergence_tolerance.get() * scale;
        let flat = std_pop(&highs) < tolerance * mean(&highs)
            && std_pop(&lows) < tolerance * mean(&lows);
        flat.then(|| peak_idx.into_iter().chain(trough_idx).collect())
    }
}

// ============================================================
// CUP AND HANDLE
// ============================================================

/// Cup and Handle - a trough recovering above an older low while the rim
/// keeps rising
///
/// Requires two maxima for the rim comparison in addition to the four
/// troughs outlining the cup and handle.
#[derive(Debug, Clone, Default)]
pub struct CupAndHandleRule;

impl PatternRule for CupAndHandleRule {
    fn pattern(&self) -> Pattern {
        Pattern::CupAndHandle
    }

    fn evaluate(
        &self,
        close: &[f64],
        maxima: &[usize],
        minima: &[usize],
        _scale: f64,
    ) -> Option<Vec<usize>> {
        if minima.len() < 4 {
            return None;
        }
        let cup = minima[minima.len() - 4];
        let handle = *minima.last()?;
        let [rim_prev, rim] = tail::<2>(maxima)?;

        let rising = close[cup] < close[handle] && close[rim] > close[rim_prev];
        rising.then(|| vec![cup, rim_prev, handle, rim])
    }
}
