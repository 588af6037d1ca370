//! Reversal rules: Double Top, Double Bottom, Head and Shoulders.

use super::{tail, PatternRule};
use crate::{Pattern, Tolerance};

impl_with_defaults!(DoubleTopRule, DoubleBottomRule, HeadAndShouldersRule);

// ============================================================
// DOUBLE TOP / DOUBLE BOTTOM
// ============================================================

/// Double Top - the two most recent peaks close at nearly the same level
#[derive(Debug, Clone)]
pub struct DoubleTopRule {
    /// Maximum relative gap between the two peak closes
    pub peak_tolerance: Tolerance,
}

impl Default for DoubleTopRule {
    fn default() -> Self {
        Self {
            peak_tolerance: Tolerance::new_const(0.02),
        }
    }
}

impl PatternRule for DoubleTopRule {
    fn pattern(&self) -> Pattern {
        Pattern::DoubleTop
    }

    fn evaluate(
        &self,
        close: &[f64],
        maxima: &[usize],
        _minima: &[usize],
        scale: f64,
    ) -> Option<Vec<usize>> {
        let [first, second] = tail::<2>(maxima)?;
        let tolerance = self.peak_tolerance.get() * scale;
        let near = (close[first] - close[second]).abs() < tolerance * close[first];
        near.then(|| vec![first, second])
    }
}

/// Double Bottom - the two most recent troughs close at nearly the same level
#[derive(Debug, Clone)]
pub struct DoubleBottomRule {
    /// Maximum relative gap between the two trough closes
    pub trough_tolerance: Tolerance,
}

impl Default for DoubleBottomRule {
    fn default() -> Self {
        Self {
            trough_tolerance: Tolerance::new_const(0.02),
        }
    }
}

impl PatternRule for DoubleBottomRule {
    fn pattern(&self) -> Pattern {
        Pattern::DoubleBottom
    }

    fn evaluate(
        &self,
        close: &[f64],
        _maxima: &[usize],
        minima: &[usize],
        scale: f64,
    ) -> Option<Vec<usize>> {
        let [first, second] = tail::<2>(minima)?;
        let tolerance = self.trough_tolerance.get() * scale;
        let near = (close[first] - close[second]).abs() < tolerance * close[first];
        near.then(|| vec![first, second])
    }
}

// ============================================================
// HEAD AND SHOULDERS
// ============================================================

/// Head and Shoulders - a head strictly above two shoulders of similar height
#[derive(Debug, Clone)]
pub struct HeadAndShouldersRule {
    /// Maximum relative gap between the two shoulder closes, measured
    /// against the head close
    pub shoulder_tolerance: Tolerance,
}

impl Default for HeadAndShouldersRule {
    fn default() -> Self {
        Self {
            shoulder_tolerance: Tolerance::new_const(0.02),
        }
    }
}

impl PatternRule for HeadAndShouldersRule {
    fn pattern(&self) -> Pattern {
        Pattern::HeadAndShoulders
    }

    fn evaluate(
        &self,
        close: &[f64],
        maxima: &[usize],
        minima: &[usize],
        scale: f64,
    ) -> Option<Vec<usize>> {
        let [left, head, right] = tail::<3>(maxima)?;
        let [neck_a, neck_b] = tail::<2>(minima)?;

        let head_above = close[head] > close[left] && close[head] > close[right];
        let tolerance = self.shoulder_tolerance.get() * scale;
        let shoulders_level = (close[left] - close[right]).abs() < tolerance * close[head];

        (head_above && shoulders_level).then(|| vec![left, head, right, neck_a, neck_b])
    }
}
