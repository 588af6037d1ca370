//! Geometric chart-pattern rules.
//!
//! Each rule is a stateless check over the most recent extrema of a
//! closing-price series: a cheap comparison on a fixed small tail of the
//! maxima/minima lists rather than a general shape search. Rules are
//! independent; the scanner evaluates all of them on every call.

/// Generate `with_defaults()` -> `Self::default()` for multiple rule types.
macro_rules! impl_with_defaults {
  ($($rule:ty),* $(,)?) => {
    $(impl $rule {
      pub fn with_defaults() -> Self { Self::default() }
    })*
  };
}

pub mod continuation;
pub mod reversal;

pub use continuation::*;
pub use reversal::*;

use crate::Pattern;

/// A single detection rule.
///
/// `evaluate` returns the evidence indices (oldest first) when the pattern
/// is present, `None` otherwise. `scale` multiplies the rule's base
/// tolerances; the scanner derives it from the sensitivity dial.
pub trait PatternRule: Send + Sync {
    /// Pattern this rule flags
    fn pattern(&self) -> Pattern;

    /// Evaluate against closes and ascending extrema index lists
    fn evaluate(
        &self,
        close: &[f64],
        maxima: &[usize],
        minima: &[usize],
        scale: f64,
    ) -> Option<Vec<usize>>;
}

/// Macro to generate the BuiltinRule enum without boilerplate
macro_rules! define_builtin_rules {
    (
        $(
            $variant:ident($rule:ty)
        ),* $(,)?
    ) => {
        /// All builtin rules - fast path via enum dispatch
        #[derive(Debug, Clone)]
        pub enum BuiltinRule {
            $($variant($rule)),*
        }

        impl BuiltinRule {
            #[inline]
            pub fn pattern(&self) -> Pattern {
                match self {
                    $(Self::$variant(r) => PatternRule::pattern(r)),*
                }
            }

            #[inline]
            pub fn evaluate(
                &self,
                close: &[f64],
                maxima: &[usize],
                minima: &[usize],
                scale: f64,
            ) -> Option<Vec<usize>> {
                match self {
                    $(Self::$variant(r) => PatternRule::evaluate(r, close, maxima, minima, scale)),*
                }
            }
        }
    };
}

define_builtin_rules! {
    DoubleTop(DoubleTopRule),
    DoubleBottom(DoubleBottomRule),
    HeadAndShoulders(HeadAndShouldersRule),
    Flag(FlagRule),
    Pennant(PennantRule),
    Triangle(TriangleRule),
    CupAndHandle(CupAndHandleRule),
}

// ============================================================
// SHARED NUMERIC HELPERS
// ============================================================

/// Last `N` entries of an ascending index list, oldest first
#[inline]
pub(crate) fn tail<const N: usize>(indices: &[usize]) -> Option<[usize; N]> {
    if indices.len() < N {
        return None;
    }
    let mut out = [0usize; N];
    out.copy_from_slice(&indices[indices.len() - N..]);
    Some(out)
}

/// Arithmetic mean
#[inline]
pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (ddof = 0)
#[inline]
pub(crate) fn std_pop(values: &[f64]) -> f64 {
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}
