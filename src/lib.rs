//! # chartscan - Geometric Chart Pattern Scanner
//!
//! Detection of classic chart patterns (Double Top, Head and Shoulders,
//! Flag, ...) in ordered closing-price series, plus forward-return
//! backtesting of the detections.
//!
//! The pipeline is three pure stages: a price series is reduced to its
//! strict local extrema, a table of independent geometric rules is
//! evaluated against the extrema tails, and the resulting report can be
//! replayed against the same series to measure how reliable each pattern
//! has been.
//!
//! ## Quick Start
//!
//! ```rust
//! use chartscan::prelude::*;
//!
//! // Define your OHLC data
//! struct Bar { open: f64, high: f64, low: f64, close: f64 }
//!
//! impl Ohlcv for Bar {
//!     fn open(&self) -> f64 { self.open }
//!     fn high(&self) -> f64 { self.high }
//!     fn low(&self) -> f64 { self.low }
//!     fn close(&self) -> f64 { self.close }
//! }
//!
//! // A gently oscillating series
//! let bars: Vec<Bar> = (0..120)
//!     .map(|i| {
//!         let c = 100.0 + (i as f64 * 0.15).sin() * 5.0;
//!         Bar { open: c - 0.5, high: c + 1.0, low: c - 1.0, close: c }
//!     })
//!     .collect();
//!
//! // Scan with the default rule table
//! let scanner = ScannerBuilder::new().with_all_defaults().build();
//! let report = scanner.scan(&bars)?;
//!
//! for (pattern, signal) in report.iter() {
//!     if signal.detected {
//!         println!("{pattern}: {} at {:?}", signal.action, signal.points);
//!     }
//! }
//!
//! // Replay detections and measure 10-bar forward returns
//! let stats = chartscan::backtest::evaluate(&bars, &report, Horizon::default())?;
//! println!("{:.2}", stats.get(Pattern::DoubleTop).success_rate);
//! # Ok::<(), PatternError>(())
//! ```

pub mod backtest;
pub mod extrema;
pub mod rules;

pub mod prelude {
    pub use crate::{
        // Backtest
        backtest::{evaluate, BacktestReport, PatternStats},
        // Lookup
        describe,
        // One-shot detection
        detect_patterns,
        // Extrema
        extrema::Extrema,
        // Rules
        rules::{
            BuiltinRule, CupAndHandleRule, DoubleBottomRule, DoubleTopRule, FlagRule,
            HeadAndShouldersRule, PatternRule, PennantRule, TriangleRule,
        },
        // Parallel
        scan_parallel,
        // Types
        Action,
        Horizon,
        Ohlcv,
        Pattern,
        // Errors
        PatternError,
        // Engine
        PatternScanner,
        PatternSignal,
        Result,
        ScanReport,
        ScannerBuilder,
        Sensitivity,
        SymbolError,
        SymbolReport,
        Tolerance,
    };
}

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, PatternError>;

/// Errors that can occur during scanning or backtesting
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PatternError {
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("Empty price series")]
    EmptySeries,

    #[error("Timestamps not strictly increasing at index {index}")]
    NonMonotonicTimestamps { index: usize },

    #[error("Invalid close at index {index}: {reason}")]
    InvalidClose { index: usize, reason: &'static str },
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Detection strictness dial (must be finite and > 0). Default 1.0.
///
/// A higher value shrinks both the extremum window and every rule tolerance,
/// so larger sensitivities flag fewer, tighter shapes.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Sensitivity(f64);

impl Sensitivity {
    /// Extremum half-window at sensitivity 1.0
    pub const BASE_WINDOW: f64 = 20.0;

    /// Create a new Sensitivity, validating the value is finite and > 0
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(PatternError::InvalidValue(
                "Sensitivity cannot be NaN or infinite",
            ));
        }
        if value <= 0.0 {
            return Err(PatternError::InvalidValue("Sensitivity must be > 0"));
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }

    /// Extremum half-width: `round(20 / sensitivity)`, clamped to at least 1
    /// so very large sensitivities never degenerate to a zero window.
    #[inline]
    pub fn window(self) -> usize {
        let w = (Self::BASE_WINDOW / self.0).round() as usize;
        w.max(1)
    }

    /// Multiplier applied to every rule tolerance. Shrinks with the window
    /// as the dial rises: `1 / sensitivity`.
    #[inline]
    pub fn scale(self) -> f64 {
        1.0 / self.0
    }
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self(1.0)
    }
}

impl serde::Serialize for Sensitivity {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Sensitivity {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        Sensitivity::new(value).map_err(serde::de::Error::custom)
    }
}

/// Look-forward horizon in bars for backtesting (must be > 0). Default 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Horizon(usize);

impl Horizon {
    /// Create a new Horizon, validating value is > 0
    pub fn new(value: usize) -> Result<Self> {
        if value == 0 {
            return Err(PatternError::InvalidValue("Horizon must be > 0"));
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: usize) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Self(10)
    }
}

impl serde::Serialize for Horizon {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Horizon {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = usize::deserialize(d)?;
        Horizon::new(value).map_err(serde::de::Error::custom)
    }
}

/// Base fraction for a rule's proximity check (must be finite and > 0)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Tolerance(f64);

impl Tolerance {
    /// Create a new Tolerance, validating the value is finite and > 0
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(PatternError::InvalidValue(
                "Tolerance cannot be NaN or infinite",
            ));
        }
        if value <= 0.0 {
            return Err(PatternError::InvalidValue("Tolerance must be > 0"));
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl serde::Serialize for Tolerance {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Tolerance {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        Tolerance::new(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================
// OHLC TRAIT
// ============================================================

/// Core OHLC data trait. The scanner only reads closes; the full candle
/// shape is kept so any time-ordered OHLC table plugs in unchanged.
pub trait Ohlcv {
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;

    fn volume(&self) -> f64 {
        0.0
    }

    fn timestamp(&self) -> Option<i64> {
        None
    }
}

/// Fail fast on malformed input: empty series, non-finite closes, or
/// timestamps (when supplied) that are not strictly increasing.
pub(crate) fn validate_series<T: Ohlcv>(bars: &[T]) -> Result<()> {
    if bars.is_empty() {
        return Err(PatternError::EmptySeries);
    }
    let mut prev_ts: Option<i64> = None;
    for (index, bar) in bars.iter().enumerate() {
        let close = bar.close();
        if close.is_nan() {
            return Err(PatternError::InvalidClose {
                index,
                reason: "NaN close",
            });
        }
        if close.is_infinite() {
            return Err(PatternError::InvalidClose {
                index,
                reason: "infinite close",
            });
        }
        if let Some(ts) = bar.timestamp() {
            if let Some(prev) = prev_ts {
                if ts <= prev {
                    return Err(PatternError::NonMonotonicTimestamps { index });
                }
            }
            prev_ts = Some(ts);
        }
    }
    Ok(())
}

// ============================================================
// PATTERN VOCABULARY
// ============================================================

/// Suggested trading action attached to a detected pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Action {
    Buy,
    Sell,
    #[serde(rename = "Buy on breakout")]
    BuyOnBreakout,
}

impl Action {
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Buy => "Buy",
            Action::Sell => "Sell",
            Action::BuyOnBreakout => "Buy on breakout",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed chart-pattern vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Pattern {
    #[serde(rename = "Double Top")]
    DoubleTop,
    #[serde(rename = "Double Bottom")]
    DoubleBottom,
    #[serde(rename = "Head and Shoulders")]
    HeadAndShoulders,
    Flag,
    Pennant,
    Triangle,
    #[serde(rename = "Cup and Handle")]
    CupAndHandle,
}

impl Pattern {
    /// All patterns in canonical report order
    pub const ALL: [Pattern; 7] = [
        Pattern::DoubleTop,
        Pattern::DoubleBottom,
        Pattern::HeadAndShoulders,
        Pattern::Flag,
        Pattern::Pennant,
        Pattern::Triangle,
        Pattern::CupAndHandle,
    ];

    /// Display name used as the report key
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            Pattern::DoubleTop => "Double Top",
            Pattern::DoubleBottom => "Double Bottom",
            Pattern::HeadAndShoulders => "Head and Shoulders",
            Pattern::Flag => "Flag",
            Pattern::Pennant => "Pennant",
            Pattern::Triangle => "Triangle",
            Pattern::CupAndHandle => "Cup and Handle",
        }
    }

    /// Resolve a pattern from its display name
    pub fn from_name(name: &str) -> Option<Pattern> {
        Pattern::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Suggested action when this pattern is flagged
    #[inline]
    pub fn action(self) -> Action {
        match self {
            Pattern::DoubleTop | Pattern::HeadAndShoulders => Action::Sell,
            Pattern::DoubleBottom | Pattern::Flag | Pattern::Pennant | Pattern::CupAndHandle => {
                Action::Buy
            }
            Pattern::Triangle => Action::BuyOnBreakout,
        }
    }

    /// Human-readable description of the pattern
    pub fn description(self) -> &'static str {
        match self {
            Pattern::DoubleTop => {
                "A bearish reversal pattern with two peaks at similar levels, indicating \
                 resistance. Suggests a potential sell opportunity."
            }
            Pattern::DoubleBottom => {
                "A bullish reversal pattern with two troughs at similar levels, indicating \
                 support. Suggests a potential buy opportunity."
            }
            Pattern::HeadAndShoulders => {
                "A bearish reversal pattern with a central peak (head) flanked by two lower \
                 peaks (shoulders). Signals a trend reversal."
            }
            Pattern::Flag => {
                "A bullish continuation pattern with a short consolidation after a sharp \
                 move, resembling a flag. Suggests a buy on breakout."
            }
            Pattern::Pennant => {
                "A bullish continuation pattern with converging trendlines after a sharp \
                 move, resembling a pennant. Suggests a buy on breakout."
            }
            Pattern::Triangle => {
                "A continuation pattern with converging highs and lows. Can be bullish or \
                 bearish depending on breakout direction."
            }
            Pattern::CupAndHandle => {
                "A bullish continuation pattern with a rounded bottom (cup) followed by a \
                 short consolidation (handle). Suggests a buy on breakout."
            }
        }
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Sentinel returned by [`describe`] for unknown pattern names
pub const NO_DESCRIPTION: &str = "No description available.";

/// Description lookup by display name; unknown names yield the
/// [`NO_DESCRIPTION`] sentinel instead of failing.
///
/// ```
/// assert_eq!(chartscan::describe("Unknown"), "No description available.");
/// ```
pub fn describe(name: &str) -> &'static str {
    Pattern::from_name(name)
        .map(Pattern::description)
        .unwrap_or(NO_DESCRIPTION)
}

// ============================================================
// SCAN REPORT
// ============================================================

/// Detection outcome for one pattern
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PatternSignal {
    pub detected: bool,
    /// Evidence indices into the scanned series, oldest first; the last
    /// entry is the most recent evidence.
    pub points: Vec<usize>,
    pub action: Action,
}

impl PatternSignal {
    fn undetected(action: Action) -> Self {
        Self {
            detected: false,
            points: Vec::new(),
            action,
        }
    }
}

/// Detection results for the full pattern vocabulary, keyed by [`Pattern`].
///
/// Serializes to a JSON object keyed by pattern display name.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport {
    signals: [PatternSignal; 7],
}

impl ScanReport {
    /// Report with every pattern undetected
    pub fn empty() -> Self {
        Self {
            signals: Pattern::ALL.map(|p| PatternSignal::undetected(p.action())),
        }
    }

    /// Mark a pattern detected with its evidence points. Mainly useful for
    /// tests and hand-built pipelines; `scan` fills reports itself.
    pub fn flag(&mut self, pattern: Pattern, points: Vec<usize>) {
        let signal = &mut self.signals[pattern as usize];
        signal.detected = true;
        signal.points = points;
    }

    #[inline]
    pub fn get(&self, pattern: Pattern) -> &PatternSignal {
        &self.signals[pattern as usize]
    }

    /// Iterate all patterns in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Pattern, &PatternSignal)> {
        Pattern::ALL.into_iter().zip(self.signals.iter())
    }

    /// Iterate only the detected patterns
    pub fn detected(&self) -> impl Iterator<Item = (Pattern, &PatternSignal)> {
        self.iter().filter(|(_, signal)| signal.detected)
    }
}

impl Default for ScanReport {
    fn default() -> Self {
        Self::empty()
    }
}

impl serde::Serialize for ScanReport {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = s.serialize_map(Some(self.signals.len()))?;
        for (pattern, signal) in self.iter() {
            map.serialize_entry(pattern.name(), signal)?;
        }
        map.end()
    }
}

// ============================================================
// SCANNER ENGINE
// ============================================================

use extrema::Extrema;
use rules::BuiltinRule;

/// Chart-pattern scanner: a table of independent geometric rules evaluated
/// against the most recent extrema of a closing-price series.
#[derive(Debug, Clone)]
pub struct PatternScanner {
    rules: Vec<BuiltinRule>,
    sensitivity: Sensitivity,
}

impl PatternScanner {
    /// Scan a full OHLC series: validate, extract extrema at the configured
    /// window, and evaluate every rule. Rules are independent; none
    /// short-circuits another.
    pub fn scan<T: Ohlcv>(&self, bars: &[T]) -> Result<ScanReport> {
        validate_series(bars)?;
        let close: Vec<f64> = bars.iter().map(Ohlcv::close).collect();
        let extrema = Extrema::find(&close, self.sensitivity.window());
        Ok(self.scan_extrema(&close, &extrema))
    }

    /// Evaluate the rule table against precomputed extrema.
    ///
    /// Lower-level entry point for callers that manage the extremum window
    /// themselves.
    pub fn scan_extrema(&self, close: &[f64], extrema: &Extrema) -> ScanReport {
        let scale = self.sensitivity.scale();
        let mut report = ScanReport::empty();
        for rule in &self.rules {
            if let Some(points) = rule.evaluate(close, &extrema.maxima, &extrema.minima, scale) {
                report.flag(rule.pattern(), points);
            }
        }
        report
    }

    #[inline]
    pub fn sensitivity(&self) -> Sensitivity {
        self.sensitivity
    }

    /// Extremum half-window derived from the sensitivity dial
    #[inline]
    pub fn window(&self) -> usize {
        self.sensitivity.window()
    }
}

impl Default for PatternScanner {
    fn default() -> Self {
        ScannerBuilder::new().with_all_defaults().build()
    }
}

/// Builder for [`PatternScanner`] instances
#[derive(Debug, Clone)]
pub struct ScannerBuilder {
    rules: Vec<BuiltinRule>,
    sensitivity: Sensitivity,
}

impl Default for ScannerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScannerBuilder {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            sensitivity: Sensitivity::default(),
        }
    }

    /// Add all seven builtin rules with default tolerances
    pub fn with_all_defaults(mut self) -> Self {
        self.rules.extend([
            BuiltinRule::DoubleTop(Default::default()),
            BuiltinRule::DoubleBottom(Default::default()),
            BuiltinRule::HeadAndShoulders(Default::default()),
            BuiltinRule::Flag(Default::default()),
            BuiltinRule::Pennant(Default::default()),
            BuiltinRule::Triangle(Default::default()),
            BuiltinRule::CupAndHandle(Default::default()),
        ]);
        self
    }

    /// Add a single rule
    #[allow(clippy::should_implement_trait)]
    pub fn add(mut self, rule: BuiltinRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Set the sensitivity dial
    pub fn sensitivity(mut self, sensitivity: Sensitivity) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Build the scanner
    pub fn build(self) -> PatternScanner {
        PatternScanner {
            rules: self.rules,
            sensitivity: self.sensitivity,
        }
    }
}

/// One-shot detection with the default rule table, for callers that do not
/// reuse a scanner.
pub fn detect_patterns<T: Ohlcv>(bars: &[T], sensitivity: Sensitivity) -> Result<ScanReport> {
    ScannerBuilder::new()
        .with_all_defaults()
        .sensitivity(sensitivity)
        .build()
        .scan(bars)
}

// ============================================================
// PARALLEL SCANNING
// ============================================================

use rayon::prelude::*;

/// Detection report for a single instrument
#[derive(Debug)]
pub struct SymbolReport {
    pub symbol: String,
    pub report: ScanReport,
}

/// Scan failure for a single instrument
#[derive(Debug)]
pub struct SymbolError {
    pub symbol: String,
    pub error: PatternError,
}

/// Parallel scanning of multiple instruments
pub fn scan_parallel<'a, T, I>(
    scanner: &PatternScanner,
    instruments: I,
) -> (Vec<SymbolReport>, Vec<SymbolError>)
where
    T: Ohlcv + Sync + 'a,
    I: IntoParallelIterator<Item = (&'a str, &'a [T])>,
{
    let results: Vec<_> = instruments
        .into_par_iter()
        .map(|(symbol, bars)| {
            scanner
                .scan(bars)
                .map(|report| SymbolReport {
                    symbol: symbol.to_string(),
                    report,
                })
                .map_err(|error| SymbolError {
                    symbol: symbol.to_string(),
                    error,
                })
        })
        .collect();

    let mut successes = Vec::new();
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(r) => successes.push(r),
            Err(e) => errors.push(e),
        }
    }

    (successes, errors)
}

// ============================================================
// TESTS
// ============================================================
