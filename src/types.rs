use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Two-class label with an explicit no-data sentinel.
///
/// `Undefined` marks bars whose label cannot be determined (usually trailing
/// bars lacking forward data). It is a distinct variant rather than a NaN so
/// that missing data can never leak into arithmetic unnoticed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Undefined,
    Zero,
    One,
}

impl Label {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Label::Undefined)
    }

    /// Numeric view for the model boundary. Undefined becomes NaN.
    pub fn as_f64(&self) -> f64 {
        match self {
            Label::Undefined => f64::NAN,
            Label::Zero => 0.0,
            Label::One => 1.0,
        }
    }
}

/// Three-class label used by the signed strategies.
///
/// Fixed-time-horizon labeling never produces `Neutral`: returns inside the
/// threshold band are `Undefined` and must be forward-filled by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignedLabel {
    Undefined,
    Down,
    Neutral,
    Up,
}

impl SignedLabel {
    pub fn is_undefined(&self) -> bool {
        matches!(self, SignedLabel::Undefined)
    }

    /// Collapse to the two-class vocabulary: `Up` maps to `One`, `Down` and
    /// `Neutral` both fold to `Zero`, `Undefined` stays a sentinel.
    pub fn collapse(&self) -> Label {
        match self {
            SignedLabel::Undefined => Label::Undefined,
            SignedLabel::Up => Label::One,
            SignedLabel::Down | SignedLabel::Neutral => Label::Zero,
        }
    }
}

/// A completed round trip. Entries and exits both fill at the bar open, so
/// `exit_bar` always strictly follows `entry_bar`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub entry_bar: usize,
    pub exit_bar: usize,
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    pub exit_price: f64,
    pub gross_return: f64,
    pub net_return: f64,
}

impl Trade {
    pub fn is_winner(&self) -> bool {
        self.net_return > 0.0
    }

    pub fn holding_days(&self) -> i64 {
        (self.exit_date - self.entry_date).num_days()
    }
}

/// Per-bar wealth for the three comparison tracks, all compounded from the
/// same initial cash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityCurves {
    pub buy_and_hold: Vec<f64>,
    pub strategy: Vec<f64>,
    pub strategy_net: Vec<f64>,
}
