use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Sector, Symbol, ValidationError};

/// Chronological daily closing prices for one symbol, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosingHistory {
    pub symbol: Symbol,
    pub closes: Vec<f64>,
}

impl ClosingHistory {
    pub fn new(symbol: Symbol, closes: Vec<f64>) -> Self {
        Self { symbol, closes }
    }

    /// The two most recent closes as `(prior, latest)`, if at least two sessions exist.
    pub fn last_two(&self) -> Option<(f64, f64)> {
        match self.closes.as_slice() {
            [.., prior, latest] => Some((*prior, *latest)),
            _ => None,
        }
    }

    pub fn sessions(&self) -> usize {
        self.closes.len()
    }
}

/// Derived quote for one constituent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquityQuote {
    pub price: f64,
    pub change_percent: f64,
    pub market_cap_millions: f64,
}

impl EquityQuote {
    /// Derive price, day-over-day percent change and market cap (in millions)
    /// from the two latest closes and the raw market cap.
    pub fn from_closes(
        prior: f64,
        latest: f64,
        market_cap: Option<f64>,
    ) -> Result<Self, ValidationError> {
        let change_percent = (latest - prior) / prior * 100.0;
        let market_cap_millions = market_cap.unwrap_or(0.0) / 1_000_000.0;

        Ok(Self {
            price: finite("price", round_to(latest, 2))?,
            change_percent: finite("change_percent", round_to(change_percent, 2))?,
            market_cap_millions: finite("market_cap", round_to(market_cap_millions, 0))?,
        })
    }
}

/// Benchmark index level with absolute and relative change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexQuote {
    pub value: f64,
    /// Absolute point change versus the prior close.
    pub change: f64,
    pub change_percent: f64,
}

impl IndexQuote {
    pub fn from_closes(prior: f64, latest: f64) -> Result<Self, ValidationError> {
        let change = latest - prior;
        let change_percent = change / prior * 100.0;

        Ok(Self {
            value: finite("value", round_to(latest, 2))?,
            change: finite("change", round_to(change, 2))?,
            change_percent: finite("change_percent", round_to(change_percent, 2))?,
        })
    }

    /// Placeholder written when the index could not be fetched.
    pub const fn zero() -> Self {
        Self {
            value: 0.0,
            change: 0.0,
            change_percent: 0.0,
        }
    }
}

/// One company row of the snapshot document.
///
/// `change` is a percentage here, unlike [`IndexQuote::change`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRecord {
    pub name: String,
    pub ticker: String,
    pub sector: Sector,
    pub price: f64,
    pub change: f64,
    pub market_cap: f64,
}

/// The persisted artifact of one refresh run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    /// Completion time of the run, RFC3339 in UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub last_update: OffsetDateTime,
    pub index: IndexQuote,
    pub companies: Vec<CompanyRecord>,
}

/// Round to `places` decimal places, exact ties going to the even neighbour.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round_ties_even() / factor
}

fn finite(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NonFiniteValue { field })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_nearest() {
        assert_eq!(round_to(1.234, 2), 1.23);
        assert_eq!(round_to(-1.236, 2), -1.24);
        assert_eq!(round_to(12_345.6, 0), 12_346.0);
    }

    #[test]
    fn exact_ties_round_to_even() {
        assert_eq!(round_to(4.125, 2), 4.12);
        assert_eq!(round_to(4.375, 2), 4.38);
        assert_eq!(round_to(12_344.5, 0), 12_344.0);
        assert_eq!(round_to(12_345.5, 0), 12_346.0);
        assert_eq!(round_to(-0.5, 0), 0.0);
    }

    #[test]
    fn equity_quote_ties_round_to_even() {
        let quote = EquityQuote::from_closes(4.0, 4.125, Some(12_344_500_000.0))
            .expect("finite inputs");

        assert_eq!(quote.price, 4.12);
        assert_eq!(quote.market_cap_millions, 12_344.0);
    }

    #[test]
    fn equity_quote_derives_percent_change_and_market_cap() {
        let quote = EquityQuote::from_closes(10.0, 10.5, Some(75_123_456_789.0))
            .expect("finite inputs");

        assert_eq!(quote.price, 10.5);
        assert_eq!(quote.change_percent, 5.0);
        assert_eq!(quote.market_cap_millions, 75_123.0);
    }

    #[test]
    fn equity_quote_treats_missing_market_cap_as_zero() {
        let quote = EquityQuote::from_closes(4.0, 3.0, None).expect("finite inputs");
        assert_eq!(quote.change_percent, -25.0);
        assert_eq!(quote.market_cap_millions, 0.0);
    }

    #[test]
    fn zero_prior_close_is_rejected() {
        let err = EquityQuote::from_closes(0.0, 3.0, None).expect_err("must fail");
        assert_eq!(err, ValidationError::NonFiniteValue { field: "change_percent" });
    }

    #[test]
    fn index_quote_keeps_absolute_and_percent_change() {
        let quote = IndexQuote::from_closes(11_000.0, 11_110.456).expect("finite inputs");
        assert_eq!(quote.value, 11_110.46);
        assert_eq!(quote.change, 110.46);
        assert_eq!(quote.change_percent, 1.0);
    }

    #[test]
    fn last_two_returns_most_recent_pair() {
        let symbol = Symbol::parse("SAN.MC").expect("valid");
        let history = ClosingHistory::new(symbol.clone(), vec![1.0, 2.0, 3.0]);
        assert_eq!(history.last_two(), Some((2.0, 3.0)));

        let short = ClosingHistory::new(symbol, vec![1.0]);
        assert_eq!(short.last_two(), None);
    }

    #[test]
    fn index_quote_serializes_with_camel_case_keys() {
        let json = serde_json::to_value(IndexQuote::zero()).expect("serializes");
        assert_eq!(json, serde_json::json!({"value": 0.0, "change": 0.0, "changePercent": 0.0}));
    }
}
