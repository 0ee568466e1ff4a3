//! # Domain Models
//!
//! Typed values that flow from the provider into the snapshot document.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated provider ticker (`SAN.MC`, `^IBEX`) |
//! | [`ClosingHistory`] | Recent daily closes for one symbol |
//! | [`EquityQuote`] | Price, percent change and market cap of a constituent |
//! | [`IndexQuote`] | Index level with absolute and percent change |
//! | [`CompanyRecord`] | One row of the snapshot's `companies` list |
//! | [`MarketSnapshot`] | The document written to disk |
//!
//! All derived numbers are rounded with [`round_to`] before they leave this
//! module; non-finite results are rejected with
//! [`ValidationError::NonFiniteValue`](crate::ValidationError::NonFiniteValue).

mod models;
mod symbol;

pub use models::{
    round_to, ClosingHistory, CompanyRecord, EquityQuote, IndexQuote, MarketSnapshot,
};
pub use symbol::{Symbol, EXCHANGE_SUFFIX};
