//! Provider contract used by the quote and index fetchers.
//!
//! A [`DataSource`] answers two questions about a symbol: its recent daily
//! closes and its market capitalization. Anything that can answer both can
//! stand in for Yahoo, which is how the tests drive the fetchers with
//! scripted responses.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{ClosingHistory, Symbol};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    InvalidRequest,
    InsufficientHistory,
    Internal,
}

/// Structured provider error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub fn insufficient_history(symbol: &Symbol, sessions: usize) -> Self {
        Self {
            kind: SourceErrorKind::InsufficientHistory,
            message: format!("{symbol} returned {sessions} session(s), need at least 2"),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::InsufficientHistory => "source.insufficient_history",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Quote provider contract.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the fetcher holds them behind an `Arc`.
pub trait DataSource: Send + Sync {
    /// Short provider name used in log fields.
    fn id(&self) -> &'static str;

    /// Recent daily closing prices, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the provider is unreachable, rejects the
    /// symbol, or returns a payload that cannot be parsed.
    fn daily_closes<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<ClosingHistory, SourceError>> + Send + 'a>>;

    /// Market capitalization in the listing currency, `None` when the
    /// provider has no figure for the symbol.
    fn market_cap<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<Option<f64>, SourceError>> + Send + 'a>>;
}
