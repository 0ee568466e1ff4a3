//! Per-symbol fetch with bounded retry, and the single-shot index fetch.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::data_source::{DataSource, SourceError, SourceErrorKind};
use crate::progress::ProgressObserver;
use crate::retry::{RetryConfig, Sleeper};
use crate::{EquityQuote, IndexQuote, Symbol};

/// Fetches and derives quotes from a [`DataSource`].
#[derive(Clone)]
pub struct QuoteFetcher {
    source: Arc<dyn DataSource>,
    sleeper: Arc<dyn Sleeper>,
    observer: Arc<dyn ProgressObserver>,
    retry: RetryConfig,
}

impl QuoteFetcher {
    pub fn new(
        source: Arc<dyn DataSource>,
        sleeper: Arc<dyn Sleeper>,
        observer: Arc<dyn ProgressObserver>,
    ) -> Self {
        Self {
            source,
            sleeper,
            observer,
            retry: RetryConfig::default(),
        }
    }

    /// Override the delay between attempts; the attempt count is passed per call.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn observer(&self) -> &Arc<dyn ProgressObserver> {
        &self.observer
    }

    pub fn sleeper(&self) -> &Arc<dyn Sleeper> {
        &self.sleeper
    }

    /// Price, percent change and market cap for `symbol`, or `None` once
    /// `max_attempts` attempts have failed.
    ///
    /// Insufficient history ends the fetch at once; every other error is
    /// retried after the configured delay.
    pub async fn fetch_quote(&self, symbol: &Symbol, max_attempts: u32) -> Option<EquityQuote> {
        let retry = RetryConfig::fixed(self.retry.delay, max_attempts);
        let mut attempt = 1;

        loop {
            match self.try_quote(symbol).await {
                Ok(quote) => return Some(quote),
                Err(err) if err.kind() == SourceErrorKind::InsufficientHistory => {
                    warn!(symbol = %symbol, source = self.source.id(), error = %err, "insufficient history");
                    self.observer.fetch_failed(symbol, &err);
                    return None;
                }
                Err(err) if retry.has_attempts_after(attempt) => {
                    warn!(
                        symbol = %symbol,
                        attempt,
                        max_attempts = retry.max_attempts,
                        error = %err,
                        "quote fetch failed, retrying"
                    );
                    self.observer
                        .retrying(symbol, attempt, retry.max_attempts, &err);
                    self.sleeper.sleep(retry.delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    error!(
                        symbol = %symbol,
                        attempts = attempt,
                        error = %err,
                        "quote fetch failed, giving up"
                    );
                    self.observer.fetch_failed(symbol, &err);
                    return None;
                }
            }
        }
    }

    /// Index level and its absolute and percent change. One attempt only.
    pub async fn fetch_index(&self, symbol: &Symbol) -> Option<IndexQuote> {
        match self.try_index(symbol).await {
            Ok(quote) => Some(quote),
            Err(err) => {
                error!(symbol = %symbol, source = self.source.id(), error = %err, "index fetch failed");
                self.observer.index_failed(symbol, &err);
                None
            }
        }
    }

    async fn try_quote(&self, symbol: &Symbol) -> Result<EquityQuote, SourceError> {
        let market_cap = self.source.market_cap(symbol).await?;
        let history = self.source.daily_closes(symbol).await?;

        let (prior, latest) = history
            .last_two()
            .ok_or_else(|| SourceError::insufficient_history(symbol, history.sessions()))?;
        debug!(symbol = %symbol, prior, latest, ?market_cap, "derived quote inputs");

        EquityQuote::from_closes(prior, latest, market_cap)
            .map_err(|e| SourceError::internal(format!("{symbol}: {e}")))
    }

    async fn try_index(&self, symbol: &Symbol) -> Result<IndexQuote, SourceError> {
        let history = self.source.daily_closes(symbol).await?;

        let (prior, latest) = history
            .last_two()
            .ok_or_else(|| SourceError::insufficient_history(symbol, history.sessions()))?;

        IndexQuote::from_closes(prior, latest)
            .map_err(|e| SourceError::internal(format!("{symbol}: {e}")))
    }
}
