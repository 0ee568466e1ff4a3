use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::data_source::{DataSource, SourceError};
use crate::http_client::{HttpClient, HttpRequest, HttpResponse};
use crate::{ClosingHistory, Symbol};

const CHART_HOST: &str = "https://query1.finance.yahoo.com";
const SUMMARY_HOST: &str = "https://query2.finance.yahoo.com";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const REFERER: &str = "https://finance.yahoo.com/";
const CRUMB_ENDPOINTS: [&str; 2] = [
    "https://query1.finance.yahoo.com/v1/test/getcrumb",
    "https://query2.finance.yahoo.com/v1/test/getcrumb",
];

/// Window of daily history requested per symbol. Weekends and holidays
/// mean five calendar days usually hold three or more sessions.
pub const HISTORY_RANGE: &str = "5d";

// ============================================================================
// Yahoo Auth Manager - Handles cookie/crumb authentication
// ============================================================================

/// Caches the crumb token Yahoo requires on `quoteSummary` calls.
///
/// The handshake is:
/// 1. Session cookie from `fc.yahoo.com` (kept by the client's cookie jar)
/// 2. Crumb token from `/v1/test/getcrumb`
pub struct YahooAuthManager {
    crumb: Mutex<Option<CachedCrumb>>,
    ttl: Duration,
}

struct CachedCrumb {
    value: String,
    fetched_at: Instant,
}

impl Default for YahooAuthManager {
    fn default() -> Self {
        Self {
            crumb: Mutex::new(None),
            ttl: Duration::from_secs(3600),
        }
    }
}

impl YahooAuthManager {
    /// Current crumb, fetching a fresh one when missing or older than the TTL.
    pub async fn get_crumb(&self, http_client: &dyn HttpClient) -> Result<String, SourceError> {
        let mut cached = self.crumb.lock().await;

        if let Some(crumb) = cached.as_ref() {
            if crumb.fetched_at.elapsed() < self.ttl {
                return Ok(crumb.value.clone());
            }
        }

        let value = Self::fetch_crumb(http_client).await?;
        *cached = Some(CachedCrumb {
            value: value.clone(),
            fetched_at: Instant::now(),
        });
        Ok(value)
    }

    /// Drop the cached crumb so the next call performs the handshake again.
    pub async fn invalidate(&self) {
        *self.crumb.lock().await = None;
    }

    async fn fetch_crumb(http_client: &dyn HttpClient) -> Result<String, SourceError> {
        let cookie_request = HttpRequest::get(COOKIE_URL).with_header("referer", REFERER);

        // fc.yahoo.com answers 404 while still setting the session cookie.
        http_client.execute(cookie_request).await.map_err(|e| {
            SourceError::unavailable(format!("failed to fetch Yahoo cookie: {}", e.message()))
        })?;

        for endpoint in CRUMB_ENDPOINTS {
            let crumb_request = HttpRequest::get(endpoint).with_header("referer", REFERER);

            match http_client.execute(crumb_request).await {
                Ok(response) if response.is_success() => {
                    let body = response.body.trim();

                    if body.contains("<html") || body.contains("<!DOCTYPE") {
                        continue;
                    }

                    if body.to_lowercase().contains("too many requests") {
                        return Err(SourceError::rate_limited(
                            "Yahoo rate limited while fetching crumb",
                        ));
                    }

                    if !body.is_empty() && body.len() < 100 && !body.contains(' ') {
                        return Ok(body.to_string());
                    }
                }
                Ok(response) if response.status == 429 => {
                    return Err(SourceError::rate_limited(
                        "Yahoo rate limited while fetching crumb",
                    ));
                }
                _ => continue,
            }
        }

        Err(SourceError::unavailable(
            "failed to fetch Yahoo crumb from all endpoints",
        ))
    }
}

// ============================================================================
// Yahoo Adapter
// ============================================================================

/// Yahoo Finance adapter: chart API for closes, quoteSummary for market cap.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    auth_manager: Arc<YahooAuthManager>,
}

impl YahooAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            auth_manager: Arc::new(YahooAuthManager::default()),
        }
    }

    async fn fetch_closes(&self, symbol: &Symbol) -> Result<ClosingHistory, SourceError> {
        let endpoint = format!(
            "{CHART_HOST}/v8/finance/chart/{}?range={HISTORY_RANGE}&interval=1d",
            urlencoding::encode(symbol.as_str()),
        );

        let request = HttpRequest::get(endpoint).with_header("referer", REFERER);
        let response = self.http_client.execute(request).await.map_err(|e| {
            SourceError::unavailable(format!("yahoo transport error: {}", e.message()))
        })?;

        if !response.is_success() {
            return Err(status_error(symbol, &response));
        }

        parse_chart_response(symbol, &response.body)
    }

    async fn fetch_market_cap(&self, symbol: &Symbol) -> Result<Option<f64>, SourceError> {
        let crumb = self.auth_manager.get_crumb(self.http_client.as_ref()).await?;
        let response = self.fetch_summary(symbol, &crumb).await?;

        // A stale crumb shows up as 401; refresh once and retry.
        let response = if response.status == 401 {
            debug!(symbol = %symbol, "yahoo crumb rejected, refreshing");
            self.auth_manager.invalidate().await;
            let crumb = self.auth_manager.get_crumb(self.http_client.as_ref()).await?;
            self.fetch_summary(symbol, &crumb).await?
        } else {
            response
        };

        if !response.is_success() {
            return Err(status_error(symbol, &response));
        }

        parse_summary_response(&response.body)
    }

    async fn fetch_summary(&self, symbol: &Symbol, crumb: &str) -> Result<HttpResponse, SourceError> {
        let endpoint = format!(
            "{SUMMARY_HOST}/v10/finance/quoteSummary/{}?modules=price&crumb={}",
            urlencoding::encode(symbol.as_str()),
            urlencoding::encode(crumb),
        );

        let request = HttpRequest::get(endpoint).with_header("referer", REFERER);
        self.http_client.execute(request).await.map_err(|e| {
            SourceError::unavailable(format!("yahoo transport error: {}", e.message()))
        })
    }
}

impl DataSource for YahooAdapter {
    fn id(&self) -> &'static str {
        "yahoo"
    }

    fn daily_closes<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<ClosingHistory, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_closes(symbol))
    }

    fn market_cap<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<Option<f64>, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_market_cap(symbol))
    }
}

fn status_error(symbol: &Symbol, response: &HttpResponse) -> SourceError {
    match response.status {
        404 => SourceError::invalid_request(format!("yahoo does not know symbol {symbol}")),
        429 => SourceError::rate_limited(format!("yahoo rate limited request for {symbol}")),
        status => SourceError::unavailable(format!("yahoo returned status {status} for {symbol}")),
    }
}

fn parse_chart_response(symbol: &Symbol, body: &str) -> Result<ClosingHistory, SourceError> {
    let chart_response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo chart: {e}")))?;

    if let Some(error) = chart_response.chart.error {
        return Err(SourceError::unavailable(format!(
            "yahoo chart API error: {}",
            error
        )));
    }

    let closes = chart_response
        .chart
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|result| result.indicators.quote.into_iter().next())
        .map(|quote| quote.close.into_iter().flatten().collect::<Vec<_>>())
        .unwrap_or_default();

    Ok(ClosingHistory::new(symbol.clone(), closes))
}

fn parse_summary_response(body: &str) -> Result<Option<f64>, SourceError> {
    let summary_response: YahooQuoteSummaryResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo summary: {e}")))?;

    if let Some(error) = summary_response.quote_summary.error {
        return Err(SourceError::unavailable(format!(
            "yahoo summary API error: {}",
            error
        )));
    }

    let market_cap = summary_response
        .quote_summary
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|result| result.price)
        .and_then(|price| price.market_cap)
        .and_then(|value| value.raw);

    Ok(market_cap)
}

// Yahoo Finance API response structures
#[derive(Debug, Clone, Deserialize)]
struct YahooApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

impl std::fmt::Display for YahooApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.description)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: YahooQuoteSummaryData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteSummaryData {
    #[serde(default)]
    result: Option<Vec<YahooQuoteSummaryResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteSummaryResult {
    #[serde(default)]
    price: Option<YahooPriceData>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooPriceData {
    #[serde(rename = "marketCap", default)]
    market_cap: Option<YahooRawValue>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooRawValue {
    #[serde(default)]
    raw: Option<f64>,
}
