//! Contract tests for the Yahoo adapter driven through the quote fetcher,
//! with canned HTTP payloads in place of the network.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ibexsnap_core::{
    ibex35, HttpClient, HttpError, HttpRequest, HttpResponse, QuoteFetcher, RecordingSleeper,
    SilentProgress, SnapshotBuilder, Symbol, YahooAdapter,
};

/// Serves canned responses in order for URLs containing `needle`.
struct CannedHttpClient {
    routes: Mutex<Vec<(&'static str, VecDeque<Result<HttpResponse, HttpError>>)>>,
    hits: Mutex<Vec<String>>,
}

impl CannedHttpClient {
    fn new() -> Self {
        Self {
            routes: Mutex::new(Vec::new()),
            hits: Mutex::new(Vec::new()),
        }
    }

    fn route(self, needle: &'static str, responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
        self.routes
            .lock()
            .expect("route store should not be poisoned")
            .push((needle, responses.into()));
        self
    }

    fn hits(&self, needle: &str) -> usize {
        self.hits
            .lock()
            .expect("hit store should not be poisoned")
            .iter()
            .filter(|url| url.contains(needle))
            .count()
    }
}

impl HttpClient for CannedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.hits
            .lock()
            .expect("hit store should not be poisoned")
            .push(request.url.clone());

        let mut routes = self
            .routes
            .lock()
            .expect("route store should not be poisoned");
        let response = routes
            .iter_mut()
            .find(|(needle, _)| request.url.contains(needle))
            .and_then(|(_, queue)| {
                if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                }
            })
            .unwrap_or_else(|| Ok(HttpResponse::with_status(404, "")));

        Box::pin(async move { response })
    }
}

fn chart(closes: &[f64]) -> Result<HttpResponse, HttpError> {
    let closes = closes
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(",");
    Ok(HttpResponse::ok_json(format!(
        r#"{{"chart":{{"result":[{{"indicators":{{"quote":[{{"close":[{closes}]}}]}}}}],"error":null}}}}"#
    )))
}

fn summary(market_cap: f64) -> Result<HttpResponse, HttpError> {
    Ok(HttpResponse::ok_json(format!(
        r#"{{"quoteSummary":{{"result":[{{"price":{{"marketCap":{{"raw":{market_cap}}}}}}}],"error":null}}}}"#
    )))
}

fn authenticated_client() -> CannedHttpClient {
    CannedHttpClient::new()
        .route("fc.yahoo.com", vec![Ok(HttpResponse::with_status(404, ""))])
        .route("getcrumb", vec![Ok(HttpResponse::ok_json("crumb123"))])
}

fn fetcher(client: Arc<CannedHttpClient>, sleeper: Arc<RecordingSleeper>) -> QuoteFetcher {
    QuoteFetcher::new(
        Arc::new(YahooAdapter::new(client)),
        sleeper,
        Arc::new(SilentProgress),
    )
}

#[tokio::test]
async fn yahoo_payloads_produce_rounded_quote() {
    let client = Arc::new(
        authenticated_client()
            .route("quoteSummary/SAN.MC", vec![summary(68_123_456_789.0)])
            .route("chart/SAN.MC", vec![chart(&[4.5, 4.611, 4.7349])]),
    );
    let symbol = Symbol::parse("SAN.MC").expect("valid");

    let quote = fetcher(client, Arc::new(RecordingSleeper::new()))
        .fetch_quote(&symbol, 3)
        .await
        .expect("quote derived");

    assert_eq!(quote.price, 4.73);
    assert_eq!(quote.change_percent, 2.69);
    assert_eq!(quote.market_cap_millions, 68_123.0);
}

#[tokio::test]
async fn http_503_is_retried_until_the_chart_answers() {
    let client = Arc::new(
        authenticated_client()
            .route("quoteSummary", vec![summary(1_000_000.0)])
            .route(
                "chart/BBVA.MC",
                vec![
                    Ok(HttpResponse::with_status(503, "")),
                    Ok(HttpResponse::with_status(503, "")),
                    chart(&[9.0, 9.9]),
                ],
            ),
    );
    let sleeper = Arc::new(RecordingSleeper::new());
    let symbol = Symbol::parse("BBVA.MC").expect("valid");

    let quote = fetcher(client.clone(), sleeper.clone())
        .fetch_quote(&symbol, 3)
        .await
        .expect("third attempt succeeds");

    assert_eq!(quote.change_percent, 10.0);
    assert_eq!(quote.market_cap_millions, 1.0);
    assert_eq!(client.hits("chart/BBVA.MC"), 3);
    assert_eq!(sleeper.pauses(), vec![Duration::from_secs(2); 2]);
}

#[tokio::test]
async fn unknown_symbol_is_dropped_after_all_attempts() {
    let client = Arc::new(authenticated_client().route(
        "quoteSummary",
        vec![Ok(HttpResponse::with_status(404, ""))],
    ));
    let symbol = Symbol::parse("ZZZ.MC").expect("valid");

    let quote = fetcher(client.clone(), Arc::new(RecordingSleeper::new()))
        .fetch_quote(&symbol, 3)
        .await;

    assert!(quote.is_none());
    assert_eq!(client.hits("quoteSummary/ZZZ.MC"), 3);
}

#[tokio::test]
async fn index_uses_chart_only_and_encodes_caret() {
    let client = Arc::new(
        CannedHttpClient::new().route("chart/%5EIBEX", vec![chart(&[13_900.0, 14_039.0])]),
    );
    let symbol = Symbol::parse("^IBEX").expect("valid");

    let index = fetcher(client.clone(), Arc::new(RecordingSleeper::new()))
        .fetch_index(&symbol)
        .await
        .expect("index derived");

    assert_eq!(index.value, 14_039.0);
    assert_eq!(index.change, 139.0);
    assert_eq!(index.change_percent, 1.0);
    assert_eq!(client.hits("getcrumb"), 0);
}

#[tokio::test]
async fn offline_provider_still_yields_an_empty_valid_snapshot() {
    let client = Arc::new(CannedHttpClient::new().route(
        "yahoo.com",
        vec![Err(HttpError::new("network unreachable"))],
    ));
    let builder = SnapshotBuilder::new(fetcher(client, Arc::new(RecordingSleeper::new())))
        .expect("index symbol is valid");
    let registry = ibex35().expect("registry entries are valid");

    let snapshot = builder.build(&registry).await;

    assert!(snapshot.companies.is_empty());
    assert_eq!(snapshot.index.value, 0.0);
}
