//! # ibexsnap Core
//!
//! End-of-day snapshot of the IBEX 35: the index level plus price, daily
//! percent change and market capitalization of every constituent, written
//! as a single JSON document for dashboards to read.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`registry`] | The 35 tracked companies and the index symbol |
//! | [`domain`] | Symbols, quotes, snapshot document types |
//! | [`data_source`] | Provider contract and structured errors |
//! | [`adapters`] | Yahoo Finance implementation of the provider contract |
//! | [`http_client`] | HTTP transport abstraction (reqwest in production) |
//! | [`retry`] | Fixed-delay retry policy and injectable sleep |
//! | [`fetcher`] | Per-company fetch with retry, single-shot index fetch |
//! | [`snapshot`] | Run orchestration and the whole-file JSON write |
//! | [`progress`] | Observer hooks for console progress |
//!
//! ## Flow
//!
//! ```text
//! SnapshotBuilder ──▶ QuoteFetcher::fetch_index (once, no retry)
//!        │
//!        ├──▶ QuoteFetcher::fetch_quote (per company, up to 3 attempts, 2 s apart)
//!        │         └──▶ DataSource (YahooAdapter ──▶ HttpClient)
//!        │
//!        └──▶ write_snapshot (ibex_data.json)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ibexsnap_core::{
//!     ibex35, QuoteFetcher, ReqwestHttpClient, SilentProgress, SnapshotBuilder, TokioSleeper,
//!     YahooAdapter, OUTPUT_PATH,
//! };
//!
//! let adapter = YahooAdapter::new(Arc::new(ReqwestHttpClient::new()?));
//! let fetcher = QuoteFetcher::new(Arc::new(adapter), Arc::new(TokioSleeper), Arc::new(SilentProgress));
//! let snapshot = SnapshotBuilder::new(fetcher)?.refresh(OUTPUT_PATH, &ibex35()?).await?;
//! ```

pub mod adapters;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod fetcher;
pub mod http_client;
pub mod progress;
pub mod registry;
pub mod retry;
pub mod snapshot;

pub use adapters::{YahooAdapter, YahooAuthManager};

pub use data_source::{DataSource, SourceError, SourceErrorKind};

pub use domain::{
    round_to, ClosingHistory, CompanyRecord, EquityQuote, IndexQuote, MarketSnapshot, Symbol,
    EXCHANGE_SUFFIX,
};

pub use error::{CoreError, ValidationError};

pub use fetcher::QuoteFetcher;

pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

pub use progress::{ProgressObserver, SilentProgress};

pub use registry::{ibex35, index_symbol, CompanyDescriptor, Sector, INDEX_SYMBOL};

pub use retry::{RecordingSleeper, RetryConfig, Sleeper, TokioSleeper};

pub use snapshot::{
    read_snapshot, to_json, write_snapshot, SnapshotBuilder, COMPANY_PAUSE,
    OUTPUT_PATH,
};
