//! Orchestrates one refresh: index, then every company in registry order,
//! then a single whole-document write.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use time::OffsetDateTime;
use tracing::{debug, info};

use crate::fetcher::QuoteFetcher;
use crate::registry::{index_symbol, CompanyDescriptor};
use crate::retry::DEFAULT_MAX_ATTEMPTS;
use crate::{CompanyRecord, CoreError, IndexQuote, MarketSnapshot, Symbol, ValidationError};

/// Default location of the snapshot document, relative to the working directory.
pub const OUTPUT_PATH: &str = "ibex_data.json";

/// Pause after each company to stay under the provider's rate limits.
pub const COMPANY_PAUSE: Duration = Duration::from_millis(500);

pub struct SnapshotBuilder {
    fetcher: QuoteFetcher,
    index: Symbol,
}

impl SnapshotBuilder {
    /// # Errors
    ///
    /// Returns [`ValidationError`] if [`INDEX_SYMBOL`](crate::INDEX_SYMBOL) does not parse.
    pub fn new(fetcher: QuoteFetcher) -> Result<Self, ValidationError> {
        Ok(Self {
            fetcher,
            index: index_symbol()?,
        })
    }

    /// Run every fetch and assemble the document. Per-company failures are
    /// absorbed here; the result only ever shrinks.
    pub async fn build(&self, registry: &[CompanyDescriptor]) -> MarketSnapshot {
        let observer = self.fetcher.observer();
        observer.run_started(OffsetDateTime::now_utc());

        observer.index_started(&self.index);
        let index = match self.fetcher.fetch_index(&self.index).await {
            Some(index) => index,
            None => {
                info!(symbol = %self.index, "index unavailable, writing zero values");
                IndexQuote::zero()
            }
        };

        let total = registry.len();
        observer.companies_started(total);

        let mut companies = Vec::with_capacity(total);
        for (position, company) in registry.iter().enumerate() {
            observer.company_started(position + 1, total, company);

            let quote = self
                .fetcher
                .fetch_quote(&company.symbol, DEFAULT_MAX_ATTEMPTS)
                .await;
            let included = quote.is_some();

            if let Some(quote) = quote {
                companies.push(CompanyRecord {
                    name: company.name.clone(),
                    ticker: company.symbol.display_ticker().to_owned(),
                    sector: company.sector,
                    price: quote.price,
                    change: quote.change_percent,
                    market_cap: quote.market_cap_millions,
                });
            }

            observer.company_finished(company, included);
            self.fetcher.sleeper().sleep(COMPANY_PAUSE).await;
        }

        observer.run_finished(companies.len(), total);
        info!(included = companies.len(), total, "snapshot assembled");

        MarketSnapshot {
            last_update: OffsetDateTime::now_utc(),
            index,
            companies,
        }
    }

    /// Build the snapshot and write it to `path`. The file is touched once,
    /// after every fetch has finished.
    pub async fn refresh(
        &self,
        path: impl AsRef<Path>,
        registry: &[CompanyDescriptor],
    ) -> Result<MarketSnapshot, CoreError> {
        let snapshot = self.build(registry).await;
        write_snapshot(path, &snapshot)?;
        Ok(snapshot)
    }
}

/// Pretty JSON, two-space indent, UTF-8 with non-ASCII kept literal.
pub fn to_json(snapshot: &MarketSnapshot) -> Result<String, CoreError> {
    let mut json = serde_json::to_string_pretty(snapshot)?;
    json.push('\n');
    Ok(json)
}

/// Write the whole document to a sibling temp file, then rename it over `path`.
pub fn write_snapshot(path: impl AsRef<Path>, snapshot: &MarketSnapshot) -> Result<(), CoreError> {
    let path = path.as_ref();
    let json = to_json(snapshot)?;

    let mut tmp_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| OUTPUT_PATH.into());
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;

    debug!(path = %path.display(), bytes = json.len(), "snapshot written");
    Ok(())
}

pub fn read_snapshot(path: impl AsRef<Path>) -> Result<MarketSnapshot, CoreError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::registry::Sector;

    fn sample() -> MarketSnapshot {
        MarketSnapshot {
            last_update: datetime!(2025-06-02 16:40 UTC),
            index: IndexQuote {
                value: 14_021.3,
                change: -35.2,
                change_percent: -0.25,
            },
            companies: vec![CompanyRecord {
                name: String::from("Telefónica"),
                ticker: String::from("TEF"),
                sector: Sector::Telecom,
                price: 4.52,
                change: 1.12,
                market_cap: 25_612.0,
            }],
        }
    }

    #[test]
    fn json_uses_document_field_names() {
        let value = serde_json::to_value(sample()).expect("serializes");

        assert_eq!(value["lastUpdate"], "2025-06-02T16:40:00Z");
        assert_eq!(value["index"]["changePercent"], -0.25);
        assert_eq!(value["companies"][0]["ticker"], "TEF");
        assert_eq!(value["companies"][0]["marketCap"], 25_612.0);
        assert_eq!(value["companies"][0]["sector"], "Telecom");
    }

    #[test]
    fn json_is_indented_and_keeps_accents() {
        let json = to_json(&sample()).expect("serializes");

        assert!(json.starts_with("{\n  \"lastUpdate\""));
        assert!(json.contains("\"name\": \"Telefónica\""));
        assert!(!json.contains("\\u00f3"));
        assert!(json.ends_with("}\n"));
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(OUTPUT_PATH);

        write_snapshot(&path, &sample()).expect("write succeeds");
        let parsed = read_snapshot(&path).expect("read succeeds");

        assert_eq!(parsed, sample());
        assert!(!dir.path().join("ibex_data.json.tmp").exists());
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("missing").join(OUTPUT_PATH);

        let err = write_snapshot(&path, &sample()).expect_err("must fail");
        assert!(matches!(err, CoreError::Io(_)));
    }
}
