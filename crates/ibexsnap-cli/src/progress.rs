use std::io::Write;

use ibexsnap_core::{CompanyDescriptor, ProgressObserver, SourceError, SourceErrorKind, Symbol};
use time::macros::format_description;
use time::OffsetDateTime;

/// Human-readable progress on stdout, one line per company.
#[derive(Debug, Default)]
pub struct ConsoleProgress;

impl ConsoleProgress {
    fn flush() {
        let _ = std::io::stdout().flush();
    }
}

impl ProgressObserver for ConsoleProgress {
    fn run_started(&self, at: OffsetDateTime) {
        let stamp = at
            .format(format_description!(
                "[year]-[month]-[day] [hour]:[minute]:[second] UTC"
            ))
            .unwrap_or_else(|_| at.to_string());

        println!("🚀 Starting IBEX 35 data refresh...");
        println!("⏰ Timestamp: {stamp}");
    }

    fn index_started(&self, _symbol: &Symbol) {
        println!("\n📊 Fetching IBEX 35 index...");
    }

    fn index_failed(&self, symbol: &Symbol, error: &SourceError) {
        println!("❌ Error fetching index {symbol}: {}", error.message());
    }

    fn companies_started(&self, total: usize) {
        println!("\n📈 Fetching data for {total} companies...");
    }

    fn company_started(&self, position: usize, total: usize, company: &CompanyDescriptor) {
        print!("[{position}/{total}] {} ({})... ", company.name, company.symbol);
        Self::flush();
    }

    fn retrying(&self, symbol: &Symbol, attempt: u32, max_attempts: u32, _error: &SourceError) {
        print!("⚠️  Error on {symbol}, retrying... ({attempt}/{max_attempts}) ");
        Self::flush();
    }

    fn fetch_failed(&self, symbol: &Symbol, error: &SourceError) {
        if error.kind() == SourceErrorKind::InsufficientHistory {
            print!("⚠️  Insufficient data for {symbol} ");
        } else {
            print!("❌ Error fetching {symbol}: {} ", error.message());
        }
        Self::flush();
    }

    fn company_finished(&self, _company: &CompanyDescriptor, included: bool) {
        println!("{}", if included { "✅" } else { "❌" });
    }
}
