//! Progress callbacks for a refresh run.
//!
//! The library never prints. The binary plugs in a console observer; tests
//! plug in recorders. Every method has a no-op default.

use time::OffsetDateTime;

use crate::data_source::SourceError;
use crate::registry::CompanyDescriptor;
use crate::Symbol;

pub trait ProgressObserver: Send + Sync {
    fn run_started(&self, _at: OffsetDateTime) {}

    fn index_started(&self, _symbol: &Symbol) {}

    fn index_failed(&self, _symbol: &Symbol, _error: &SourceError) {}

    fn companies_started(&self, _total: usize) {}

    /// `position` is 1-based.
    fn company_started(&self, _position: usize, _total: usize, _company: &CompanyDescriptor) {}

    /// Attempt `attempt` of `max_attempts` failed and another one follows.
    fn retrying(&self, _symbol: &Symbol, _attempt: u32, _max_attempts: u32, _error: &SourceError) {}

    fn fetch_failed(&self, _symbol: &Symbol, _error: &SourceError) {}

    fn company_finished(&self, _company: &CompanyDescriptor, _included: bool) {}

    fn run_finished(&self, _included: usize, _total: usize) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ProgressObserver for SilentProgress {}
