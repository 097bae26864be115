//! Data models for teseacquire.

mod domain_filter;
mod event_log;
mod record;
mod search_page;

pub use domain_filter::DomainFilter;
pub use event_log::EventLogEntry;
pub use record::{DetailTarget, ExtractedRecord, NewRecord, RecordFilter, RecordStage, UNKNOWN};
pub use search_page::SearchPage;
