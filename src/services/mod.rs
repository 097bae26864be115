//! Pipeline services: listing extraction and the crawl orchestrator.

mod crawler;
pub mod listing;

pub use crawler::Crawler;
