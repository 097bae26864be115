//! Fetch layer: direct HTTP, headless-browser fallback, and pagination
//! discovery over raw search pages.

#[cfg(feature = "browser")]
pub mod browser;
mod fetcher;
mod http_client;
pub mod pagination;

pub use fetcher::Fetcher;
pub use http_client::{is_blocked, DirectClient, USER_AGENT};
pub use pagination::{discover, max_page_in_text, PageLink};
