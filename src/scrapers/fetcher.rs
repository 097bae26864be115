//! Two-tier fetcher: direct HTTP first, rendered browser on block or error.

use std::time::Duration;

use tracing::{debug, warn};

use super::http_client::DirectClient;
use crate::config::Settings;
use crate::error::CrawlError;
use crate::progress::ProgressFn;

/// Retrieves page content, working around anti-automation defenses.
///
/// `fetch` never errors: when both the direct and the rendered path fail it
/// returns `None` and the caller decides what to skip.
#[derive(Clone)]
pub struct Fetcher {
    direct: DirectClient,
    user_agent: String,
    headless: bool,
    dwell: Duration,
    timeout: Duration,
}

fn notify(progress: Option<&ProgressFn>, message: &str) {
    if let Some(cb) = progress {
        cb(message);
    }
}

impl Fetcher {
    pub fn new(settings: &Settings) -> crate::error::Result<Self> {
        let timeout = Duration::from_secs(settings.fetch_timeout_secs);
        Ok(Self {
            direct: DirectClient::new(timeout, &settings.user_agent)?,
            user_agent: settings.user_agent.clone(),
            headless: settings.headless,
            dwell: Duration::from_secs(settings.render_dwell_secs),
            timeout,
        })
    }

    /// Fetch a URL's content.
    ///
    /// Direct GET first; on a bot challenge or any network failure, fall
    /// back to headless rendering. Progress strings are purely
    /// observational.
    pub async fn fetch(&self, url: &str, progress: Option<&ProgressFn>) -> Option<String> {
        if url.trim().is_empty() {
            notify(progress, "Empty URL, nothing to fetch");
            return None;
        }

        notify(progress, &format!("Connecting: {}", truncate(url, 60)));
        match self.direct.get(url).await {
            Ok(html) => Some(html),
            Err(CrawlError::FetchBlocked(_)) => {
                debug!("Bot challenge at {url}, switching to rendered fetch");
                notify(progress, "Bot challenge detected, launching browser...");
                self.rendered(url, progress).await
            }
            Err(e) => {
                debug!("Direct fetch failed for {url}: {e}");
                notify(progress, "Direct access failed, trying via browser...");
                self.rendered(url, progress).await
            }
        }
    }

    #[cfg(feature = "browser")]
    async fn rendered(&self, url: &str, progress: Option<&ProgressFn>) -> Option<String> {
        let config = super::browser::RenderConfig {
            headless: self.headless,
            dwell: self.dwell,
            timeout: self.timeout,
            user_agent: self.user_agent.clone(),
        };
        match super::browser::render(url, &config).await {
            Ok(html) => {
                notify(progress, "Content captured via browser");
                Some(html)
            }
            Err(e) => {
                warn!("Rendered fetch failed for {url}: {e}");
                notify(progress, &format!("Browser fetch failed: {}", truncate(&e.to_string(), 60)));
                None
            }
        }
    }

    #[cfg(not(feature = "browser"))]
    async fn rendered(&self, url: &str, progress: Option<&ProgressFn>) -> Option<String> {
        warn!("Rendered fetch unavailable (built without the browser feature): {url}");
        notify(progress, "Browser fallback not compiled in");
        None
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn test_fetcher() -> Fetcher {
        let settings = Settings {
            fetch_timeout_secs: 2,
            render_dwell_secs: 0,
            ..Settings::default()
        };
        Fetcher::new(&settings).expect("fetcher")
    }

    #[tokio::test]
    async fn both_paths_failing_yields_none_not_an_error() {
        let fetcher = test_fetcher();
        let statuses: std::sync::Arc<Mutex<Vec<String>>> = std::sync::Arc::new(Mutex::new(Vec::new()));
        let cb = {
            let statuses = statuses.clone();
            move |msg: &str| statuses.lock().unwrap().push(msg.to_string())
        };

        // Nothing listens on port 1: the direct path is refused and the
        // rendered fallback cannot reach the address either.
        let result = fetcher.fetch("http://127.0.0.1:1/", Some(&cb)).await;
        assert!(result.is_none());

        // The fallback was attempted, not skipped.
        let statuses = statuses.lock().unwrap();
        assert!(statuses.iter().any(|s| s.contains("browser")));
    }

    #[tokio::test]
    async fn empty_url_short_circuits() {
        let fetcher = test_fetcher();
        assert!(fetcher.fetch("", None).await.is_none());
        assert!(fetcher.fetch("   ", None).await.is_none());
    }
}
