//! Direct HTTP client with bot-challenge classification.

use std::time::Duration;

use reqwest::Client;

use crate::error::{CrawlError, Result};

/// Realistic browser identification; several repositories refuse the
/// default reqwest user agent outright.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Body markers of known bot-challenge interstitials. Matched
/// case-insensitively; some of these come back with a 200 status.
const BLOCK_MARKERS: &[&str] = &[
    "recaptcha",
    "not a bot",
    "anubis",
    "verificando sua sessão",
    "just a moment",
];

/// Classify a response as a bot challenge.
///
/// 401/403 always count; otherwise the body is scanned for challenge
/// markers, since several front-ends serve the interstitial with 200 OK.
pub fn is_blocked(status: u16, body: &str) -> bool {
    if status == 401 || status == 403 {
        return true;
    }
    let lower = body.to_lowercase();
    BLOCK_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Lightweight direct GET path of the fetcher.
#[derive(Clone)]
pub struct DirectClient {
    client: Client,
}

impl DirectClient {
    /// Build a client with a short timeout and relaxed TLS verification.
    ///
    /// Several institutional repositories run expired or self-signed
    /// certificates; strict verification would lose them entirely.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| CrawlError::FetchFailed {
                url: String::new(),
                reason: format!("client build: {e}"),
            })?;
        Ok(Self { client })
    }

    /// Fetch a page, classifying blocks so the caller can fall back to
    /// rendering.
    pub async fn get(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CrawlError::FetchFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CrawlError::FetchFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if is_blocked(status.as_u16(), &body) {
            return Err(CrawlError::FetchBlocked(url.to_string()));
        }
        if !status.is_success() {
            return Err(CrawlError::FetchFailed {
                url: url.to_string(),
                reason: format!("status {status}"),
            });
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_classify_as_blocked() {
        assert!(is_blocked(403, "<html>forbidden</html>"));
        assert!(is_blocked(401, ""));
        assert!(!is_blocked(200, "<html>resultados</html>"));
        assert!(!is_blocked(500, "<html>erro interno</html>"));
    }

    #[test]
    fn challenge_markers_classify_despite_200() {
        assert!(is_blocked(200, "<div class=\"g-reCAPTCHA\">prove you are human</div>"));
        assert!(is_blocked(200, "Verificando sua SESSÃO, aguarde..."));
        assert!(is_blocked(200, "<title>Anubis</title>"));
        assert!(!is_blocked(200, "<title>Biblioteca Digital</title>"));
    }
}
