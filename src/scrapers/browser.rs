//! Headless browser fallback for anti-bot protected repositories.
//!
//! Renders the page in an isolated Chromium session so JavaScript-driven
//! front-ends (DSpace 7+) produce real content. The session is torn down on
//! every exit path; a leaked browser process would outlive the batch.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tracing::{debug, info};

/// Settings for the rendering path.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Run without a visible window.
    pub headless: bool,
    /// Fixed dwell after navigation so client-side rendering settles.
    pub dwell: Duration,
    /// Navigation timeout.
    pub timeout: Duration,
    /// User agent override, matching the direct path.
    pub user_agent: String,
}

/// Common Chromium executable locations.
const CHROME_PATHS: &[&str] = &[
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
];

fn find_chrome() -> Result<PathBuf> {
    for path in CHROME_PATHS {
        let p = std::path::Path::new(path);
        if p.exists() {
            debug!("Found Chromium at {}", path);
            return Ok(p.to_path_buf());
        }
    }
    for cmd in &["google-chrome", "google-chrome-stable", "chromium", "chromium-browser"] {
        if let Ok(output) = std::process::Command::new("which").arg(cmd).output() {
            if output.status.success() {
                let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !path.is_empty() {
                    return Ok(PathBuf::from(path));
                }
            }
        }
    }
    Err(anyhow::anyhow!(
        "Chromium not found; install chromium or google-chrome for the rendering fallback"
    ))
}

/// Render a URL and return the resulting document.
///
/// Launches a fresh browser, navigates, waits the configured dwell, and
/// captures the rendered HTML. The browser is closed before this function
/// returns, success or not.
pub async fn render(url: &str, config: &RenderConfig) -> Result<String> {
    let chrome_path = find_chrome()?;

    let mut builder = BrowserConfig::builder()
        .chrome_executable(chrome_path)
        .arg("--disable-blink-features=AutomationControlled")
        .arg("--disable-dev-shm-usage")
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg("--disable-background-networking")
        .arg("--no-sandbox")
        .arg("--disable-gpu")
        .arg(format!("--user-agent={}", config.user_agent))
        .request_timeout(config.timeout);
    if !config.headless {
        builder = builder.with_head();
    }
    let browser_config = builder
        .build()
        .map_err(|e| anyhow::anyhow!("browser config: {e}"))?;

    info!("Launching browser session for {url}");
    let (mut browser, mut handler) = Browser::launch(browser_config)
        .await
        .context("failed to launch browser")?;

    let handler_task = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if event.is_err() {
                break;
            }
        }
    });

    // All navigation happens in an inner scope so teardown below runs on
    // every path.
    let result = navigate_and_capture(&browser, url, config.dwell).await;

    let _ = browser.close().await;
    let _ = browser.wait().await;
    handler_task.abort();

    result
}

async fn navigate_and_capture(browser: &Browser, url: &str, dwell: Duration) -> Result<String> {
    let page = browser
        .new_page("about:blank")
        .await
        .context("failed to open page")?;

    page.goto(url).await.context("navigation failed")?;

    // Fixed dwell: DSpace 7/9 front-ends build the document client side.
    tokio::time::sleep(dwell).await;

    let content = page.content().await.context("failed to capture document")?;
    let _ = page.close().await;
    Ok(content)
}
