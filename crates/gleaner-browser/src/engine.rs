use crate::error::{BrowserError, Result};
use crate::fingerprint::FingerprintConfig;
use crate::renderer::PageRenderer;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use rand::Rng;
use std::path::PathBuf;
use std::time::Duration;

/// Script injected after navigation to drop the most common automation tells.
const STEALTH_JS: &str = r"
    delete navigator.__proto__.webdriver;
    Object.defineProperty(navigator, 'webdriver', { get: () => false });
";

/// Engine construction options.
///
/// Each scraper owns one engine exclusively, so there is no session sharing
/// and no locking around the underlying browser.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Run without a visible window. Attended runs keep this off so an
    /// operator can solve challenge pages in the browser.
    pub headless: bool,
    /// Explicit chrome/chromium executable; autodetected when absent
    pub executable: Option<PathBuf>,
    /// Persistent profile directory carried across runs
    pub user_data_dir: Option<PathBuf>,
    /// User agent and viewport presented to the sites
    pub fingerprint: FingerprintConfig,
    /// Post-load settle delay range in milliseconds, sampled per navigation
    pub settle_min_ms: u64,
    /// Upper bound of the settle delay range
    pub settle_max_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
            user_data_dir: None,
            fingerprint: FingerprintConfig::randomized(),
            settle_min_ms: 300,
            settle_max_ms: 1100,
        }
    }
}

/// Chromium-backed page renderer.
pub struct BrowserEngine {
    browser: Browser,
    config: EngineConfig,
}

impl BrowserEngine {
    /// Launch a browser instance with the given options.
    pub async fn launch(config: EngineConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(
                config.fingerprint.viewport_width,
                config.fingerprint.viewport_height,
            )
            .arg(format!("--user-agent={}", config.fingerprint.user_agent))
            .arg("--disable-blink-features=AutomationControlled");

        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &config.executable {
            builder = builder.chrome_executable(path);
        }
        if let Some(dir) = &config.user_data_dir {
            builder = builder.user_data_dir(dir);
        }

        let browser_config = builder.build().map_err(BrowserError::Launch)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        // The handler drives the CDP connection for the lifetime of the browser.
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        tracing::debug!(
            headless = config.headless,
            user_agent = %config.fingerprint.user_agent,
            "browser engine launched"
        );

        Ok(Self { browser, config })
    }

    /// Close the underlying browser process gracefully.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::warn!("browser close failed: {e}");
        }
        let _ = self.browser.wait().await;
    }

    fn settle_delay(&self) -> Duration {
        let mut rng = rand::thread_rng();
        let ms = rng.gen_range(self.config.settle_min_ms..=self.config.settle_max_ms);
        Duration::from_millis(ms)
    }
}

#[async_trait::async_trait]
impl PageRenderer for BrowserEngine {
    async fn render(&self, url: &str) -> Result<String> {
        let page = self
            .browser
            .new_page(url)
            .await
            .map_err(|e| BrowserError::Navigation(e.to_string()))?;

        page.evaluate(STEALTH_JS)
            .await
            .map_err(|e| BrowserError::Script(e.to_string()))?;

        // Let dynamic content finish loading; a varying delay also avoids a
        // machine-regular navigate/capture rhythm.
        tokio::time::sleep(self.settle_delay()).await;

        page.wait_for_navigation()
            .await
            .map_err(|e| BrowserError::Navigation(e.to_string()))?;

        let html = page
            .content()
            .await
            .map_err(|e| BrowserError::Capture(e.to_string()))?;

        if let Err(e) = page.close().await {
            tracing::debug!("page close failed: {e}");
        }

        Ok(html)
    }
}
