//! The per-source extraction workflow.
//!
//! Every source runs the same loop over its owned URL list, one index at a
//! time:
//!
//! ```text
//! render -> challenge-check -> (challenge-wait -> render same index)
//!        -> extract -> emit -> pace -> next index
//! ```
//!
//! The two failure paths deliberately move in opposite directions: a render
//! failure skips forward to the next URL (retrying it would loop on a dead
//! page), while a detected challenge retries the same index after the
//! operator clears it (skipping forward would silently drop the page).
//! Cancellation is cooperative and observed before each render, while
//! waiting on the operator, while pacing, and on every push into the sink.

use crate::challenge::ChallengeGate;
use crate::error::{Result, ScrapeError};
use crate::extract::{extract_offer, CompiledSelectors, OfferSelectors};
use crate::scraper::{OfferSink, Scraper};
use gleaner_browser::PageRenderer;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Everything that distinguishes one source site from another: its name, the
/// URL list it owns, the phrase its protection service injects into
/// challenge pages, the pacing range, and the selector table.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Source name reported by the scraper and stamped on every offer
    pub source: String,
    /// Target URLs, visited in order
    pub urls: Vec<String>,
    /// Distinctive phrase identifying an anti-bot challenge page
    pub challenge_marker: String,
    /// Minimum pause between two page visits
    pub pace_min: Duration,
    /// Maximum pause between two page visits
    pub pace_max: Duration,
    /// Structural query rules for this site's offer pages
    pub selectors: OfferSelectors,
}

/// A [`Scraper`] driving the extraction workflow against one site.
///
/// Generic over the renderer and the challenge gate so tests can substitute
/// scripted implementations for both.
pub struct OfferScraper<R, G> {
    site: SiteConfig,
    compiled: CompiledSelectors,
    renderer: Arc<R>,
    gate: Arc<G>,
}

impl<R, G> OfferScraper<R, G>
where
    R: PageRenderer,
    G: ChallengeGate,
{
    /// Build a scraper for `site`, compiling its selector table.
    ///
    /// An invalid selector is a setup failure surfaced here, before any page
    /// is visited.
    pub fn new(site: SiteConfig, renderer: Arc<R>, gate: Arc<G>) -> Result<Self> {
        let compiled = site.selectors.compile()?;
        Ok(Self {
            site,
            compiled,
            renderer,
            gate,
        })
    }

    /// Sleep a random duration inside the configured pacing range, giving up
    /// early on cancellation. Mandatory between any two page visits.
    async fn pace(&self, token: &CancellationToken) -> Result<()> {
        let delay = {
            let mut rng = rand::thread_rng();
            rng.gen_range(self.site.pace_min..=self.site.pace_max)
        };
        tracing::debug!(source = %self.site.source, ?delay, "pacing");

        tokio::select! {
            () = token.cancelled() => Err(ScrapeError::Cancelled),
            () = tokio::time::sleep(delay) => Ok(()),
        }
    }

    async fn pace_if_more(&self, token: &CancellationToken, next_index: usize) -> Result<()> {
        if next_index < self.site.urls.len() {
            self.pace(token).await
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl<R, G> Scraper for OfferScraper<R, G>
where
    R: PageRenderer + 'static,
    G: ChallengeGate + 'static,
{
    fn source(&self) -> &str {
        &self.site.source
    }

    async fn scrape(&self, token: CancellationToken, sink: OfferSink) -> Result<()> {
        let total = self.site.urls.len();
        let mut index = 0;

        while index < total {
            if token.is_cancelled() {
                return Err(ScrapeError::Cancelled);
            }

            let url = &self.site.urls[index];
            let html = match self.renderer.render(url).await {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!(
                        source = %self.site.source,
                        url = %url,
                        error = %e,
                        "render failed, skipping page"
                    );
                    self.pace_if_more(&token, index + 1).await?;
                    index += 1;
                    continue;
                }
            };

            if html.contains(&self.site.challenge_marker) {
                tokio::select! {
                    () = token.cancelled() => return Err(ScrapeError::Cancelled),
                    () = self.gate.wait_released(&self.site.source) => {}
                }
                // Same index again: the page behind the challenge has not
                // been extracted yet.
                self.pace(&token).await?;
                continue;
            }

            let offer = extract_offer(&self.compiled, &html, url, &self.site.source);

            tokio::select! {
                biased;
                () = token.cancelled() => return Err(ScrapeError::Cancelled),
                sent = sink.send(offer) => sent.map_err(|_| ScrapeError::SinkClosed)?,
            }

            tracing::info!(
                source = %self.site.source,
                scraped = index + 1,
                total,
                url = %url,
                "offer scraped"
            );

            self.pace_if_more(&token, index + 1).await?;
            index += 1;
        }

        Ok(())
    }
}
