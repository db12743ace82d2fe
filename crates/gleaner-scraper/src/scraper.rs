//! The polymorphic scraper interface.

use crate::error::Result;
use gleaner_core::JobOffer;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Sending half of the fan-in channel scrapers push offers into.
pub type OfferSink = mpsc::Sender<JobOffer>;

/// One source site.
///
/// A scraper owns its URL list exclusively for the duration of a
/// [`scrape`](Scraper::scrape) call and emits offers in list order. Pushing
/// into the sink is a cancellation point: once `token` is cancelled a scraper
/// must stop emitting and return [`ScrapeError::Cancelled`]
/// promptly. Any other error abandons the remaining work of this source only;
/// sibling scrapers are unaffected.
///
/// [`ScrapeError::Cancelled`]: crate::error::ScrapeError::Cancelled
#[async_trait::async_trait]
pub trait Scraper: Send + Sync {
    /// Name of the source site, used in logs and stored on every offer.
    fn source(&self) -> &str;

    /// Run the scrape task to completion, cancellation, or failure.
    async fn scrape(&self, token: CancellationToken, sink: OfferSink) -> Result<()>;
}
