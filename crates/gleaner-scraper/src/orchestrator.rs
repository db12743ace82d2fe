//! Fan-in orchestrator for running a collection of source scrapers.
//!
//! The orchestrator turns N independent scrapers into one stream of offers.
//! Scrapers push into clones of a bounded channel sender; the returned
//! receiver reaches end-of-stream only after every scraper has returned and
//! the supervisor task has finished - no producer can close the stream on
//! its own. A scraper's error is logged with its source name and swallowed
//! here: one failing source never stops its siblings and never prevents the
//! stream from closing.

use crate::error::ScrapeError;
use crate::scraper::Scraper;
use gleaner_core::JobOffer;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Scheduling policy for a scraper collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleMode {
    /// Run scrapers one after another, in the given order.
    Sequential,
    /// Run every scraper as its own task, with starts staggered by a fixed
    /// delay to avoid synchronized bursts against shared infrastructure.
    Concurrent,
}

/// Orchestrator run options.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Scheduling policy
    pub mode: ScheduleMode,
    /// Delay between consecutive scraper starts in concurrent mode
    pub stagger: Duration,
    /// Capacity of the fan-in channel
    pub channel_capacity: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            mode: ScheduleMode::Sequential,
            stagger: Duration::from_secs(5),
            channel_capacity: 64,
        }
    }
}

/// Run the given scrapers and fan their offers into one stream.
///
/// Returns immediately with the receiving half of the stream; scraping
/// happens on background tasks. Offers arrive in the order produced by the
/// fan-in: order across sources is unspecified, order within one source
/// follows that source's URL list.
///
/// Cancelling `token` makes every scraper stop at its next cancellation
/// point; the stream still closes only after all of them have returned.
pub fn run_scrapers(
    token: CancellationToken,
    scrapers: Vec<Arc<dyn Scraper>>,
    options: RunOptions,
) -> mpsc::Receiver<JobOffer> {
    let (tx, rx) = mpsc::channel(options.channel_capacity.max(1));

    tokio::spawn(supervise(token, scrapers, options, tx));

    rx
}

async fn supervise(
    token: CancellationToken,
    scrapers: Vec<Arc<dyn Scraper>>,
    options: RunOptions,
    tx: mpsc::Sender<JobOffer>,
) {
    match options.mode {
        ScheduleMode::Sequential => {
            for scraper in scrapers {
                run_one(scraper.as_ref(), token.clone(), tx.clone()).await;
            }
        }
        ScheduleMode::Concurrent => {
            let mut tasks = JoinSet::new();

            for (i, scraper) in scrapers.into_iter().enumerate() {
                if i > 0 {
                    tokio::time::sleep(options.stagger).await;
                }
                let token = token.clone();
                let tx = tx.clone();
                tasks.spawn(async move {
                    run_one(scraper.as_ref(), token, tx).await;
                });
            }

            while let Some(joined) = tasks.join_next().await {
                if let Err(e) = joined {
                    tracing::error!("scraper task aborted: {e}");
                }
            }
        }
    }

    // `tx` drops here; the receiver sees end-of-stream once the workers'
    // clones are gone as well.
}

async fn run_one(scraper: &dyn Scraper, token: CancellationToken, sink: mpsc::Sender<JobOffer>) {
    let source = scraper.source().to_string();
    tracing::info!(source = %source, "starting scraper");

    match scraper.scrape(token, sink).await {
        Ok(()) => tracing::info!(source = %source, "finished scraper"),
        Err(ScrapeError::Cancelled) => {
            tracing::warn!(source = %source, "scraper cancelled");
        }
        Err(e) => tracing::error!(source = %source, error = %e, "scraper failed"),
    }
}
