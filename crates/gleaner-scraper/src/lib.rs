//! Gleaner Scraper - source scrapers and the harvesting orchestrator.
//!
//! This crate holds the concurrency-critical half of the pipeline:
//!
//! - The [`Scraper`] trait every source site implements: report a source
//!   name, run against a cancellation token and an offer sink, return a
//!   terminal error.
//! - [`run_scrapers`], the orchestrator that runs a collection of scrapers
//!   sequentially or concurrently with staggered starts, fans their offers
//!   into one stream, and closes that stream exactly once - after every
//!   scraper has returned.
//! - [`OfferScraper`], the per-source extraction workflow: render a page,
//!   detect anti-bot challenge pages and wait for an operator to clear them
//!   (re-visiting the same URL afterwards), extract an offer from the
//!   markup, emit it, then pace before the next page.
//!
//! Scrapers are independent: they never share a browser session, a URL list
//! or mutable state. The only shared resources are the fan-in channel and the
//! cancellation token.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod challenge;
pub mod error;
#[allow(missing_docs)]
pub mod extract;
pub mod machine;
pub mod orchestrator;
pub mod scraper;
pub mod sites;

// Re-export commonly used types
pub use challenge::{ChallengeGate, StdinGate};
pub use error::{Result, ScrapeError};
pub use extract::{OfferSelectors, SalaryKind, SalaryRule};
pub use machine::{OfferScraper, SiteConfig};
pub use orchestrator::{run_scrapers, RunOptions, ScheduleMode};
pub use scraper::{OfferSink, Scraper};
