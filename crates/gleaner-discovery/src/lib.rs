//! URL discovery for the harvesting pipeline.
//!
//! A companion phase to scraping: for each site, render its listing page,
//! pull out the offer links behind a per-site anchor selector, and persist
//! them as plain newline-separated URL list files that the scrapers consume
//! later. Discovery shares the render-then-extract pattern with scraping but
//! has none of its merge or cancellation machinery.

pub mod error;
pub mod links;
pub mod urlfile;

pub use error::{DiscoveryError, Result};
pub use links::{collect_offer_links, targets, DiscoveryTarget};
pub use urlfile::{load_urls, save_urls};
