//! Scraper error types.
//!
//! Per-page failures (render errors, pages with no matching markup) are not
//! errors at this level - the state machine logs them and moves to the next
//! URL. A scraper returns an error only for whole-task conditions.

use thiserror::Error;

/// Terminal errors a scraper run can end with.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The shared cancellation token fired; the scraper stopped at the next
    /// cancellation point.
    #[error("scrape cancelled")]
    Cancelled,

    /// The consumer went away before the scraper finished pushing offers.
    #[error("offer sink closed")]
    SinkClosed,

    /// A selector table entry failed to compile at construction time.
    #[error("invalid selector `{selector}`: {reason}")]
    Selector {
        /// The offending selector expression
        selector: String,
        /// Parser diagnostic
        reason: String,
    },

    /// Unrecoverable setup failure outside the per-page workflow.
    #[error("scraper failed: {0}")]
    Setup(String),
}

/// Result type alias for scraper operations.
pub type Result<T> = std::result::Result<T, ScrapeError>;
