//! Operator intervention seam for anti-bot challenge pages.
//!
//! The pipeline does not solve challenges - it recognizes them and defers to
//! a human. A [`ChallengeGate`] blocks a scraper until the operator signals
//! that the challenge has been cleared in the browser; there is deliberately
//! no timeout, so one stuck source waits on the operator without affecting
//! siblings running concurrently.

use tokio::io::{AsyncBufReadExt, BufReader};

/// Blocks a scraper while the operator deals with a challenge page.
#[async_trait::async_trait]
pub trait ChallengeGate: Send + Sync {
    /// Wait until the operator reports the challenge for `source` as solved.
    async fn wait_released(&self, source: &str);
}

/// Gate released by pressing Enter on the terminal.
#[derive(Debug, Default)]
pub struct StdinGate;

#[async_trait::async_trait]
impl ChallengeGate for StdinGate {
    async fn wait_released(&self, source: &str) {
        tracing::warn!(
            source = %source,
            "anti-bot challenge detected; solve it in the browser window, then press Enter"
        );

        let mut line = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());
        if let Err(e) = reader.read_line(&mut line).await {
            tracing::error!("failed to read operator confirmation: {e}");
        }
    }
}
