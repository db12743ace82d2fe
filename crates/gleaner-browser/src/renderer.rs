use crate::error::Result;

/// The rendering seam every scraper is generic over.
///
/// An implementation turns a URL into fully-rendered markup. The production
/// implementation drives a chromium instance; tests substitute scripted
/// renderers. A render call is not a cancellation point - callers observe
/// cancellation before and after it, never inside.
#[async_trait::async_trait]
pub trait PageRenderer: Send + Sync {
    /// Navigate to `url` and capture the rendered document markup.
    async fn render(&self, url: &str) -> Result<String>;
}
