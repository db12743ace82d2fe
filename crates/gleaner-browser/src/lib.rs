//! Browser rendering engine for JavaScript-heavy job boards.
//!
//! Provides headless browser control with anti-fingerprinting and a
//! randomized post-load settle delay so dynamic content finishes loading
//! before the markup is captured. Scrapers depend on the [`PageRenderer`]
//! trait only; the chromium-backed [`BrowserEngine`] is one implementation.

pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod renderer;

pub use engine::{BrowserEngine, EngineConfig};
pub use error::{BrowserError, Result};
pub use fingerprint::FingerprintConfig;
pub use renderer::PageRenderer;
