//! Gleaner Core - Foundation crate for the Gleaner job-offer harvester.
//!
//! This crate provides the shared record type, the canonical URL normalizer
//! and configuration management that all other Gleaner crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Configuration error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths and env overrides
//! - [`types`] - The [`JobOffer`] record emitted by every scraper
//! - [`urlnorm`] - Canonical URL normalization used for deduplication

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;
pub mod urlnorm;

// Re-export commonly used types
pub use config::{AppConfig, BrowserConfig, GeneralConfig, ScrapingConfig};
pub use error::{ConfigError, ConfigResult};
pub use types::JobOffer;
pub use urlnorm::normalize;
