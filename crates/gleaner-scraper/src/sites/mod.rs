//! Selector tables and pacing defaults for the supported job boards.
//!
//! The selector strings are configuration data, kept next to each other so a
//! site redesign is a one-file fix. Each constructor takes the URL list the
//! scraper will own plus the pacing range; everything else about the site is
//! fixed here.

mod justjoin;
mod nofluff;
mod pracuj;

pub use justjoin::justjoin;
pub use nofluff::nofluff;
pub use pracuj::pracuj;

/// The interstitial phrase Cloudflare injects while "checking your browser".
pub(crate) const CLOUDFLARE_MARKER: &str = "Verifying you are human";
