use thiserror::Error;

pub type Result<T> = std::result::Result<T, DiscoveryError>;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    #[error("browser error: {0}")]
    Browser(#[from] gleaner_browser::BrowserError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
