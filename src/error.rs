use thiserror::Error;

/// Failures while wiring the page up. Once running, handlers never fail.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("no browser window is available")]
    NoWindow,
    #[error("the window has no document")]
    NoDocument,
    #[error("invalid behavior config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("{context}: {message}")]
    Js {
        context: &'static str,
        message: String,
    },
}
