use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PermissoError {
    /// Inbound message body was not JSON. Recovered by the bridge, never surfaced.
    #[error("malformed message payload: {0}")]
    MalformedMessagePayload(String),

    /// A link needed an overlay but no container in the chain can present one.
    #[error("no presenting container could be resolved")]
    NoPresentingContainer,

    #[error("presentation unavailable: {0}")]
    PresentationUnavailable(String),

    #[error("renderer initialization failed: {0}")]
    RendererInitializationFailed(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("failed to open url externally: {0}")]
    ExternalOpen(String),

    #[error("overlay presentation failed: {0}")]
    Overlay(String),

    #[error("webview error: {0}")]
    WebView(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<url::ParseError> for PermissoError {
    fn from(e: url::ParseError) -> Self {
        Self::InvalidUrl(e.to_string())
    }
}
