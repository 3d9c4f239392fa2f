#[derive(Debug, thiserror::Error)]
pub enum PanelScanError {
    /// A configuration precondition was violated. Data-quality
    /// problems never land here; the engine degrades instead.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read word fixture: {0}")]
    Fixture(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
