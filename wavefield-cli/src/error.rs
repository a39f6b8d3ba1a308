/// Result alias that carries the CLI's [`CliError`] type.
pub type Result<T> = std::result::Result<T, CliError>;

/// Everything that can stop the CLI. The engine itself never fails; these
/// all come from reading presets and command-line input.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Reading the preset file failed.
    #[error("failed to read preset: {0}")]
    Io(#[from] std::io::Error),
    /// The preset file is not valid JSON for the expected shape.
    #[error("malformed preset: {0}")]
    Json(#[from] serde_json::Error),
    /// The preset parsed but names something that does not exist.
    #[error("invalid preset: {0}")]
    InvalidPreset(String),
    /// A command-line value is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl CliError {
    pub fn preset<T: Into<String>>(msg: T) -> Self {
        Self::InvalidPreset(msg.into())
    }

    pub fn argument<T: Into<String>>(msg: T) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
