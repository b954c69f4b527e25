/// Errors surfaced by the notification core.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("configuration item {0} is not supported")]
    InvalidConfigItem(u32),

    #[error("invalid value for {item}: {reason}")]
    InvalidValue { item: String, reason: String },

    #[error("display service is unavailable")]
    MissingDisplayService,

    #[error("record not found: {0}")]
    RecordNotFound(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl NotifyError {
    pub fn invalid_value(item: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            item: item.into(),
            reason: reason.into(),
        }
    }

    /// Wrap any storage backend error.
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }
}

pub type Result<T, E = NotifyError> = std::result::Result<T, E>;
