use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Figment(#[from] figment::Error),

    #[error("invalid {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}
