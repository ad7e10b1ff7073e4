use simcore::ParamError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid session parameters: {0}")]
    Param(#[from] ParamError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse session config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("failed to install logger: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error("failed to write telemetry: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid run settings: {0}")]
    Settings(String),
}
