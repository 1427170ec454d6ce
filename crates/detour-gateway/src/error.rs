use std::path::PathBuf;

use detour_core::{SourceError, StoreError};
use detour_telemetry::TelemetryError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to read source file '{path}': {source}")]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to build redirect table: {0}")]
    Source(#[from] SourceError),
    #[error("failed to open store: {0}")]
    Store(#[from] StoreError),
    #[error("failed to initialize telemetry: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}
