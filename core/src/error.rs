//! Error types for overlay operations

use std::path::PathBuf;

use floatwin_types::OverlayId;
use thiserror::Error;

/// Errors returned by registry and service operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
    #[error("no overlay registered as {0}")]
    UnknownOverlay(OverlayId),

    #[error("host surface for overlay {0} no longer exists")]
    SurfaceGone(OverlayId),

    #[error("host refused to create a surface for overlay {0}")]
    SurfaceRejected(OverlayId),

    #[error("overlay service is not running")]
    ServiceStopped,
}

/// Errors reported by a `WindowHost` implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("surface no longer exists")]
    SurfaceGone,

    #[error("host rejected the request: {0}")]
    Rejected(String),
}

/// Errors during settings loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings TOML in {path}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to access the settings store")]
    Store(#[from] confy::ConfyError),

    #[error("invalid settings: {0}")]
    Invalid(String),
}
