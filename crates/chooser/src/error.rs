use std::path::PathBuf;

/// Errors surfaced while building a [`crate::Coordinator`] or rasterizing an artifact.
///
/// Nothing in the apply loop propagates these; they are logged and absorbed there.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid config value for `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("invalid color `{0}`, expected #RGB, #ARGB, #RRGGBB or #AARRGGBB")]
    InvalidColor(String),

    #[error("cannot rasterize a {width}x{height} bitmap")]
    EmptyGeometry { width: u32, height: u32 },

    #[error("failed to read config from {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
