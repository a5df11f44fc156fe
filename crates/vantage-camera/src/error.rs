use std::path::PathBuf;

/// Errors raised while loading camera settings or scene descriptions.
///
/// The per-frame camera update never fails; these only occur at load time.
#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse camera data: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("zone '{zone}' references unknown anchor '{anchor}'")]
    UnknownAnchor { zone: String, anchor: String },

    #[error("fallback anchor '{0}' is not declared in the scene")]
    UnknownFallbackAnchor(String),

    #[error("duplicate {kind} name '{name}'")]
    DuplicateName { kind: &'static str, name: String },
}
