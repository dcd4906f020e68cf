use thiserror::Error;

/// Errors raised while fetching a Terraform release.
#[derive(Debug, Error)]
pub enum InstallError {
    /// Network-level error (connection failed, timeout, etc.)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Release or checkpoint endpoint answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid release version: '{version}'")]
    InvalidVersion { version: String },

    #[error("no checksum listed for {file}")]
    MissingChecksum { file: String },

    #[error("checksum mismatch for {file}: expected {expected}, got {actual}")]
    Checksum {
        file: String,
        expected: String,
        actual: String,
    },

    #[error("no release available for {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("invalid release archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("unable to determine user cache directory")]
    NoCacheDir,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
