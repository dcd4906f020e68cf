use serde::Deserialize;

use super::InstallError;

pub const PRODUCT: &str = "terraform";

/// Response of the checkpoint version API. Only the fields the installer
/// reads are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckpointResponse {
    pub current_version: String,
    #[serde(default)]
    pub current_download_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: &'static str,
    pub arch: &'static str,
}

impl Platform {
    pub fn current() -> Result<Self, InstallError> {
        Self::from_rust(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Maps Rust target names onto the names used in release file names.
    pub fn from_rust(os: &str, arch: &str) -> Result<Self, InstallError> {
        let release_os = match os {
            "linux" => "linux",
            "macos" => "darwin",
            "windows" => "windows",
            "freebsd" => "freebsd",
            "openbsd" => "openbsd",
            _ => return Err(unsupported(os, arch)),
        };
        let release_arch = match arch {
            "x86_64" => "amd64",
            "x86" => "386",
            "aarch64" => "arm64",
            "arm" => "arm",
            _ => return Err(unsupported(os, arch)),
        };

        Ok(Self {
            os: release_os,
            arch: release_arch,
        })
    }
}

fn unsupported(os: &str, arch: &str) -> InstallError {
    InstallError::UnsupportedPlatform {
        os: os.to_string(),
        arch: arch.to_string(),
    }
}

/// Release versions become path components, so only plain semver-ish
/// strings are accepted.
pub fn is_version(input: &str) -> bool {
    !input.is_empty()
        && input.starts_with(|c: char| c.is_ascii_digit())
        && input
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+'))
}

pub fn archive_name(version: &str, platform: Platform) -> String {
    format!(
        "{}_{}_{}_{}.zip",
        PRODUCT, version, platform.os, platform.arch
    )
}

pub fn sums_name(version: &str) -> String {
    format!("{}_{}_SHA256SUMS", PRODUCT, version)
}

/// Finds the hex digest for `file_name` in a `SHA256SUMS` body
/// (`<hex>  <file>` per line).
pub fn find_checksum(sums: &str, file_name: &str) -> Option<String> {
    sums.lines().find_map(|line| {
        let mut parts = line.split_whitespace();
        let digest = parts.next()?;
        let name = parts.next()?;
        (name == file_name).then(|| digest.to_ascii_lowercase())
    })
}
