//! Downloading a Terraform release when none is installed.
//!
//! Releases are cached per version under the user cache directory
//! (`<cache>/tfmoduletest/terraform/<version>/terraform`), so a second run
//! reuses the binary without touching the network beyond the version check.

mod client;
mod error;
mod types;

pub use client::ReleasesClient;
pub use error::InstallError;
pub use types::{CheckpointResponse, Platform, archive_name, find_checksum, is_version, sums_name};

use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use types::PRODUCT;

pub fn default_install_root() -> Result<PathBuf, InstallError> {
    dirs::cache_dir()
        .map(|dir| dir.join("tfmoduletest").join(PRODUCT))
        .ok_or(InstallError::NoCacheDir)
}

pub fn binary_file_name() -> String {
    format!("{}{}", PRODUCT, std::env::consts::EXE_SUFFIX)
}

pub async fn install_latest(client: &ReleasesClient, root: &Path) -> Result<PathBuf, InstallError> {
    let version = client.latest_version().await?;
    install_version(client, root, &version).await
}

pub async fn install_version(
    client: &ReleasesClient,
    root: &Path,
    version: &str,
) -> Result<PathBuf, InstallError> {
    if !is_version(version) {
        return Err(InstallError::InvalidVersion {
            version: version.to_string(),
        });
    }

    let dest = root.join(version).join(binary_file_name());
    if dest.is_file() {
        tracing::info!(version, path = %dest.display(), "using cached terraform release");
        return Ok(dest);
    }

    let platform = Platform::current()?;
    let archive = client.download_archive(version, platform).await?;
    extract_binary(&archive, &dest)?;

    tracing::info!(version, path = %dest.display(), "installed terraform release");

    Ok(dest)
}

/// Writes the `terraform` entry of a release zip to `dest`.
///
/// The binary is staged next to `dest` and renamed into place, so an
/// interrupted extraction never leaves a truncated binary behind.
pub fn extract_binary(archive: &[u8], dest: &Path) -> Result<(), InstallError> {
    let mut reader = zip::ZipArchive::new(Cursor::new(archive))?;
    let mut entry = reader.by_name(&binary_file_name())?;

    if let Some(dir) = dest.parent() {
        fs::create_dir_all(dir)?;
    }

    let staging = dest.with_extension("partial");
    {
        let mut out = fs::File::create(&staging)?;
        io::copy(&mut entry, &mut out)?;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&staging, fs::Permissions::from_mode(0o755))?;
    }

    fs::rename(&staging, dest)?;

    Ok(())
}
