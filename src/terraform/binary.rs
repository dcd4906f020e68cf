use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::TfTestError;
use crate::install::{self, ReleasesClient};

pub const BINARY_NAME: &str = "terraform";

#[derive(Debug, Clone, Default)]
pub struct BinaryConfig {
    /// Use this binary and nothing else.
    pub explicit: Option<PathBuf>,
    /// Download the latest release when nothing is on `PATH`.
    pub allow_install: bool,
}

/// Resolves the single Terraform binary used for the run: an explicit path,
/// then `PATH`, then the latest release.
pub async fn find_terraform(config: &BinaryConfig) -> Result<PathBuf, TfTestError> {
    if let Some(path) = &config.explicit {
        if !path.is_file() {
            return Err(TfTestError::BinaryNotFound(format!(
                "{} does not exist",
                path.display()
            )));
        }
        tracing::info!(path = %path.display(), "using explicit terraform binary");
        return Ok(path.clone());
    }

    if let Some(path) = env::var_os("PATH").and_then(|p| look_path(BINARY_NAME, &p)) {
        tracing::info!(path = %path.display(), "found terraform on PATH");
        return Ok(path);
    }

    if !config.allow_install {
        return Err(TfTestError::BinaryNotFound(format!(
            "{} not found on PATH",
            BINARY_NAME
        )));
    }

    let client = ReleasesClient::new()?;
    let root = install::default_install_root()?;
    let path = install::install_latest(&client, &root).await?;
    Ok(path)
}

/// First executable named `name` in the given `PATH`-style list.
pub fn look_path(name: &str, path_var: &OsStr) -> Option<PathBuf> {
    let file_name = format!("{}{}", name, env::consts::EXE_SUFFIX);
    env::split_paths(path_var)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(&file_name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_binary(dir: &Path, executable: bool) -> PathBuf {
        let path = dir.join(format!("{}{}", BINARY_NAME, env::consts::EXE_SUFFIX));
        std::fs::write(&path, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = if executable { 0o755 } else { 0o644 };
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode)).unwrap();
        }
        #[cfg(not(unix))]
        let _ = executable;
        path
    }

    #[test]
    fn test_look_path_finds_first_match() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        write_binary(second.path(), true);
        let expected = write_binary(first.path(), true);

        let path_var = env::join_paths([first.path(), second.path()]).unwrap();
        assert_eq!(look_path(BINARY_NAME, &path_var), Some(expected));
    }

    #[test]
    fn test_look_path_none_when_missing() {
        let empty = TempDir::new().unwrap();
        let path_var = env::join_paths([empty.path()]).unwrap();
        assert_eq!(look_path(BINARY_NAME, &path_var), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_look_path_skips_non_executable() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        write_binary(first.path(), false);
        let expected = write_binary(second.path(), true);

        let path_var = env::join_paths([first.path(), second.path()]).unwrap();
        assert_eq!(look_path(BINARY_NAME, &path_var), Some(expected));
    }

    #[tokio::test]
    async fn test_explicit_binary_used() {
        let tmp = TempDir::new().unwrap();
        let bin = write_binary(tmp.path(), true);
        let config = BinaryConfig {
            explicit: Some(bin.clone()),
            allow_install: false,
        };

        assert_eq!(find_terraform(&config).await.unwrap(), bin);
    }

    #[tokio::test]
    async fn test_explicit_binary_missing_is_error() {
        let tmp = TempDir::new().unwrap();
        let config = BinaryConfig {
            explicit: Some(tmp.path().join("terraform")),
            allow_install: true,
        };

        match find_terraform(&config).await {
            Err(TfTestError::BinaryNotFound(msg)) => assert!(msg.contains("does not exist")),
            other => panic!("expected BinaryNotFound, got {:?}", other),
        }
    }
}
