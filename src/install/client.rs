use sha2::{Digest, Sha256};

use super::InstallError;
use super::types::{
    CheckpointResponse, PRODUCT, Platform, archive_name, find_checksum, is_version, sums_name,
};

const CHECKPOINT_API_BASE: &str = "https://checkpoint-api.hashicorp.com";
const RELEASES_BASE: &str = "https://releases.hashicorp.com";

#[derive(Debug, Clone)]
pub struct ReleasesClient {
    client: reqwest::Client,
    checkpoint_url: String,
    releases_url: String,
}

impl ReleasesClient {
    pub fn new() -> Result<Self, InstallError> {
        Self::with_base_urls(CHECKPOINT_API_BASE.to_string(), RELEASES_BASE.to_string())
    }

    /// NOTE: Primarily used for testing with mock servers.
    pub fn with_base_urls(
        checkpoint_url: String,
        releases_url: String,
    ) -> Result<Self, InstallError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("tfmoduletest/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(InstallError::Network)?;

        Ok(Self {
            client,
            checkpoint_url: checkpoint_url.trim_end_matches('/').to_string(),
            releases_url: releases_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn latest_version(&self) -> Result<String, InstallError> {
        let url = format!("{}/v1/check/{}", self.checkpoint_url, PRODUCT);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(InstallError::Api {
                status: status.as_u16(),
                message: "checkpoint version lookup failed".to_string(),
            });
        }

        let body: CheckpointResponse =
            response.json().await.map_err(|e| InstallError::Api {
                status: status.as_u16(),
                message: format!("Failed to parse response: {}", e),
            })?;

        if !is_version(&body.current_version) {
            return Err(InstallError::InvalidVersion {
                version: body.current_version,
            });
        }

        tracing::info!(
            version = %body.current_version,
            download_url = body.current_download_url.as_deref().unwrap_or("-"),
            "latest terraform release"
        );

        Ok(body.current_version)
    }

    /// Downloads the release archive for `platform` and verifies it against
    /// the published `SHA256SUMS`.
    pub async fn download_archive(
        &self,
        version: &str,
        platform: Platform,
    ) -> Result<Vec<u8>, InstallError> {
        if !is_version(version) {
            return Err(InstallError::InvalidVersion {
                version: version.to_string(),
            });
        }

        let release_dir = format!("{}/{}/{}", self.releases_url, PRODUCT, version);
        let archive = archive_name(version, platform);

        let sums = self
            .fetch(&format!("{}/{}", release_dir, sums_name(version)))
            .await?;
        let sums = String::from_utf8_lossy(&sums);
        let expected =
            find_checksum(&sums, &archive).ok_or_else(|| InstallError::MissingChecksum {
                file: archive.clone(),
            })?;

        let bytes = self.fetch(&format!("{}/{}", release_dir, archive)).await?;
        let actual = hex::encode(Sha256::digest(&bytes));

        if actual != expected {
            return Err(InstallError::Checksum {
                file: archive,
                expected,
                actual,
            });
        }

        tracing::debug!(file = %archive, size = bytes.len(), "release archive verified");

        Ok(bytes)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, InstallError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(InstallError::Api {
                status: status.as_u16(),
                message: format!("download failed: {}", url),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
