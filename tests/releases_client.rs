use std::io::{Cursor, Write};

use sha2::{Digest, Sha256};
use tfmoduletest::install::{
    self, InstallError, Platform, ReleasesClient, archive_name, sums_name,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip::write::SimpleFileOptions;

const LINUX_AMD64: Platform = Platform {
    os: "linux",
    arch: "amd64",
};

fn release_zip(binary: &[u8]) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut buf);
        writer
            .start_file(install::binary_file_name(), SimpleFileOptions::default())
            .unwrap();
        writer.write_all(binary).unwrap();
        writer.finish().unwrap();
    }
    buf.into_inner()
}

fn sums_for(file: &str, archive: &[u8]) -> String {
    format!(
        "0000000000000000000000000000000000000000000000000000000000000000  terraform_other.zip\n{}  {}\n",
        hex::encode(Sha256::digest(archive)),
        file
    )
}

fn client_for(server: &MockServer) -> ReleasesClient {
    ReleasesClient::with_base_urls(server.uri(), server.uri()).unwrap()
}

async fn mount_release(server: &MockServer, version: &str, platform: Platform, archive: &[u8], sums: String) {
    let base = format!("/terraform/{}", version);

    Mock::given(method("GET"))
        .and(path(format!("{}/{}", base, sums_name(version))))
        .respond_with(ResponseTemplate::new(200).set_body_string(sums))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{}/{}", base, archive_name(version, platform))))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(archive.to_vec()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_latest_version() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/check/terraform"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "product": "terraform",
            "current_version": "1.9.5",
            "current_download_url": "https://releases.hashicorp.com/terraform/1.9.5",
            "alerts": []
        })))
        .mount(&mock_server)
        .await;

    let version = client_for(&mock_server).latest_version().await.unwrap();
    assert_eq!(version, "1.9.5");
}

#[tokio::test]
async fn test_latest_version_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/check/terraform"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server).latest_version().await;
    match result {
        Err(InstallError::Api { status, .. }) => assert_eq!(status, 503),
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_latest_version_rejects_unsafe_version() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/check/terraform"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "current_version": "../../../tmp"
        })))
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server).latest_version().await;
    assert!(matches!(result, Err(InstallError::InvalidVersion { .. })));
}

#[tokio::test]
async fn test_download_archive_verified() {
    let mock_server = MockServer::start().await;
    let archive = release_zip(b"terraform-binary");
    let sums = sums_for(&archive_name("1.9.5", LINUX_AMD64), &archive);
    mount_release(&mock_server, "1.9.5", LINUX_AMD64, &archive, sums).await;

    let bytes = client_for(&mock_server)
        .download_archive("1.9.5", LINUX_AMD64)
        .await
        .unwrap();
    assert_eq!(bytes, archive);
}

#[tokio::test]
async fn test_download_archive_checksum_mismatch() {
    let mock_server = MockServer::start().await;
    let archive = release_zip(b"terraform-binary");
    let tampered = release_zip(b"something-else");
    let sums = sums_for(&archive_name("1.9.5", LINUX_AMD64), &archive);
    mount_release(&mock_server, "1.9.5", LINUX_AMD64, &tampered, sums).await;

    let result = client_for(&mock_server)
        .download_archive("1.9.5", LINUX_AMD64)
        .await;

    match result {
        Err(InstallError::Checksum { file, .. }) => {
            assert_eq!(file, "terraform_1.9.5_linux_amd64.zip")
        }
        other => panic!("expected Checksum error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_download_archive_missing_checksum() {
    let mock_server = MockServer::start().await;
    let archive = release_zip(b"terraform-binary");
    let sums = "abcd  terraform_1.9.5_windows_386.zip\n".to_string();
    mount_release(&mock_server, "1.9.5", LINUX_AMD64, &archive, sums).await;

    let result = client_for(&mock_server)
        .download_archive("1.9.5", LINUX_AMD64)
        .await;
    assert!(matches!(result, Err(InstallError::MissingChecksum { .. })));
}

#[tokio::test]
async fn test_download_archive_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server)
        .download_archive("9.9.9", LINUX_AMD64)
        .await;
    match result {
        Err(InstallError::Api { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_install_latest_extracts_binary() {
    let Ok(platform) = Platform::current() else {
        return;
    };

    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/check/terraform"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "current_version": "1.9.5"
        })))
        .mount(&mock_server)
        .await;

    let archive = release_zip(b"terraform-binary");
    let sums = sums_for(&archive_name("1.9.5", platform), &archive);
    mount_release(&mock_server, "1.9.5", platform, &archive, sums).await;

    let root = tempfile::TempDir::new().unwrap();
    let installed = install::install_latest(&client_for(&mock_server), root.path())
        .await
        .unwrap();

    assert_eq!(
        installed,
        root.path().join("1.9.5").join(install::binary_file_name())
    );
    assert_eq!(std::fs::read(&installed).unwrap(), b"terraform-binary");
}
