//! Integration tests for the download stage.
//!
//! These tests verify the full download flow with mock HTTP servers.

use std::time::Duration;

use anexos_core::discovery::PdfLink;
use anexos_core::download::{DownloadError, HttpClient, download_all};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to mount a PDF body on `route`.
async fn mount_file(mock_server: &MockServer, route: &str, content: &[u8]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
        .mount(mock_server)
        .await;
}

fn link(mock_server: &MockServer, route: &str) -> PdfLink {
    PdfLink::parse(&format!("{}{route}", mock_server.uri())).expect("valid link")
}

#[tokio::test]
async fn test_download_full_flow_preserves_content() {
    let content = b"%PDF-1.4\nconteudo do anexo\n%%EOF";
    let mock_server = MockServer::start().await;
    mount_file(&mock_server, "/docs/Anexo_I.pdf", content).await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let client = HttpClient::new();
    let url = format!("{}/docs/Anexo_I.pdf", mock_server.uri());
    let file_path = client
        .download_to_file(&url, temp_dir.path())
        .await
        .expect("download should succeed");

    assert_eq!(file_path, temp_dir.path().join("Anexo_I.pdf"));
    let downloaded_content = std::fs::read(&file_path).expect("should read file");
    assert_eq!(downloaded_content, content);
}

#[tokio::test]
async fn test_download_percent_encoded_name_is_decoded() {
    let mock_server = MockServer::start().await;
    mount_file(&mock_server, "/docs/Anexo%20II.pdf", b"pdf").await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let client = HttpClient::new();
    let url = format!("{}/docs/Anexo%20II.pdf", mock_server.uri());
    let file_path = client
        .download_to_file(&url, temp_dir.path())
        .await
        .expect("download should succeed");

    assert_eq!(file_path.file_name().unwrap(), "Anexo II.pdf");
}

#[tokio::test]
async fn test_download_404_returns_http_status_and_leaves_no_file() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/docs/Anexo_I.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let client = HttpClient::new();
    let url = format!("{}/docs/Anexo_I.pdf", mock_server.uri());
    let result = client.download_to_file(&url, temp_dir.path()).await;

    assert!(matches!(
        result,
        Err(DownloadError::HttpStatus { status: 404, .. })
    ));
    assert!(!temp_dir.path().join("Anexo_I.pdf").exists());
}

#[tokio::test]
async fn test_download_failure_keeps_previous_copy() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/docs/Anexo_I.pdf"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let existing = temp_dir.path().join("Anexo_I.pdf");
    std::fs::write(&existing, b"copia anterior").unwrap();

    let client = HttpClient::new();
    let url = format!("{}/docs/Anexo_I.pdf", mock_server.uri());
    let result = client.download_to_file(&url, temp_dir.path()).await;

    assert!(result.is_err());
    assert_eq!(std::fs::read(&existing).unwrap(), b"copia anterior");
}

#[tokio::test]
async fn test_download_slow_server_times_out() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lento.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"late".to_vec())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let client = HttpClient::with_timeout(Duration::from_millis(200));
    let url = format!("{}/lento.pdf", mock_server.uri());
    let result = client.download_to_file(&url, temp_dir.path()).await;

    assert!(
        matches!(result, Err(DownloadError::Timeout { .. })),
        "expected timeout, got {result:?}"
    );
}

#[tokio::test]
async fn test_download_all_skips_failed_link_and_keeps_order() {
    let mock_server = MockServer::start().await;
    mount_file(&mock_server, "/a/Anexo_I.pdf", b"um").await;
    mount_file(&mock_server, "/a/Anexo_III.pdf", b"tres").await;
    Mock::given(method("GET"))
        .and(path("/a/Anexo_II.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let target = temp_dir.path().join("downloads");
    let links = [
        link(&mock_server, "/a/Anexo_I.pdf"),
        link(&mock_server, "/a/Anexo_II.pdf"),
        link(&mock_server, "/a/Anexo_III.pdf"),
    ];

    let client = HttpClient::new();
    let files = download_all(&client, &links, &target)
        .await
        .expect("batch should succeed");

    let names: Vec<String> = files
        .iter()
        .map(|f| f.path().file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["Anexo_I.pdf", "Anexo_III.pdf"]);
    assert_eq!(files[1].source_url(), links[2].as_str());
    assert_eq!(std::fs::read(target.join("Anexo_III.pdf")).unwrap(), b"tres");
    assert!(!target.join("Anexo_II.pdf").exists());
}

#[tokio::test]
async fn test_download_all_twice_overwrites_with_identical_content() {
    let mock_server = MockServer::start().await;
    mount_file(&mock_server, "/Anexo_I.pdf", b"%PDF-1.7 estavel").await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let links = [link(&mock_server, "/Anexo_I.pdf")];
    let client = HttpClient::new();

    let first = download_all(&client, &links, temp_dir.path()).await.unwrap();
    let second = download_all(&client, &links, temp_dir.path()).await.unwrap();

    assert_eq!(first[0].path(), second[0].path());
    assert_eq!(std::fs::read(second[0].path()).unwrap(), b"%PDF-1.7 estavel");
    let entries = std::fs::read_dir(temp_dir.path()).unwrap().count();
    assert_eq!(entries, 1, "second run must not create a renamed copy");
}
