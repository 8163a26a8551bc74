//! Integration tests for link discovery against a mock page.

use anexos_core::discovery::{DiscoveryError, MarkerRule, discover_links};
use anexos_core::download::{DownloadError, HttpClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = r#"<html><body>
<ul>
  <li><a href="/docs/Anexo_I.pdf">Anexo I - Lista de procedimentos</a></li>
  <li><a href="docs/Anexo_II.pdf"> Anexo II </a></li>
  <li><a href="/docs/Relatorio.pdf">Relatório anual</a></li>
  <li><a href="/docs/anexo-iii.html">Anexo III</a></li>
  <li><a href="mailto:ouvidoria@example.com">Anexo por e-mail</a></li>
</ul>
</body></html>"#;

async fn setup_page(route: &str, body: &str) -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html; charset=utf-8")
                .set_body_string(body),
        )
        .mount(&mock_server)
        .await;

    mock_server
}

#[tokio::test]
async fn test_discover_links_selects_anexo_pdfs_in_document_order() {
    let mock_server = setup_page("/rol/pagina", PAGE).await;
    let client = HttpClient::new();
    let page_url = format!("{}/rol/pagina", mock_server.uri());

    let links = discover_links(&client, &page_url, MarkerRule::Text)
        .await
        .expect("discovery should succeed");

    let urls: Vec<&str> = links.iter().map(|l| l.as_str()).collect();
    assert_eq!(
        urls,
        [
            format!("{}/docs/Anexo_I.pdf", mock_server.uri()),
            format!("{}/rol/docs/Anexo_II.pdf", mock_server.uri()),
        ]
    );
}

#[tokio::test]
async fn test_discover_links_url_rule_matches_path_markers() {
    let body = r#"<a href="/arquivos/anexo-i-rol.pdf">Download</a>
<a href="/arquivos/anexo-ii-dut.pdf">Download</a>
<a href="/arquivos/nota-tecnica.pdf">Anexo técnico</a>"#;
    let mock_server = setup_page("/pagina", body).await;
    let client = HttpClient::new();
    let page_url = format!("{}/pagina", mock_server.uri());

    let links = discover_links(&client, &page_url, MarkerRule::Url)
        .await
        .expect("discovery should succeed");

    assert_eq!(links.len(), 2);
    assert!(links[0].as_str().ends_with("/arquivos/anexo-i-rol.pdf"));
    assert!(links[1].as_str().ends_with("/arquivos/anexo-ii-dut.pdf"));
}

#[tokio::test]
async fn test_discover_links_page_without_attachments_is_empty_ok() {
    let mock_server = setup_page("/vazia", "<html><body><p>Sem anexos</p></body></html>").await;
    let client = HttpClient::new();
    let page_url = format!("{}/vazia", mock_server.uri());

    let links = discover_links(&client, &page_url, MarkerRule::Text)
        .await
        .expect("discovery should succeed");

    assert!(links.is_empty());
}

#[tokio::test]
async fn test_discover_links_http_error_is_fetch_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fora"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;
    let client = HttpClient::new();
    let page_url = format!("{}/fora", mock_server.uri());

    let result = discover_links(&client, &page_url, MarkerRule::Text).await;

    assert!(
        matches!(
            result,
            Err(DiscoveryError::Fetch(DownloadError::HttpStatus { status: 503, .. }))
        ),
        "expected HTTP 503 fetch error, got {result:?}"
    );
}

#[tokio::test]
async fn test_discover_links_rejects_relative_page_url() {
    let client = HttpClient::new();

    let result = discover_links(&client, "/sem/host", MarkerRule::Text).await;

    assert!(matches!(result, Err(DiscoveryError::InvalidPageUrl { .. })));
}
