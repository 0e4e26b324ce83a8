//! Tests for the download module

use super::downloader::part_path;
use super::*;
use crate::error::ErrorKind;
use crate::http::{HttpClient, HttpClientConfig};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use test_case::test_case;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn downloader(dir: &TempDir) -> HttpAssetDownloader {
    let http = HttpClient::with_config(HttpClientConfig::default()).unwrap();
    HttpAssetDownloader::new(http, dir.path().join("downloads"))
}

// ============================================================================
// File Name Tests
// ============================================================================

#[test_case("Naruto Uzumaki", "Naruto_Uzumaki" ; "spaces")]
#[test_case("../../etc/passwd", "etc_passwd" ; "traversal")]
#[test_case("..", "asset" ; "dots only")]
#[test_case("", "asset" ; "empty")]
#[test_case("うずまき.png", "png" ; "non ascii collapses")]
#[test_case("cover-01.webp", "cover-01.webp" ; "already safe")]
fn test_sanitize_file_name(input: &str, expected: &str) {
    assert_eq!(sanitize_file_name(input), expected);
}

#[test]
fn test_sanitize_file_name_truncates() {
    let long = "a".repeat(300);
    assert_eq!(sanitize_file_name(&long).len(), 100);
}

#[tokio::test]
async fn test_reserve_uses_url_extension() {
    let dir = TempDir::new().unwrap();
    let dl = downloader(&dir);
    let url = Url::parse("https://cdn.example.com/images/abc123.webp?w=640").unwrap();

    let target = dl.reserve(&url, "Naruto Uzumaki").await.unwrap();
    assert_eq!(
        target.file_name().and_then(|n| n.to_str()),
        Some("Naruto_Uzumaki.webp")
    );
    assert!(target.exists());
}

#[tokio::test]
async fn test_reserve_falls_back_to_url_segment() {
    let dir = TempDir::new().unwrap();
    let dl = downloader(&dir);
    let url = Url::parse("https://cdn.example.com/images/abc123.jpg").unwrap();

    let target = dl.reserve(&url, "  ").await.unwrap();
    assert_eq!(
        target.file_name().and_then(|n| n.to_str()),
        Some("abc123.jpg")
    );
}

#[tokio::test]
async fn test_reserve_never_reuses_a_name() {
    let dir = TempDir::new().unwrap();
    let dl = downloader(&dir);
    std::fs::create_dir_all(dl.directory()).unwrap();
    std::fs::write(dl.directory().join("pic.png"), b"old").unwrap();

    let url = Url::parse("https://cdn.example.com/pic.png").unwrap();
    let first = dl.reserve(&url, "pic").await.unwrap();
    let second = dl.reserve(&url, "pic").await.unwrap();

    assert_eq!(first, dl.directory().join("pic-1.png"));
    assert_eq!(second, dl.directory().join("pic-2.png"));
    assert_eq!(std::fs::read(dl.directory().join("pic.png")).unwrap(), b"old");
}

#[test]
fn test_part_path_appends_suffix() {
    assert_eq!(
        part_path(Path::new("/tmp/x.png")),
        PathBuf::from("/tmp/x.png.part")
    );
    assert_ne!(
        part_path(Path::new("/tmp/x.png")),
        part_path(Path::new("/tmp/x.jpg"))
    );
}

// ============================================================================
// Download Tests
// ============================================================================

#[tokio::test]
async fn test_download_writes_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/images/17.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\xff\xd8\xff jpeg".to_vec()))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let dl = downloader(&dir);

    let saved = dl
        .download(&format!("{}/images/17.jpg", server.uri()), "Naruto")
        .await
        .unwrap();

    assert_eq!(saved, dl.directory().join("Naruto.jpg"));
    assert_eq!(std::fs::read(&saved).unwrap(), b"\xff\xd8\xff jpeg");
    assert!(!dl.directory().join("Naruto.jpg.part").exists());
}

#[tokio::test]
async fn test_download_twice_keeps_both() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"png".to_vec()))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let dl = downloader(&dir);
    let url = format!("{}/a.png", server.uri());

    let first = dl.download(&url, "").await.unwrap();
    let second = dl.download(&url, "").await.unwrap();

    assert_ne!(first, second);
    assert!(first.exists());
    assert!(second.exists());
}

#[tokio::test]
async fn test_concurrent_downloads_with_same_name_keep_both() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cover.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"cover".to_vec())
                .set_delay(Duration::from_millis(50)),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let dl = downloader(&dir);
    let url = format!("{}/cover.png", server.uri());

    let (first, second) = tokio::join!(dl.download(&url, "cover"), dl.download(&url, "cover"));
    let first = first.unwrap();
    let second = second.unwrap();

    assert_ne!(first, second);
    let mut names: Vec<String> = std::fs::read_dir(dl.directory())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["cover-1.png", "cover.png"]);
    assert_eq!(std::fs::read(&first).unwrap(), b"cover");
    assert_eq!(std::fs::read(&second).unwrap(), b"cover");
}

#[tokio::test]
async fn test_concurrent_downloads_with_different_extensions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/x.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"png".to_vec())
                .set_delay(Duration::from_millis(50)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/x.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"jpg".to_vec())
                .set_delay(Duration::from_millis(50)),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let dl = downloader(&dir);

    let png_url = format!("{}/x.png", server.uri());
    let jpg_url = format!("{}/x.jpg", server.uri());
    let (png, jpg) = tokio::join!(
        dl.download(&png_url, "x"),
        dl.download(&jpg_url, "x"),
    );

    assert_eq!(std::fs::read(png.unwrap()).unwrap(), b"png");
    assert_eq!(std::fs::read(jpg.unwrap()).unwrap(), b"jpg");
}

#[tokio::test]
async fn test_download_interrupted_body_leaves_nothing_behind() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Promise 1000 bytes, send a few, hang up
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let _ = socket.read(&mut buf).await.unwrap();
        socket
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 1000\r\n\r\npartial")
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });

    let dir = TempDir::new().unwrap();
    let dl = downloader(&dir);

    let err = dl
        .download(&format!("http://{addr}/big.png"), "big")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Download);

    let leftovers: Vec<_> = std::fs::read_dir(dl.directory()).unwrap().collect();
    assert!(leftovers.is_empty(), "unexpected files: {leftovers:?}");
    server.await.unwrap();
}

#[tokio::test]
async fn test_download_http_error_is_download_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let dl = downloader(&dir);

    let err = dl
        .download(&format!("{}/gone.png", server.uri()), "gone")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Download);
    assert!(err.to_string().contains("404"));
    assert!(!dl.directory().join("gone.png").exists());
}

#[tokio::test]
async fn test_download_rejects_bad_urls() {
    let dir = TempDir::new().unwrap();
    let dl = downloader(&dir);

    let err = dl.download("not a url", "x").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Download);

    let err = dl.download("file:///etc/passwd", "x").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Download);
    assert!(err.to_string().contains("unsupported scheme"));
}
