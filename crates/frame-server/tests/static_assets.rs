// crates/frame-server/tests/static_assets.rs
use std::net::SocketAddr;

use frame_core::ArtifactPattern;
use frame_server::{assets, page};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;

async fn serve(root: &std::path::Path) -> (SocketAddr, oneshot::Sender<()>) {
    let listener = assets::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = assets::router(root.to_path_buf(), page::bootstrap_page(8765, "frames/frame_0.svg"));
    let (stop, stopped) = oneshot::channel::<()>();
    tokio::spawn(assets::serve(listener, router, async move {
        let _ = stopped.await;
    }));
    (addr, stop)
}

fn svg_pattern() -> ArtifactPattern {
    "frames/frame_{slot}.svg".parse().unwrap()
}

/// Minimal HTTP/1.1 GET; returns (status line, body).
async fn get(addr: SocketAddr, path: &str) -> (String, String) {
    let (head, body) = get_with_headers(addr, path).await;
    let status = head.lines().next().unwrap_or_default().to_string();
    (status, body)
}

/// Like [`get`], but returns the whole response head.
async fn get_with_headers(addr: SocketAddr, path: &str) -> (String, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        path, addr
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    let text = String::from_utf8_lossy(&raw).to_string();

    let (head, body) = text.split_once("\r\n\r\n").unwrap_or((text.as_str(), ""));
    (head.to_string(), body.to_string())
}

#[tokio::test]
async fn ensure_artifacts_writes_missing_files_once() {
    let dir = tempfile::tempdir().unwrap();
    let pattern = svg_pattern();

    assert_eq!(assets::ensure_artifacts(dir.path(), &pattern, 10).await.unwrap(), 10);
    assert_eq!(assets::ensure_artifacts(dir.path(), &pattern, 10).await.unwrap(), 0);
    assert_eq!(assets::ensure_artifacts(dir.path(), &pattern, 12).await.unwrap(), 2);

    let svg = std::fs::read_to_string(dir.path().join("frames/frame_9.svg")).unwrap();
    assert!(svg.contains("frame 9"));
}

#[tokio::test]
async fn ensure_artifacts_follows_nested_padded_patterns() {
    let dir = tempfile::tempdir().unwrap();
    let pattern: ArtifactPattern = "demo_images/placeholder/{slot:04}.svg".parse().unwrap();

    assert_eq!(assets::ensure_artifacts(dir.path(), &pattern, 3).await.unwrap(), 3);
    assert!(dir.path().join("demo_images/placeholder/0002.svg").is_file());

    let escaping: ArtifactPattern = "../{slot}.svg".parse().unwrap();
    assert!(assets::ensure_artifacts(dir.path(), &escaping, 1).await.is_err());
}

#[tokio::test]
async fn nothing_is_written_unless_asked() {
    // Serving alone never creates artifacts.
    let dir = tempfile::tempdir().unwrap();
    let (addr, _stop) = serve(dir.path()).await;
    let (status, _) = get(addr, "/").await;
    assert!(status.contains("200"), "{}", status);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn serves_page_and_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    assets::ensure_artifacts(dir.path(), &svg_pattern(), 10).await.unwrap();
    std::fs::create_dir_all(dir.path().join("demo_images/gta_drive")).unwrap();
    std::fs::write(dir.path().join("demo_images/gta_drive/0001.png"), b"\x89PNG").unwrap();
    let (addr, _stop) = serve(dir.path()).await;

    let (status, body) = get(addr, "/").await;
    assert!(status.contains("200"), "{}", status);
    assert!(body.contains("const CONTROL_PORT = 8765;"));

    let (status, body) = get(addr, "/frames/frame_1.svg").await;
    assert!(status.contains("200"), "{}", status);
    assert!(body.contains("frame 1"));

    let (head, _) = get_with_headers(addr, "/frames/frame_1.svg").await;
    assert!(head.to_ascii_lowercase().contains("content-type: image/svg+xml"), "{}", head);
    let (head, _) = get_with_headers(addr, "/demo_images/gta_drive/0001.png").await;
    assert!(head.to_ascii_lowercase().contains("content-type: image/png"), "{}", head);
}

#[tokio::test]
async fn missing_and_escaping_paths_are_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let (addr, _stop) = serve(dir.path()).await;

    let (status, _) = get(addr, "/frames/frame_1.svg").await;
    assert!(status.contains("404"), "{}", status);

    let (status, _) = get(addr, "/../Cargo.toml").await;
    assert!(status.contains("404") || status.contains("400"), "{}", status);
}

#[tokio::test]
async fn asset_bind_failure_is_reported() {
    let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = taken.local_addr().unwrap().to_string();

    let result = assets::bind(&addr).await;
    assert!(matches!(result, Err(frame_server::ServerError::Bind { .. })));
}
