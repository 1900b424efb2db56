//! Static asset server.
//!
//! A plain HTTP server, independent of the control channel, that serves
//! the bootstrap page and every file under the asset directory
//! (including the rotating artifacts named by the artifact pattern).

use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::extract::{self, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use frame_core::ArtifactPattern;
use mime_guess::MimeGuess;
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::error::ServerError;

#[derive(Clone)]
struct AssetState {
    root: Arc<PathBuf>,
    page: Arc<str>,
}

/// Build the router serving `page` at `/` and files from `root`.
pub fn router(root: PathBuf, page: String) -> Router {
    let state = AssetState {
        root: Arc::new(root),
        page: page.into(),
    };

    Router::new()
        .route("/", get(index))
        .route("/index.html", get(index))
        .route("/*path", get(static_file))
        .with_state(state)
}

/// Bind the asset listener.
pub async fn bind(addr: &str) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })
}

/// Serve `router` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!(addr = %listener.local_addr()?, "asset server listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("asset server stopped");
    Ok(())
}

/// Write placeholder artifacts for slots `0..count`, named by `pattern`
/// relative to `root`, leaving existing files alone. Returns how many
/// were written.
pub async fn ensure_artifacts(
    root: &Path,
    pattern: &ArtifactPattern,
    count: u64,
) -> std::io::Result<usize> {
    let mut written = 0;
    for slot in 0..count {
        let name = pattern.render(slot);
        let relative = sanitize(&name).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("artifact path {name:?} escapes the asset directory"),
            )
        })?;
        let path = root.join(relative);
        if tokio::fs::metadata(&path).await.is_ok() {
            continue;
        }
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, placeholder_svg(slot, count)).await?;
        written += 1;
    }

    debug!(root = %root.display(), %pattern, written, "placeholder artifacts ready");
    Ok(written)
}

fn placeholder_svg(slot: u64, count: u64) -> String {
    let hue = slot * 360 / count.max(1);
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="640" height="360" viewBox="0 0 640 360">"#,
            r#"<rect width="640" height="360" fill="hsl({hue},55%,35%)"/>"#,
            r##"<text x="320" y="195" font-family="monospace" font-size="48" fill="#fff" text-anchor="middle">frame {slot}</text>"##,
            "</svg>\n"
        ),
        hue = hue,
        slot = slot
    )
}

async fn index(State(state): State<AssetState>) -> Html<String> {
    Html(state.page.to_string())
}

async fn static_file(
    State(state): State<AssetState>,
    extract::Path(path): extract::Path<String>,
) -> Response {
    let Some(relative) = sanitize(&path) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let full = state.root.join(&relative);

    match tokio::fs::read(&full).await {
        Ok(bytes) => {
            let mime = MimeGuess::from_path(&full).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.to_string())], bytes).into_response()
        }
        Err(e) => {
            debug!(path = %full.display(), error = %e, "asset not found");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// Keep only plain path components; anything escaping the root is refused.
pub(crate) fn sanitize(path: &str) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in Path::new(path).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    (!out.as_os_str().is_empty()).then_some(out)
}
