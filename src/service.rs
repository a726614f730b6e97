//! HTTP request handlers.
//!
//! Every handler receives the immutable [`ServerParam`] and the shared
//! [`DeckRenderer`] through axum extensions; the only mutable state is the
//! reload channel, owned by the watcher side.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{
        self,
        ws::{Message, WebSocket, WebSocketUpgrade},
        Extension,
    },
    http::{header, HeaderMap, Request, StatusCode},
    response::{Html, IntoResponse, Response},
};
use tokio::sync::watch::Receiver;
use tower::util::ServiceExt;
use tower_http::services::ServeDir;
use tracing::log::*;

use crate::assets;
use crate::config::ServerParam;
use crate::render::DeckRenderer;

/// `GET /`: re-reads the source file and renders the deck from its current
/// content, so edits are visible on refresh even without watching. Failures
/// are per-request: the listener stays up.
pub(crate) async fn serve_deck(
    Extension(param): Extension<Arc<ServerParam>>,
    Extension(renderer): Extension<Arc<DeckRenderer>>,
) -> Response {
    let markdown = match tokio::fs::read_to_string(&param.path).await {
        Ok(markdown) => markdown,
        Err(err) => {
            error!("failed to read {}: {}", param.path.display(), err);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("failed to read {}: {}", param.path.display(), err),
            )
                .into_response();
        }
    };

    match renderer.render(&markdown) {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            error!("failed to render {}: {}", param.path.display(), err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("failed to render slides: {}", err),
            )
                .into_response()
        }
    }
}

/// `GET /_static/*path`: serves a bundled asset.
pub(crate) async fn serve_asset(extract::Path(path): extract::Path<PathBuf>) -> impl IntoResponse {
    let path = path.strip_prefix("/").unwrap_or(&path);

    let file = match assets::bundled(&path.to_string_lossy()) {
        Some(file) => file,
        None => return Err((StatusCode::NOT_FOUND, "asset not found")),
    };

    let mime = mime_guess::from_path(path);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        mime.first_or_octet_stream()
            .to_string()
            .parse()
            .expect("mime type is a valid header value"),
    );

    Ok((headers, file.contents()))
}

/// `GET /theme.css`: the user-supplied stylesheet, read from disk on each
/// request so theme edits show up on reload. 404 unless a custom theme is
/// configured.
pub(crate) async fn serve_theme(
    Extension(param): Extension<Arc<ServerParam>>,
) -> impl IntoResponse {
    let path = match param.theme.custom_path() {
        Some(path) => path,
        None => return Err((StatusCode::NOT_FOUND, String::from("no custom theme"))),
    };

    match tokio::fs::read(path).await {
        Ok(contents) => {
            let mut headers = HeaderMap::new();
            headers.insert(
                header::CONTENT_TYPE,
                "text/css".parse().expect("static header value"),
            );
            Ok((headers, contents))
        }
        Err(err) => {
            error!("failed to read theme {}: {}", path.display(), err);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("failed to read theme: {}", err),
            ))
        }
    }
}

/// `GET /reload`: the live-reload channel. Browsers hold a websocket open and
/// reload the page whenever a message arrives. Inactive (404) unless the
/// server was started with watching enabled.
pub(crate) async fn reload_handler(
    ws: Option<WebSocketUpgrade>,
    Extension(param): Extension<Arc<ServerParam>>,
    Extension(reload_rx): Extension<Receiver<u64>>,
) -> Response {
    if !param.watch {
        return (StatusCode::NOT_FOUND, "live reload is disabled").into_response();
    }

    match ws {
        Some(ws) => ws.on_upgrade(|socket| relay_reloads(socket, reload_rx)),
        None => (StatusCode::BAD_REQUEST, "expected a websocket upgrade").into_response(),
    }
}

/// Forwards each reload notification to one connected browser. Exits when the
/// client goes away (releasing its channel subscription) or when the server
/// shuts down, in which case the socket is closed cleanly.
async fn relay_reloads(mut socket: WebSocket, mut reload_rx: Receiver<u64>) {
    // The extension's receiver never consumes versions, so a fresh clone may
    // still hold edits from before this client connected. Mark the current
    // generation as seen: the page this client just loaded was rendered from
    // content at least that new, and a stale signal here would put the
    // browser's reload script into a reconnect-and-reload loop.
    reload_rx.borrow_and_update();

    loop {
        tokio::select! {
            changed = reload_rx.changed() => {
                if changed.is_err() {
                    // Server dropped the sender: shutting down.
                    break;
                }
                debug!("notifying client of reload");
                if socket.send(Message::Text(String::from("reload"))).await.is_err() {
                    return;
                }
            }
            msg = socket.recv() => {
                match msg {
                    None | Some(Err(_)) | Some(Ok(Message::Close(_))) => return,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    let _ = socket.send(Message::Close(None)).await;
}

/// Fallback route: serves files from the markdown file's directory, so slides
/// can reference images and other assets relative to the source file.
pub(crate) async fn serve_static_file(
    Extension(param): Extension<Arc<ServerParam>>,
    req: Request<Body>,
) -> impl IntoResponse {
    let root = match param.path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    ServeDir::new(root)
        .oneshot(req)
        .await
        .map_err(|err| (StatusCode::NOT_FOUND, err.to_string()))
}
