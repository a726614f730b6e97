//! podium serves a single markdown file as a browser-based slide deck.
//!
//! This crate provides a [`Server`] that renders a markdown document into a
//! presentation page (slides split on horizontal rules, navigated by a
//! bundled browser-side engine) and serves it over local HTTP. The document
//! is re-rendered from the file on every request, so a refresh always shows
//! the latest save. With watching enabled, the server also pushes reload
//! notifications over a websocket so open browsers refresh themselves.
//!
//! # Example
//!
//! ```no_run
//! use std::net::SocketAddr;
//! use podium::{Server, ServerParam};
//!
//! # tokio_test::block_on(async {
//! let addr = "127.0.0.1:3000".parse::<SocketAddr>()?;
//!
//! let mut param = ServerParam::new("talk.md");
//! param.watch = true;
//!
//! let server = Server::bind(&addr, param)?;
//! println!("accepting connections at http://{}", server.addr());
//!
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! # });
//! ```
//!
//! The server is asynchronous, and assumes that a `tokio` runtime is in use.

#![warn(missing_debug_implementations)]
#![warn(missing_docs)]

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::Extension, routing::get, Router};
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::log::*;

mod assets;
mod config;
mod error;
pub mod render;
mod service;
mod watch;

pub use crate::config::{RevealOptions, ServerParam, Theme};
pub use crate::error::Error;

/// Slide-deck preview server.
///
/// Listens for HTTP connections and serves the rendered presentation for one
/// markdown file. When the configuration enables watching, a background
/// watcher observes the file and broadcasts a reload signal to every
/// connected browser after each change.
///
/// Dropping the server shuts it down gracefully: new connections stop being
/// accepted, open reload channels are closed, and in-flight requests are
/// allowed to complete.
pub struct Server {
    addr: SocketAddr,
    param: Arc<ServerParam>,
    _watcher: Option<watch::FileWatcher>,
    _reload_tx: Option<tokio::sync::watch::Sender<u64>>,
    _shutdown_tx: oneshot::Sender<()>,
}

impl Server {
    /// Binds the server to `addr` and starts serving `param`.
    ///
    /// Binding to port 0 requests a port assignment from the OS; use
    /// [`addr()`][Self::addr] to find out what was assigned. A port that is
    /// already in use fails with [`Error::Bind`]; there is no automatic port
    /// hunting.
    ///
    /// The server must be bound within a Tokio runtime.
    pub fn bind(addr: &SocketAddr, param: ServerParam) -> Result<Server, Error> {
        let param = Arc::new(param);
        let renderer = Arc::new(render::DeckRenderer::new(&param));

        let (reload_tx, reload_rx) = tokio::sync::watch::channel(0u64);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let app = Router::new()
            .route("/", get(service::serve_deck))
            .route("/reload", get(service::reload_handler))
            .route("/theme.css", get(service::serve_theme))
            .route("/_static/*path", get(service::serve_asset))
            .fallback(get(service::serve_static_file))
            .layer(Extension(Arc::clone(&param)))
            .layer(Extension(renderer))
            .layer(Extension(reload_rx))
            .layer(TraceLayer::new_for_http());

        // Bind through std first so an in-use port surfaces as an error
        // instead of a panic inside hyper.
        let listener = std::net::TcpListener::bind(addr).map_err(|source| Error::Bind {
            addr: *addr,
            source,
        })?;
        listener.set_nonblocking(true).map_err(|source| Error::Bind {
            addr: *addr,
            source,
        })?;

        let http_server = axum::Server::from_tcp(listener)
            .map_err(|err| Error::Bind {
                addr: *addr,
                source: std::io::Error::new(std::io::ErrorKind::Other, err),
            })?
            .serve(app.into_make_service());

        let addr = http_server.local_addr();
        info!("listening on {:?}", addr);

        let http_server = http_server.with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });

        tokio::spawn(http_server);

        // With watching enabled the watcher owns the sender; otherwise the
        // server keeps it so subscribed channels stay open (and simply idle).
        let (watcher, reload_tx) = if param.watch {
            (Some(watch::watch_file(&param.path, reload_tx)?), None)
        } else {
            (None, Some(reload_tx))
        };

        Ok(Server {
            addr,
            param,
            _watcher: watcher,
            _reload_tx: reload_tx,
            _shutdown_tx: shutdown_tx,
        })
    }

    /// Returns the socket address that the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the configuration this server was started with.
    pub fn param(&self) -> &ServerParam {
        &self.param
    }
}

impl fmt::Debug for Server {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Server")
            .field("addr", &self.addr)
            .field("param", &self.param)
            .field("watching", &self._watcher.is_some())
            .finish()
    }
}
