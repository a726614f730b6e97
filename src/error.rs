//! Error types.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while configuring or starting the server.
///
/// Per-request failures (unreadable markdown, missing assets) never surface
/// here; they are turned into HTTP error responses by the request handlers.
#[derive(Debug, Error)]
pub enum Error {
    /// The listen address could not be bound, usually because the port is
    /// already in use. Fatal: the server does not hunt for another port.
    #[error("failed to bind {addr}")]
    Bind {
        /// The address that could not be bound.
        addr: SocketAddr,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// A user-supplied theme stylesheet could not be read at startup.
    #[error("failed to read theme stylesheet {}", path.display())]
    Theme {
        /// The path of the stylesheet.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// A presentation-engine option name outside the known option set.
    #[error("unknown presentation option `{0}`")]
    UnknownOption(String),

    /// The file watcher could not be started.
    #[error("failed to watch file for changes")]
    Watch(#[from] notify::Error),

    /// Any other I/O error during startup.
    #[error(transparent)]
    Io(#[from] io::Error),
}
