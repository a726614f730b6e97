//! Watches the source file and pushes reload notifications.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_full::{new_debouncer, DebounceEventResult, Debouncer, FileIdMap};
use tokio::sync::watch::Sender;
use tracing::log::*;

use crate::Error;

/// Burst edits within this window coalesce into a single reload.
pub(crate) const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

pub(crate) type FileWatcher = Debouncer<RecommendedWatcher, FileIdMap>;

/// Starts watching `path` for content changes; each detected change bumps the
/// generation counter on `reload_tx`, waking every subscribed reload channel.
///
/// The parent directory is watched rather than the file itself: most editors
/// save via an atomic rename, which replaces the watched inode. Events are
/// filtered back down to the one file by name. Watch errors after startup are
/// logged and the watcher keeps running; a transiently missing file simply
/// produces no notification until it reappears and changes again.
///
/// The returned handle owns the watch; dropping it stops the watcher.
pub(crate) fn watch_file(path: &Path, reload_tx: Sender<u64>) -> Result<FileWatcher, Error> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    // The directory has to exist to be watched; the file itself may not, yet.
    let dir = dir.canonicalize()?;

    let file_name: OsString = match path.file_name() {
        Some(name) => name.to_owned(),
        None => {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} has no file name to watch", path.display()),
            )))
        }
    };

    let watched = file_name.clone();
    let mut generation = 0u64;
    let mut last_notified: Option<Instant> = None;
    let mut debouncer = new_debouncer(
        DEBOUNCE_WINDOW,
        None,
        move |result: DebounceEventResult| match result {
            Ok(events) => {
                let changed = events.iter().any(|event| {
                    (event.kind.is_create() || event.kind.is_modify())
                        && event
                            .paths
                            .iter()
                            .any(|p| p.file_name() == Some(watched.as_os_str()))
                });

                // The debouncer can split one burst of writes across two
                // callbacks when the burst straddles its tick; a second
                // notification inside the window would defeat the coalescing,
                // so rate-limit the sends ourselves.
                let quiesced = last_notified.map_or(true, |at| at.elapsed() >= DEBOUNCE_WINDOW);

                if changed && quiesced {
                    generation += 1;
                    last_notified = Some(Instant::now());
                    debug!("file changed, broadcasting reload #{}", generation);
                    // Fails only when the server (and thus every listener) is
                    // already gone.
                    let _ = reload_tx.send(generation);
                } else if changed {
                    debug!("change within the debounce window, already notified");
                }
            }
            Err(errors) => {
                for err in errors {
                    warn!("watch error (will keep watching): {}", err);
                }
            }
        },
    )?;

    debouncer.watcher().watch(&dir, RecursiveMode::NonRecursive)?;
    info!("watching {} for changes", dir.join(&file_name).display());

    Ok(debouncer)
}
