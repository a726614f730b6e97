//! Server configuration: the source file, theme, and presentation options.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::log::*;

use crate::assets;
use crate::Error;

/// Immutable configuration for one server run.
///
/// Constructed once at startup and never mutated afterwards; the server shares
/// it read-only with every request handler.
#[derive(Debug, Clone)]
pub struct ServerParam {
    /// The markdown file to present.
    pub path: PathBuf,

    /// The stylesheet used for the deck.
    pub theme: Theme,

    /// Address shown to the operator at startup (display only; the listen
    /// address is chosen by the caller of [`Server::bind`][crate::Server::bind]).
    pub host: String,

    /// Whether to watch `path` and push reloads to connected browsers.
    pub watch: bool,

    /// Options forwarded verbatim to the presentation engine.
    pub reveal_options: RevealOptions,
}

impl ServerParam {
    /// Creates a configuration for `path` with the default theme and options.
    pub fn new(path: impl Into<PathBuf>) -> ServerParam {
        ServerParam {
            path: path.into(),
            theme: Theme::default(),
            host: String::from("localhost"),
            watch: false,
            reveal_options: RevealOptions::default(),
        }
    }
}

/// The stylesheet that a rendered deck links to.
#[derive(Debug, Clone)]
pub enum Theme {
    /// One of the bundled theme stylesheets, by name.
    Bundled(String),

    /// A user-supplied CSS file, served from disk.
    Custom(PathBuf),
}

impl Theme {
    /// Resolves a bundled theme by name. A trailing `.css` extension is
    /// ignored. Unknown names fall back to the default theme so the tool
    /// stays usable with a typoed name; the fallback is logged.
    pub fn bundled(name: &str) -> Theme {
        let name = name.strip_suffix(".css").unwrap_or(name);

        if assets::theme_exists(name) {
            Theme::Bundled(name.to_owned())
        } else {
            warn!(
                "no bundled theme named `{}`, falling back to `{}`",
                name,
                assets::DEFAULT_THEME
            );
            Theme::Bundled(assets::DEFAULT_THEME.to_owned())
        }
    }

    /// Uses a stylesheet from the filesystem.
    ///
    /// The file must be readable now: a bad explicit theme path is a startup
    /// error, unlike an unknown bundled name.
    pub fn custom(path: impl Into<PathBuf>) -> Result<Theme, Error> {
        let path = path.into();

        fs::metadata(&path)
            .and_then(|meta| {
                if meta.is_file() {
                    Ok(())
                } else {
                    Err(io_not_a_file())
                }
            })
            .map_err(|source| Error::Theme {
                path: path.clone(),
                source,
            })?;

        Ok(Theme::Custom(path))
    }

    /// The href the rendered document links the stylesheet under.
    pub(crate) fn href(&self) -> String {
        match self {
            Theme::Bundled(name) => format!("/_static/css/theme/{}.css", name),
            Theme::Custom(_) => String::from("/theme.css"),
        }
    }

    /// The on-disk stylesheet path, for custom themes only.
    pub(crate) fn custom_path(&self) -> Option<&Path> {
        match self {
            Theme::Custom(path) => Some(path),
            Theme::Bundled(_) => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Bundled(assets::DEFAULT_THEME.to_owned())
    }
}

fn io_not_a_file() -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file")
}

/// Option names the presentation engine understands.
///
/// Keys outside this set are rejected rather than silently forwarded, so a
/// typo fails at startup instead of being ignored by the browser.
const KNOWN_OPTIONS: &[&str] = &[
    "transition",
    "transitionSpeed",
    "controls",
    "progress",
    "history",
    "center",
    "loop",
    "slideNumber",
    "hash",
    "autoSlide",
];

/// An ordered mapping of presentation-engine option name to literal value.
///
/// Values are JavaScript expressions passed through verbatim into the engine's
/// initialization script; a string value must carry its own quotes, e.g.
/// `'fade'`. The caller is trusted, since this is a local preview tool.
#[derive(Debug, Clone)]
pub struct RevealOptions(Vec<(String, String)>);

impl RevealOptions {
    /// An empty option set.
    pub fn new() -> RevealOptions {
        RevealOptions(Vec::new())
    }

    /// Sets `key` to the literal `value`, replacing any earlier value.
    ///
    /// Fails with [`Error::UnknownOption`] if `key` is not a known engine
    /// option.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<(), Error> {
        if !KNOWN_OPTIONS.contains(&key) {
            return Err(Error::UnknownOption(key.to_owned()));
        }

        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key.to_owned(), value)),
        }

        Ok(())
    }

    /// Serializes the options as the body of a JavaScript object literal,
    /// one `key: value` pair per line, preserving insertion order.
    pub(crate) fn to_init_js(&self) -> String {
        self.0
            .iter()
            .map(|(key, value)| format!("        {}: {}", key, value))
            .collect::<Vec<_>>()
            .join(",\n")
    }
}

impl Default for RevealOptions {
    /// The default options: a `'default'` slide transition.
    fn default() -> Self {
        let mut options = RevealOptions::new();
        options
            .set("transition", "'default'")
            .expect("transition is a known option");
        options
    }
}
