//! Bundled static assets: the presentation engine and its theme stylesheets.

use include_dir::{include_dir, Dir, File};

static STATIC_FILES: Dir = include_dir!("$CARGO_MANIFEST_DIR/static");

/// The theme used when an unknown theme name is requested.
pub const DEFAULT_THEME: &str = "black";

/// Looks up a bundled asset by its path relative to the static root, e.g.
/// `js/deck.js` or `css/theme/moon.css`.
pub(crate) fn bundled(path: &str) -> Option<&'static File<'static>> {
    STATIC_FILES.get_file(path)
}

/// Returns `true` if a theme stylesheet with the given name is bundled.
pub(crate) fn theme_exists(name: &str) -> bool {
    bundled(&format!("css/theme/{}.css", name)).is_some()
}
