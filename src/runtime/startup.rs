use std::env;
use std::path::PathBuf;

use crate::app::App;
use crate::config;

/// Resolve the library root: command-line argument, then configured root,
/// then the current directory.
pub fn resolve_root(settings: &config::Settings) -> PathBuf {
    match env::args().nth(1) {
        Some(dir) => PathBuf::from(dir),
        None => settings
            .library
            .root
            .clone()
            .unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from("."))),
    }
}

/// Build the app model and perform the initial root listing.
pub fn build_app(settings: &config::Settings) -> App {
    let root = resolve_root(settings);
    tracing::info!(root = %root.display(), "opening library");

    let mut app = App::new(root, &settings.library);
    app.load_root();
    app
}
