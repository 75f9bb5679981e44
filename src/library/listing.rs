use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::config::LibrarySettings;

/// One entry of a directory listing, as reported by a [`DirectoryLister`].
#[derive(Clone, Debug)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
    /// File size in bytes; `None` for directories.
    pub size: Option<u64>,
}

/// Listing seam between the tree model and storage.
///
/// A listing is all-or-nothing: implementations return the complete set of
/// immediate children or an error, never a partial list.
pub trait DirectoryLister {
    fn list(&self, path: &Path) -> io::Result<Vec<DirEntry>>;
}

/// Production lister: one directory level via `walkdir`.
pub struct WalkdirLister {
    follow_links: bool,
    include_hidden: bool,
}

impl WalkdirLister {
    pub fn new(settings: &LibrarySettings) -> Self {
        Self {
            follow_links: settings.follow_links,
            include_hidden: settings.include_hidden,
        }
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

impl DirectoryLister for WalkdirLister {
    fn list(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();

        for entry in WalkDir::new(path)
            .follow_links(self.follow_links)
            .min_depth(1)
            .max_depth(1)
        {
            let entry = entry.map_err(|error| {
                error
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("directory walk was interrupted"))
            })?;

            // Entries with non-UTF-8 names cannot be displayed; skip them.
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if !self.include_hidden && is_hidden(name) {
                continue;
            }

            let file_type = entry.file_type();
            let size = if file_type.is_file() {
                entry.metadata().ok().map(|meta| meta.len())
            } else {
                None
            };

            entries.push(DirEntry {
                name: name.to_string(),
                is_dir: file_type.is_dir(),
                size,
            });
        }

        Ok(entries)
    }
}

/// Pure predicate deciding whether an entry name is an audio track, driven by
/// the configured extension allow-list.
#[derive(Clone, Debug)]
pub struct TrackClassifier {
    extensions: Vec<String>,
}

impl TrackClassifier {
    pub fn new(settings: &LibrarySettings) -> Self {
        let extensions = settings
            .extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();

        Self { extensions }
    }

    pub fn is_track(&self, name: &str) -> bool {
        Path::new(name)
            .extension()
            .and_then(|s| s.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|e| e == &ext)
            })
            .unwrap_or(false)
    }
}
