//! Application model types: `App` and the popup payload `TrackDetails`.
//!
//! `App` is the explicitly-owned application context: it holds the library
//! tree, the listing collaborator and the classifier, plus the status and
//! redraw state the UI reads each frame. Rendering never mutates it.

use std::path::{Path, PathBuf};

use crate::config::LibrarySettings;
use crate::library::probe::{self, ProbedTags};
use crate::library::{
    FocusDirection, LibraryTree, NodeId, TrackClassifier, TreeError, WalkdirLister,
};

/// Details shown in the metadata popup for one track.
pub struct TrackDetails {
    pub name: String,
    pub path: PathBuf,
    pub size: Option<u64>,
    pub tags: ProbedTags,
}

/// The main application model.
pub struct App {
    pub tree: LibraryTree,
    lister: WalkdirLister,
    classifier: TrackClassifier,

    root: PathBuf,
    /// Last model error, shown in the status box; `None` renders as
    /// "No errors".
    pub last_error: Option<String>,
    /// Track most recently handed off for playback.
    pub now_playing: Option<NodeId>,
    pub metadata_window: bool,
    pub metadata: Option<TrackDetails>,
    redraw: bool,
}

impl App {
    /// Build the model for `root`. No I/O happens here; the first listing is
    /// requested by [`load_root`](Self::load_root).
    pub fn new(root: impl Into<PathBuf>, settings: &LibrarySettings) -> Self {
        let root = root.into();
        Self {
            tree: LibraryTree::new(&root),
            lister: WalkdirLister::new(settings),
            classifier: TrackClassifier::new(settings),
            root,
            last_error: None,
            now_playing: None,
            metadata_window: false,
            metadata: None,
            redraw: true,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List the library root and focus the first visible row. A failure ends
    /// up in the status box; the refresh key retries.
    pub fn load_root(&mut self) {
        let root = self.tree.root_id().clone();
        if let Err(error) = self.tree.ensure_loaded(&root, &self.lister, &self.classifier) {
            self.report(error);
        }
        if self.tree.focused().is_none() {
            self.tree.move_focus(FocusDirection::Down);
        }
        self.mark_redraw();
    }

    /// Rebuild the tree from the configured root, dropping all loaded state.
    /// This is the only way a loaded directory becomes unloaded again.
    pub fn refresh(&mut self) {
        tracing::info!(root = %self.root.display(), "rebuilding library tree");
        self.tree = LibraryTree::new(&self.root);
        self.last_error = None;
        self.now_playing = None;
        self.close_metadata_window();
        self.load_root();
    }

    pub fn move_up(&mut self) {
        self.tree.move_focus(FocusDirection::Up);
        self.mark_redraw();
    }

    pub fn move_down(&mut self) {
        self.tree.move_focus(FocusDirection::Down);
        self.mark_redraw();
    }

    pub fn focus_first(&mut self) {
        if let Some(row) = self.tree.flatten().next() {
            let _ = self.tree.set_focus(&row.id);
            self.mark_redraw();
        }
    }

    pub fn focus_last(&mut self) {
        if let Some(row) = self.tree.flatten().last() {
            let _ = self.tree.set_focus(&row.id);
            self.mark_redraw();
        }
    }

    /// Expand/collapse the focused directory, or hand a focused track off as
    /// the selection.
    pub fn activate_focused(&mut self) {
        let Some(node) = self.tree.focused_node() else {
            return;
        };
        if node.is_track() {
            self.select_track();
        } else {
            self.toggle_focused();
        }
    }

    /// Toggle expansion of the focused node. A track reports
    /// `NotExpandable`, which lands in the status box like any other model
    /// error.
    pub fn toggle_focused(&mut self) {
        let Some(id) = self.tree.focused().cloned() else {
            return;
        };
        match self.tree.toggle_expand(&id, &self.lister, &self.classifier) {
            Ok(_) => self.clear_error(),
            Err(error) => self.report(error),
        }
        self.mark_redraw();
    }

    /// Collapse the focused directory, or move focus to the parent when
    /// there is nothing to collapse.
    pub fn collapse_or_parent(&mut self) {
        let Some(node) = self.tree.focused_node() else {
            return;
        };
        let expanded_dir = node.directory().is_some_and(|state| state.expanded);
        let parent = node.parent.clone();
        let id = node.id.clone();

        if expanded_dir {
            match self.tree.toggle_expand(&id, &self.lister, &self.classifier) {
                Ok(_) => self.clear_error(),
                Err(error) => self.report(error),
            }
        } else if let Some(parent) = parent {
            if self.tree.is_visible(&parent) {
                let _ = self.tree.set_focus(&parent);
            }
        }
        self.mark_redraw();
    }

    /// Expand the focused directory when it is collapsed; otherwise a no-op.
    pub fn expand_focused(&mut self) {
        let Some(node) = self.tree.focused_node() else {
            return;
        };
        if node.directory().is_some_and(|state| !state.expanded) {
            self.toggle_focused();
        }
    }

    /// Record the focused track as the playback hand-off, probing its
    /// duration on first selection so the status line can show it.
    pub fn select_track(&mut self) {
        let Some(track) = self.tree.selected_track() else {
            return;
        };
        let id = track.id.clone();
        let known = track.track_meta().and_then(|meta| meta.duration);

        if known.is_none() {
            if let Some(duration) = probe::probe_duration(id.as_path()) {
                self.tree.set_track_duration(&id, duration);
            }
        }

        tracing::info!(track = %id, "track selected for playback");
        self.now_playing = Some(id);
        self.mark_redraw();
    }

    /// Toggle the metadata popup for the focused track. Directories have no
    /// metadata to show, so the popup simply stays closed for them.
    pub fn toggle_metadata_window(&mut self) {
        if self.metadata_window {
            self.close_metadata_window();
            self.mark_redraw();
            return;
        }

        let Some(track) = self.tree.selected_track() else {
            return;
        };
        let id = track.id.clone();
        let name = track.name.clone();
        let size = track.track_meta().and_then(|meta| meta.size);

        let tags = probe::probe(id.as_path());
        if let Some(duration) = tags.duration {
            self.tree.set_track_duration(&id, duration);
        }

        self.metadata = Some(TrackDetails {
            name,
            path: id.as_path().to_path_buf(),
            size,
            tags,
        });
        self.metadata_window = true;
        self.mark_redraw();
    }

    fn close_metadata_window(&mut self) {
        self.metadata_window = false;
        self.metadata = None;
    }

    /// Record a model error for the status box and the log.
    fn report(&mut self, error: TreeError) {
        tracing::warn!(%error, "library operation failed");
        self.last_error = Some(error.to_string());
    }

    fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Flag that the model changed and the next loop iteration must redraw.
    pub fn mark_redraw(&mut self) {
        self.redraw = true;
    }

    pub fn clear_redraw(&mut self) {
        self.redraw = false;
    }

    pub fn needs_redraw(&self) -> bool {
        self.redraw
    }
}
