//! On-demand track metadata probing via `lofty`.
//!
//! Probing is best-effort: an unreadable or tagless file degrades to "all
//! fields unknown", never to an error, so a broken track cannot take the
//! browser down.

use std::path::Path;
use std::time::Duration;

use lofty::prelude::{AudioFile, ItemKey, TaggedFileExt};

/// Metadata read from a track's tags and stream properties.
#[derive(Clone, Debug, Default)]
pub struct ProbedTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: Option<Duration>,
}

/// Read just the playing time of a track.
pub fn probe_duration(path: &Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
}

/// Read tags and duration for the metadata popup.
pub fn probe(path: &Path) -> ProbedTags {
    let Ok(tagged) = lofty::read_from_path(path) else {
        return ProbedTags::default();
    };

    let mut tags = ProbedTags {
        duration: Some(tagged.properties().duration()),
        ..ProbedTags::default()
    };

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        if let Some(v) = tag.get_string(&ItemKey::TrackTitle) {
            let v = v.trim();
            if !v.is_empty() {
                tags.title = Some(v.to_string());
            }
        }
        if let Some(v) = tag.get_string(&ItemKey::TrackArtist) {
            let v = v.trim();
            if !v.is_empty() {
                tags.artist = Some(v.to_string());
            }
        }
        if let Some(v) = tag.get_string(&ItemKey::AlbumTitle) {
            let v = v.trim();
            if !v.is_empty() {
                tags.album = Some(v.to_string());
            }
        }
    }

    tags
}
