use crate::model::Track;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac", "wav", "ogg", "m4a", "aac", "opus"];

pub fn scan_folder(root: &Path) -> Vec<Track> {
    let mut tracks: Vec<Track> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file() && is_audio(entry.path()))
        .map(|entry| Track::from_path(entry.path()))
        .collect();

    tracks.sort_by(|a, b| a.path.cmp(&b.path));
    debug!(root = %root.display(), found = tracks.len(), "scanned folder");
    tracks
}

/// Collects tracks from a mix of folders and single files, keeping the order
/// the roots were given in. Duplicate paths keep their first position.
pub fn scan_many(roots: &[PathBuf]) -> Vec<Track> {
    let mut all: Vec<Track> = Vec::new();
    for root in roots {
        let found = if root.is_file() {
            is_audio(root)
                .then(|| Track::from_path(root))
                .into_iter()
                .collect()
        } else {
            scan_folder(root)
        };
        for track in found {
            if !all.iter().any(|known| known.path == track.path) {
                all.push(track);
            }
        }
    }
    all
}

fn is_audio(path: &Path) -> bool {
    let ext = path.extension().and_then(OsStr::to_str).unwrap_or_default();
    AUDIO_EXTENSIONS
        .iter()
        .any(|supported| ext.eq_ignore_ascii_case(supported))
}
