//! Library traversal and recording discovery
//!
//! A recording is importable when a video file sits next to both of its
//! sidecars: `<name>.episode.json` and `<name>.storage.json`. The walk is
//! materialized into a list before any processing, so archival moves never
//! perturb it. Nothing is special-cased: the catalog database and stray files
//! have no sidecars and fall out naturally, and the recycle tree holds only
//! `.json` files, which the suffix filter skips.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::error::Result;

/// Suffix of every metadata sidecar; files carrying it are never videos.
pub const METADATA_SUFFIX: &str = ".json";

/// Episode sidecar suffix, appended to the full video file name.
pub const EPISODE_SIDECAR_SUFFIX: &str = ".episode.json";

/// Storage sidecar suffix, appended to the full video file name.
pub const STORAGE_SIDECAR_SUFFIX: &str = ".storage.json";

/// A video file together with its two metadata sidecars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingTriple {
    pub video: PathBuf,
    pub episode_sidecar: PathBuf,
    pub storage_sidecar: PathBuf,
}

/// Append a sidecar suffix to the video's file name.
fn sidecar_path(video: &Path, suffix: &str) -> PathBuf {
    let mut name = video
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(suffix);
    video.with_file_name(name)
}

/// Walk the library and collect every complete recording triple, in natural
/// directory-tree order.
pub fn discover(root: &Path) -> Result<Vec<RecordingTriple>> {
    let mut triples = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.ends_with(METADATA_SUFFIX) {
            continue;
        }
        let episode_sidecar = sidecar_path(entry.path(), EPISODE_SIDECAR_SUFFIX);
        let storage_sidecar = sidecar_path(entry.path(), STORAGE_SIDECAR_SUFFIX);
        if episode_sidecar.is_file() && storage_sidecar.is_file() {
            trace!(video = %entry.path().display(), "Found recording triple");
            triples.push(RecordingTriple {
                video: entry.path().to_path_buf(),
                episode_sidecar,
                storage_sidecar,
            });
        }
    }
    debug!(count = triples.len(), root = %root.display(), "Library walk complete");
    Ok(triples)
}
