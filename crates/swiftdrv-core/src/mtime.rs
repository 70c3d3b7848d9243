//! Recorded Input Modification Snapshot (§C12): captures each input's
//! mtime once, at construction, so the build record observes a consistent
//! view even if inputs change mid-build.

use rustc_hash::FxHashMap;
use std::path::Path;
use std::time::SystemTime;
use swiftdrv_common::{TypedVirtualPath, VirtualPath};

pub type RecordedInputModificationDates = FxHashMap<VirtualPath, SystemTime>;

/// Reads `mtime` for every input whose path resolves to a real file.
/// Inputs with no on-disk counterpart (stdin, a temporary not yet
/// materialized) are silently skipped, matching invariant 6.
pub fn snapshot(inputs: &[TypedVirtualPath]) -> RecordedInputModificationDates {
    let mut dates = FxHashMap::default();
    for input in inputs {
        let path: &Path = match &input.file {
            VirtualPath::Absolute(p) | VirtualPath::Relative(p) | VirtualPath::Temporary(p) => p.as_path(),
            VirtualPath::StandardInput | VirtualPath::StandardOutput => continue,
            VirtualPath::FileList(p, _) => p.as_path(),
            VirtualPath::TemporaryWithKnownContents(p, _) => p.as_path(),
        };
        if let Ok(metadata) = std::fs::metadata(path) {
            if let Ok(modified) = metadata.modified() {
                dates.insert(input.file.clone(), modified);
            }
        }
    }
    dates
}
