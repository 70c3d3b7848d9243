//! Classifies positional arguments into typed virtual paths (§4.4).

use swiftdrv_common::{FileType, TypedVirtualPath, VirtualPath};

/// Classify every positional argument. `-` becomes standard input typed as
/// `swift`; everything else is classified by extension, defaulting to
/// `object` for anything unrecognized. Relative inputs stay relative; any
/// rebasing against a working directory happens later.
pub fn collect_inputs(positional: &[String]) -> Vec<TypedVirtualPath> {
    positional
        .iter()
        .map(|raw| {
            if raw == "-" {
                return TypedVirtualPath::new(VirtualPath::StandardInput, FileType::Swift);
            }
            let path = VirtualPath::from_string(raw);
            let file_type = path
                .extension()
                .map(|ext| FileType::from_extension(&ext))
                .unwrap_or(FileType::Object);
            TypedVirtualPath::new(path, file_type)
        })
        .collect()
}
