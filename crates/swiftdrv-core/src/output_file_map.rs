//! The declarative `(input, output-type) -> path` side table (§4.5).

use crate::error::DriverError;
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::path::Path;
use swiftdrv_common::{FileType, VirtualPath};

/// The key a whole-module (single-input-style) output is recorded under.
const SINGLE_INPUT_KEY: &str = "";

fn tag_for(file_type: FileType) -> &'static str {
    use FileType::*;
    match file_type {
        Swift => "swift",
        Object => "object",
        LlvmBitcode => "llvm-bc",
        Assembly => "assembly",
        Sil => "sil",
        RawSil => "raw-sil",
        Sib => "sib",
        RawSib => "raw-sib",
        LlvmIR => "llvm-ir",
        SwiftModule => "swiftmodule",
        SwiftDocumentation => "swiftdoc",
        SwiftSourceInfoFile => "swiftsourceinfo",
        SwiftInterface => "swiftinterface",
        PrivateSwiftInterface => "private-swiftinterface",
        Pch => "pch",
        Ast => "ast",
        Pcm => "pcm",
        ImportedModules => "importedmodules",
        IndexData => "index-data",
        Remap => "remap",
        Dependencies => "dependencies",
        Diagnostics => "diagnostics",
        ObjcHeader => "objc-header",
        ModuleTrace => "module-trace",
        Tbd => "tbd",
        YamlOptimizationRecord => "opt-record",
        BitstreamOptimizationRecord => "opt-record-bitstream",
        JsonDependencies => "json-dependencies",
        JsonClangDependencies => "json-clang-dependencies",
    }
}

fn file_type_for_tag(tag: &str) -> Option<FileType> {
    use FileType::*;
    [
        Swift, Object, LlvmBitcode, Assembly, Sil, RawSil, Sib, RawSib, LlvmIR, SwiftModule,
        SwiftDocumentation, SwiftSourceInfoFile, SwiftInterface, PrivateSwiftInterface, Pch, Ast,
        Pcm, ImportedModules, IndexData, Remap, Dependencies, Diagnostics, ObjcHeader, ModuleTrace,
        Tbd, YamlOptimizationRecord, BitstreamOptimizationRecord, JsonDependencies,
        JsonClangDependencies,
    ]
    .into_iter()
    .find(|ft| tag_for(*ft) == tag)
}

#[derive(Debug, Clone, Default)]
pub struct OutputFileMap {
    entries: FxHashMap<String, FxHashMap<FileType, VirtualPath>>,
}

impl OutputFileMap {
    pub fn from_json(raw: &str) -> Result<OutputFileMap, String> {
        let value: Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;
        let Value::Object(top) = value else {
            return Err("output file map must be a JSON object".to_string());
        };
        let mut entries = FxHashMap::default();
        for (input_key, outputs) in top {
            let Value::Object(outputs) = outputs else {
                return Err(format!("entry for '{}' must be a JSON object", input_key));
            };
            let mut by_type = FxHashMap::default();
            for (tag, path) in outputs {
                let Some(file_type) = file_type_for_tag(&tag) else {
                    continue;
                };
                let Value::String(path) = path else {
                    return Err(format!("path for '{}'/'{}' must be a string", input_key, tag));
                };
                by_type.insert(file_type, VirtualPath::from_string(path));
            }
            entries.insert(input_key, by_type);
        }
        Ok(OutputFileMap { entries })
    }

    pub fn load(path: &Path) -> Result<OutputFileMap, DriverError> {
        let raw = std::fs::read_to_string(path).map_err(|e| DriverError::UnableToLoadOutputFileMap {
            path: path.display().to_string(),
            detail: e.to_string(),
        })?;
        OutputFileMap::from_json(&raw).map_err(|detail| DriverError::UnableToLoadOutputFileMap {
            path: path.display().to_string(),
            detail,
        })
    }

    pub fn existing_output(&self, input: &str, output_type: FileType) -> Option<&VirtualPath> {
        self.entries.get(input)?.get(&output_type)
    }

    pub fn existing_output_for_single_input(&self, output_type: FileType) -> Option<&VirtualPath> {
        self.existing_output(SINGLE_INPUT_KEY, output_type)
    }

    /// Rebase every relative output path onto `relative_to`. Idempotent:
    /// a path already made absolute by a prior call is left untouched.
    pub fn resolve_relative_paths(&self, relative_to: &Path) -> OutputFileMap {
        let mut entries = FxHashMap::default();
        for (input, by_type) in &self.entries {
            let mut rebased = FxHashMap::default();
            for (file_type, path) in by_type {
                let new_path = match path {
                    VirtualPath::Relative(p) => VirtualPath::Absolute(relative_to.join(p)),
                    other => other.clone(),
                };
                rebased.insert(*file_type, new_path);
            }
            entries.insert(input.clone(), rebased);
        }
        OutputFileMap { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn loads_single_input_entry() {
        let json = r#"{"": {"object": "out/main.o", "swiftmodule": "out/main.swiftmodule"}}"#;
        let map = OutputFileMap::from_json(json).unwrap();
        assert_eq!(
            map.existing_output_for_single_input(FileType::Object),
            Some(&VirtualPath::Relative(PathBuf::from("out/main.o")))
        );
    }

    #[test]
    fn loads_per_input_entry() {
        let json = r#"{"a.swift": {"object": "a.o"}}"#;
        let map = OutputFileMap::from_json(json).unwrap();
        assert_eq!(
            map.existing_output("a.swift", FileType::Object),
            Some(&VirtualPath::Relative(PathBuf::from("a.o")))
        );
        assert_eq!(map.existing_output("a.swift", FileType::SwiftModule), None);
    }

    #[test]
    fn unrecognized_tags_are_skipped() {
        let json = r#"{"a.swift": {"not-a-real-tag": "x"}}"#;
        let map = OutputFileMap::from_json(json).unwrap();
        assert_eq!(map.existing_output("a.swift", FileType::Object), None);
    }

    #[test]
    fn resolve_relative_paths_rebases_and_is_idempotent() {
        let json = r#"{"": {"object": "out/main.o"}}"#;
        let map = OutputFileMap::from_json(json).unwrap();
        let base = PathBuf::from("/project");
        let once = map.resolve_relative_paths(&base);
        let twice = once.resolve_relative_paths(&base);
        let expected = VirtualPath::Absolute(PathBuf::from("/project/out/main.o"));
        assert_eq!(once.existing_output_for_single_input(FileType::Object), Some(&expected));
        assert_eq!(twice.existing_output_for_single_input(FileType::Object), Some(&expected));
    }

    #[test]
    fn non_object_top_level_is_an_error() {
        assert!(OutputFileMap::from_json("[]").is_err());
    }
}
