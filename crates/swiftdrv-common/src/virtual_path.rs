//! Logical path values manipulated by the driver.
//!
//! A [`VirtualPath`] never touches the filesystem on its own; it is a tagged
//! value describing *where a path logically lives* (already on disk,
//! relative to a working directory not yet known, or materialized later by
//! the executor). Resolving it to a real [`std::path::Path`] is a separate,
//! explicit step.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A path value tagged with how it should be interpreted by the rest of the
/// pipeline. `StandardInput`/`StandardOutput` never carry a path at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VirtualPath {
    /// An absolute, already-resolved path.
    Absolute(PathBuf),
    /// A path relative to some working directory, not yet rebased.
    Relative(PathBuf),
    /// A relative path whose real location is allocated by the executor at
    /// job-run time (e.g. inside a scratch directory).
    Temporary(PathBuf),
    /// A temporary path the planner has already decided the contents of;
    /// the executor still owns materializing it on disk.
    TemporaryWithKnownContents(PathBuf, Vec<u8>),
    /// A file containing a newline-separated list of other paths (used for
    /// filelist-style job inputs).
    FileList(PathBuf, Vec<String>),
    /// The process's standard input stream.
    StandardInput,
    /// The process's standard output stream.
    StandardOutput,
}

/// Stable wire form of [`VirtualPath`]; bumping `version` is how a future
/// reader can detect an incompatible payload shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodedVirtualPath {
    pub version: u32,
    pub path: VirtualPath,
}

const ENCODING_VERSION: u32 = 1;

impl VirtualPath {
    /// Construct a path value from a user-facing string: absolute if the
    /// string parses as an absolute path, relative otherwise.
    pub fn from_string(s: impl AsRef<str>) -> VirtualPath {
        let path = PathBuf::from(s.as_ref());
        if path.is_absolute() {
            VirtualPath::Absolute(path)
        } else {
            VirtualPath::Relative(path)
        }
    }

    pub fn temporary(relative: impl Into<PathBuf>) -> VirtualPath {
        VirtualPath::Temporary(relative.into())
    }

    /// The path string backing this value, or `None` for the standard
    /// streams, which have no path.
    pub fn raw_path(&self) -> Option<&Path> {
        match self {
            VirtualPath::Absolute(p)
            | VirtualPath::Relative(p)
            | VirtualPath::Temporary(p)
            | VirtualPath::TemporaryWithKnownContents(p, _)
            | VirtualPath::FileList(p, _) => Some(p),
            VirtualPath::StandardInput | VirtualPath::StandardOutput => None,
        }
    }

    pub fn is_temporary(&self) -> bool {
        matches!(
            self,
            VirtualPath::Temporary(_) | VirtualPath::TemporaryWithKnownContents(_, _)
        )
    }

    pub fn extension(&self) -> Option<String> {
        self.raw_path()?
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
    }

    pub fn basename_without_ext(&self) -> Option<String> {
        self.raw_path()?
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
    }

    pub fn parent_directory(&self) -> Option<VirtualPath> {
        let parent = self.raw_path()?.parent()?;
        Some(match self {
            VirtualPath::Absolute(_) => VirtualPath::Absolute(parent.to_path_buf()),
            _ => VirtualPath::Relative(parent.to_path_buf()),
        })
    }

    /// The path string for display/command-line use. Programmer error to
    /// call this on a standard stream.
    pub fn path_string(&self) -> String {
        self.raw_path()
            .unwrap_or_else(|| panic!("VirtualPath::path_string on a standard stream"))
            .to_string_lossy()
            .into_owned()
    }

    /// Resolve to a concrete absolute path given a base directory to anchor
    /// relative paths against. Temporaries resolve to their relative form;
    /// the executor is responsible for the real materialization.
    pub fn absolute_path(&self, relative_to: &Path) -> Option<PathBuf> {
        match self {
            VirtualPath::Absolute(p) => Some(p.clone()),
            VirtualPath::Relative(p) | VirtualPath::Temporary(p) => Some(relative_to.join(p)),
            VirtualPath::TemporaryWithKnownContents(p, _) | VirtualPath::FileList(p, _) => {
                Some(relative_to.join(p))
            }
            VirtualPath::StandardInput | VirtualPath::StandardOutput => None,
        }
    }

    /// Append a literal path component. A programmer error on the standard
    /// streams, which have no directory to append into.
    pub fn appending(&self, component: &str) -> VirtualPath {
        match self {
            VirtualPath::Absolute(p) => VirtualPath::Absolute(p.join(component)),
            VirtualPath::Relative(p) => VirtualPath::Relative(p.join(component)),
            VirtualPath::Temporary(p) => VirtualPath::Temporary(p.join(component)),
            VirtualPath::TemporaryWithKnownContents(p, bytes) => {
                VirtualPath::TemporaryWithKnownContents(p.join(component), bytes.clone())
            }
            VirtualPath::FileList(p, contents) => {
                VirtualPath::FileList(p.join(component), contents.clone())
            }
            VirtualPath::StandardInput | VirtualPath::StandardOutput => {
                panic!("cannot append a component to a standard stream")
            }
        }
    }

    /// Replace the extension with the canonical extension for `file_type`,
    /// preserving the path's tag (absolute stays absolute, etc.).
    pub fn with_extension(&self, file_type: FileType) -> VirtualPath {
        let new_ext = file_type.extension();
        let rebuild = |p: &Path| -> PathBuf {
            let mut owned = p.to_path_buf();
            if new_ext.is_empty() {
                owned.set_extension("");
            } else {
                owned.set_extension(new_ext);
            }
            owned
        };
        match self {
            VirtualPath::Absolute(p) => VirtualPath::Absolute(rebuild(p)),
            VirtualPath::Relative(p) => VirtualPath::Relative(rebuild(p)),
            VirtualPath::Temporary(p) => VirtualPath::Temporary(rebuild(p)),
            VirtualPath::TemporaryWithKnownContents(p, bytes) => {
                VirtualPath::TemporaryWithKnownContents(rebuild(p), bytes.clone())
            }
            VirtualPath::FileList(p, contents) => {
                VirtualPath::FileList(rebuild(p), contents.clone())
            }
            VirtualPath::StandardInput | VirtualPath::StandardOutput => self.clone(),
        }
    }

    pub fn encode(&self) -> EncodedVirtualPath {
        EncodedVirtualPath {
            version: ENCODING_VERSION,
            path: self.clone(),
        }
    }

    pub fn decode(encoded: &EncodedVirtualPath) -> Option<VirtualPath> {
        if encoded.version != ENCODING_VERSION {
            return None;
        }
        Some(encoded.path.clone())
    }
}

/// A [`VirtualPath`] paired with the [`FileType`] it is understood to hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypedVirtualPath {
    pub file: VirtualPath,
    pub file_type: FileType,
}

impl TypedVirtualPath {
    pub fn new(file: VirtualPath, file_type: FileType) -> Self {
        Self { file, file_type }
    }
}

/// Every artifact kind the driver plans a path for, whether a compiler
/// input, a primary output, or a side-band supplementary output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileType {
    Swift,
    Object,
    LlvmBitcode,
    Assembly,
    Sil,
    RawSil,
    Sib,
    RawSib,
    LlvmIR,
    SwiftModule,
    SwiftDocumentation,
    SwiftSourceInfoFile,
    SwiftInterface,
    PrivateSwiftInterface,
    Pch,
    Ast,
    Pcm,
    ImportedModules,
    IndexData,
    Remap,
    Dependencies,
    Diagnostics,
    ObjcHeader,
    ModuleTrace,
    Tbd,
    YamlOptimizationRecord,
    BitstreamOptimizationRecord,
    JsonDependencies,
    JsonClangDependencies,
}

impl FileType {
    /// The canonical filename extension for this type, without a leading
    /// dot. A handful of types (e.g. `ImportedModules`) have no natural
    /// on-disk extension and return an empty string.
    pub fn extension(self) -> &'static str {
        use FileType::*;
        match self {
            Swift => "swift",
            Object => "o",
            LlvmBitcode => "bc",
            Assembly => "s",
            Sil => "sil",
            RawSil => "sil",
            Sib => "sib",
            RawSib => "sib",
            LlvmIR => "ll",
            SwiftModule => "swiftmodule",
            SwiftDocumentation => "swiftdoc",
            SwiftSourceInfoFile => "swiftsourceinfo",
            SwiftInterface => "swiftinterface",
            PrivateSwiftInterface => "private.swiftinterface",
            Pch => "pch",
            Ast => "ast",
            Pcm => "pcm",
            ImportedModules => "importedmodules",
            IndexData => "",
            Remap => "remap",
            Dependencies => "d",
            Diagnostics => "dia",
            ObjcHeader => "h",
            ModuleTrace => "trace.json",
            Tbd => "tbd",
            YamlOptimizationRecord => "opt.yaml",
            BitstreamOptimizationRecord => "opt.bitstream",
            JsonDependencies => "json",
            JsonClangDependencies => "json",
        }
    }

    /// Classify a positional input by its extension; unrecognized
    /// extensions are treated as opaque object-like inputs (e.g. an
    /// already-built `.o` intended for the link step, or an archive).
    pub fn from_extension(ext: &str) -> FileType {
        match ext {
            "swift" => FileType::Swift,
            "o" => FileType::Object,
            "bc" => FileType::LlvmBitcode,
            "s" | "asm" => FileType::Assembly,
            "sil" => FileType::Sil,
            "sib" => FileType::Sib,
            "ll" => FileType::LlvmIR,
            "swiftmodule" => FileType::SwiftModule,
            "swiftdoc" => FileType::SwiftDocumentation,
            "swiftsourceinfo" => FileType::SwiftSourceInfoFile,
            "swiftinterface" => FileType::SwiftInterface,
            "pch" => FileType::Pch,
            "ast" => FileType::Ast,
            "pcm" => FileType::Pcm,
            _ => FileType::Object,
        }
    }

    pub fn is_source(self) -> bool {
        matches!(self, FileType::Swift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_classifies_absolute_vs_relative() {
        assert_eq!(
            VirtualPath::from_string("/tmp/a.swift"),
            VirtualPath::Absolute(PathBuf::from("/tmp/a.swift"))
        );
        assert_eq!(
            VirtualPath::from_string("a.swift"),
            VirtualPath::Relative(PathBuf::from("a.swift"))
        );
    }

    #[test]
    fn standard_streams_have_no_raw_path() {
        assert_eq!(VirtualPath::StandardInput.raw_path(), None);
        assert_eq!(VirtualPath::StandardOutput.raw_path(), None);
        assert_eq!(VirtualPath::StandardInput.extension(), None);
    }

    #[test]
    #[should_panic]
    fn appending_to_stdin_panics() {
        let _ = VirtualPath::StandardInput.appending("foo");
    }

    #[test]
    fn with_extension_preserves_tag() {
        let p = VirtualPath::Relative(PathBuf::from("foo.swift"));
        let rewritten = p.with_extension(FileType::SwiftModule);
        assert_eq!(
            rewritten,
            VirtualPath::Relative(PathBuf::from("foo.swiftmodule"))
        );
    }

    #[test]
    fn temporary_stays_relative_even_when_materialized_absolute() {
        let t = VirtualPath::temporary("sources-abc123/main.o");
        assert!(t.is_temporary());
        assert!(matches!(t, VirtualPath::Temporary(ref p) if p.is_relative()));
    }

    #[test]
    fn encode_decode_round_trips_every_case() {
        let cases = vec![
            VirtualPath::Absolute(PathBuf::from("/a/b.swift")),
            VirtualPath::Relative(PathBuf::from("b.swift")),
            VirtualPath::Temporary(PathBuf::from("tmp-x")),
            VirtualPath::TemporaryWithKnownContents(PathBuf::from("tmp-y"), vec![1, 2, 3]),
            VirtualPath::FileList(PathBuf::from("list.txt"), vec!["a".into(), "b".into()]),
            VirtualPath::StandardInput,
            VirtualPath::StandardOutput,
        ];
        for case in cases {
            let encoded = case.encode();
            let json = serde_json::to_string(&encoded).unwrap();
            let decoded: EncodedVirtualPath = serde_json::from_str(&json).unwrap();
            assert_eq!(VirtualPath::decode(&decoded), Some(case));
        }
    }

    #[test]
    fn file_type_from_extension_defaults_to_object() {
        assert_eq!(FileType::from_extension("swift"), FileType::Swift);
        assert_eq!(FileType::from_extension("a"), FileType::Object);
        assert_eq!(FileType::from_extension("dylib"), FileType::Object);
    }
}
