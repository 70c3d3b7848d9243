//! Parsing the frontend's `-print-target-info` JSON output.

use crate::error::ToolchainError;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct TripleInfo {
    pub triple: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FrontendTargetInfo {
    pub target: TripleInfo,
    #[serde(rename = "targetVariant")]
    pub target_variant: Option<TripleInfo>,
    #[serde(rename = "sdkPath")]
    pub sdk_path: Option<String>,
    #[serde(rename = "compilerVersion")]
    pub compiler_version: String,
    #[serde(rename = "runtimeCompatibilityVersion")]
    pub runtime_compatibility_version: Option<String>,
}

impl FrontendTargetInfo {
    /// Decode the frontend's JSON payload, producing a detailed,
    /// human-readable failure description on error rather than a bare
    /// serde message.
    pub fn decode(raw_output: &str) -> Result<FrontendTargetInfo, ToolchainError> {
        serde_json::from_str(raw_output).map_err(|err| ToolchainError::UnableToDecodeTargetInfo {
            raw_output: raw_output.to_string(),
            detail: classify_decode_error(&err),
        })
    }

    /// Apply an explicit `-runtime-compatibility-version` override to both
    /// the primary target and (if present) the target-variant version.
    /// Invalid values are rejected by the caller before this is invoked;
    /// this just performs the substitution.
    pub fn with_runtime_compatibility_override(mut self, version: &str) -> Self {
        self.runtime_compatibility_version = Some(version.to_string());
        self
    }
}

fn classify_decode_error(err: &serde_json::Error) -> String {
    use serde_json::error::Category;
    match err.classify() {
        Category::Syntax => format!("corrupted data at line {} column {}", err.line(), err.column()),
        Category::Eof => "missing value: unexpected end of input".to_string(),
        Category::Io => format!("io error: {}", err),
        Category::Data => {
            let msg = err.to_string();
            if msg.contains("missing field") {
                format!("missing key: {}", msg)
            } else {
                format!("type mismatch: {}", msg)
            }
        }
    }
}
