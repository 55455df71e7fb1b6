//! User-facing conversion options.
//!
//! The whole struct is deserializable so a CLI config file can be a partial
//! options document; command-line flags are merged over it by the caller.

use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::path::PathBuf;

/// Options recognized by a conversion run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConvertOptions {
    /// Entry module path. Required for a real run; tests construct projects
    /// directly and leave it empty.
    pub entry_file: PathBuf,

    /// Root type names to resolve. Empty means every exported declaration
    /// of the entry module.
    pub type_names: Vec<String>,

    /// When set, the rendered output is written to this path, creating
    /// parent directories as needed.
    pub output_path: Option<PathBuf>,

    /// Surface type name -> replacement Rust spelling, applied at emit time.
    pub custom_type_mappings: FxHashMap<String, TypeMapping>,

    /// Verbatim text spliced after the generated banner.
    pub custom_header: Option<String>,

    /// Verbatim text appended at the end of the file.
    pub custom_footer: Option<String>,

    /// Attribute lines prepended to every emitted type's attribute block.
    pub custom_type_annotations: Vec<String>,

    /// Disallow fallback to the dynamic JSON value; any fallback becomes a
    /// fatal error instead of a warning.
    pub strict: bool,

    /// tsconfig-style project file used by the host to locate neighboring
    /// modules (`compilerOptions.baseUrl` and `compilerOptions.paths`).
    pub project_hint: Option<PathBuf>,
}

/// A custom mapping for one surface type name.
///
/// Accepts either a bare string (`"chrono::DateTime<chrono::Utc>"`) or the
/// long form carrying extra field annotations.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TypeMapping {
    /// Replacement Rust type spelling.
    Plain(String),
    /// Replacement spelling plus attribute lines for fields of this type.
    #[serde(rename_all = "camelCase")]
    Detailed {
        rust_type: String,
        #[serde(default)]
        field_annotations: Vec<String>,
    },
}

impl TypeMapping {
    /// The Rust spelling this mapping substitutes.
    #[must_use]
    pub fn rust_type(&self) -> &str {
        match self {
            TypeMapping::Plain(ty) => ty,
            TypeMapping::Detailed { rust_type, .. } => rust_type,
        }
    }

    /// Attribute lines to prepend to fields of the mapped type.
    #[must_use]
    pub fn field_annotations(&self) -> &[String] {
        match self {
            TypeMapping::Plain(_) => &[],
            TypeMapping::Detailed {
                field_annotations, ..
            } => field_annotations,
        }
    }
}
