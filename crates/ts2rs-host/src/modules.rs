//! Module specifier resolution.
//!
//! Handles the three specifier families a declaration project uses:
//! - relative (`./types`, `../shared/models`) against the importing file
//! - bare (`some-pkg`, `@scope/pkg`) through ancestor `node_modules`
//!   directories
//! - tsconfig `paths` patterns against `baseUrl`
//!
//! Resolution probes `.ts`, `.d.ts`, `/index.ts`, and `/index.d.ts` in that
//! order. File existence is checked through a caller-supplied predicate so
//! virtual overlay files participate exactly like on-disk ones.

use serde::Deserialize;
use std::path::{Component, Path, PathBuf};
use ts2rs_common::HostError;

const EXTENSIONS: &[&str] = &[".ts", ".d.ts"];
const INDEX_FILES: &[&str] = &["index.ts", "index.d.ts"];

/// Resolution settings extracted from a tsconfig-style project hint.
#[derive(Debug, Clone, Default)]
pub struct ResolutionConfig {
    pub base_url: Option<PathBuf>,
    /// `(pattern, targets)` pairs; a `*` in the pattern captures the rest.
    pub paths: Vec<(String, Vec<String>)>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TsConfigFile {
    #[serde(default)]
    compiler_options: TsConfigCompilerOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TsConfigCompilerOptions {
    base_url: Option<String>,
    #[serde(default)]
    paths: std::collections::BTreeMap<String, Vec<String>>,
}

impl ResolutionConfig {
    /// Load `baseUrl` and `paths` from a tsconfig-style file.
    pub fn from_project_file(path: &Path) -> Result<ResolutionConfig, HostError> {
        let text = std::fs::read_to_string(path).map_err(|e| HostError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let parsed: TsConfigFile = serde_json::from_str(&text).map_err(|e| HostError::Parse {
            path: path.to_path_buf(),
            line: e.line() as u32,
            message: e.to_string(),
        })?;
        let config_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        let base_url = parsed
            .compiler_options
            .base_url
            .map(|base| normalize_path(&config_dir.join(base)));
        Ok(ResolutionConfig {
            base_url,
            paths: parsed.compiler_options.paths.into_iter().collect(),
        })
    }
}

/// Resolve `specifier` as imported from `importer`. Returns the resolved
/// file path, or an error naming the specifier and the importing module.
pub fn resolve_specifier(
    specifier: &str,
    importer: &Path,
    config: &ResolutionConfig,
    exists: &dyn Fn(&Path) -> bool,
) -> Result<PathBuf, HostError> {
    let importer_dir = importer.parent().unwrap_or(Path::new("."));

    let resolved = if specifier.starts_with("./") || specifier.starts_with("../") {
        probe(&importer_dir.join(specifier), exists)
    } else {
        resolve_paths_mapping(specifier, config, exists)
            .or_else(|| resolve_node_modules(specifier, importer_dir, exists))
    };

    resolved.ok_or_else(|| HostError::ModuleNotFound {
        specifier: specifier.to_string(),
        from: importer.to_path_buf(),
    })
}

/// Try a candidate as written, with extensions, then as a directory.
fn probe(candidate: &Path, exists: &dyn Fn(&Path) -> bool) -> Option<PathBuf> {
    let candidate = normalize_path(candidate);
    let as_str = candidate.to_string_lossy();
    if as_str.ends_with(".ts") && exists(&candidate) {
        return Some(candidate);
    }
    for ext in EXTENSIONS {
        let with_ext = PathBuf::from(format!("{as_str}{ext}"));
        if exists(&with_ext) {
            return Some(with_ext);
        }
    }
    for index in INDEX_FILES {
        let index_path = candidate.join(index);
        if exists(&index_path) {
            return Some(index_path);
        }
    }
    None
}

/// tsconfig `paths`: the first pattern that matches wins; within it, the
/// first target that resolves wins.
fn resolve_paths_mapping(
    specifier: &str,
    config: &ResolutionConfig,
    exists: &dyn Fn(&Path) -> bool,
) -> Option<PathBuf> {
    let base = config.base_url.as_deref()?;
    for (pattern, targets) in &config.paths {
        let captured = match pattern.split_once('*') {
            Some((prefix, suffix)) => {
                let Some(rest) = specifier.strip_prefix(prefix) else {
                    continue;
                };
                let rest = rest.strip_suffix(suffix).unwrap_or(rest);
                Some(rest)
            }
            None if pattern == specifier => None,
            None => continue,
        };
        for target in targets {
            let substituted = match captured {
                Some(rest) => target.replacen('*', rest, 1),
                None => target.clone(),
            };
            if let Some(found) = probe(&base.join(substituted), exists) {
                return Some(found);
            }
        }
    }
    None
}

/// Walk ancestor directories probing `node_modules/<specifier>`.
fn resolve_node_modules(
    specifier: &str,
    importer_dir: &Path,
    exists: &dyn Fn(&Path) -> bool,
) -> Option<PathBuf> {
    let mut dir = Some(importer_dir);
    while let Some(current) = dir {
        let candidate = current.join("node_modules").join(specifier);
        if let Some(found) = probe(&candidate, exists) {
            return Some(found);
        }
        dir = current.parent();
    }
    None
}

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// preceding component. Works for overlay paths that never touch the disk.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Whether a module path belongs to an external package rather than the
/// user's own sources.
#[must_use]
pub fn is_external_path(path: &Path) -> bool {
    path.components()
        .any(|c| c.as_os_str() == "node_modules")
}
