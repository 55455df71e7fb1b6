//! ts2rs: generate serde-ready Rust types from TypeScript declarations.
//!
//! The pipeline is resolver then emitter: the resolver walks the surface
//! type graph through the host query interface and normalizes every
//! reachable declaration into a small IR, the emitter renders that IR as
//! Rust with serde attributes matching TypeScript's natural JSON encoding.
//!
//! ```no_run
//! use ts2rs::{convert, ConvertOptions};
//!
//! let options = ConvertOptions {
//!     entry_file: "./src/types.ts".into(),
//!     type_names: vec!["User".to_string()],
//!     ..ConvertOptions::default()
//! };
//! let conversion = convert(&options)?;
//! println!("{}", conversion.text);
//! # Ok::<(), ts2rs::ConvertError>(())
//! ```

use std::path::Path;
use tracing::debug;

pub use ts2rs_common::{ConvertError, ConvertOptions, HostError, TypeMapping};
pub use ts2rs_host::{Project, TypeHost};
pub use ts2rs_ir as ir;
pub use ts2rs_resolver::{Resolution, Resolver};

/// Result of a conversion run.
#[derive(Debug)]
pub struct Conversion {
    /// The rendered Rust source.
    pub text: String,
    /// Collected type names in emission order.
    pub emitted_names: Vec<String>,
    /// Resolver warnings followed by emitter warnings, in occurrence order.
    pub warnings: Vec<String>,
}

/// Convert the entry module named by `options`, writing the output file
/// when `options.output_path` is set.
pub fn convert(options: &ConvertOptions) -> Result<Conversion, ConvertError> {
    let project = match &options.project_hint {
        Some(hint) => Project::with_project_hint(hint)?,
        None => Project::new(),
    };
    convert_with_project(&project, options)
}

/// Convert against an existing project, so callers can preload virtual
/// files or reuse resolution settings.
pub fn convert_with_project(
    project: &Project,
    options: &ConvertOptions,
) -> Result<Conversion, ConvertError> {
    if !project.module_exists(&options.entry_file) {
        return Err(ConvertError::Host(HostError::ModuleNotFound {
            specifier: options.entry_file.display().to_string(),
            from: options.entry_file.clone(),
        }));
    }
    let entry = project.load_module(&options.entry_file)?;
    debug!(entry = %options.entry_file.display(), "starting conversion");

    let resolution = Resolver::new(project, options).resolve(entry)?;
    let mut warnings = resolution.warnings;
    let emitted = ts2rs_emitter::emit(&resolution.collected, options);
    warnings.extend(emitted.warnings);

    if let Some(output_path) = &options.output_path {
        write_output(output_path, &emitted.text)?;
    }
    Ok(Conversion {
        text: emitted.text,
        emitted_names: emitted.emitted_names,
        warnings,
    })
}

fn write_output(path: &Path, text: &str) -> Result<(), ConvertError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| ConvertError::Output {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        }
    }
    std::fs::write(path, text).map_err(|e| ConvertError::Output {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
