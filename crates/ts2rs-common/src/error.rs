//! Error types for the conversion pipeline.
//!
//! All of these are fatal to a run. Recoverable conditions are expressed as
//! warnings on the resolver, never as errors.

use std::fmt;
use std::path::PathBuf;

/// Failure surfaced by the host query layer: file system access, module
/// resolution, or parsing of a surface module.
#[derive(Debug)]
pub enum HostError {
    /// A module path could not be resolved to a file.
    ModuleNotFound { specifier: String, from: PathBuf },
    /// A module file could not be read.
    Io { path: PathBuf, message: String },
    /// A module failed to parse.
    Parse {
        path: PathBuf,
        line: u32,
        message: String,
    },
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::ModuleNotFound { specifier, from } => {
                write!(
                    f,
                    "cannot find module '{specifier}' imported from '{}'",
                    from.display()
                )
            }
            HostError::Io { path, message } => {
                write!(f, "failed to read '{}': {message}", path.display())
            }
            HostError::Parse {
                path,
                line,
                message,
            } => {
                write!(f, "parse error at {}:{line}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for HostError {}

/// Fatal conversion error.
#[derive(Debug)]
pub enum ConvertError {
    /// A named type could not be located in the project.
    TypeNotFound { name: String },
    /// A construct categorically unrepresentable in JSON.
    NonSerializable { name: String },
    /// A strict-mode fallback refusal, or any explicit conversion refusal.
    TypeConversion {
        type_name: String,
        reason: String,
        source_path: Option<PathBuf>,
        line: Option<u32>,
    },
    /// A host query failure, surfaced unchanged.
    Host(HostError),
    /// Output could not be written.
    Output { path: PathBuf, message: String },
}

impl ConvertError {
    pub fn type_conversion(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        ConvertError::TypeConversion {
            type_name: type_name.into(),
            reason: reason.into(),
            source_path: None,
            line: None,
        }
    }

    #[must_use]
    pub fn with_location(mut self, path: PathBuf, at_line: u32) -> Self {
        if let ConvertError::TypeConversion {
            source_path, line, ..
        } = &mut self
        {
            *source_path = Some(path);
            *line = Some(at_line);
        }
        self
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::TypeNotFound { name } => {
                write!(f, "type '{name}' was not found in the project")
            }
            ConvertError::NonSerializable { name } => {
                write!(f, "type '{name}' is not serializable to JSON")
            }
            ConvertError::TypeConversion {
                type_name,
                reason,
                source_path,
                line,
            } => {
                write!(f, "cannot convert type '{type_name}': {reason}")?;
                if let Some(path) = source_path {
                    write!(f, " ({}", path.display())?;
                    if let Some(line) = line {
                        write!(f, ":{line}")?;
                    }
                    write!(f, ")")?;
                }
                Ok(())
            }
            ConvertError::Host(err) => err.fmt(f),
            ConvertError::Output { path, message } => {
                write!(f, "failed to write '{}': {message}", path.display())
            }
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvertError::Host(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HostError> for ConvertError {
    fn from(err: HostError) -> Self {
        ConvertError::Host(err)
    }
}
