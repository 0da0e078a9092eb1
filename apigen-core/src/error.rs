use std::path::PathBuf;

use crate::config::ConfigError;

/// Error type for every stage of the generation pipeline.
///
/// Any variant aborts the remaining plan. Files already written stay on disk;
/// running the same command again resumes where it stopped.
#[derive(Debug)]
pub enum GenerateError {
    /// The resource name or version tag cannot be turned into identifiers.
    InvalidInput(String),
    /// A template references a placeholder with no value in the parameter set.
    MissingParam {
        template: &'static str,
        param: String,
    },
    /// A patch target exists but its insertion point could not be located.
    AnchorNotFound { path: PathBuf, anchor: String },
    /// An artifact kind name the planner does not know.
    UnsupportedKind(String),
    /// An external scaffolder (e.g. `php artisan make:*`) failed.
    CollaboratorFailure { command: String, message: String },
    /// Reading or writing a file failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The generator configuration could not be loaded or is invalid.
    Config(ConfigError),
}

impl GenerateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenerateError::Io {
            path: path.into(),
            source,
        }
    }
}

impl std::fmt::Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateError::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            GenerateError::MissingParam { template, param } => {
                write!(f, "Template '{template}' requires parameter '{param}'")
            }
            GenerateError::AnchorNotFound { path, anchor } => write!(
                f,
                "Could not find insertion point `{anchor}` in {}",
                path.display()
            ),
            GenerateError::UnsupportedKind(kind) => {
                write!(f, "Unsupported artifact kind '{kind}'")
            }
            GenerateError::CollaboratorFailure { command, message } => {
                write!(f, "`{command}` failed: {message}")
            }
            GenerateError::Io { path, source } => write!(f, "{}: {source}", path.display()),
            GenerateError::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for GenerateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerateError::Io { source, .. } => Some(source),
            GenerateError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for GenerateError {
    fn from(err: ConfigError) -> Self {
        GenerateError::Config(err)
    }
}
