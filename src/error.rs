//! Error taxonomy for archive assembly.
//!
//! Every fatal condition maps to one variant so callers can tell a bad
//! configuration apart from a library collision or a zip writer failure.
//! Missing optional inputs are not errors; they are logged as warnings.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = BootError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum BootError {
    /// A required configuration element is missing or invalid.
    ///
    /// Raised before any filesystem mutation.
    #[error("{0}")]
    Config(String),

    /// A launcher library did not exist when it was added to the configuration.
    #[error("Spring Boot loader launcher library not found: {}", .0.display())]
    LauncherNotFound(PathBuf),

    /// A library copy would overwrite a file already staged under the same name.
    #[error("library collision: {} already exists (copying {})", .destination.display(), .source_path.display())]
    Collision {
        source_path: PathBuf,
        destination: PathBuf,
    },

    /// The zip writer reported an error while packing the staging directory.
    #[error("creating archive {}: {message}", .archive.display())]
    Archive { archive: PathBuf, message: String },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl BootError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    pub fn is_collision(&self) -> bool {
        matches!(self, Self::Collision { .. })
    }
}

/// Attach a human-readable context to an `io::Result`.
///
/// Mirrors `anyhow::Context::with_context` for the typed error.
pub(crate) trait IoContext<T> {
    fn io_context<F, S>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn io_context<F, S>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|source| BootError::Io {
            context: context().into(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_context_wraps_source() {
        let result: io::Result<()> = Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let err = result.io_context(|| "reading lib/foo.jar").unwrap_err();

        assert_eq!(err.to_string(), "reading lib/foo.jar: gone");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_launcher_not_found_message() {
        let err = BootError::LauncherNotFound(PathBuf::from("foo"));
        assert!(err.to_string().contains("not found"));
        assert!(!err.is_config());
    }
}
