use std::io;
use std::path::PathBuf;

use objser_reflect::binary::BinaryError;
use objser_task::Aborted;
use thiserror::Error;

/// An error raised while reading or writing a configuration file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("cannot access `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Binary(#[from] BinaryError),
    /// A background save was aborted before the file was replaced.
    #[error("configuration save was aborted")]
    Aborted(#[from] Aborted),
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }

    /// Returns `true` if the file does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}
