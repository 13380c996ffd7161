use thiserror::Error;

/// The outcome of a [`Worker`](crate::Worker) that did not produce a value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WorkerError<E> {
    /// The job returned an error.
    #[error("worker failed: {0}")]
    Failed(E),
    /// The job panicked, carries the panic message.
    #[error("worker panicked: {0}")]
    Panicked(String),
    /// The worker was aborted before it started, or the job stopped at a
    /// [`checkpoint`](crate::WorkerContext::checkpoint).
    #[error("worker was aborted")]
    Aborted,
    /// The result was already taken by an earlier wait.
    #[error("worker result was already taken")]
    Joined,
}

impl<E> WorkerError<E> {
    #[inline]
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted)
    }

    /// Returns the job's own error, if that is what this is.
    #[inline]
    pub fn into_failed(self) -> Option<E> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Returned by [`WorkerContext::checkpoint`](crate::WorkerContext::checkpoint)
/// once an abort was requested.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Default)]
#[error("abort requested")]
pub struct Aborted;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err: WorkerError<String> = WorkerError::Failed("disk full".into());
        assert_eq!(err.to_string(), "worker failed: disk full");
        assert_eq!(err.into_failed().as_deref(), Some("disk full"));

        let err: WorkerError<Aborted> = WorkerError::Panicked("index out of bounds".into());
        assert_eq!(err.to_string(), "worker panicked: index out of bounds");
        assert!(!err.is_aborted());

        assert!(WorkerError::<Aborted>::Aborted.is_aborted());
        assert_eq!(Aborted.to_string(), "abort requested");
    }
}
