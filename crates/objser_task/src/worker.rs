//! A single generic handle for background jobs.

use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};
use core::task::{Context, Poll, ready};
use core::time::Duration;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use async_io::Timer;
use async_task::Task;
use futures_lite::future;

use crate::error::Aborted;
use crate::{IoTaskPool, LOG_TARGET, TaskPool, WorkerError, block_on};

// -----------------------------------------------------------------------------
// WorkerStatus

/// The lifecycle state of a [`Worker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WorkerStatus {
    /// Queued, the job has not started yet.
    Pending = 0,
    Running = 1,
    Completed = 2,
    Failed = 3,
    Panicked = 4,
    Aborted = 5,
}

impl WorkerStatus {
    /// Returns `true` once the job can no longer change state.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending | Self::Running)
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Pending,
            1 => Self::Running,
            2 => Self::Completed,
            3 => Self::Failed,
            4 => Self::Panicked,
            _ => Self::Aborted,
        }
    }
}

impl fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Panicked => "panicked",
            Self::Aborted => "aborted",
        })
    }
}

// -----------------------------------------------------------------------------
// Shared state

struct Shared {
    aborted: AtomicBool,
    status: AtomicU8,
    /// `f32` bits in `0.0..=1.0`.
    progress: AtomicU32,
}

impl Shared {
    fn new() -> Self {
        Self {
            aborted: AtomicBool::new(false),
            status: AtomicU8::new(WorkerStatus::Pending as u8),
            progress: AtomicU32::new(0.0_f32.to_bits()),
        }
    }

    #[inline]
    fn status(&self) -> WorkerStatus {
        WorkerStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    #[inline]
    fn set_status(&self, status: WorkerStatus) {
        self.status.store(status as u8, Ordering::Release);
    }
}

// -----------------------------------------------------------------------------
// WorkerContext

/// The job's view of its [`Worker`].
///
/// Aborting is cooperative: a running job observes the request through
/// [`is_aborted`](Self::is_aborted) or [`checkpoint`](Self::checkpoint) and
/// decides where to stop.
pub struct WorkerContext {
    shared: Arc<Shared>,
}

impl WorkerContext {
    /// Returns `true` once [`Worker::abort`] has been called.
    #[inline]
    pub fn is_aborted(&self) -> bool {
        self.shared.aborted.load(Ordering::Acquire)
    }

    /// Returns `Err(Aborted)` once an abort was requested, for use with `?`.
    ///
    /// A job that fails after an abort request is reported as
    /// [`WorkerError::Aborted`], whatever its error value.
    #[inline]
    pub fn checkpoint(&self) -> Result<(), Aborted> {
        if self.is_aborted() { Err(Aborted) } else { Ok(()) }
    }

    /// Publishes the fraction of work done, clamped to `0.0..=1.0`.
    ///
    /// `NaN` is ignored.
    pub fn report_progress(&self, fraction: f32) {
        if fraction.is_nan() {
            return;
        }
        let fraction = fraction.clamp(0.0, 1.0);
        self.shared.progress.store(fraction.to_bits(), Ordering::Release);
    }
}

impl fmt::Debug for WorkerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerContext")
            .field("aborted", &self.is_aborted())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Worker

/// A handle on a blocking job running on a [`TaskPool`].
///
/// The job is a closure receiving a [`WorkerContext`] and returning
/// `Result<T, E>`. Its outcome is delivered once, to [`wait`](Self::wait),
/// [`wait_timeout`](Self::wait_timeout) or by awaiting the worker:
///
/// - `Ok(value)` when the job returned `Ok`.
/// - [`WorkerError::Failed`] when it returned `Err`.
/// - [`WorkerError::Panicked`] when it panicked.
/// - [`WorkerError::Aborted`] when it was aborted.
///
/// Dropping the handle of a worker that has not started cancels it, use
/// [`detach`](Self::detach) to let it run unobserved.
///
/// # Examples
///
/// ```
/// use objser_task::{Aborted, Worker, WorkerError};
///
/// let mut worker: Worker<u32, Aborted> = Worker::start_with(vec![3_u32, 4, 5], |items, ctx| {
///     let mut total = 0;
///     for (i, item) in items.iter().enumerate() {
///         ctx.checkpoint()?;
///         total += item;
///         ctx.report_progress((i + 1) as f32 / items.len() as f32);
///     }
///     Ok(total)
/// });
///
/// assert_eq!(worker.wait(), Ok(12));
/// assert_eq!(worker.progress(), 1.0);
/// assert_eq!(worker.wait(), Err(WorkerError::Joined));
/// ```
#[must_use = "Workers are canceled when dropped before they start, use `.detach()` to run them in the background."]
pub struct Worker<T, E> {
    task: Option<Task<Result<T, WorkerError<E>>>>,
    shared: Arc<Shared>,
}

impl<T: Send + 'static, E: Send + 'static> Worker<T, E> {
    /// Starts `job` on the global [`IoTaskPool`].
    pub fn start<F>(job: F) -> Self
    where
        F: FnOnce(&WorkerContext) -> Result<T, E> + Send + 'static,
    {
        Self::start_on(IoTaskPool::get(), job)
    }

    /// Starts `job` with an argument on the global [`IoTaskPool`].
    pub fn start_with<A, F>(arg: A, job: F) -> Self
    where
        A: Send + 'static,
        F: FnOnce(A, &WorkerContext) -> Result<T, E> + Send + 'static,
    {
        Self::start(move |context| job(arg, context))
    }

    /// Starts `job` on the given pool.
    pub fn start_on<F>(pool: &TaskPool, job: F) -> Self
    where
        F: FnOnce(&WorkerContext) -> Result<T, E> + Send + 'static,
    {
        let shared = Arc::new(Shared::new());
        let context = WorkerContext {
            shared: Arc::clone(&shared),
        };
        let task = pool.spawn(async move { run_job(&context, job) });

        Self {
            task: Some(task),
            shared,
        }
    }
}

impl<T, E> Worker<T, E> {
    /// Blocks until the job ends and returns its outcome.
    ///
    /// Calls after the outcome was taken return [`WorkerError::Joined`].
    pub fn wait(&mut self) -> Result<T, WorkerError<E>> {
        match self.task.take() {
            Some(task) => block_on(task),
            None => Err(WorkerError::Joined),
        }
    }

    /// Blocks until the job ends or `timeout` elapses.
    ///
    /// Returns `None` on timeout, the worker keeps running and can be
    /// waited on again.
    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<Result<T, WorkerError<E>>> {
        let Some(task) = self.task.as_mut() else {
            return Some(Err(WorkerError::Joined));
        };

        let result = block_on(future::or(async { Some(task.await) }, async {
            Timer::after(timeout).await;
            None
        }));

        if result.is_some() {
            self.task = None;
        }
        result
    }

    /// Requests the worker to stop.
    ///
    /// A job that has not started yet never runs. A running job is only
    /// stopped if it checks [`WorkerContext::is_aborted`].
    pub fn abort(&self) {
        self.shared.aborted.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_aborted(&self) -> bool {
        self.shared.aborted.load(Ordering::Acquire)
    }

    /// Returns `true` once the job has ended or its outcome was taken.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(Task::is_finished)
    }

    #[inline]
    pub fn status(&self) -> WorkerStatus {
        self.shared.status()
    }

    /// Returns the last fraction reported by the job.
    #[inline]
    pub fn progress(&self) -> f32 {
        f32::from_bits(self.shared.progress.load(Ordering::Acquire))
    }

    /// Lets the job run to completion without a handle.
    pub fn detach(mut self) {
        if let Some(task) = self.task.take() {
            task.detach();
        }
    }
}

impl<T, E> Future for Worker<T, E> {
    type Output = Result<T, WorkerError<E>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let Some(task) = self.task.as_mut() else {
            return Poll::Ready(Err(WorkerError::Joined));
        };
        let result = ready!(Pin::new(task).poll(cx));
        self.task = None;
        Poll::Ready(result)
    }
}

impl<T, E> fmt::Debug for Worker<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Worker")
            .field("status", &self.status())
            .field("aborted", &self.is_aborted())
            .field("progress", &self.progress())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Job execution

fn run_job<T, E, F>(context: &WorkerContext, job: F) -> Result<T, WorkerError<E>>
where
    F: FnOnce(&WorkerContext) -> Result<T, E>,
{
    if context.is_aborted() {
        context.shared.set_status(WorkerStatus::Aborted);
        log::debug!(target: LOG_TARGET, "worker aborted before start");
        return Err(WorkerError::Aborted);
    }

    context.shared.set_status(WorkerStatus::Running);

    let (status, result) = match panic::catch_unwind(AssertUnwindSafe(|| job(context))) {
        Ok(Ok(value)) => (WorkerStatus::Completed, Ok(value)),
        Ok(Err(_)) if context.is_aborted() => (WorkerStatus::Aborted, Err(WorkerError::Aborted)),
        Ok(Err(err)) => (WorkerStatus::Failed, Err(WorkerError::Failed(err))),
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            log::error!(target: LOG_TARGET, "worker panicked: {message}");
            (WorkerStatus::Panicked, Err(WorkerError::Panicked(message)))
        }
    };

    log::debug!(target: LOG_TARGET, "worker {status}");
    context.shared.set_status(status);
    result
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("Box<dyn Any>")
    }
}

// -----------------------------------------------------------------------------
// Tests
