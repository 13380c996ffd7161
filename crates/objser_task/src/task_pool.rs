use core::future::Future;
use core::mem;
use core::ops::Deref;
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};

use async_channel::{Receiver, Sender};
use async_task::{Runnable, Task};

use crate::LOG_TARGET;

// -----------------------------------------------------------------------------
// OnDrop

struct CallOnDrop(Option<Arc<dyn Fn() + Send + Sync + 'static>>);

impl Drop for CallOnDrop {
    fn drop(&mut self) {
        if let Some(call) = self.0.as_ref() {
            call();
        }
    }
}

// -----------------------------------------------------------------------------
// TaskPoolBuilder

/// Builder for creating a [`TaskPool`].
///
/// Currently configurable parameters:
///
/// - [`thread_num`]: Number of worker threads to spawn.
///   Defaults to the number of logical cores on the system.
///
/// - [`thread_name`]: Thread name prefix. If set, threads are named in the format
///   `{thread_name} ({id})`, e.g., `persist (1)`. Default: `TaskPool ({id})`.
///
/// - [`stack_size`]: Stack size for worker threads. Default is system-dependent.
///
/// - [`on_thread_spawn`]: Callback executed once when each thread spawns.
///
/// - [`on_thread_destroy`]: Callback executed once when each thread is about to terminate.
///
/// # Examples
///
/// ```
/// use objser_task::{TaskPoolBuilder, block_on};
///
/// let task_pool = TaskPoolBuilder::new()
///     .thread_num(2)
///     .thread_name(String::from("doc"))
///     .build();
///
/// let task = task_pool.spawn(async { 20 + 22 });
/// assert_eq!(block_on(task), 42);
/// ```
///
/// [`thread_num`]: Self::thread_num
/// [`thread_name`]: Self::thread_name
/// [`stack_size`]: Self::stack_size
/// [`on_thread_spawn`]: Self::on_thread_spawn
/// [`on_thread_destroy`]: Self::on_thread_destroy
#[derive(Default)]
#[must_use]
pub struct TaskPoolBuilder {
    /// Number of threads. If `None`, uses logical core count.
    thread_num: Option<usize>,
    /// Custom stack size.
    stack_size: Option<usize>,
    /// Thread name prefix.
    thread_name: Option<String>,
    /// Called on thread spawn.
    on_thread_spawn: Option<Arc<dyn Fn() + Send + Sync + 'static>>,
    /// Called on thread termination.
    on_thread_destroy: Option<Arc<dyn Fn() + Send + Sync + 'static>>,
}

impl TaskPoolBuilder {
    /// Creates a new [`TaskPoolBuilder`].
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            thread_num: None,
            stack_size: None,
            thread_name: None,
            on_thread_spawn: None,
            on_thread_destroy: None,
        }
    }

    /// Sets the number of threads in the pool, at least `1`.
    ///
    /// If unset, defaults to the system's logical core count.
    #[inline]
    pub fn thread_num(mut self, thread_num: usize) -> Self {
        self.thread_num = Some(thread_num.max(1));
        self
    }

    /// Override the stack size of the threads created for the pool.
    #[inline]
    pub fn stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = Some(stack_size);
        self
    }

    /// Sets the thread name prefix.
    ///
    /// Threads will be named `<thread_name> (<thread_index>)`, e.g., `MyThreadPool (2)`.
    #[inline]
    pub fn thread_name(mut self, thread_name: String) -> Self {
        self.thread_name = Some(thread_name);
        self
    }

    /// Sets a callback invoked once per thread when it starts.
    ///
    /// Executed on the thread itself, before it runs any task.
    #[inline]
    pub fn on_thread_spawn(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_thread_spawn = Some(Arc::new(f));
        self
    }

    /// Sets a callback invoked once per thread when it terminates.
    ///
    /// Executed on the thread itself. Dropping the pool blocks until the
    /// callback completes.
    #[inline]
    pub fn on_thread_destroy(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_thread_destroy = Some(Arc::new(f));
        self
    }

    /// Creates a [`TaskPool`] with the configured options.
    #[inline]
    pub fn build(self) -> TaskPool {
        TaskPool::new_internal(self)
    }
}

// -----------------------------------------------------------------------------
// TaskPool

/// A pool of dedicated threads executing `'static` tasks.
///
/// Spawned futures are wrapped into [`async_task`] runnables. Scheduling a
/// runnable pushes it into a shared channel, and every pool thread pulls
/// from that channel and runs what it receives. Long blocking jobs, such as
/// the closures run by a [`Worker`](crate::Worker), simply occupy one thread
/// until they return.
///
/// Dropping the pool closes the channel, lets the threads drain the
/// runnables already queued and joins them.
#[derive(Debug)]
pub struct TaskPool {
    /// Runnable queue shared by all threads.
    sender: Sender<Runnable>,
    /// Worker threads.
    threads: Box<[JoinHandle<()>]>,
}

impl TaskPool {
    /// Creates a `TaskPool` with default configuration.
    ///
    /// The number of threads created by this function depends on
    /// [`std::thread::available_parallelism`], not less than `1`.
    pub fn new() -> Self {
        TaskPoolBuilder::new().build()
    }

    /// Creates a [`TaskPoolBuilder`].
    #[inline]
    pub fn builder() -> TaskPoolBuilder {
        TaskPoolBuilder::new()
    }

    fn new_internal(builder: TaskPoolBuilder) -> Self {
        let (sender, receiver) = async_channel::unbounded::<Runnable>();

        let thread_num = builder.thread_num.unwrap_or_else(|| {
            thread::available_parallelism().map_or(1, |n| n.get())
        });

        let threads: Box<[JoinHandle<()>]> = (0..thread_num)
            .map(|i| {
                let receiver = receiver.clone();

                let thread_name = if let Some(thread_name) = builder.thread_name.as_deref() {
                    format!("{thread_name} ({i})")
                } else {
                    format!("TaskPool ({i})")
                };

                let mut thread_builder = thread::Builder::new().name(thread_name);

                if let Some(stack_size) = builder.stack_size {
                    thread_builder = thread_builder.stack_size(stack_size);
                }

                let on_thread_spawn = builder.on_thread_spawn.clone();
                let on_thread_destroy = builder.on_thread_destroy.clone();

                thread_builder
                    .spawn(move || {
                        if let Some(on_spawn) = on_thread_spawn {
                            on_spawn();
                        }

                        // Create a drop guard, call `on_thread_destroy` automatically.
                        let _destructor = CallOnDrop(on_thread_destroy);

                        run_thread(&receiver);
                    })
                    .expect("Failed to spawn thread.")
            })
            .collect();

        Self { sender, threads }
    }

    /// Returns the number of worker threads in the pool.
    #[inline]
    pub fn thread_num(&self) -> usize {
        self.threads.len()
    }

    /// Spawns a `'static` future onto the task pool.
    ///
    /// Returns an [`async_task::Task`] that can be awaited for the result.
    /// The pool runs the future whether or not the handle is polled.
    /// Dropping the handle cancels it, `detach` keeps it running.
    ///
    /// A panic inside the future resumes on the thread awaiting the handle.
    ///
    /// # Examples
    ///
    /// ```
    /// use objser_task::{TaskPool, block_on};
    ///
    /// let pool = TaskPool::new();
    /// let tasks: Vec<_> = (0..4_u32).map(|i| pool.spawn(async move { i * 2 })).collect();
    ///
    /// let results: Vec<u32> = tasks.into_iter().map(block_on).collect();
    /// assert_eq!(results, [0, 2, 4, 6]);
    /// ```
    pub fn spawn<T: Send + 'static>(
        &self,
        future: impl Future<Output = T> + Send + 'static,
    ) -> Task<T> {
        let sender = self.sender.clone();
        let schedule = move |runnable: Runnable| {
            // A closed queue means the pool is gone, dropping the runnable cancels the task.
            let _ = sender.try_send(runnable);
        };

        let (runnable, task) = async_task::Builder::new()
            .propagate_panic(true)
            .spawn(|_| future, schedule);
        runnable.schedule();

        task
    }
}

impl Default for TaskPool {
    fn default() -> Self {
        Self::new()
    }
}

fn run_thread(receiver: &Receiver<Runnable>) {
    let name = thread::current().name().unwrap_or("TaskPool").to_owned();
    log::trace!(target: LOG_TARGET, "thread `{name}` started");

    while let Ok(runnable) = receiver.recv_blocking() {
        runnable.run();
    }

    log::trace!(target: LOG_TARGET, "thread `{name}` stopped");
}

impl Drop for TaskPool {
    fn drop(&mut self) {
        self.sender.close();

        let panicking = thread::panicking();

        let threads = mem::replace(&mut self.threads, Box::new([]));

        for join_handle in threads {
            let res = join_handle.join();
            if !panicking {
                res.expect("Task thread panicked while executing.");
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Global pools

static IO_TASK_POOL: OnceLock<IoTaskPool> = OnceLock::new();

/// The global pool for IO-bound jobs, such as persisting serialized data in
/// the background.
///
/// [`Worker::start`](crate::Worker::start) runs its jobs here. It derefs to
/// [`TaskPool`].
#[derive(Debug)]
pub struct IoTaskPool(TaskPool);

impl IoTaskPool {
    /// Returns the global pool, building it with `f` if it does not exist yet.
    ///
    /// `f` is ignored once the pool exists.
    pub fn get_or_init(f: impl FnOnce() -> TaskPool) -> &'static Self {
        IO_TASK_POOL.get_or_init(|| Self(f()))
    }

    /// Returns the global pool if something already started it.
    pub fn try_get() -> Option<&'static Self> {
        IO_TASK_POOL.get()
    }

    /// Returns the global pool, building a default [`TaskPool`] on first use.
    pub fn get() -> &'static Self {
        Self::get_or_init(TaskPool::new)
    }
}

impl Deref for IoTaskPool {
    type Target = TaskPool;

    fn deref(&self) -> &TaskPool {
        &self.0
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::block_on;

    #[test]
    fn spawn_returns_output() {
        let pool = TaskPoolBuilder::new().thread_num(2).build();
        assert_eq!(pool.thread_num(), 2);

        let tasks: Vec<_> = (0..32_usize).map(|i| pool.spawn(async move { i + 1 })).collect();
        let sum: usize = tasks.into_iter().map(block_on).sum();
        assert_eq!(sum, (1..=32).sum());
    }

    #[test]
    fn thread_callbacks_run_once_per_thread() {
        let spawned = Arc::new(AtomicUsize::new(0));
        let destroyed = Arc::new(AtomicUsize::new(0));

        let pool = {
            let spawned = spawned.clone();
            let destroyed = destroyed.clone();
            TaskPoolBuilder::new()
                .thread_num(3)
                .thread_name(String::from("callbacks"))
                .on_thread_spawn(move || {
                    spawned.fetch_add(1, Ordering::AcqRel);
                })
                .on_thread_destroy(move || {
                    destroyed.fetch_add(1, Ordering::AcqRel);
                })
                .build()
        };

        let name = block_on(pool.spawn(async {
            thread::current().name().map(str::to_owned)
        }));
        assert!(name.is_some_and(|name| name.starts_with("callbacks (")));

        drop(pool);
        assert_eq!(spawned.load(Ordering::Acquire), 3);
        assert_eq!(destroyed.load(Ordering::Acquire), 3);
    }

    #[test]
    fn panics_resume_on_the_awaiting_thread() {
        let pool = TaskPoolBuilder::new().thread_num(1).build();
        let task = pool.spawn(async { panic!("boom") });

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| block_on(task)));
        assert!(result.is_err());

        // The thread survives and keeps serving tasks.
        assert_eq!(block_on(pool.spawn(async { 7 })), 7);
    }

    #[test]
    fn drop_drains_queued_tasks() {
        let counter = Arc::new(AtomicUsize::new(0));
        let pool = TaskPoolBuilder::new().thread_num(1).build();

        for _ in 0..16 {
            let counter = counter.clone();
            pool.spawn(async move {
                counter.fetch_add(1, Ordering::AcqRel);
            })
            .detach();
        }

        drop(pool);
        assert_eq!(counter.load(Ordering::Acquire), 16);
    }

    #[test]
    fn global_pool_is_shared() {
        let a = IoTaskPool::get();
        let b = IoTaskPool::try_get().unwrap();
        assert!(core::ptr::eq(a, b));
        assert!(a.thread_num() >= 1);

        // Later initializers do not replace the pool.
        let c = IoTaskPool::get_or_init(|| TaskPoolBuilder::new().thread_num(5).build());
        assert!(core::ptr::eq(a, c));
    }

    #[test]
    fn dropped_handle_cancels_pending_task() {
        let ran = Arc::new(AtomicUsize::new(0));
        let pool = TaskPoolBuilder::new().thread_num(1).build();
        let (release, gate) = async_channel::bounded::<()>(1);

        let blocker = pool.spawn(async move {
            let _ = gate.recv_blocking();
        });
        let counter = ran.clone();
        let task = pool.spawn(async move {
            counter.fetch_add(1, Ordering::AcqRel);
        });
        assert!(!task.is_finished());
        drop(task);

        release.send_blocking(()).unwrap();
        block_on(blocker);
        drop(pool);
        assert_eq!(ran.load(Ordering::Acquire), 0);
    }
}
