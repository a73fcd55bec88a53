use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::artifact::Artifact;

/// Identity of one launched render task. Never reused within a coordinator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub(crate) u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A cooperative cancellation flag shared between the coordinator and one worker.
///
/// Workers only read it; there is no way back from a cancelled token.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    CancelRequested,
    Cancelled,
    Completed,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Cancelled | TaskState::Completed)
    }
}

/// The coordinator's side of a launched task.
#[derive(Debug)]
pub struct TaskHandle {
    id: TaskId,
    artifact: Artifact,
    token: CancelToken,
    state: TaskState,
}

impl TaskHandle {
    pub(crate) fn new(id: TaskId, artifact: Artifact) -> Self {
        Self {
            id,
            artifact,
            token: CancelToken::new(),
            state: TaskState::Pending,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn artifact(&self) -> Artifact {
        self.artifact
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    /// The read-only flag handed to the worker.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub(crate) fn mark_running(&mut self) -> bool {
        self.transition(TaskState::Pending, TaskState::Running)
    }

    /// Running → CancelRequested. Sets the worker's flag.
    pub(crate) fn request_cancel(&mut self) -> bool {
        if matches!(self.state, TaskState::Pending | TaskState::Running) {
            self.token.cancel();
            self.state = TaskState::CancelRequested;
            true
        } else {
            false
        }
    }

    pub(crate) fn mark_cancelled(&mut self) -> bool {
        self.transition(TaskState::CancelRequested, TaskState::Cancelled)
    }

    pub(crate) fn mark_completed(&mut self) -> bool {
        self.transition(TaskState::Running, TaskState::Completed)
    }

    fn transition(&mut self, from: TaskState, to: TaskState) -> bool {
        if self.state == from {
            self.state = to;
            true
        } else {
            false
        }
    }
}

pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs render jobs off the apply context.
pub trait Spawner: Send + Sync {
    fn spawn(&self, job: Job);
}

/// Runs jobs on smol's blocking thread pool.
#[derive(Clone, Copy, Debug, Default)]
pub struct PoolSpawner;

impl Spawner for PoolSpawner {
    fn spawn(&self, job: Job) {
        smol::unblock(job).detach();
    }
}

/// Queues jobs until the test runs them, so ordering is fully deterministic.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct ManualSpawner {
    queue: parking_lot::Mutex<std::collections::VecDeque<Job>>,
}

#[cfg(test)]
impl ManualSpawner {
    pub(crate) fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    /// Run the oldest queued job. Returns false if nothing was queued.
    pub(crate) fn run_next(&self) -> bool {
        let job = self.queue.lock().pop_front();
        match job {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    /// Run jobs, including ones queued by earlier jobs, until the queue is empty.
    pub(crate) fn run_all(&self) -> usize {
        let mut count = 0;
        while self.run_next() {
            count += 1;
        }
        count
    }
}

#[cfg(test)]
impl Spawner for ManualSpawner {
    fn spawn(&self, job: Job) {
        self.queue.lock().push_back(job);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_lifecycle() {
        let mut handle = TaskHandle::new(TaskId(1), Artifact::Gradient);
        assert_eq!(handle.state(), TaskState::Pending);
        assert!(handle.mark_running());
        assert!(!handle.mark_running());

        let token = handle.token();
        assert!(!token.is_cancelled());
        assert!(handle.request_cancel());
        assert!(token.is_cancelled());
        assert_eq!(handle.state(), TaskState::CancelRequested);

        // A cancel-requested task can no longer complete.
        assert!(!handle.mark_completed());
        assert!(handle.mark_cancelled());
        assert!(handle.state().is_terminal());
        assert!(!handle.request_cancel());
    }

    #[test]
    fn test_completed_is_final() {
        let mut handle = TaskHandle::new(TaskId(2), Artifact::Swatch);
        handle.mark_running();
        assert!(handle.mark_completed());
        assert!(!handle.request_cancel());
        assert!(!handle.mark_cancelled());
        assert_eq!(handle.state(), TaskState::Completed);
        assert!(!handle.token().is_cancelled());
    }

    #[test]
    fn test_manual_spawner() {
        let spawner = ManualSpawner::default();
        let (tx, rx) = std::sync::mpsc::channel();
        for i in 0..3 {
            let tx = tx.clone();
            spawner.spawn(Box::new(move || tx.send(i).unwrap()));
        }
        assert_eq!(spawner.pending(), 3);
        assert!(spawner.run_next());
        assert_eq!(spawner.run_all(), 2);
        assert!(!spawner.run_next());
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_pool_spawner_runs_job() {
        let (tx, rx) = smol::channel::bounded(1);
        PoolSpawner.spawn(Box::new(move || {
            tx.send_blocking(42).unwrap();
        }));
        assert_eq!(smol::block_on(rx.recv()).unwrap(), 42);
    }
}
