use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;

/// The event loop refused a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnFailed {
    pub reason: String,
}

impl std::fmt::Display for SpawnFailed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to spawn local task: {}", self.reason)
    }
}

impl std::error::Error for SpawnFailed {}

/// Single-threaded task spawner.
///
/// Tasks are `!Send` and run on the same event loop as the caller; they
/// only make progress once the caller yields back to that loop.
pub trait TaskSpawner {
    fn spawn_task(&self, task: LocalBoxFuture<'static, ()>) -> Result<(), SpawnFailed>;
}

impl TaskSpawner for futures::executor::LocalSpawner {
    fn spawn_task(&self, task: LocalBoxFuture<'static, ()>) -> Result<(), SpawnFailed> {
        self.spawn_local(task).map_err(|e| SpawnFailed {
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::TaskSpawner;
    use futures::executor::LocalPool;
    use futures::FutureExt;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn tasks_run_only_when_pool_is_driven() {
        let mut pool = LocalPool::new();
        let spawner = pool.spawner();
        let ran = Rc::new(Cell::new(false));
        let flag = ran.clone();
        spawner
            .spawn_task(async move { flag.set(true) }.boxed_local())
            .unwrap();
        assert!(!ran.get());
        pool.run_until_stalled();
        assert!(ran.get());
    }
}
