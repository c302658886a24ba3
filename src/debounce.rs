//! Delayed, cancel-and-reschedule work item.
//!
//! Connectivity events arrive in bursts (cycling through BLE profiles fires
//! one event per step). The [`Debouncer`] runs its evaluate callback once,
//! `delay` after the *last* [`schedule`](Debouncer::schedule) call:
//!
//! ```text
//! schedule ─┬──┬─┬──────────┐
//!           │  │ │          ▼
//! deadline  └──┴─┴──▶ t+16ms ──▶ evaluate()   (one run per quiet period)
//! ```
//!
//! The callback runs on the debouncer's own worker thread and must only
//! queue messages; it never touches display state.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use log::debug;

use crate::drivers::task_pin;
use crate::error::Result;

#[derive(Debug, Default)]
struct Pending {
    deadline: Option<Instant>,
    shutdown: bool,
}

#[derive(Debug, Default)]
struct Shared {
    pending: Mutex<Pending>,
    wake: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct Debouncer {
    shared: Arc<Shared>,
    delay: Duration,
    worker: Option<JoinHandle<()>>,
}

impl Debouncer {
    /// Start the worker thread. `evaluate` runs once per quiet period.
    pub fn spawn(
        name: &'static str,
        delay: Duration,
        evaluate: impl FnMut() + Send + 'static,
    ) -> Result<Self> {
        let shared = Arc::new(Shared::default());
        let worker = {
            let shared = Arc::clone(&shared);
            task_pin::spawn_delayed(name, 16, 0, move || worker_loop(&shared, evaluate))?
        };

        Ok(Self {
            shared,
            delay,
            worker: Some(worker),
        })
    }

    /// (Re)arm the work item, cancelling any schedule that has not fired.
    pub fn schedule(&self) {
        let mut pending = self.shared.lock();
        if pending.deadline.is_some() {
            debug!("Debounce: rescheduling pending evaluation");
        }
        pending.deadline = Some(Instant::now() + self.delay);
        self.shared.wake.notify_one();
    }

    /// Whether an evaluation is armed and has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.shared.lock().deadline.is_some()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.shared.lock().shutdown = true;
        self.shared.wake.notify_one();
        if let Some(worker) = self.worker.take() {
            // Never join ourselves if the last handle dies on the worker.
            if worker.thread().id() != std::thread::current().id() {
                let _ = worker.join();
            }
        }
    }
}

fn worker_loop(shared: &Shared, mut evaluate: impl FnMut()) {
    let mut pending = shared.lock();
    loop {
        if pending.shutdown {
            return;
        }

        match pending.deadline {
            None => {
                pending = shared
                    .wake
                    .wait(pending)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    pending.deadline = None;
                    drop(pending);
                    evaluate();
                    pending = shared.lock();
                } else {
                    pending = shared
                        .wake
                        .wait_timeout(pending, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0;
                }
            }
        }
    }
}
