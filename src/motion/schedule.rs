//! Deterministic, single-threaded task scheduling.
//!
//! [`Timeline`] is a virtual clock. Work is registered with
//! [`after`](Timeline::after) (one shot) or [`every`](Timeline::every)
//! (repeating) and runs only when the clock is moved with
//! [`advance`](Timeline::advance). Due tasks fire in time order; ties go to
//! the task registered first.
//!
//! Every registration returns a [`TaskHandle`]. Dropping the handle, or
//! calling [`TaskHandle::cancel`], removes the task, so a component that
//! owns its handles cannot leak timers past its own lifetime. Callbacks may
//! register or cancel tasks while they run.

use super::non_negative;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Slack for comparing accumulated float times against due times.
const TIME_EPSILON: f64 = 1e-9;
/// Shortest period a repeating task may have.
pub const MIN_PERIOD: f64 = 0.001;

type Callback = Rc<RefCell<dyn FnMut(f64)>>;

struct Task {
    id: u64,
    origin: f64,
    period: Option<f64>,
    /// Times fired so far; repeating due times are `origin + period * (fired + 1)`.
    fired: u64,
    due: f64,
    callback: Callback,
}

struct TimelineState {
    now: f64,
    next_id: u64,
    tasks: Vec<Task>,
}

/// Virtual-clock scheduler. Clones share the same clock and tasks.
#[derive(Clone)]
pub struct Timeline {
    state: Rc<RefCell<TimelineState>>,
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(TimelineState {
                now: 0.0,
                next_id: 0,
                tasks: Vec::new(),
            })),
        }
    }

    /// Current virtual time in seconds.
    pub fn now(&self) -> f64 {
        self.state.borrow().now
    }

    /// Run `callback` once, `delay` seconds from now.
    pub fn after<F>(&self, delay: f64, callback: F) -> TaskHandle
    where
        F: FnMut(f64) + 'static,
    {
        self.insert(non_negative(delay), None, callback)
    }

    /// Run `callback` every `interval` seconds, first after one interval.
    ///
    /// Intervals shorter than [`MIN_PERIOD`] (including non-finite ones)
    /// are raised to it.
    pub fn every<F>(&self, interval: f64, callback: F) -> TaskHandle
    where
        F: FnMut(f64) + 'static,
    {
        let period = if interval.is_finite() {
            interval.max(MIN_PERIOD)
        } else {
            MIN_PERIOD
        };
        self.insert(period, Some(period), callback)
    }

    fn insert<F>(&self, delay: f64, period: Option<f64>, callback: F) -> TaskHandle
    where
        F: FnMut(f64) + 'static,
    {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        let origin = state.now;
        let callback: Callback = Rc::new(RefCell::new(callback));
        state.tasks.push(Task {
            id,
            origin,
            period,
            fired: 0,
            due: origin + delay,
            callback,
        });
        TaskHandle {
            id,
            state: Rc::downgrade(&self.state),
        }
    }

    /// Number of tasks still scheduled.
    pub fn active_tasks(&self) -> usize {
        self.state.borrow().tasks.len()
    }

    /// Move the clock forward by `seconds`, firing everything that falls due.
    pub fn advance(&self, seconds: f64) {
        let target = self.now() + non_negative(seconds);
        self.run_until(target);
    }

    /// Move the clock to `target` (never backwards), firing due tasks in order.
    pub fn run_until(&self, target: f64) {
        loop {
            let next = {
                let mut state = self.state.borrow_mut();
                let due_index = state
                    .tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, task)| task.due <= target + TIME_EPSILON)
                    .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)))
                    .map(|(index, _)| index);
                let Some(index) = due_index else {
                    break;
                };

                let due = state.tasks[index].due;
                if due > state.now {
                    state.now = due;
                }
                let callback = Rc::clone(&state.tasks[index].callback);
                if let Some(period) = state.tasks[index].period {
                    let task = &mut state.tasks[index];
                    task.fired += 1;
                    task.due = task.origin + period * (task.fired + 1) as f64;
                } else {
                    state.tasks.remove(index);
                }
                (due, callback)
            };
            let (due, callback) = next;
            (callback.borrow_mut())(due);
        }

        let mut state = self.state.borrow_mut();
        if target > state.now {
            state.now = target;
        }
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Timeline")
            .field("now", &state.now)
            .field("tasks", &state.tasks.len())
            .finish()
    }
}

/// Ownership of one scheduled task. Dropping it cancels the task.
#[must_use = "dropping a TaskHandle cancels the task immediately"]
pub struct TaskHandle {
    id: u64,
    state: Weak<RefCell<TimelineState>>,
}

impl TaskHandle {
    /// Cancel the task now. Equivalent to dropping the handle.
    pub fn cancel(self) {}

    /// Whether the task is still scheduled.
    pub fn is_active(&self) -> bool {
        self.state
            .upgrade()
            .is_some_and(|state| state.borrow().tasks.iter().any(|t| t.id == self.id))
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            state.borrow_mut().tasks.retain(|t| t.id != self.id);
        }
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
