//! Cyclic crossfade between a fixed list of items.
//!
//! A [`Carousel`] is pure state: a list, the index shown, and an interval.
//! [`Carousel::advance`] moves to the next item and wraps. Mounting the
//! carousel on a [`Timeline`] ties advancement to the clock; the returned
//! [`MountedCarousel`] owns the timer, so unmounting (or dropping it) stops
//! the cycle.
//!
//! With fewer than two items there is nothing to alternate, so no timer is
//! ever started.

use super::schedule::{TaskHandle, Timeline};
use std::cell::RefCell;
use std::rc::Rc;

/// Seconds each item stays visible when no valid interval is given.
pub const DEFAULT_INTERVAL: f64 = 2.8;

/// One transition between two items.
#[derive(Debug, Clone, PartialEq)]
pub struct Crossfade<T> {
    pub from_index: usize,
    pub to_index: usize,
    pub outgoing: T,
    pub incoming: T,
}

#[derive(Debug, Clone)]
pub struct Carousel<T> {
    items: Vec<T>,
    current: usize,
    interval: f64,
}

impl<T: Clone> Carousel<T> {
    /// Intervals that are not positive and finite use [`DEFAULT_INTERVAL`].
    pub fn new(items: impl IntoIterator<Item = T>, interval: f64) -> Self {
        let interval = if interval.is_finite() && interval > 0.0 {
            interval
        } else {
            DEFAULT_INTERVAL
        };
        Self {
            items: items.into_iter().collect(),
            current: 0,
            interval,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&T> {
        self.items.get(self.current)
    }

    /// Whether the carousel would change anything if advanced.
    pub fn cycles(&self) -> bool {
        self.items.len() > 1
    }

    /// Index shown after `ticks` advances from the first item.
    pub fn index_after(&self, ticks: usize) -> usize {
        if self.items.is_empty() {
            0
        } else {
            ticks % self.items.len()
        }
    }

    /// Move to the next item, wrapping after the last.
    ///
    /// Returns `None` for empty and single-item carousels.
    pub fn advance(&mut self) -> Option<Crossfade<T>> {
        if !self.cycles() {
            return None;
        }
        let from_index = self.current;
        let to_index = (from_index + 1) % self.items.len();
        self.current = to_index;
        Some(Crossfade {
            from_index,
            to_index,
            outgoing: self.items[from_index].clone(),
            incoming: self.items[to_index].clone(),
        })
    }

    /// Start advancing every interval on `timeline`.
    ///
    /// `on_change` sees each crossfade as it happens. Returns `None` for an
    /// empty carousel; a single item mounts without a timer.
    pub fn mount<F>(self, timeline: &Timeline, mut on_change: F) -> Option<MountedCarousel<T>>
    where
        T: 'static,
        F: FnMut(&Crossfade<T>) + 'static,
    {
        if self.is_empty() {
            return None;
        }
        let cycles = self.cycles();
        let interval = self.interval;
        let state = Rc::new(RefCell::new(MountedState {
            carousel: self,
            ticks: 0,
        }));

        let timer = cycles.then(|| {
            let shared = Rc::downgrade(&state);
            timeline.every(interval, move |_| {
                let Some(state) = shared.upgrade() else {
                    return;
                };
                let change = {
                    let mut state = state.borrow_mut();
                    state.ticks += 1;
                    state.carousel.advance()
                };
                if let Some(change) = change {
                    on_change(&change);
                }
            })
        });

        Some(MountedCarousel { state, timer })
    }
}

struct MountedState<T> {
    carousel: Carousel<T>,
    ticks: usize,
}

/// A carousel running on a timeline. Dropping it stops the timer.
#[must_use = "dropping a MountedCarousel stops it"]
pub struct MountedCarousel<T> {
    state: Rc<RefCell<MountedState<T>>>,
    timer: Option<TaskHandle>,
}

impl<T: Clone> MountedCarousel<T> {
    pub fn current(&self) -> Option<T> {
        self.state.borrow().carousel.current().cloned()
    }

    pub fn current_index(&self) -> usize {
        self.state.borrow().carousel.current_index()
    }

    /// Timer firings since mount.
    pub fn ticks(&self) -> usize {
        self.state.borrow().ticks
    }

    pub fn is_running(&self) -> bool {
        self.timer.as_ref().is_some_and(TaskHandle::is_active)
    }

    /// Stop the timer and hand back the carousel in its current state.
    pub fn unmount(mut self) -> Carousel<T> {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        self.state.borrow().carousel.clone()
    }
}
