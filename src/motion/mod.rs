//! Motion orchestration shared by every animated section.
//!
//! Sections never animate anything directly. They describe entrances as
//! immutable values ([`RevealSpec`], [`StaggerSpec`]) and resolve them
//! against a [`MotionContext`] that is passed in explicitly. The resolved
//! values carry everything the page needs: starting pose, delay, duration
//! and easing. The browser runtime only flips a class.
//!
//! ```text
//! MotionContext ──► RevealSpec::resolve ──► ResolvedReveal ──► markup
//!                   StaggerContainer    ─┘
//!                   WordReveal          ─┘
//! ```
//!
//! | Module | Role |
//! |--------|------|
//! | [`reveal`] | Single-element entrance: direction, timing, visibility state |
//! | [`words`] | Whitespace-preserving word split with per-word delays |
//! | [`stagger`] | Incremental delays across an ordered group |
//! | [`carousel`] | Rotating content with an explicit, cancellable timer |
//! | [`schedule`] | Deterministic virtual-clock scheduler used by the carousel |
//! | [`easing`] | CSS `cubic-bezier()` curves, evaluated in Rust |
//!
//! # Reduced motion
//!
//! When the effective preference is [`MotionPreference::Reduced`] every
//! resolved reveal starts and ends at rest: full opacity, no offset, zero
//! delay and zero duration. Content is never left hidden.

pub mod carousel;
pub mod easing;
pub mod reveal;
pub mod schedule;
pub mod stagger;
pub mod words;

pub use carousel::{Carousel, Crossfade, MountedCarousel};
pub use easing::CubicBezier;
pub use reveal::{Direction, Phase, Pose, ResolvedReveal, Reveal, RevealSpec, Trigger, Wrapper};
pub use schedule::{TaskHandle, Timeline};
pub use stagger::{StaggerContainer, StaggerItem, StaggerSpec};
pub use words::{Word, WordReveal};

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Whether animations should play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionPreference {
    #[default]
    Full,
    Reduced,
}

impl MotionPreference {
    pub fn is_reduced(self) -> bool {
        self == MotionPreference::Reduced
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MotionPreference::Full => "full",
            MotionPreference::Reduced => "reduced",
        }
    }
}

impl fmt::Display for MotionPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type Listener = Rc<RefCell<dyn FnMut(MotionPreference)>>;

struct ContextState {
    /// Environment value. `None` when the environment cannot report one.
    system: Option<MotionPreference>,
    /// In-app override; wins over `system` when set.
    override_pref: Option<MotionPreference>,
    listeners: Vec<(u64, Listener)>,
    next_id: u64,
}

impl ContextState {
    fn effective(&self) -> MotionPreference {
        self.override_pref.or(self.system).unwrap_or_default()
    }
}

/// Shared, observable motion preference.
///
/// Cloning yields another handle to the same state. Listeners registered
/// with [`subscribe`](Self::subscribe) fire only when the effective
/// preference actually changes, and may read the context while running.
#[derive(Clone)]
pub struct MotionContext {
    state: Rc<RefCell<ContextState>>,
}

impl MotionContext {
    /// Create a context from the environment's reported preference.
    ///
    /// `None` means the environment has no way to report one, which is
    /// treated as full motion.
    pub fn new(system: Option<MotionPreference>) -> Self {
        Self {
            state: Rc::new(RefCell::new(ContextState {
                system,
                override_pref: None,
                listeners: Vec::new(),
                next_id: 0,
            })),
        }
    }

    pub fn full() -> Self {
        Self::new(Some(MotionPreference::Full))
    }

    pub fn reduced() -> Self {
        Self::new(Some(MotionPreference::Reduced))
    }

    pub fn preference(&self) -> MotionPreference {
        self.state.borrow().effective()
    }

    pub fn should_reduce_motion(&self) -> bool {
        self.preference().is_reduced()
    }

    pub fn override_preference(&self) -> Option<MotionPreference> {
        self.state.borrow().override_pref
    }

    /// Record a change reported by the environment.
    pub fn set_system(&self, system: Option<MotionPreference>) {
        self.update(|state| state.system = system);
    }

    /// Set or clear the in-app override.
    pub fn set_override(&self, pref: Option<MotionPreference>) {
        self.update(|state| state.override_pref = pref);
    }

    /// Register a listener for effective-preference changes.
    ///
    /// The listener stays registered for as long as the returned
    /// [`Subscription`] is alive.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(MotionPreference) + 'static,
    {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        let listener: Listener = Rc::new(RefCell::new(listener));
        state.listeners.push((id, listener));
        Subscription {
            id,
            state: Rc::downgrade(&self.state),
        }
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    fn update(&self, change: impl FnOnce(&mut ContextState)) {
        // Listeners are cloned out so none of them runs while the state is borrowed.
        let (changed, after, listeners) = {
            let mut state = self.state.borrow_mut();
            let before = state.effective();
            change(&mut state);
            let after = state.effective();
            let listeners: Vec<Listener> = state
                .listeners
                .iter()
                .map(|(_, listener)| Rc::clone(listener))
                .collect();
            (before != after, after, listeners)
        };
        if !changed {
            return;
        }
        for listener in listeners {
            (listener.borrow_mut())(after);
        }
    }
}

impl fmt::Debug for MotionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("MotionContext")
            .field("system", &state.system)
            .field("override", &state.override_pref)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

impl Default for MotionContext {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Keeps a [`MotionContext`] listener registered. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    state: Weak<RefCell<ContextState>>,
}

impl Subscription {
    /// Remove the listener now. Equivalent to dropping the subscription.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            state
                .borrow_mut()
                .listeners
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Clamp to a finite, non-negative number. NaN and infinities become zero.
pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Format a number for CSS: at most three decimals, no trailing zeros.
pub fn css_number(value: f64) -> String {
    let rounded = format!("{:.3}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn missing_environment_means_full_motion() {
        let ctx = MotionContext::new(None);
        assert_eq!(ctx.preference(), MotionPreference::Full);
        assert!(!ctx.should_reduce_motion());
    }

    #[test]
    fn system_preference_is_reported() {
        assert!(MotionContext::reduced().should_reduce_motion());
        assert!(!MotionContext::full().should_reduce_motion());
    }

    #[test]
    fn override_wins_over_system() {
        let ctx = MotionContext::reduced();
        ctx.set_override(Some(MotionPreference::Full));
        assert!(!ctx.should_reduce_motion());

        ctx.set_override(None);
        assert!(ctx.should_reduce_motion());
    }

    #[test]
    fn listener_sees_environment_change() {
        let ctx = MotionContext::full();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = ctx.subscribe(move |pref| sink.borrow_mut().push(pref));

        ctx.set_system(Some(MotionPreference::Reduced));
        ctx.set_system(Some(MotionPreference::Full));

        assert_eq!(
            *seen.borrow(),
            vec![MotionPreference::Reduced, MotionPreference::Full]
        );
    }

    #[test]
    fn listener_not_called_when_effective_value_unchanged() {
        let ctx = MotionContext::full();
        ctx.set_override(Some(MotionPreference::Reduced));
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let _sub = ctx.subscribe(move |_| counter.set(counter.get() + 1));

        // Override still pins the effective value.
        ctx.set_system(Some(MotionPreference::Reduced));
        ctx.set_system(Some(MotionPreference::Full));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn dropped_subscription_receives_nothing() {
        let ctx = MotionContext::full();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let sub = ctx.subscribe(move |_| counter.set(counter.get() + 1));
        assert_eq!(ctx.listener_count(), 1);

        sub.unsubscribe();
        assert_eq!(ctx.listener_count(), 0);

        ctx.set_system(Some(MotionPreference::Reduced));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn listener_can_read_context_while_notified() {
        let ctx = MotionContext::full();
        let observed = Rc::new(Cell::new(false));
        let reader = ctx.clone();
        let flag = Rc::clone(&observed);
        let _sub = ctx.subscribe(move |_| flag.set(reader.should_reduce_motion()));

        ctx.set_system(Some(MotionPreference::Reduced));
        assert!(observed.get());
    }

    #[test]
    fn subscription_outliving_context_is_harmless() {
        let ctx = MotionContext::full();
        let sub = ctx.subscribe(|_| {});
        drop(ctx);
        drop(sub);
    }

    #[test]
    fn clones_share_state() {
        let ctx = MotionContext::full();
        let other = ctx.clone();
        other.set_override(Some(MotionPreference::Reduced));
        assert!(ctx.should_reduce_motion());
    }

    #[test]
    fn css_number_trims() {
        assert_eq!(css_number(0.3 + 0.1 * 3.0), "0.6");
        assert_eq!(css_number(1.0), "1");
        assert_eq!(css_number(0.05), "0.05");
        assert_eq!(css_number(0.0), "0");
        assert_eq!(css_number(-0.0001), "0");
        assert_eq!(css_number(14.0), "14");
    }

    #[test]
    fn non_negative_clamps() {
        assert_eq!(non_negative(-1.0), 0.0);
        assert_eq!(non_negative(f64::NAN), 0.0);
        assert_eq!(non_negative(f64::INFINITY), 0.0);
        assert_eq!(non_negative(0.25), 0.25);
    }
}
