//! Single-element entrance animations.
//!
//! A [`RevealSpec`] says how an element should enter: from which side, how
//! far, when and for how long. Resolving it against a [`MotionContext`]
//! yields a [`ResolvedReveal`], which is what gets rendered. Under reduced
//! motion the resolved reveal is static: it starts at rest and takes no time.
//!
//! ## Direction
//!
//! The direction names the way the element travels:
//!
//! | Direction | Starts at | Travels |
//! |-----------|-----------|---------|
//! | `up` | `distance` below rest | upward |
//! | `down` | `distance` above rest | downward |
//! | `left` | `distance` right of rest | leftward |
//! | `right` | `distance` left of rest | rightward |
//! | `none` | at rest | fades only |
//!
//! ## Markup contract
//!
//! [`render`] wraps content in an element carrying:
//!
//! ```text
//! class="reveal …"            (+ "is-visible" when static)
//! data-reveal="view|mount"    when the runtime should trigger it
//! data-once="true|false"      whether leaving the viewport resets it
//! style="--reveal-x: 0px; --reveal-y: 14px; --reveal-opacity: 0;
//!        --reveal-delay: 0.3s; --reveal-duration: 0.75s;
//!        --reveal-ease: cubic-bezier(…)"
//! ```

use super::easing::CubicBezier;
use super::{MotionContext, MotionPreference, css_number, non_negative};
use maud::{Markup, html};

/// Duration used when a spec is given a non-positive or non-finite one.
pub const DEFAULT_DURATION: f64 = 0.6;
/// Travel distance in CSS pixels when none is given.
pub const DEFAULT_DISTANCE: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    #[default]
    None,
}

impl Direction {
    /// Parse a direction name. Unknown names fall back to a plain fade.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "up" => Direction::Up,
            "down" => Direction::Down,
            "left" => Direction::Left,
            "right" => Direction::Right,
            _ => Direction::None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::None => "none",
        }
    }

    /// Starting offset `(x, y)` relative to rest.
    fn offset(self, distance: f64) -> (f64, f64) {
        match self {
            Direction::Up => (0.0, distance),
            Direction::Down => (0.0, -distance),
            Direction::Left => (distance, 0.0),
            Direction::Right => (-distance, 0.0),
            Direction::None => (0.0, 0.0),
        }
    }
}

impl From<&str> for Direction {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

/// What starts the entrance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Trigger {
    /// First intersection with the viewport.
    #[default]
    View,
    /// Page load. For above-the-fold content.
    Mount,
}

impl Trigger {
    pub fn as_str(self) -> &'static str {
        match self {
            Trigger::View => "view",
            Trigger::Mount => "mount",
        }
    }
}

/// Immutable description of one element's entrance.
///
/// Every builder method sanitizes its input, so a spec is always valid:
/// delays and distances are finite and non-negative, durations are positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealSpec {
    direction: Direction,
    delay: f64,
    duration: f64,
    distance: f64,
    once: bool,
    trigger: Trigger,
    ease: CubicBezier,
}

impl RevealSpec {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            delay: 0.0,
            duration: DEFAULT_DURATION,
            distance: DEFAULT_DISTANCE,
            once: true,
            trigger: Trigger::View,
            ease: CubicBezier::EDITORIAL,
        }
    }

    /// A fade with no travel.
    pub fn fade() -> Self {
        Self::new(Direction::None)
    }

    /// Seconds before the entrance starts. Negative values become zero.
    pub fn with_delay(mut self, seconds: f64) -> Self {
        self.delay = non_negative(seconds);
        self
    }

    /// Seconds the entrance takes. Non-positive values use [`DEFAULT_DURATION`].
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = if seconds.is_finite() && seconds > 0.0 {
            seconds
        } else {
            DEFAULT_DURATION
        };
        self
    }

    /// Travel distance in CSS pixels. Negative values become zero.
    pub fn with_distance(mut self, pixels: f64) -> Self {
        self.distance = non_negative(pixels);
        self
    }

    /// Whether the entrance plays only on the first intersection.
    pub fn with_once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }

    /// Trigger on page load instead of viewport intersection.
    pub fn on_mount(mut self) -> Self {
        self.trigger = Trigger::Mount;
        self
    }

    pub fn with_ease(mut self, ease: CubicBezier) -> Self {
        self.ease = ease;
        self
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn delay(&self) -> f64 {
        self.delay
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn once(&self) -> bool {
        self.once
    }

    pub fn trigger(&self) -> Trigger {
        self.trigger
    }

    pub fn ease(&self) -> CubicBezier {
        self.ease
    }

    pub fn resolve(&self, motion: &MotionContext) -> ResolvedReveal {
        self.resolve_for(motion.preference())
    }

    /// Resolve against a fixed preference.
    pub fn resolve_for(&self, preference: MotionPreference) -> ResolvedReveal {
        if preference.is_reduced() {
            return ResolvedReveal {
                from: Pose::REST,
                to: Pose::REST,
                delay: 0.0,
                duration: 0.0,
                ease: self.ease,
                trigger: self.trigger,
                once: self.once,
            };
        }
        let (x, y) = self.direction.offset(self.distance);
        ResolvedReveal {
            from: Pose { opacity: 0.0, x, y },
            to: Pose::REST,
            delay: self.delay,
            duration: self.duration,
            ease: self.ease,
            trigger: self.trigger,
            once: self.once,
        }
    }
}

impl Default for RevealSpec {
    fn default() -> Self {
        Self::new(Direction::Up)
    }
}

/// Visual state of an element: opacity plus translation in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub opacity: f64,
    pub x: f64,
    pub y: f64,
}

impl Pose {
    pub const REST: Pose = Pose {
        opacity: 1.0,
        x: 0.0,
        y: 0.0,
    };

    fn lerp(from: Pose, to: Pose, progress: f64) -> Pose {
        let mix = |a: f64, b: f64| a + (b - a) * progress;
        Pose {
            opacity: mix(from.opacity, to.opacity),
            x: mix(from.x, to.x),
            y: mix(from.y, to.y),
        }
    }

    pub fn is_rest(&self) -> bool {
        *self == Pose::REST
    }
}

/// A reveal with the motion preference already applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedReveal {
    pub from: Pose,
    pub to: Pose,
    pub delay: f64,
    pub duration: f64,
    pub ease: CubicBezier,
    pub trigger: Trigger,
    pub once: bool,
}

impl ResolvedReveal {
    /// Seconds after the trigger at which the element is at rest.
    pub fn end(&self) -> f64 {
        self.delay + self.duration
    }

    /// True when there is nothing to animate.
    pub fn is_static(&self) -> bool {
        self.from == self.to && self.duration == 0.0
    }

    /// Pose `elapsed` seconds after the trigger fired.
    pub fn pose_at(&self, elapsed: f64) -> Pose {
        if elapsed >= self.end() {
            return self.to;
        }
        if elapsed <= self.delay {
            return self.from;
        }
        let progress = self.ease.apply((elapsed - self.delay) / self.duration);
        Pose::lerp(self.from, self.to, progress)
    }

    /// Inline CSS custom properties consumed by the stylesheet.
    pub fn css_vars(&self) -> String {
        format!(
            "--reveal-x: {}px; --reveal-y: {}px; --reveal-opacity: {}; \
             --reveal-delay: {}s; --reveal-duration: {}s; --reveal-ease: {};",
            css_number(self.from.x),
            css_number(self.from.y),
            css_number(self.from.opacity),
            css_number(self.delay),
            css_number(self.duration),
            self.ease.to_css()
        )
    }
}

/// Where the entrance currently is for one mounted element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Hidden,
    Revealed,
}

/// Visibility state machine for one element.
///
/// `Hidden → Revealed` on mount (mount trigger) or first intersection
/// (view trigger). With `once = false`, leaving the viewport goes back to
/// `Hidden` so the next intersection plays the entrance again.
#[derive(Debug, Clone)]
pub struct Reveal {
    spec: RevealSpec,
    phase: Phase,
    plays: u32,
}

impl Reveal {
    pub fn new(spec: RevealSpec) -> Self {
        Self {
            spec,
            phase: Phase::Hidden,
            plays: 0,
        }
    }

    pub fn spec(&self) -> &RevealSpec {
        &self.spec
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// How many times the entrance has been started.
    pub fn plays(&self) -> u32 {
        self.plays
    }

    /// Handle the element being mounted. Returns the new phase on a transition.
    pub fn mount(&mut self) -> Option<Phase> {
        if self.spec.trigger == Trigger::Mount && self.phase == Phase::Hidden {
            return Some(self.enter());
        }
        None
    }

    /// Handle a viewport intersection change. Returns the new phase on a transition.
    pub fn set_visible(&mut self, visible: bool) -> Option<Phase> {
        if self.spec.trigger != Trigger::View {
            return None;
        }
        match (self.phase, visible) {
            (Phase::Hidden, true) => Some(self.enter()),
            (Phase::Revealed, false) if !self.spec.once => {
                self.phase = Phase::Hidden;
                Some(Phase::Hidden)
            }
            _ => None,
        }
    }

    /// Pose `elapsed` seconds after the most recent transition.
    pub fn pose_at(&self, motion: &MotionContext, elapsed: f64) -> Pose {
        let resolved = self.spec.resolve(motion);
        match self.phase {
            Phase::Hidden => resolved.from,
            Phase::Revealed => resolved.pose_at(elapsed),
        }
    }

    fn enter(&mut self) -> Phase {
        self.phase = Phase::Revealed;
        self.plays += 1;
        Phase::Revealed
    }
}

/// Element used for the reveal wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrapper {
    /// `<div>`, for block content.
    Block,
    /// `<span>`, for content inside headings and paragraphs.
    Inline,
}

/// Wrap `content` in a reveal element.
///
/// Static reveals (reduced motion) are emitted already visible and without
/// a trigger, so they never depend on the runtime.
pub fn render(resolved: &ResolvedReveal, wrapper: Wrapper, class: &str, content: Markup) -> Markup {
    let is_static = resolved.is_static();
    let class = match (class.is_empty(), is_static) {
        (true, false) => "reveal".to_string(),
        (true, true) => "reveal is-visible".to_string(),
        (false, false) => format!("reveal {class}"),
        (false, true) => format!("reveal {class} is-visible"),
    };
    let trigger = (!is_static).then(|| resolved.trigger.as_str());
    let once = (!is_static).then(|| if resolved.once { "true" } else { "false" });
    let style = resolved.css_vars();

    match wrapper {
        Wrapper::Block => html! {
            div class=(class) data-reveal=[trigger] data-once=[once] style=(style) { (content) }
        },
        Wrapper::Inline => html! {
            span class=(class) data-reveal=[trigger] data-once=[once] style=(style) { (content) }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_DIRECTIONS: [Direction; 5] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::None,
    ];

    #[test]
    fn unknown_direction_is_a_fade() {
        assert_eq!(Direction::from_name("sideways"), Direction::None);
        assert_eq!(Direction::from_name(""), Direction::None);
        assert_eq!(Direction::from_name(" UP "), Direction::Up);
        assert_eq!(Direction::from("left"), Direction::Left);
    }

    #[test]
    fn builder_sanitizes_values() {
        let spec = RevealSpec::new(Direction::Up)
            .with_delay(-1.0)
            .with_duration(0.0)
            .with_distance(f64::NAN);
        assert_eq!(spec.delay(), 0.0);
        assert_eq!(spec.duration(), DEFAULT_DURATION);
        assert_eq!(spec.distance(), 0.0);

        let spec = RevealSpec::fade().with_duration(-2.0);
        assert_eq!(spec.duration(), DEFAULT_DURATION);
    }

    #[test]
    fn directions_start_from_the_expected_side() {
        let resolve = |d| {
            RevealSpec::new(d)
                .with_distance(10.0)
                .resolve_for(MotionPreference::Full)
                .from
        };
        assert_eq!((resolve(Direction::Up).x, resolve(Direction::Up).y), (0.0, 10.0));
        assert_eq!(resolve(Direction::Down).y, -10.0);
        assert_eq!(resolve(Direction::Left).x, 10.0);
        assert_eq!(resolve(Direction::Right).x, -10.0);
        let fade = resolve(Direction::None);
        assert_eq!((fade.x, fade.y, fade.opacity), (0.0, 0.0, 0.0));
    }

    #[test]
    fn reduced_motion_is_always_at_rest() {
        for direction in ALL_DIRECTIONS {
            let resolved = RevealSpec::new(direction)
                .with_delay(0.4)
                .with_duration(0.8)
                .with_distance(30.0)
                .resolve(&MotionContext::reduced());
            assert!(resolved.from.is_rest(), "{direction:?} starts off rest");
            assert!(resolved.to.is_rest());
            assert_eq!(resolved.delay, 0.0);
            assert_eq!(resolved.duration, 0.0);
            assert!(resolved.is_static());
            for t in [-1.0, 0.0, 0.1, 5.0] {
                assert!(resolved.pose_at(t).is_rest());
            }
        }
    }

    #[test]
    fn full_motion_ends_at_rest() {
        for direction in ALL_DIRECTIONS {
            let resolved = RevealSpec::new(direction)
                .with_delay(0.3)
                .with_duration(0.75)
                .resolve(&MotionContext::full());
            assert!(resolved.pose_at(resolved.end()).is_rest());
            assert!(resolved.pose_at(100.0).is_rest());
            assert_eq!(resolved.pose_at(0.0).opacity, 0.0);
        }
    }

    #[test]
    fn pose_progresses_between_delay_and_end() {
        let resolved = RevealSpec::new(Direction::Up)
            .with_delay(0.2)
            .with_duration(1.0)
            .with_distance(20.0)
            .resolve_for(MotionPreference::Full);
        let mid = resolved.pose_at(0.7);
        assert!(mid.opacity > 0.0 && mid.opacity < 1.0);
        assert!(mid.y > 0.0 && mid.y < 20.0);
        assert_eq!(resolved.pose_at(0.2), resolved.from);
    }

    #[test]
    fn view_reveal_plays_once() {
        let mut reveal = Reveal::new(RevealSpec::new(Direction::Up));
        assert_eq!(reveal.mount(), None);
        assert_eq!(reveal.set_visible(true), Some(Phase::Revealed));
        assert_eq!(reveal.set_visible(false), None);
        assert_eq!(reveal.set_visible(true), None);
        assert_eq!(reveal.plays(), 1);
        assert_eq!(reveal.phase(), Phase::Revealed);
    }

    #[test]
    fn repeatable_reveal_resets_when_leaving_view() {
        let mut reveal = Reveal::new(RevealSpec::new(Direction::Up).with_once(false));
        reveal.set_visible(true);
        assert_eq!(reveal.set_visible(false), Some(Phase::Hidden));
        assert_eq!(reveal.set_visible(true), Some(Phase::Revealed));
        assert_eq!(reveal.plays(), 2);
    }

    #[test]
    fn mount_reveal_ignores_viewport() {
        let mut reveal = Reveal::new(RevealSpec::fade().on_mount());
        assert_eq!(reveal.set_visible(true), None);
        assert_eq!(reveal.mount(), Some(Phase::Revealed));
        assert_eq!(reveal.mount(), None);
        assert_eq!(reveal.set_visible(false), None);
    }

    #[test]
    fn hidden_reveal_holds_starting_pose() {
        let reveal = Reveal::new(RevealSpec::new(Direction::Left).with_distance(12.0));
        let pose = reveal.pose_at(&MotionContext::full(), 10.0);
        assert_eq!(pose.x, 12.0);
        assert_eq!(pose.opacity, 0.0);

        // Reduced motion never hides, even before the trigger.
        assert!(reveal.pose_at(&MotionContext::reduced(), 0.0).is_rest());
    }

    #[test]
    fn render_emits_trigger_and_variables() {
        let resolved = RevealSpec::new(Direction::Up)
            .with_delay(0.3)
            .with_duration(0.75)
            .with_distance(14.0)
            .on_mount()
            .resolve_for(MotionPreference::Full);
        let html = render(&resolved, Wrapper::Inline, "headline-line", html! { "Hi" })
            .into_string();
        assert!(html.starts_with("<span"));
        assert!(html.contains(r#"class="reveal headline-line""#));
        assert!(html.contains(r#"data-reveal="mount""#));
        assert!(html.contains(r#"data-once="true""#));
        assert!(html.contains("--reveal-y: 14px"));
        assert!(html.contains("--reveal-delay: 0.3s"));
        assert!(html.contains("--reveal-duration: 0.75s"));
    }

    #[test]
    fn render_static_reveal_is_visible_without_runtime() {
        let resolved = RevealSpec::new(Direction::Up).resolve_for(MotionPreference::Reduced);
        let html = render(&resolved, Wrapper::Block, "", html! { p { "x" } }).into_string();
        assert!(html.contains(r#"class="reveal is-visible""#));
        assert!(!html.contains("data-reveal"));
        assert!(html.contains("--reveal-opacity: 1"));
        assert!(html.contains("--reveal-y: 0px"));
    }
}
