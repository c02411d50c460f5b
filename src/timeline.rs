//! Choreography preview.
//!
//! Plays the page's entrances on a virtual [`Timeline`] without a browser.
//! The cues come from the same rendering pass that produces `index.html`,
//! so the preview shows exactly the delays and durations the page ships.
//!
//! Mount-triggered cues (the hero) start at `t = 0`. View-triggered sections
//! are assumed to scroll into view one after another, `scroll_interval`
//! seconds apart. The greeting carousel is mounted on the same clock, and a
//! motion-context subscription reacts to a mid-run switch to reduced motion
//! the way the runtime does: everything still pending is shown at rest.
//!
//! Each cue drives a [`Reveal`] state machine: a section's trigger reveals
//! its hidden entrances, and the previous section scrolling out of view
//! hides again only the entrances that are not `once`.
//!
//! When the run ends every task handle, the carousel and the subscription
//! are released, and the report records what was left behind (nothing,
//! unless something leaks).

use crate::generate::render_site;
use crate::motion::{
    Carousel, MotionPreference, Phase, Reveal, RevealSpec, TaskHandle, Timeline, Trigger,
};
use crate::sections::Cue;
use crate::types::Manifest;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Seconds between consecutive view-triggered sections entering the viewport.
pub const DEFAULT_SCROLL_INTERVAL: f64 = 1.5;
pub const DEFAULT_DURATION: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineOptions {
    /// Start with the environment reporting reduced motion.
    pub reduced: bool,
    /// Flip the effective preference at this time.
    pub flip_at: Option<f64>,
    /// Seconds to run before unmounting.
    pub duration: f64,
    pub scroll_interval: f64,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            reduced: false,
            flip_at: None,
            duration: DEFAULT_DURATION,
            scroll_interval: DEFAULT_SCROLL_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimelineEvent {
    SectionInView {
        at: f64,
        section: String,
    },
    CueStarted {
        at: f64,
        section: String,
        label: String,
    },
    CueSettled {
        at: f64,
        section: String,
        label: String,
    },
    Greeting {
        at: f64,
        index: usize,
        text: String,
    },
    PreferenceChanged {
        at: f64,
        preference: MotionPreference,
    },
    /// Reduced motion took effect; `count` pending entrances jumped to rest.
    ShownAtRest {
        at: f64,
        count: usize,
    },
}

impl TimelineEvent {
    pub fn at(&self) -> f64 {
        match self {
            TimelineEvent::SectionInView { at, .. }
            | TimelineEvent::CueStarted { at, .. }
            | TimelineEvent::CueSettled { at, .. }
            | TimelineEvent::Greeting { at, .. }
            | TimelineEvent::PreferenceChanged { at, .. }
            | TimelineEvent::ShownAtRest { at, .. } => *at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TimelineReport {
    /// Cues as rendered with the starting preference.
    pub cues: Vec<Cue>,
    /// When each section's trigger fires, in page order.
    pub triggers: Vec<(String, f64)>,
    pub events: Vec<TimelineEvent>,
    pub initial: MotionPreference,
    pub preference: MotionPreference,
    pub duration: f64,
    pub greeting_ticks: usize,
    /// Entrances started by a trigger. Each plays once unless it leaves the
    /// viewport with `once = false` and comes back.
    pub entrances_played: u32,
    /// Tasks still scheduled after unmounting.
    pub leaked_tasks: usize,
    /// Preference listeners still registered after unmounting.
    pub leaked_listeners: usize,
}

impl TimelineReport {
    /// Time at which every cue is at rest, if the run was long enough to see it.
    pub fn settled_at(&self) -> Option<f64> {
        let mut settled = 0;
        let mut last = 0.0_f64;
        for event in &self.events {
            match event {
                TimelineEvent::ShownAtRest { at, .. } => return Some(last.max(*at)),
                TimelineEvent::CueSettled { at, .. } => {
                    settled += 1;
                    last = last.max(*at);
                }
                _ => {}
            }
        }
        (settled == self.cues.len()).then_some(last)
    }
}

/// When each section's entrance trigger fires: mount sections at 0, view
/// sections in page order every `scroll_interval` seconds.
pub fn section_triggers(cues: &[Cue], scroll_interval: f64) -> Vec<(String, f64)> {
    let interval = if scroll_interval.is_finite() && scroll_interval > 0.0 {
        scroll_interval
    } else {
        DEFAULT_SCROLL_INTERVAL
    };
    let mut triggers: Vec<(String, f64)> = Vec::new();
    let mut scrolled = 0;
    for cue in cues {
        if triggers.iter().any(|(section, _)| *section == cue.section) {
            continue;
        }
        let at = match cue.trigger {
            Trigger::Mount => 0.0,
            Trigger::View => {
                scrolled += 1;
                scrolled as f64 * interval
            }
        };
        triggers.push((cue.section.clone(), at));
    }
    triggers
}

/// One cue and the visibility state of the element it animates.
struct Entrance {
    cue: Cue,
    reveal: Reveal,
}

impl Entrance {
    fn new(cue: Cue) -> Self {
        let spec = RevealSpec::fade().with_once(cue.once);
        let spec = match cue.trigger {
            Trigger::Mount => spec.on_mount(),
            Trigger::View => spec,
        };
        Self {
            cue,
            reveal: Reveal::new(spec),
        }
    }
}

/// State shared by every task of one run.
struct Run {
    timeline: Timeline,
    entrances: RefCell<Vec<Entrance>>,
    events: RefCell<Vec<TimelineEvent>>,
    /// Start and settle tasks of entrances that are playing.
    pending: RefCell<Vec<TaskHandle>>,
    settled: Cell<usize>,
    /// Reduced motion took over; later triggers have nothing left to play.
    at_rest: Cell<bool>,
}

impl Run {
    fn new(timeline: Timeline, cues: &[Cue]) -> Rc<Self> {
        Rc::new(Self {
            timeline,
            entrances: RefCell::new(cues.iter().cloned().map(Entrance::new).collect()),
            events: RefCell::new(Vec::new()),
            pending: RefCell::new(Vec::new()),
            settled: Cell::new(0),
            at_rest: Cell::new(false),
        })
    }

    fn push(&self, event: TimelineEvent) {
        self.events.borrow_mut().push(event);
    }

    fn plays(&self) -> u32 {
        self.entrances.borrow().iter().map(|e| e.reveal.plays()).sum()
    }
}

/// Section `section` hit its trigger: every entrance in it that transitions
/// to revealed starts playing now.
fn enter_section(run: &Rc<Run>, section: &str) {
    if run.at_rest.get() {
        return;
    }
    let starting: Vec<Cue> = run
        .entrances
        .borrow_mut()
        .iter_mut()
        .filter(|e| e.cue.section == section)
        .filter_map(|e| {
            let transition = match e.cue.trigger {
                Trigger::Mount => e.reveal.mount(),
                Trigger::View => e.reveal.set_visible(true),
            };
            (transition == Some(Phase::Revealed)).then(|| e.cue.clone())
        })
        .collect();
    for cue in &starting {
        schedule_cue(run, cue);
    }
}

/// Section `section` scrolled out of view.
fn leave_section(run: &Run, section: &str) {
    for entrance in run
        .entrances
        .borrow_mut()
        .iter_mut()
        .filter(|e| e.cue.section == section)
    {
        entrance.reveal.set_visible(false);
    }
}

/// Run the page choreography for `options.duration` seconds.
pub fn simulate(manifest: &Manifest, options: &TimelineOptions) -> TimelineReport {
    let system = if options.reduced {
        MotionPreference::Reduced
    } else {
        MotionPreference::Full
    };
    let motion = manifest.config.motion.preference.context();
    motion.set_system(Some(system));
    let initial = motion.preference();

    let (_, cues) = render_site(manifest, &motion);
    let triggers = section_triggers(&cues, options.scroll_interval);
    let timeline = Timeline::new();
    let run = Run::new(timeline.clone(), &cues);

    let mut trigger_tasks: Vec<TaskHandle> = Vec::new();
    let mut previous: Option<String> = None;
    for (section, at) in &triggers {
        let run_handle = Rc::clone(&run);
        let section = section.clone();
        let scrolled = *at > 0.0;
        let leaving = if scrolled { previous.take() } else { None };
        if scrolled {
            previous = Some(section.clone());
        }
        trigger_tasks.push(timeline.after(*at, move |now| {
            if scrolled {
                run_handle.push(TimelineEvent::SectionInView {
                    at: now,
                    section: section.clone(),
                });
            }
            if let Some(leaving) = &leaving {
                leave_section(&run_handle, leaving);
            }
            enter_section(&run_handle, &section);
        }));
    }

    let subscription = {
        let handle = Rc::clone(&run);
        let total = cues.len();
        motion.subscribe(move |preference| {
            let now = handle.timeline.now();
            handle.push(TimelineEvent::PreferenceChanged { at: now, preference });
            if preference.is_reduced() {
                let count = total - handle.settled.get();
                handle.at_rest.set(true);
                drop(handle.pending.take());
                handle.settled.set(total);
                handle.push(TimelineEvent::ShownAtRest { at: now, count });
            }
        })
    };

    let flip = options.flip_at.map(|at| {
        let motion = motion.clone();
        let target = match initial {
            MotionPreference::Full => MotionPreference::Reduced,
            MotionPreference::Reduced => MotionPreference::Full,
        };
        timeline.after(at, move |_| motion.set_override(Some(target)))
    });

    let greetings = Carousel::new(
        manifest.profile.greetings.iter().cloned(),
        manifest.config.motion.carousel.interval,
    );
    let carousel = {
        let handle = Rc::clone(&run);
        greetings.mount(&timeline, move |change| {
            handle.push(TimelineEvent::Greeting {
                at: handle.timeline.now(),
                index: change.to_index,
                text: change.incoming.clone(),
            });
        })
    };

    let duration = if options.duration.is_finite() {
        options.duration.max(0.0)
    } else {
        DEFAULT_DURATION
    };
    timeline.run_until(duration);

    let greeting_ticks = carousel.as_ref().map_or(0, |c| c.ticks());
    let preference = motion.preference();
    let entrances_played = run.plays();

    // Unmount everything the run created.
    if let Some(carousel) = carousel {
        carousel.unmount();
    }
    drop(flip);
    drop(subscription);
    drop(trigger_tasks);
    drop(run.pending.take());

    let leaked_tasks = timeline.active_tasks();
    let leaked_listeners = motion.listener_count();

    let events = run.events.take();

    TimelineReport {
        cues,
        triggers,
        events,
        initial,
        preference,
        duration,
        greeting_ticks,
        entrances_played,
        leaked_tasks,
        leaked_listeners,
    }
}

/// Schedule the start and settle of `cue`, relative to the current time.
fn schedule_cue(run: &Rc<Run>, cue: &Cue) {
    let start = {
        let handle = Rc::clone(run);
        let (section, label) = (cue.section.clone(), cue.label.clone());
        run.timeline.after(cue.delay, move |now| {
            handle.push(TimelineEvent::CueStarted {
                at: now,
                section: section.clone(),
                label: label.clone(),
            });
        })
    };
    let finish = {
        let handle = Rc::clone(run);
        let (section, label) = (cue.section.clone(), cue.label.clone());
        run.timeline.after(cue.end(), move |now| {
            handle.settled.set(handle.settled.get() + 1);
            handle.push(TimelineEvent::CueSettled {
                at: now,
                section: section.clone(),
                label: label.clone(),
            });
        })
    };
    let mut pending = run.pending.borrow_mut();
    pending.push(start);
    pending.push(finish);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn cue(section: &str, trigger: Trigger) -> Cue {
        Cue {
            section: section.to_string(),
            label: "x".to_string(),
            trigger,
            delay: 0.0,
            duration: 0.5,
            once: true,
        }
    }

    fn started(run: &Run) -> usize {
        run.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, TimelineEvent::CueStarted { .. }))
            .count()
    }

    fn trigger_of(report: &TimelineReport, section: &str) -> f64 {
        report
            .triggers
            .iter()
            .find(|(s, _)| s == section)
            .map(|(_, at)| *at)
            .unwrap()
    }

    #[test]
    fn mount_sections_trigger_at_zero_and_views_scroll_in_order() {
        let cues = vec![
            cue("top", Trigger::Mount),
            cue("top", Trigger::Mount),
            cue("about", Trigger::View),
            cue("projects", Trigger::View),
            cue("about", Trigger::View),
        ];
        let triggers = section_triggers(&cues, 2.0);
        assert_eq!(
            triggers,
            vec![
                ("top".to_string(), 0.0),
                ("about".to_string(), 2.0),
                ("projects".to_string(), 4.0),
            ]
        );
    }

    #[test]
    fn invalid_scroll_interval_uses_default() {
        let cues = vec![cue("about", Trigger::View)];
        let triggers = section_triggers(&cues, -1.0);
        assert!(close(triggers[0].1, DEFAULT_SCROLL_INTERVAL));
    }

    #[test]
    fn full_run_settles_everything_and_leaks_nothing() {
        let (_tmp, manifest) = scanned_fixtures();
        let report = simulate(&manifest, &TimelineOptions::default());

        assert_eq!(report.initial, MotionPreference::Full);
        assert_eq!(report.preference, MotionPreference::Full);
        assert!(report.settled_at().is_some());
        assert_eq!(report.entrances_played as usize, report.cues.len());
        assert_eq!(report.leaked_tasks, 0);
        assert_eq!(report.leaked_listeners, 0);
        assert!(close(trigger_of(&report, "top"), 0.0));
        assert!(close(trigger_of(&report, "about"), 1.5));
        assert!(close(trigger_of(&report, "projects"), 3.0));
    }

    #[test]
    fn events_are_in_time_order() {
        let (_tmp, manifest) = scanned_fixtures();
        let report = simulate(&manifest, &TimelineOptions::default());
        let times: Vec<f64> = report.events.iter().map(TimelineEvent::at).collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1] + 1e-9));
    }

    #[test]
    fn greeting_rotates_on_the_same_clock() {
        let (_tmp, manifest) = scanned_fixtures();
        let report = simulate(&manifest, &TimelineOptions::default());
        // three greetings, 2.8s interval, 10s run
        assert_eq!(report.greeting_ticks, 3);
        let first = report
            .events
            .iter()
            .find_map(|e| match e {
                TimelineEvent::Greeting { at, index, .. } => Some((*at, *index)),
                _ => None,
            })
            .unwrap();
        assert!(close(first.0, 2.8));
        assert_eq!(first.1, 1);
    }

    #[test]
    fn view_cues_start_after_their_section_scrolls_in() {
        let (_tmp, manifest) = scanned_fixtures();
        let report = simulate(&manifest, &TimelineOptions::default());
        for event in &report.events {
            if let TimelineEvent::CueStarted { at, section, .. } = event {
                assert!(*at + 1e-9 >= trigger_of(&report, section), "{section} at {at}");
            }
        }
    }

    #[test]
    fn flipping_to_reduced_shows_pending_cues_at_rest() {
        let (_tmp, manifest) = scanned_fixtures();
        let options = TimelineOptions {
            flip_at: Some(0.5),
            ..TimelineOptions::default()
        };
        let report = simulate(&manifest, &options);

        assert_eq!(report.preference, MotionPreference::Reduced);
        let shown = report
            .events
            .iter()
            .find_map(|e| match e {
                TimelineEvent::ShownAtRest { at, count } => Some((*at, *count)),
                _ => None,
            })
            .unwrap();
        assert!(close(shown.0, 0.5));
        assert!(shown.1 > 0);
        assert!(report.events.iter().all(|e| match e {
            TimelineEvent::CueStarted { at, .. } | TimelineEvent::CueSettled { at, .. } =>
                *at <= 0.5 + 1e-9,
            _ => true,
        }));
        assert!(close(report.settled_at().unwrap(), 0.5));
        let mounted = report.cues.iter().filter(|c| c.trigger == Trigger::Mount).count();
        assert_eq!(report.entrances_played as usize, mounted);
        assert_eq!(report.leaked_tasks, 0);
        assert_eq!(report.leaked_listeners, 0);
    }

    #[test]
    fn reduced_start_puts_every_cue_at_its_trigger() {
        let (_tmp, manifest) = scanned_fixtures();
        let options = TimelineOptions {
            reduced: true,
            ..TimelineOptions::default()
        };
        let report = simulate(&manifest, &options);

        assert_eq!(report.initial, MotionPreference::Reduced);
        assert!(report.cues.iter().all(|c| c.delay == 0.0 && c.duration == 0.0));
        for event in &report.events {
            if let TimelineEvent::CueSettled { at, section, .. } = event {
                assert!(close(*at, trigger_of(&report, section)));
            }
        }
    }

    #[test]
    fn flipping_back_to_full_is_reported() {
        let (_tmp, manifest) = scanned_fixtures();
        let options = TimelineOptions {
            reduced: true,
            flip_at: Some(1.0),
            ..TimelineOptions::default()
        };
        let report = simulate(&manifest, &options);
        assert_eq!(report.preference, MotionPreference::Full);
        assert!(report.events.iter().any(|e| matches!(
            e,
            TimelineEvent::PreferenceChanged { preference: MotionPreference::Full, .. }
        )));
        assert!(!report.events.iter().any(|e| matches!(e, TimelineEvent::ShownAtRest { .. })));
    }

    #[test]
    fn short_run_unmounts_pending_work() {
        let (_tmp, manifest) = scanned_fixtures();
        let options = TimelineOptions {
            duration: 1.0,
            ..TimelineOptions::default()
        };
        let report = simulate(&manifest, &options);
        assert!(report.settled_at().is_none());
        assert_eq!(report.greeting_ticks, 0);
        assert_eq!(report.leaked_tasks, 0);
        assert_eq!(report.leaked_listeners, 0);
    }

    #[test]
    fn once_entrances_ignore_a_second_visit() {
        let timeline = Timeline::new();
        let run = Run::new(timeline.clone(), &[cue("about", Trigger::View)]);

        enter_section(&run, "about");
        timeline.run_until(1.0);
        leave_section(&run, "about");
        enter_section(&run, "about");
        timeline.run_until(2.0);

        assert_eq!(run.plays(), 1);
        assert_eq!(started(&run), 1);
        assert_eq!(run.entrances.borrow()[0].reveal.phase(), Phase::Revealed);
    }

    #[test]
    fn repeating_entrances_replay_after_leaving_view() {
        let timeline = Timeline::new();
        let repeating = Cue {
            once: false,
            ..cue("about", Trigger::View)
        };
        let run = Run::new(timeline.clone(), &[repeating]);

        enter_section(&run, "about");
        timeline.run_until(1.0);
        leave_section(&run, "about");
        assert_eq!(run.entrances.borrow()[0].reveal.phase(), Phase::Hidden);
        enter_section(&run, "about");
        timeline.run_until(2.0);

        assert_eq!(run.plays(), 2);
        assert_eq!(started(&run), 2);
        drop(run.pending.take());
        assert_eq!(timeline.active_tasks(), 0);
    }

    #[test]
    fn mount_entrances_ignore_scrolling() {
        let timeline = Timeline::new();
        let run = Run::new(timeline.clone(), &[cue("top", Trigger::Mount)]);

        enter_section(&run, "top");
        leave_section(&run, "top");
        enter_section(&run, "top");
        timeline.run_until(1.0);

        assert_eq!(run.plays(), 1);
        assert_eq!(started(&run), 1);
    }
}
