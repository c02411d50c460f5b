//! Page sections built from the motion primitives.
//!
//! Every section renders through a [`Stage`], which wraps the motion context
//! and config and records a [`Cue`] for each entrance it emits. The same
//! rendering pass therefore produces both the HTML and the page
//! choreography, so the `timeline` preview can never drift from what the
//! browser will play.
//!
//! | Module | Renders |
//! |--------|---------|
//! | [`hero`] | Badge, greeting carousel, headline, portrait, stats, links |
//! | [`about`] | Word-revealed lead and closing, paragraphs, video, wide image |
//! | [`markdown`] | One `NNN-name.md` file as a staggered block list |
//! | [`shell`] | Heading and subtitle wrapper shared by content sections |

pub mod about;
pub mod hero;
pub mod markdown;
pub mod shell;

use crate::config::MotionConfig;
use crate::motion::{
    MotionContext, ResolvedReveal, RevealSpec, StaggerContainer, StaggerSpec, Trigger, WordReveal,
    Wrapper, reveal,
};
use maud::Markup;
use std::cell::RefCell;

/// One scheduled entrance in the page choreography.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    /// Anchor id of the section the element lives in.
    pub section: String,
    pub label: String,
    pub trigger: Trigger,
    /// Seconds after the trigger.
    pub delay: f64,
    pub duration: f64,
    /// Plays only on the first trigger.
    pub once: bool,
}

impl Cue {
    /// Seconds after the trigger at which the element is at rest.
    pub fn end(&self) -> f64 {
        self.delay + self.duration
    }
}

/// Rendering context shared by all sections of one page.
pub struct Stage<'a> {
    motion: &'a MotionContext,
    config: &'a MotionConfig,
    section: RefCell<String>,
    cues: RefCell<Vec<Cue>>,
}

impl<'a> Stage<'a> {
    pub fn new(motion: &'a MotionContext, config: &'a MotionConfig) -> Self {
        Self {
            motion,
            config,
            section: RefCell::new(String::new()),
            cues: RefCell::new(Vec::new()),
        }
    }

    pub fn motion(&self) -> &'a MotionContext {
        self.motion
    }

    pub fn config(&self) -> &'a MotionConfig {
        self.config
    }

    /// Attribute subsequent cues to section `id`.
    pub fn enter(&self, id: &str) {
        *self.section.borrow_mut() = id.to_string();
    }

    /// Render one reveal and record its cue.
    pub fn reveal(
        &self,
        label: &str,
        spec: &RevealSpec,
        wrapper: Wrapper,
        class: &str,
        content: Markup,
    ) -> Markup {
        let resolved = spec.resolve(self.motion);
        self.record(label, &resolved, resolved.delay, resolved.duration);
        reveal::render(&resolved, wrapper, class, content)
    }

    /// Render a word-by-word reveal. The whole sentence is one cue spanning
    /// from the first word's start to the last word's end.
    pub fn words(
        &self,
        label: &str,
        text: &str,
        stagger: StaggerSpec,
        template: &RevealSpec,
    ) -> Markup {
        let words = WordReveal::new(text, stagger);
        let delays = words.delays();
        if let (Some(first), Some(last)) = (delays.first(), delays.last()) {
            let start = template.with_delay(*first).resolve(self.motion);
            let finish = template.with_delay(*last).resolve(self.motion);
            self.record(label, &start, start.delay, finish.end() - start.delay);
        }
        words.render(template, self.motion)
    }

    /// Render a stagger group and record one cue per child, labelled
    /// `"{label} {n}"` with `n` counting from 1.
    pub fn stagger<T>(
        &self,
        label: &str,
        container: &StaggerContainer<T>,
        class: &str,
        child: impl FnMut(&T) -> Markup,
    ) -> Markup {
        for entry in container.items() {
            let resolved = entry.spec.resolve(self.motion);
            self.record(
                &format!("{label} {}", entry.index + 1),
                &resolved,
                resolved.delay,
                resolved.duration,
            );
        }
        container.render(self.motion, class, child)
    }

    /// Cues recorded so far, in render order.
    pub fn cues(&self) -> Vec<Cue> {
        self.cues.borrow().clone()
    }

    pub fn into_cues(self) -> Vec<Cue> {
        self.cues.into_inner()
    }

    fn record(&self, label: &str, resolved: &ResolvedReveal, delay: f64, duration: f64) {
        self.cues.borrow_mut().push(Cue {
            section: self.section.borrow().clone(),
            label: label.to_string(),
            trigger: resolved.trigger,
            delay,
            duration,
            once: resolved.once,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::Direction;
    use maud::html;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn reveal_records_cue_in_current_section() {
        let motion = MotionContext::full();
        let config = MotionConfig::default();
        let stage = Stage::new(&motion, &config);
        stage.enter("about");
        let spec = RevealSpec::new(Direction::Up).with_delay(0.3);
        let html = stage
            .reveal("video", &spec, Wrapper::Block, "", html! { "x" })
            .into_string();

        assert!(html.contains("data-reveal=\"view\""));
        let cues = stage.into_cues();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].section, "about");
        assert_eq!(cues[0].label, "video");
        assert!(close(cues[0].delay, 0.3));
        assert_eq!(cues[0].trigger, Trigger::View);
    }

    #[test]
    fn words_record_one_cue_spanning_the_sentence() {
        let motion = MotionContext::full();
        let config = MotionConfig::default();
        let stage = Stage::new(&motion, &config);
        let template = RevealSpec::new(Direction::Up).with_duration(0.5);
        stage.words(
            "lead",
            "I build systems.",
            StaggerSpec::new(0.05).with_base(0.2),
            &template,
        );
        let cues = stage.cues();
        assert_eq!(cues.len(), 1);
        assert!(close(cues[0].delay, 0.2));
        assert!(close(cues[0].end(), 0.2 + 0.10 + 0.5));
    }

    #[test]
    fn empty_words_record_nothing() {
        let motion = MotionContext::full();
        let config = MotionConfig::default();
        let stage = Stage::new(&motion, &config);
        stage.words("lead", "", StaggerSpec::new(0.05), &RevealSpec::fade());
        assert!(stage.cues().is_empty());
    }

    #[test]
    fn stagger_records_numbered_cues() {
        let motion = MotionContext::full();
        let config = MotionConfig::default();
        let stage = Stage::new(&motion, &config);
        let container = StaggerContainer::new(
            StaggerSpec::new(0.1),
            RevealSpec::new(Direction::Up),
            ["a", "b", "c"],
        );
        stage.stagger("card", &container, "", |s| html! { (s) });
        let cues = stage.into_cues();
        let labels: Vec<&str> = cues.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["card 1", "card 2", "card 3"]);
        assert!(close(cues[2].delay, 0.2));
    }

    #[test]
    fn reduced_motion_cues_take_no_time() {
        let motion = MotionContext::reduced();
        let config = MotionConfig::default();
        let stage = Stage::new(&motion, &config);
        let container = StaggerContainer::new(
            StaggerSpec::new(0.1).with_base(0.5),
            RevealSpec::new(Direction::Left),
            [1, 2],
        );
        stage.stagger("card", &container, "", |n| html! { (n) });
        stage.words("w", "two words", StaggerSpec::new(0.05), &RevealSpec::fade());
        for cue in stage.into_cues() {
            assert_eq!(cue.delay, 0.0, "{}", cue.label);
            assert_eq!(cue.duration, 0.0, "{}", cue.label);
        }
    }
}
