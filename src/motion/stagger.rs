//! Incremental delays across an ordered group.
//!
//! Child `i` of a group starts `base + i * stagger` seconds after the
//! group's trigger. Starts are therefore non-decreasing in child order, and
//! reordering the children reorders their timing identically. Completion
//! order is not part of the contract.

use super::reveal::{self, RevealSpec, Wrapper};
use super::{MotionContext, non_negative};
use maud::{Markup, html};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StaggerSpec {
    stagger: f64,
    base: f64,
}

impl StaggerSpec {
    /// Negative or non-finite staggers are clamped to zero.
    pub fn new(stagger: f64) -> Self {
        Self {
            stagger: non_negative(stagger),
            base: 0.0,
        }
    }

    /// Offset added to every child's delay. Clamped like the stagger.
    pub fn with_base(mut self, base: f64) -> Self {
        self.base = non_negative(base);
        self
    }

    pub fn stagger(&self) -> f64 {
        self.stagger
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    /// Saturates at `f64::MAX` so huge staggers stay finite and ordered.
    pub fn delay_for(&self, index: usize) -> f64 {
        (self.base + index as f64 * self.stagger).min(f64::MAX)
    }

    pub fn delays(&self, count: usize) -> Vec<f64> {
        (0..count).map(|i| self.delay_for(i)).collect()
    }
}

/// One child of a [`StaggerContainer`] with its effective entrance.
#[derive(Debug, Clone)]
pub struct StaggerItem<T> {
    pub index: usize,
    pub delay: f64,
    pub spec: RevealSpec,
    pub item: T,
}

/// Ordered children sharing one entrance template.
///
/// The template supplies direction, duration, distance, trigger and ease;
/// its delay is replaced by the stagger delay of each child.
#[derive(Debug, Clone)]
pub struct StaggerContainer<T> {
    spec: StaggerSpec,
    template: RevealSpec,
    items: Vec<T>,
}

impl<T> StaggerContainer<T> {
    pub fn new(spec: StaggerSpec, template: RevealSpec, items: impl IntoIterator<Item = T>) -> Self {
        Self {
            spec,
            template,
            items: items.into_iter().collect(),
        }
    }

    pub fn spec(&self) -> StaggerSpec {
        self.spec
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = StaggerItem<&T>> + '_ {
        self.items.iter().enumerate().map(|(index, item)| {
            let delay = self.spec.delay_for(index);
            StaggerItem {
                index,
                delay,
                spec: self.template.with_delay(delay),
                item,
            }
        })
    }

    pub fn into_items(self) -> Vec<StaggerItem<T>> {
        let spec = self.spec;
        let template = self.template;
        self.items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let delay = spec.delay_for(index);
                StaggerItem {
                    index,
                    delay,
                    spec: template.with_delay(delay),
                    item,
                }
            })
            .collect()
    }

    /// Render every child in its own reveal wrapper, inside `div.stagger`.
    pub fn render(
        &self,
        motion: &MotionContext,
        class: &str,
        mut child: impl FnMut(&T) -> Markup,
    ) -> Markup {
        if self.is_empty() {
            return html! {};
        }
        let class = if class.is_empty() {
            "stagger".to_string()
        } else {
            format!("stagger {class}")
        };
        html! {
            div class=(class) {
                @for entry in self.items() {
                    (reveal::render(
                        &entry.spec.resolve(motion),
                        Wrapper::Block,
                        "stagger-item",
                        child(entry.item),
                    ))
                }
            }
        }
    }
}
