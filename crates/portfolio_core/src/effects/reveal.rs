use std::collections::HashSet;

use shared::{
    domain::{NodeId, ObserverId},
    error::PageResult,
    protocol::{EventOutcome, IntersectionEntry},
};
use tracing::debug;

use crate::{
    markup::{css_number, px},
    page::{ObserverOptions, Page},
    settings::Settings,
};

const REVEAL_TRANSITION: &str = "all 0.6s cubic-bezier(0.4, 0, 0.2, 1)";

/// Fades cards in the first time they intersect the viewport.
#[derive(Debug)]
pub struct RevealOnScroll {
    observer: ObserverId,
    hidden: HashSet<NodeId>,
}

impl RevealOnScroll {
    pub fn setup<P: Page + ?Sized>(page: &mut P, settings: &Settings) -> PageResult<Option<Self>> {
        let elements = page.query_all(&settings.reveal_selector)?;
        if elements.is_empty() {
            return Ok(None);
        }

        let offset = format!("translateY({})", px(settings.reveal_offset_px));
        for (index, element) in elements.iter().enumerate() {
            let delay = css_number(index as f64 * settings.reveal_stagger_secs);
            page.set_style(*element, "opacity", "0")?;
            page.set_style(*element, "transform", &offset)?;
            page.set_style(*element, "transition", &format!("{REVEAL_TRANSITION} {delay}s"))?;
        }

        let options = ObserverOptions {
            threshold: settings.reveal_threshold,
            root_margin: settings.reveal_root_margin.clone(),
        };
        let observer = page.observe_intersections(&options, &elements)?;
        debug!(count = elements.len(), "reveal targets observed");
        Ok(Some(Self {
            observer,
            hidden: elements.into_iter().collect(),
        }))
    }

    pub fn on_intersection<P: Page + ?Sized>(
        &mut self,
        page: &mut P,
        observer: ObserverId,
        entries: &[IntersectionEntry],
    ) -> PageResult<EventOutcome> {
        if observer != self.observer {
            return Ok(EventOutcome::Ignored);
        }
        for entry in entries.iter().filter(|entry| entry.is_intersecting) {
            if !self.hidden.remove(&entry.target) {
                continue;
            }
            page.set_style(entry.target, "opacity", "1")?;
            page.set_style(entry.target, "transform", "translateY(0)")?;
            page.unobserve(self.observer, entry.target)?;
        }
        Ok(EventOutcome::Handled)
    }

    pub fn remaining(&self) -> usize {
        self.hidden.len()
    }
}
