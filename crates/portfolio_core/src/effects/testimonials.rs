use shared::{
    domain::{NodeId, TimerId},
    error::PageResult,
};
use tracing::debug;

use crate::{page::Page, settings::Settings};

/// Cycles emphasis across testimonial cards on a fixed interval.
#[derive(Debug)]
pub struct TestimonialRotator {
    cards: Vec<NodeId>,
    index: usize,
    timer: TimerId,
}

impl TestimonialRotator {
    /// `None` when fewer than two cards exist.
    pub fn setup<P: Page + ?Sized>(page: &mut P, settings: &Settings) -> PageResult<Option<Self>> {
        let cards = page.query_all(&settings.testimonial_selector)?;
        if cards.len() < 2 {
            debug!(count = cards.len(), "not enough testimonials to rotate");
            return Ok(None);
        }
        emphasize(page, &cards, 0)?;
        let timer = page.set_interval(settings.rotation_interval())?;
        Ok(Some(Self {
            cards,
            index: 0,
            timer,
        }))
    }

    pub fn on_timer<P: Page + ?Sized>(&mut self, page: &mut P, timer: TimerId) -> PageResult<bool> {
        if timer != self.timer {
            return Ok(false);
        }
        self.index = (self.index + 1) % self.cards.len();
        emphasize(page, &self.cards, self.index)?;
        Ok(true)
    }

    pub fn current(&self) -> usize {
        self.index
    }
}

fn emphasize<P: Page + ?Sized>(page: &mut P, cards: &[NodeId], current: usize) -> PageResult<()> {
    for (index, card) in cards.iter().enumerate() {
        let (opacity, transform) = if index == current {
            ("1", "scale(1)")
        } else {
            ("0.3", "scale(0.95)")
        };
        page.set_style(*card, "opacity", opacity)?;
        page.set_style(*card, "transform", transform)?;
    }
    Ok(())
}
