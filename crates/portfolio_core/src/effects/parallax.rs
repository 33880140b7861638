use shared::{
    domain::{EventKind, FrameId, ListenTarget},
    error::PageResult,
    protocol::EventOutcome,
};

use crate::{markup::px, page::Page, settings::Settings};

pub fn speed_for(base: f64, step: f64, index: usize) -> f64 {
    base + index as f64 * step
}

/// Scroll-linked vertical offsets for decorative elements, recomputed at most
/// once per animation frame.
#[derive(Debug)]
pub struct Parallax {
    selector: String,
    base_speed: f64,
    speed_step: f64,
    pending: Option<FrameId>,
}

impl Parallax {
    pub fn setup<P: Page + ?Sized>(page: &mut P, settings: &Settings) -> PageResult<Self> {
        page.listen(ListenTarget::Window, EventKind::Scroll)?;
        Ok(Self {
            selector: settings.parallax_selector.clone(),
            base_speed: settings.parallax_base_speed,
            speed_step: settings.parallax_speed_step,
            pending: None,
        })
    }

    pub fn on_scroll<P: Page + ?Sized>(&mut self, page: &mut P) -> PageResult<EventOutcome> {
        if self.pending.is_none() {
            self.pending = Some(page.request_animation_frame()?);
        }
        Ok(EventOutcome::Handled)
    }

    pub fn on_frame<P: Page + ?Sized>(&mut self, page: &mut P, frame: FrameId) -> PageResult<bool> {
        if self.pending != Some(frame) {
            return Ok(false);
        }
        self.pending = None;

        let scrolled = page.scroll_offset();
        for (index, element) in page.query_all(&self.selector)?.into_iter().enumerate() {
            let offset = -(scrolled * speed_for(self.base_speed, self.speed_step, index));
            page.set_style(element, "transform", &format!("translateY({})", px(offset)))?;
        }
        Ok(true)
    }

    pub fn is_ticking(&self) -> bool {
        self.pending.is_some()
    }
}
