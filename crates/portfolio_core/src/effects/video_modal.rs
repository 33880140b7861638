use std::collections::HashMap;

use shared::{
    domain::{EventKind, ListenTarget, NodeId},
    error::PageResult,
    protocol::EventOutcome,
};
use tracing::debug;

use crate::{
    page::{ensure_style_block, Page},
    settings::Settings,
    templates::{self, MODAL_CSS, MODAL_STYLE_ID},
};

#[derive(Debug)]
pub struct VideoModal {
    trigger: NodeId,
    /// Backdrop and close control of every open overlay, keyed to the overlay.
    closers: HashMap<NodeId, NodeId>,
}

impl VideoModal {
    pub fn setup<P: Page + ?Sized>(page: &mut P, settings: &Settings) -> PageResult<Option<Self>> {
        let Some(trigger) = page.query(&settings.video_trigger_selector)? else {
            debug!(selector = %settings.video_trigger_selector, "no video trigger; modal disabled");
            return Ok(None);
        };
        page.listen(ListenTarget::Node(trigger), EventKind::Click)?;
        Ok(Some(Self {
            trigger,
            closers: HashMap::new(),
        }))
    }

    pub fn on_click<P: Page + ?Sized>(
        &mut self,
        page: &mut P,
        target: NodeId,
    ) -> PageResult<EventOutcome> {
        if target == self.trigger {
            self.open(page)?;
            return Ok(EventOutcome::Handled);
        }
        let Some(overlay) = self.closers.get(&target).copied() else {
            return Ok(EventOutcome::Ignored);
        };
        self.close(page, overlay)?;
        Ok(EventOutcome::Handled)
    }

    /// Opens a new overlay. Repeated opens stack overlays; the style block is shared.
    pub fn open<P: Page + ?Sized>(&mut self, page: &mut P) -> PageResult<NodeId> {
        let overlay = page.build(&templates::video_modal())?;
        for selector in [".modal-backdrop", ".modal-close"] {
            if let Some(closer) = page.query_within(overlay, selector)? {
                page.listen(ListenTarget::Node(closer), EventKind::Click)?;
                self.closers.insert(closer, overlay);
            }
        }

        ensure_style_block(page, MODAL_STYLE_ID, MODAL_CSS)?;
        let body = page.body()?;
        page.append_child(body, overlay)?;
        debug!(overlay = %overlay, "video modal opened");
        Ok(overlay)
    }

    fn close<P: Page + ?Sized>(&mut self, page: &mut P, overlay: NodeId) -> PageResult<()> {
        self.closers.retain(|_, owner| *owner != overlay);
        if page.is_attached(overlay) {
            page.remove(overlay)?;
        }
        debug!(overlay = %overlay, "video modal closed");
        Ok(())
    }

    pub fn open_count(&self) -> usize {
        let mut overlays: Vec<_> = self.closers.values().collect();
        overlays.sort();
        overlays.dedup();
        overlays.len()
    }
}
