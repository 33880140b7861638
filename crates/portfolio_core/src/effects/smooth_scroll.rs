use std::collections::HashSet;

use shared::{
    domain::{EventKind, ListenTarget, NodeId},
    error::PageResult,
    protocol::EventOutcome,
};
use tracing::debug;

use crate::{page::Page, settings::Settings};

/// Replaces fragment-link jumps with smooth scrolling.
///
/// The default jump is suppressed even when the fragment resolves to nothing,
/// so links like `href="#"` become inert.
#[derive(Debug)]
pub struct SmoothScroll {
    anchors: HashSet<NodeId>,
}

impl SmoothScroll {
    pub fn setup<P: Page + ?Sized>(page: &mut P, settings: &Settings) -> PageResult<Self> {
        let anchors = page.query_all(&settings.anchor_selector)?;
        for anchor in &anchors {
            page.listen(ListenTarget::Node(*anchor), EventKind::Click)?;
        }
        debug!(count = anchors.len(), "smooth scrolling wired");
        Ok(Self {
            anchors: anchors.into_iter().collect(),
        })
    }

    pub fn on_click<P: Page + ?Sized>(
        &self,
        page: &mut P,
        target: NodeId,
    ) -> PageResult<EventOutcome> {
        if !self.anchors.contains(&target) {
            return Ok(EventOutcome::Ignored);
        }

        let href = page.attribute(target, "href")?.unwrap_or_default();
        match page.query(&href) {
            Ok(Some(destination)) => page.scroll_into_view(destination)?,
            Ok(None) => debug!(%href, "fragment target missing; click suppressed"),
            Err(err) if err.is_invalid_selector() => {
                debug!(%href, error = %err, "fragment is not a selector; click suppressed")
            }
            Err(err) => return Err(err),
        }
        Ok(EventOutcome::DefaultPrevented)
    }
}
