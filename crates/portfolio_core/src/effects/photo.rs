use shared::{
    domain::{EventKind, ListenTarget, NodeId, NotificationKind},
    error::PageResult,
    protocol::EventOutcome,
};

use crate::{effects::notifications::NotificationCenter, page::Page, settings::Settings};

pub const PHOTO_HINT: &str = "Photo placeholder clicked! Replace with your actual photo.";

#[derive(Debug)]
pub struct PhotoPlaceholder {
    node: NodeId,
}

impl PhotoPlaceholder {
    pub fn setup<P: Page + ?Sized>(page: &mut P, settings: &Settings) -> PageResult<Option<Self>> {
        let Some(node) = page.element_by_id(&settings.photo_placeholder_id)? else {
            return Ok(None);
        };
        page.listen(ListenTarget::Node(node), EventKind::Click)?;
        Ok(Some(Self { node }))
    }

    pub fn on_click<P: Page + ?Sized>(
        &self,
        page: &mut P,
        target: NodeId,
        notifications: &mut NotificationCenter,
    ) -> PageResult<EventOutcome> {
        if target != self.node {
            return Ok(EventOutcome::Ignored);
        }
        notifications.show(page, PHOTO_HINT, NotificationKind::Info)?;
        Ok(EventOutcome::Handled)
    }
}
