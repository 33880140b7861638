//! Self-dismissing toasts.

use std::{collections::HashMap, time::Duration};

use shared::{
    domain::{EventKind, ListenTarget, NodeId, NotificationKind, TimerId},
    error::PageResult,
    protocol::EventOutcome,
};
use tracing::debug;

use crate::{
    page::{ensure_style_block, Page},
    templates::{self, NOTIFICATION_CSS, NOTIFICATION_STYLE_ID},
};

#[derive(Debug)]
pub struct NotificationCenter {
    lifetime: Duration,
    dismiss_buttons: HashMap<NodeId, NodeId>,
    expiries: HashMap<TimerId, NodeId>,
}

impl NotificationCenter {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            dismiss_buttons: HashMap::new(),
            expiries: HashMap::new(),
        }
    }

    /// Shows a toast and schedules its removal; returns the toast node.
    pub fn show<P: Page + ?Sized>(
        &mut self,
        page: &mut P,
        message: &str,
        kind: NotificationKind,
    ) -> PageResult<NodeId> {
        let toast = page.build(&templates::notification(message, kind))?;
        if let Some(button) = page.query_within(toast, "button")? {
            page.listen(ListenTarget::Node(button), EventKind::Click)?;
            self.dismiss_buttons.insert(button, toast);
        }

        ensure_style_block(page, NOTIFICATION_STYLE_ID, NOTIFICATION_CSS)?;

        let body = page.body()?;
        page.append_child(body, toast)?;

        let timer = page.set_timeout(self.lifetime)?;
        self.expiries.insert(timer, toast);
        debug!(toast = %toast, kind = kind.as_str(), "notification shown");
        Ok(toast)
    }

    pub fn on_click<P: Page + ?Sized>(
        &mut self,
        page: &mut P,
        target: NodeId,
    ) -> PageResult<EventOutcome> {
        let Some(toast) = self.dismiss_buttons.remove(&target) else {
            return Ok(EventOutcome::Ignored);
        };
        dismiss(page, toast)?;
        debug!(toast = %toast, "notification dismissed");
        Ok(EventOutcome::Handled)
    }

    /// Returns `false` when `timer` is not a notification expiry.
    pub fn on_timer<P: Page + ?Sized>(&mut self, page: &mut P, timer: TimerId) -> PageResult<bool> {
        let Some(toast) = self.expiries.remove(&timer) else {
            return Ok(false);
        };
        dismiss(page, toast)?;
        self.dismiss_buttons.retain(|_, owner| *owner != toast);
        Ok(true)
    }

    pub fn pending(&self) -> usize {
        self.expiries.len()
    }
}

/// Removal is a no-op once the toast has left the document.
fn dismiss<P: Page + ?Sized>(page: &mut P, toast: NodeId) -> PageResult<()> {
    if page.is_attached(toast) {
        page.remove(toast)?;
    }
    Ok(())
}
