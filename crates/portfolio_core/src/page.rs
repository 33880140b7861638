//! Seams between the page effects and whatever document hosts them.
//!
//! The browser host implements these over `web-sys`; [`crate::memory::MemoryPage`]
//! implements them in memory for tests and the replay tool.

use std::time::Duration;

use shared::{
    domain::{EventKind, FrameId, ListenTarget, NodeId, ObserverId, TimerId},
    error::PageResult,
};

use crate::markup::Markup;

#[derive(Debug, Clone, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub root_margin: String,
}

pub trait Dom {
    fn head(&self) -> PageResult<NodeId>;
    fn body(&self) -> PageResult<NodeId>;

    /// Attached elements matching `selector`, in document order.
    fn query_all(&mut self, selector: &str) -> PageResult<Vec<NodeId>>;

    fn query(&mut self, selector: &str) -> PageResult<Option<NodeId>> {
        Ok(self.query_all(selector)?.into_iter().next())
    }

    /// First descendant of `scope` matching `selector`.
    fn query_within(&mut self, scope: NodeId, selector: &str) -> PageResult<Option<NodeId>>;

    fn element_by_id(&mut self, id: &str) -> PageResult<Option<NodeId>>;

    fn attribute(&self, node: NodeId, name: &str) -> PageResult<Option<String>>;

    /// Materializes a detached subtree and returns its root.
    fn build(&mut self, markup: &Markup) -> PageResult<NodeId>;

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> PageResult<()>;

    /// Detaches `node` and forgets listeners registered on its subtree; fails
    /// with `PageError::Detached` if it has no parent.
    fn remove(&mut self, node: NodeId) -> PageResult<()>;

    fn is_attached(&self, node: NodeId) -> bool;

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> PageResult<()>;

    fn add_class(&mut self, node: NodeId, class: &str) -> PageResult<()>;

    /// Form-data lookup by control name; `None` when no control carries it.
    fn form_field(&self, form: NodeId, name: &str) -> PageResult<Option<String>>;

    /// Current value of an input or textarea.
    fn control_value(&self, control: NodeId) -> PageResult<Option<String>>;

    fn reset_form(&mut self, form: NodeId) -> PageResult<()>;

    /// Smoothly scrolls so the top of `node` aligns with the top of the viewport.
    fn scroll_into_view(&mut self, node: NodeId) -> PageResult<()>;

    fn scroll_offset(&self) -> f64;

    fn viewport_width(&self) -> f64;
}

pub trait EventHost {
    fn listen(&mut self, target: ListenTarget, kind: EventKind) -> PageResult<()>;

    fn observe_intersections(
        &mut self,
        options: &ObserverOptions,
        nodes: &[NodeId],
    ) -> PageResult<ObserverId>;

    fn unobserve(&mut self, observer: ObserverId, node: NodeId) -> PageResult<()>;

    fn set_timeout(&mut self, delay: Duration) -> PageResult<TimerId>;

    fn set_interval(&mut self, period: Duration) -> PageResult<TimerId>;

    fn request_animation_frame(&mut self) -> PageResult<FrameId>;
}

pub trait Page: Dom + EventHost {}

impl<T: Dom + EventHost> Page for T {}

/// Appends a `<style id=..>` block to the head unless one with that id exists.
pub fn ensure_style_block<P: Dom + ?Sized>(page: &mut P, id: &str, css: &str) -> PageResult<bool> {
    if page.element_by_id(id)?.is_some() {
        return Ok(false);
    }
    let style = page.build(&crate::templates::style_block(id, css))?;
    let head = page.head()?;
    page.append_child(head, style)?;
    Ok(true)
}
