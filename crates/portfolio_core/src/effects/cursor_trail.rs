use shared::{
    domain::{EventKind, FrameId, ListenTarget, NodeId},
    error::PageResult,
};
use tracing::debug;

use crate::{markup::px, page::Page, settings::Settings, templates};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Moves `factor` of the remaining distance toward `target`.
    pub fn approach(self, target: Point, factor: f64) -> Point {
        Point {
            x: self.x + (target.x - self.x) * factor,
            y: self.y + (target.y - self.y) * factor,
        }
    }
}

/// Decorative dot easing toward the pointer every animation frame.
#[derive(Debug)]
pub struct CursorTrail {
    node: NodeId,
    smoothing: f64,
    pointer: Point,
    position: Point,
    frame: FrameId,
}

impl CursorTrail {
    /// `None` on viewports at or below the breakpoint.
    pub fn start<P: Page + ?Sized>(page: &mut P, settings: &Settings) -> PageResult<Option<Self>> {
        let width = page.viewport_width();
        if width <= settings.trail_breakpoint {
            debug!(width, breakpoint = settings.trail_breakpoint, "cursor trail skipped");
            return Ok(None);
        }

        page.listen(ListenTarget::Document, EventKind::PointerMove)?;
        let node = page.build(&templates::cursor_trail())?;
        let body = page.body()?;
        page.append_child(body, node)?;

        let position = Point::default();
        render(page, node, position)?;
        let frame = page.request_animation_frame()?;
        Ok(Some(Self {
            node,
            smoothing: settings.trail_smoothing,
            pointer: Point::default(),
            position,
            frame,
        }))
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.pointer = Point { x, y };
    }

    pub fn on_frame<P: Page + ?Sized>(&mut self, page: &mut P, frame: FrameId) -> PageResult<bool> {
        if frame != self.frame {
            return Ok(false);
        }
        // The loop keeps running even if this frame's render fails.
        self.frame = page.request_animation_frame()?;
        self.position = self.position.approach(self.pointer, self.smoothing);
        render(page, self.node, self.position)?;
        Ok(true)
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn node(&self) -> NodeId {
        self.node
    }
}

fn render<P: Page + ?Sized>(page: &mut P, node: NodeId, position: Point) -> PageResult<()> {
    page.set_style(node, "left", &px(position.x))?;
    page.set_style(node, "top", &px(position.y))
}

#[cfg(test)]
mod tests {
    use shared::error::PageError;

    use super::*;
    use crate::{memory::MemoryPage, page::EventHost};

    #[test]
    fn failed_render_still_schedules_the_next_frame() {
        let mut page = MemoryPage::new();
        let first = page.request_animation_frame().expect("frame");
        let missing = NodeId(999);
        let mut trail = CursorTrail {
            node: missing,
            smoothing: 0.1,
            pointer: Point { x: 100.0, y: 50.0 },
            position: Point::default(),
            frame: first,
        };
        page.take_frames();

        assert_eq!(
            trail.on_frame(&mut page, first),
            Err(PageError::UnknownNode(missing))
        );
        let next = page.take_frames();
        assert_eq!(next.len(), 1);
        assert_ne!(next[0], first);
        assert!(trail.on_frame(&mut page, next[0]).is_err());
        assert_eq!(page.pending_frames(), 1);
    }
}
