use crate::domain::{FrameId, NodeId, ObserverId, TimerId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: NodeId,
    pub is_intersecting: bool,
}

/// Everything a host can deliver to the page controller.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    DomContentLoaded,
    Load,
    /// Delivered once per listened element on the bubbling path, innermost first.
    Click {
        target: NodeId,
    },
    Submit {
        form: NodeId,
    },
    Scroll,
    PointerMove {
        x: f64,
        y: f64,
    },
    Intersection {
        observer: ObserverId,
        entries: Vec<IntersectionEntry>,
    },
    Timer(TimerId),
    AnimationFrame(FrameId),
}

impl PageEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::DomContentLoaded => "dom_content_loaded",
            Self::Load => "load",
            Self::Click { .. } => "click",
            Self::Submit { .. } => "submit",
            Self::Scroll => "scroll",
            Self::PointerMove { .. } => "pointer_move",
            Self::Intersection { .. } => "intersection",
            Self::Timer(_) => "timer",
            Self::AnimationFrame(_) => "animation_frame",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventOutcome {
    #[default]
    Ignored,
    Handled,
    /// The host must suppress the browser's default action.
    DefaultPrevented,
}

impl EventOutcome {
    pub fn prevents_default(self) -> bool {
        self == Self::DefaultPrevented
    }

    /// Combines outcomes of listeners fired for the same DOM event.
    pub fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::DefaultPrevented, _) | (_, Self::DefaultPrevented) => Self::DefaultPrevented,
            (Self::Handled, _) | (_, Self::Handled) => Self::Handled,
            _ => Self::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EventOutcome;

    #[test]
    fn merged_outcome_keeps_strongest_effect() {
        assert_eq!(
            EventOutcome::Handled.merge(EventOutcome::DefaultPrevented),
            EventOutcome::DefaultPrevented
        );
        assert_eq!(
            EventOutcome::Ignored.merge(EventOutcome::Handled),
            EventOutcome::Handled
        );
        assert!(!EventOutcome::Ignored
            .merge(EventOutcome::Ignored)
            .prevents_default());
    }
}
