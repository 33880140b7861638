use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(NodeId);
id_newtype!(TimerId);
id_newtype!(FrameId);
id_newtype!(ObserverId);

/// Visual severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenTarget {
    Window,
    Document,
    Node(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Click,
    Submit,
    Scroll,
    PointerMove,
}

impl EventKind {
    /// DOM event type name used when registering listeners.
    pub fn dom_name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Submit => "submit",
            Self::Scroll => "scroll",
            Self::PointerMove => "mousemove",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_kind_defaults_to_info() {
        assert_eq!(NotificationKind::default(), NotificationKind::Info);
        assert_eq!(NotificationKind::Success.as_str(), "success");
    }

    #[test]
    fn notification_kind_uses_snake_case_on_the_wire() {
        let kind: NotificationKind = serde_json::from_str("\"success\"").expect("kind");
        assert_eq!(kind, NotificationKind::Success);
    }

    #[test]
    fn pointer_move_listens_for_mousemove() {
        assert_eq!(EventKind::PointerMove.dom_name(), "mousemove");
    }
}
