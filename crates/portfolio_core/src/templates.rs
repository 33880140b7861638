//! Markup and style sheets injected by the page effects.

use shared::domain::NotificationKind;

use crate::markup::Markup;

pub const MODAL_STYLE_ID: &str = "video-modal-styles";
pub const NOTIFICATION_STYLE_ID: &str = "notification-styles";

pub const MODAL_TITLE: &str = "Training Showcase";
pub const MODAL_TAGLINE: &str = "Dynamic Learning • Google-Style Upskilling • Interactive Sessions";
pub const MODAL_HINT: &str = "Replace this with your actual training video or YouTube embed";

const CLOSE_ICON_PATH: &str = "M18 6L6 18M6 6l12 12";
const PLAY_ICON_PATH: &str = "M8 5v14l11-7z";

pub const MODAL_CSS: &str = "
    .video-modal {
        position: fixed;
        top: 0;
        left: 0;
        width: 100%;
        height: 100%;
        z-index: 10000;
        display: flex;
        align-items: center;
        justify-content: center;
        animation: modalFadeIn 0.3s ease;
    }
    .modal-backdrop {
        position: absolute;
        top: 0;
        left: 0;
        width: 100%;
        height: 100%;
        background: rgba(0, 0, 0, 0.8);
        backdrop-filter: blur(10px);
    }
    .modal-content {
        position: relative;
        width: 90%;
        max-width: 800px;
        border-radius: 16px;
        overflow: hidden;
        animation: modalSlideIn 0.3s ease;
    }
    .modal-header {
        display: flex;
        justify-content: space-between;
        align-items: center;
        padding: 1.5rem;
        border-bottom: 1px solid rgba(255, 255, 255, 0.1);
    }
    .modal-header h3 {
        color: white;
        margin: 0;
        font-weight: 600;
    }
    .modal-close {
        background: none;
        border: none;
        color: rgba(255, 255, 255, 0.7);
        cursor: pointer;
        padding: 0.5rem;
        border-radius: 8px;
        transition: all 0.3s ease;
    }
    .modal-close:hover {
        background: rgba(255, 255, 255, 0.1);
        color: white;
    }
    .modal-body {
        padding: 1.5rem;
    }
    .video-placeholder-large {
        height: 400px;
        background: linear-gradient(135deg, rgba(79, 172, 254, 0.2) 0%, rgba(167, 139, 250, 0.2) 100%);
        border-radius: 12px;
        display: flex;
        flex-direction: column;
        align-items: center;
        justify-content: center;
        text-align: center;
        color: white;
        gap: 1rem;
    }
    .play-button-large {
        width: 80px;
        height: 80px;
        background: rgba(255, 255, 255, 0.2);
        border-radius: 50%;
        display: flex;
        align-items: center;
        justify-content: center;
        backdrop-filter: blur(10px);
        cursor: pointer;
        transition: all 0.3s ease;
    }
    .play-button-large:hover {
        background: rgba(255, 255, 255, 0.3);
        transform: scale(1.1);
    }
    @keyframes modalFadeIn {
        from { opacity: 0; }
        to { opacity: 1; }
    }
    @keyframes modalSlideIn {
        from { transform: translateY(30px) scale(0.95); }
        to { transform: translateY(0) scale(1); }
    }
";

pub const NOTIFICATION_CSS: &str = "
    .notification {
        position: fixed;
        top: 2rem;
        right: 2rem;
        z-index: 10001;
        animation: notificationSlideIn 0.3s ease;
    }
    .notification-content {
        background: rgba(255, 255, 255, 0.1);
        backdrop-filter: blur(20px);
        border: 1px solid rgba(255, 255, 255, 0.2);
        border-radius: 12px;
        padding: 1rem 1.5rem;
        color: white;
        display: flex;
        align-items: center;
        gap: 1rem;
        box-shadow: 0 10px 25px rgba(0, 0, 0, 0.2);
    }
    .notification-success .notification-content {
        border-color: rgba(34, 197, 94, 0.3);
        background: rgba(34, 197, 94, 0.1);
    }
    .notification button {
        background: none;
        border: none;
        color: rgba(255, 255, 255, 0.7);
        cursor: pointer;
        padding: 0.25rem;
        border-radius: 4px;
        transition: all 0.3s ease;
    }
    .notification button:hover {
        background: rgba(255, 255, 255, 0.1);
        color: white;
    }
    @keyframes notificationSlideIn {
        from { transform: translateX(100%); opacity: 0; }
        to { transform: translateX(0); opacity: 1; }
    }
";

const TRAIL_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("width", "20px"),
    ("height", "20px"),
    (
        "background",
        "radial-gradient(circle, rgba(79, 172, 254, 0.3) 0%, transparent 70%)",
    ),
    ("border-radius", "50%"),
    ("pointer-events", "none"),
    ("z-index", "9999"),
    ("transition", "opacity 0.3s ease"),
];

pub fn style_block(id: &str, css: &str) -> Markup {
    Markup::new("style").id(id).text(css)
}

fn icon(size: u32, path: Markup) -> Markup {
    Markup::svg("svg")
        .attr("width", size.to_string())
        .attr("height", size.to_string())
        .attr("viewBox", "0 0 24 24")
        .attr("fill", "none")
        .child(path)
}

fn close_icon(size: u32) -> Markup {
    icon(
        size,
        Markup::svg("path")
            .attr("d", CLOSE_ICON_PATH)
            .attr("stroke", "currentColor")
            .attr("stroke-width", "2")
            .attr("stroke-linecap", "round"),
    )
}

/// Overlay with backdrop, header (title + close control) and placeholder body.
pub fn video_modal() -> Markup {
    let header = Markup::new("div")
        .class("modal-header")
        .child(Markup::new("h3").text(MODAL_TITLE))
        .child(Markup::new("button").class("modal-close").child(close_icon(24)));

    let play_button = Markup::new("div").class("play-button-large").child(icon(
        48,
        Markup::svg("path")
            .attr("d", PLAY_ICON_PATH)
            .attr("fill", "currentColor"),
    ));

    let body = Markup::new("div").class("modal-body").child(
        Markup::new("div")
            .class("video-placeholder-large")
            .child(play_button)
            .child(Markup::new("p").text(MODAL_TAGLINE))
            .child(Markup::new("small").text(MODAL_HINT)),
    );

    Markup::new("div")
        .class("video-modal")
        .child(Markup::new("div").class("modal-backdrop"))
        .child(
            Markup::new("div")
                .class("modal-content glass")
                .child(header)
                .child(body),
        )
}

pub fn notification(message: &str, kind: NotificationKind) -> Markup {
    Markup::new("div")
        .class(format!("notification notification-{}", kind.as_str()))
        .child(
            Markup::new("div")
                .class("notification-content")
                .child(Markup::new("span").text(message))
                .child(Markup::new("button").child(close_icon(16))),
        )
}

pub fn cursor_trail() -> Markup {
    TRAIL_STYLE
        .iter()
        .fold(Markup::new("div").class("cursor-trail"), |markup, (property, value)| {
            markup.style(*property, *value)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_markup_carries_kind_class_and_message() {
        let html = notification("Done", NotificationKind::Success).to_html();
        assert!(html.starts_with("<div class=\"notification notification-success\">"));
        assert!(html.contains("<span>Done</span>"));
        assert!(html.contains("<button><svg width=\"16\" height=\"16\""));
    }

    #[test]
    fn modal_nests_backdrop_and_content_under_overlay() {
        let modal = video_modal();
        let html = modal.to_html();
        assert!(html.starts_with("<div class=\"video-modal\"><div class=\"modal-backdrop\"></div>"));
        assert!(html.contains("<h3>Training Showcase</h3>"));
        assert!(html.contains("<p>Dynamic Learning • Google-Style Upskilling • Interactive Sessions</p>"));
        assert!(html.contains("<small>Replace this with your actual training video or YouTube embed</small>"));
    }

    #[test]
    fn trail_is_fixed_and_ignores_pointer_events() {
        let trail = cursor_trail();
        assert!(trail
            .styles()
            .iter()
            .any(|(property, value)| property == "pointer-events" && value == "none"));
        assert_eq!(trail.styles().len(), 8);
    }
}
