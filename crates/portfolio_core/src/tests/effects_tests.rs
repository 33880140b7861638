use std::time::Duration;

use shared::{
    domain::{EventKind, ListenTarget, NotificationKind},
    protocol::{EventOutcome, PageEvent},
};

use crate::{
    effects::{contact_form::acknowledgement, parallax::speed_for, photo::PHOTO_HINT},
    harness::{fixture_page, Harness},
    markup::Markup,
    memory::MemoryPage,
    page::{Dom, EventHost},
    settings::Settings,
    templates::{MODAL_STYLE_ID, NOTIFICATION_STYLE_ID},
};

fn harness() -> Harness {
    Harness::start(Settings::default(), fixture_page().expect("fixture")).expect("start")
}

fn harness_with(page: MemoryPage) -> Harness {
    Harness::start(Settings::default(), page).expect("start")
}

#[test]
fn reveal_hides_targets_with_staggered_transitions() {
    let mut h = harness();
    let targets = h
        .page_mut()
        .query_all(&Settings::default().reveal_selector)
        .expect("targets");
    assert_eq!(targets.len(), 9);

    let page = h.page();
    assert_eq!(page.style(targets[0], "opacity"), Some("0"));
    assert_eq!(page.style(targets[0], "transform"), Some("translateY(30px)"));
    assert_eq!(
        page.style(targets[0], "transition"),
        Some("all 0.6s cubic-bezier(0.4, 0, 0.2, 1) 0s")
    );
    assert_eq!(
        page.style(targets[3], "transition"),
        Some("all 0.6s cubic-bezier(0.4, 0, 0.2, 1) 0.30000000000000004s")
    );

    let observer = page.observers_of(targets[0])[0];
    let observation = page.observation(observer).expect("observation");
    assert_eq!(observation.options.threshold, 0.1);
    assert_eq!(observation.options.root_margin, "0px 0px -50px 0px");
}

#[test]
fn reveal_ignores_non_intersecting_entries() {
    let mut h = harness();
    let card = h.find(".project-card").expect("card");
    let observer = h.page().observers_of(card)[0];
    h.dispatch(PageEvent::Intersection {
        observer,
        entries: vec![shared::protocol::IntersectionEntry {
            target: card,
            is_intersecting: false,
        }],
    })
    .expect("dispatch");
    assert_eq!(h.page().style(card, "opacity"), Some("0"));
}

#[test]
fn page_without_hooks_starts_inert() {
    let mut h = harness_with(MemoryPage::new());
    let behaviors = h.app().behaviors().expect("started");
    assert!(behaviors.reveal.is_none());
    assert!(behaviors.video_modal.is_none());
    assert!(behaviors.contact_form.is_none());
    assert!(behaviors.testimonials.is_none());
    assert!(behaviors.photo.is_none());

    assert_eq!(h.scroll_to(100.0).expect("scroll"), EventOutcome::Handled);
    assert_eq!(h.run_frame().expect("frame"), 1);
}

#[test]
fn second_dom_ready_does_not_rewire() {
    let mut h = harness();
    let timers = h.page().pending_timers();
    assert_eq!(
        h.dispatch(PageEvent::DomContentLoaded).expect("dispatch"),
        EventOutcome::Ignored
    );
    assert_eq!(h.page().pending_timers(), timers);
}

#[test]
fn modal_style_block_is_inserted_once() {
    let mut h = harness();
    let trigger = h.find(".video-preview").expect("trigger");
    h.click(trigger).expect("open");
    h.click(trigger).expect("open again");

    let overlays = h.page_mut().query_all(".video-modal").expect("overlays");
    assert_eq!(overlays.len(), 2);
    let styles = h
        .page_mut()
        .query_all(&format!("#{MODAL_STYLE_ID}"))
        .expect("styles");
    assert_eq!(styles.len(), 1);
    let modal = h
        .app()
        .behaviors()
        .and_then(|behaviors| behaviors.video_modal.as_ref())
        .expect("modal wired");
    assert_eq!(modal.open_count(), 2);
}

#[test]
fn modal_close_icon_click_bubbles_to_close_button() {
    let mut h = harness();
    let trigger = h.find(".video-preview").expect("trigger");
    h.click(trigger).expect("open");
    let overlay = h.find(".video-modal").expect("overlay");
    let close = h
        .page_mut()
        .query_within(overlay, ".modal-close")
        .expect("query")
        .expect("close");
    let svg = h.page().children(close)[0];
    let path = h.page().children(svg)[0];

    assert_eq!(h.click(path).expect("click"), EventOutcome::Handled);
    assert!(!h.page().is_attached(overlay));
}

#[test]
fn modal_renders_title_and_placeholder_copy() {
    let mut h = harness();
    let trigger = h.find(".video-preview").expect("trigger");
    h.click(trigger).expect("open");
    let overlay = h.find(".video-modal").expect("overlay");
    let text = h.page().text_content(overlay);
    assert!(text.contains("Training Showcase"));
    assert!(text.contains("Dynamic Learning • Google-Style Upskilling • Interactive Sessions"));
    assert!(text.contains("Replace this with your actual training video or YouTube embed"));
}

#[test]
fn contact_form_falls_back_to_typed_controls() {
    let mut page = MemoryPage::new();
    let body = page.body().expect("body");
    let form = page
        .append_markup(
            body,
            &Markup::new("form")
                .class("contact-form")
                .child(Markup::new("input").attr("type", "text"))
                .child(Markup::new("input").attr("type", "email"))
                .child(Markup::new("textarea")),
        )
        .expect("form");
    let mut h = harness_with(page);
    let name = h.find("input[type=\"text\"]").expect("name");
    h.fill(name, "Grace").expect("fill");

    assert_eq!(h.submit(form).expect("submit"), EventOutcome::DefaultPrevented);
    let toast = h.find(".notification-success").expect("toast");
    assert!(h.page().text_content(toast).contains(&acknowledgement("Grace")));
}

#[test]
fn contact_form_without_name_interpolates_empty_string() {
    let mut h = harness();
    let form = h.find(".contact-form").expect("form");
    h.submit(form).expect("submit");
    let toast = h.find(".notification").expect("toast");
    assert!(h
        .page()
        .text_content(toast)
        .contains("Thanks ! Your message has been received."));
}

#[test]
fn notification_markup_is_text_not_parsed_html() {
    let mut h = harness();
    let form = h.find(".contact-form").expect("form");
    let name = h.find("input[type=\"text\"]").expect("name");
    h.fill(name, "<b>Eve</b>").expect("fill");
    h.submit(form).expect("submit");

    assert!(h.page_mut().query_all("b").expect("query").is_empty());
    let html = h.body_html().expect("html");
    assert!(html.contains("Thanks &lt;b&gt;Eve&lt;/b&gt;!"));
}

#[test]
fn notification_style_block_is_shared_by_all_toasts() {
    let mut h = harness();
    let photo = h.find("#photoPlaceholder").expect("photo");
    h.click(photo).expect("first");
    h.click(photo).expect("second");

    assert_eq!(h.page_mut().query_all(".notification").expect("toasts").len(), 2);
    assert_eq!(
        h.page_mut()
            .query_all(&format!("#{NOTIFICATION_STYLE_ID}"))
            .expect("styles")
            .len(),
        1
    );
}

#[test]
fn photo_click_shows_info_toast() {
    let mut h = harness();
    let photo = h.find("#photoPlaceholder").expect("photo");
    assert_eq!(h.click(photo).expect("click"), EventOutcome::Handled);

    let toast = h.find(".notification").expect("toast");
    assert!(h.page().has_class(toast, "notification-info"));
    assert_eq!(h.page().text_content(toast), PHOTO_HINT);
}

#[test]
fn notification_kind_defaults_to_info() {
    let mut page = MemoryPage::new();
    let mut center = crate::effects::notifications::NotificationCenter::new(Duration::from_secs(5));
    let toast = center
        .show(&mut page, "hello", NotificationKind::default())
        .expect("show");
    assert!(page.has_class(toast, "notification-info"));
    assert_eq!(center.pending(), 1);
}

#[test]
fn smooth_scroll_targets_matching_section() {
    let mut h = harness();
    let link = h.find("a[href=\"#projects\"]").expect("link");
    let section = h.find("#projects").expect("section");

    assert_eq!(h.click(link).expect("click"), EventOutcome::DefaultPrevented);
    assert_eq!(h.page().scrolled_into_view(), &[section]);
}

#[test]
fn bare_hash_link_is_suppressed_without_scrolling() {
    let mut page = fixture_page().expect("fixture");
    let body = page.body().expect("body");
    let top = page
        .append_markup(body, &Markup::new("a").attr("href", "#").text("Top"))
        .expect("link");
    let mut h = harness_with(page);

    assert_eq!(h.click(top).expect("click"), EventOutcome::DefaultPrevented);
    assert!(h.page().scrolled_into_view().is_empty());
}

#[test]
fn parallax_coalesces_scroll_bursts_into_one_frame() {
    let mut h = harness();
    h.scroll_to(100.0).expect("scroll");
    h.scroll_to(150.0).expect("scroll");
    h.scroll_to(200.0).expect("scroll");
    assert_eq!(h.page().pending_frames(), 1);
    assert!(h
        .app()
        .behaviors()
        .and_then(|behaviors| behaviors.parallax.as_ref())
        .is_some_and(|parallax| parallax.is_ticking()));

    assert_eq!(h.run_frame().expect("frame"), 1);
    let shapes = h.page_mut().query_all(".floating").expect("shapes");
    let page = h.page();
    assert_eq!(page.style(shapes[0], "transform"), Some("translateY(-100px)"));
    assert_eq!(page.style(shapes[1], "transform"), Some("translateY(-120px)"));
    assert_eq!(page.style(shapes[2], "transform"), Some("translateY(-140px)"));
    assert!(!h
        .app()
        .behaviors()
        .and_then(|behaviors| behaviors.parallax.as_ref())
        .is_some_and(|parallax| parallax.is_ticking()));

    h.scroll_to(0.0).expect("scroll");
    h.run_frame().expect("frame");
    assert_eq!(h.page().style(shapes[0], "transform"), Some("translateY(0px)"));
}

#[test]
fn parallax_moves_svg_shapes_alongside_html_ones() {
    let mut page = MemoryPage::new();
    let body = page.body().expect("body");
    let circle = page
        .append_markup(body, &Markup::svg("svg").class("floating"))
        .expect("svg");
    let square = page
        .append_markup(body, &Markup::new("div").class("floating"))
        .expect("div");
    let mut h = harness_with(page);

    h.scroll_to(100.0).expect("scroll");
    assert_eq!(h.run_frame().expect("frame"), 1);
    assert_eq!(h.page().style(circle, "transform"), Some("translateY(-50px)"));
    assert_eq!(h.page().style(square, "transform"), Some("translateY(-60px)"));
}

#[test]
fn parallax_speed_grows_linearly() {
    assert_eq!(speed_for(0.5, 0.1, 0), 0.5);
    assert_eq!(speed_for(0.5, 0.1, 2), 0.7);
}

#[test]
fn failed_setup_leaves_other_behaviors_running() {
    let settings = Settings {
        testimonial_selector: "[".to_string(),
        ..Settings::default()
    };
    let mut h = Harness::start(settings, fixture_page().expect("fixture")).expect("start");

    let behaviors = h.app().behaviors().expect("started");
    assert!(behaviors.testimonials.is_none());
    assert!(behaviors.reveal.is_some());
    assert!(behaviors.video_modal.is_some());
    assert!(behaviors.contact_form.is_some());
    assert!(behaviors.smooth_scroll.is_some());
    assert!(behaviors.parallax.is_some());
    assert!(behaviors.photo.is_some());

    let link = h.find("a[href=\"#contact\"]").expect("link");
    assert_eq!(h.click(link).expect("click"), EventOutcome::DefaultPrevented);
    let contact = h.find("#contact").expect("section");
    assert_eq!(h.page().scrolled_into_view(), &[contact]);
}

#[test]
fn single_testimonial_is_left_alone() {
    let mut page = MemoryPage::new();
    let body = page.body().expect("body");
    let card = page
        .append_markup(body, &Markup::new("div").class("testimonial-card"))
        .expect("card");
    let mut h = harness_with(page);
    assert!(h.app().behaviors().expect("started").testimonials.is_none());
    assert_eq!(h.page().pending_timers(), 0);

    h.advance(Duration::from_secs(20)).expect("advance");
    assert_eq!(h.page().style(card, "transform"), Some("translateY(30px)"));
}

#[test]
fn load_marks_body_and_starts_trail_on_wide_viewports() {
    let mut h = harness();
    h.load().expect("load");
    let body = h.page().body().expect("body");
    assert!(h.page().has_class(body, "loaded"));
    assert!(h
        .page()
        .is_listening(ListenTarget::Document, EventKind::PointerMove));

    let trail = h.find(".cursor-trail").expect("trail");
    assert_eq!(h.page().style(trail, "position"), Some("fixed"));
    assert_eq!(h.page().style(trail, "left"), Some("0px"));

    h.move_pointer(100.0, 50.0).expect("move");
    h.run_frame().expect("frame");
    assert_eq!(h.page().style(trail, "left"), Some("10px"));
    assert_eq!(h.page().style(trail, "top"), Some("5px"));

    h.run_frame().expect("frame");
    assert_eq!(h.page().style(trail, "left"), Some("19px"));
    assert_eq!(h.page().style(trail, "top"), Some("9.5px"));
    assert_eq!(h.page().pending_frames(), 1);
}

#[test]
fn narrow_viewport_skips_trail() {
    let page = fixture_page().expect("fixture").with_viewport_width(768.0);
    let mut h = harness_with(page);
    h.load().expect("load");
    assert!(h.app().cursor_trail().is_none());
    assert!(h.find(".cursor-trail").is_err());
    let body = h.page().body().expect("body");
    assert!(h.page().has_class(body, "loaded"));
}

#[test]
fn foreign_timers_and_frames_are_ignored() {
    let mut h = harness();
    let stray = h
        .page_mut()
        .set_timeout(Duration::from_millis(1))
        .expect("timer");
    assert_eq!(
        h.dispatch(PageEvent::Timer(stray)).expect("dispatch"),
        EventOutcome::Ignored
    );
    let frame = h.page_mut().request_animation_frame().expect("frame");
    assert_eq!(
        h.dispatch(PageEvent::AnimationFrame(frame)).expect("dispatch"),
        EventOutcome::Ignored
    );
}
