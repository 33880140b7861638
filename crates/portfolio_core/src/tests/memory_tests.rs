use super::*;

fn form_page() -> (MemoryPage, NodeId) {
    let mut page = MemoryPage::new();
    let form = page
        .append_markup(
            BODY,
            &Markup::new("form")
                .class("contact-form")
                .child(Markup::new("input").attr("type", "text").attr("name", "name"))
                .child(Markup::new("input").attr("type", "email").attr("value", "me@x.com"))
                .child(Markup::new("textarea").text("draft")),
        )
        .expect("form");
    (page, form)
}

#[test]
fn queries_return_attached_elements_in_document_order() {
    let mut page = MemoryPage::new();
    let first = page
        .append_markup(BODY, &Markup::new("div").class("floating"))
        .expect("first");
    let section = page
        .append_markup(
            BODY,
            &Markup::new("section").child(Markup::new("div").class("floating")),
        )
        .expect("section");
    let nested = page.children(section)[0];

    assert_eq!(page.query_all(".floating").expect("query"), vec![first, nested]);

    page.remove(section).expect("remove");
    assert_eq!(page.query_all(".floating").expect("query"), vec![first]);
    assert!(!page.is_attached(nested));
}

#[test]
fn removal_forgets_listeners_on_the_subtree() {
    let mut page = MemoryPage::new();
    let toast = page
        .append_markup(BODY, &Markup::new("div").child(Markup::new("button")))
        .expect("toast");
    let button = page.children(toast)[0];
    page.listen(ListenTarget::Node(button), EventKind::Click)
        .expect("listen");
    page.listen(ListenTarget::Document, EventKind::PointerMove)
        .expect("listen");

    page.remove(toast).expect("remove");
    assert!(!page.is_listening(ListenTarget::Node(button), EventKind::Click));
    assert!(page.is_listening(ListenTarget::Document, EventKind::PointerMove));
}

#[test]
fn removing_a_detached_node_fails() {
    let mut page = MemoryPage::new();
    let node = page
        .append_markup(BODY, &Markup::new("div"))
        .expect("node");
    page.remove(node).expect("first removal");
    assert_eq!(page.remove(node), Err(PageError::Detached(node)));
}

#[test]
fn form_fields_prefer_names_and_reset_to_defaults() {
    let (mut page, form) = form_page();
    let name = page
        .query_within(form, "input[type=\"text\"]")
        .expect("query")
        .expect("name input");
    page.set_value(name, "Ada").expect("set");

    assert_eq!(page.form_field(form, "name").expect("field"), Some("Ada".into()));
    assert_eq!(page.form_field(form, "email").expect("field"), None);
    let textarea = page
        .query_within(form, "textarea")
        .expect("query")
        .expect("textarea");
    assert_eq!(page.control_value(textarea).expect("value"), Some("draft".into()));

    page.reset_form(form).expect("reset");
    assert_eq!(page.control_value(name).expect("value"), Some(String::new()));
    let email = page
        .query_within(form, "input[type=\"email\"]")
        .expect("query")
        .expect("email");
    assert_eq!(page.control_value(email).expect("value"), Some("me@x.com".into()));
}

#[test]
fn timers_fire_in_due_order_and_intervals_repeat() {
    let mut page = MemoryPage::new();
    let slow = page.set_timeout(Duration::from_millis(300)).expect("timeout");
    let tick = page.set_interval(Duration::from_millis(100)).expect("interval");

    let mut fired = Vec::new();
    while let Some(timer) = page.fire_next_timer(Duration::from_millis(300)) {
        fired.push(timer);
    }
    // The timeout was armed at 0ms, before the interval's third tick was re-armed at 200ms.
    assert_eq!(fired, vec![tick, tick, slow, tick]);
    assert_eq!(page.pending_timers(), 1);
    assert_eq!(page.now(), Duration::from_millis(300));
}

#[test]
fn simultaneous_timers_fire_in_arming_order_not_id_order() {
    let mut page = MemoryPage::new();
    let tick = page.set_interval(Duration::from_millis(100)).expect("interval");
    let slow = page.set_timeout(Duration::from_millis(300)).expect("timeout");
    assert!(tick < slow);

    let mut fired = Vec::new();
    while let Some(timer) = page.fire_next_timer(Duration::from_millis(300)) {
        fired.push(timer);
    }
    assert_eq!(fired, vec![tick, tick, slow, tick]);
}

#[test]
fn listened_path_walks_from_target_to_root() {
    let mut page = MemoryPage::new();
    let button = page
        .append_markup(
            BODY,
            &Markup::new("button").child(Markup::svg("svg").child(Markup::svg("path"))),
        )
        .expect("button");
    let svg = page.children(button)[0];
    let path = page.children(svg)[0];

    page.listen(ListenTarget::Node(button), EventKind::Click)
        .expect("listen");
    assert_eq!(page.listened_path(path, EventKind::Click), vec![button]);
    assert!(page.listened_path(path, EventKind::Submit).is_empty());
}

#[test]
fn outer_html_declares_svg_namespace_at_subtree_root() {
    let mut page = MemoryPage::new();
    let button = page
        .append_markup(
            BODY,
            &Markup::new("button").child(
                Markup::svg("svg")
                    .attr("viewBox", "0 0 24 24")
                    .child(Markup::svg("path").attr("d", "M0 0")),
            ),
        )
        .expect("button");
    let svg = page.children(button)[0];

    assert_eq!(page.namespace(button), None);
    assert_eq!(page.namespace(svg), Some(markup::SVG_NAMESPACE));
    assert_eq!(
        page.outer_html(button),
        "<button><svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 24 24\"><path d=\"M0 0\"></path></svg></button>"
    );
}

#[test]
fn outer_html_renders_styles_classes_and_raw_style_text() {
    let mut page = MemoryPage::new();
    let node = page
        .append_markup(BODY, &Markup::new("div").class("card"))
        .expect("node");
    page.set_style(node, "opacity", "0").expect("style");
    page.set_style(node, "opacity", "1").expect("style");
    page.add_class(node, "seen").expect("class");
    assert_eq!(
        page.outer_html(node),
        "<div class=\"card seen\" style=\"opacity: 1;\"></div>"
    );

    let style = page
        .append_markup(HEAD, &Markup::new("style").text("a > b {}"))
        .expect("style");
    assert_eq!(page.outer_html(style), "<style>a > b {}</style>");
}
