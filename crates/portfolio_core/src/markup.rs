//! Structured element trees used instead of string templating.
//!
//! A [`Markup`] describes a detached subtree: tag, namespace, attributes,
//! inline style declarations and children. Hosts materialize it through
//! `Dom::build`; `to_html` renders the same tree for snapshots.

use std::fmt::Write as _;

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

#[derive(Debug, Clone, PartialEq)]
pub enum MarkupNode {
    Element(Markup),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Markup {
    tag: String,
    namespace: Option<&'static str>,
    attributes: Vec<(String, String)>,
    styles: Vec<(String, String)>,
    children: Vec<MarkupNode>,
}

impl Markup {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            namespace: None,
            attributes: Vec::new(),
            styles: Vec::new(),
            children: Vec::new(),
        }
    }

    /// An element in the SVG namespace.
    pub fn svg(tag: impl Into<String>) -> Self {
        Self {
            namespace: Some(SVG_NAMESPACE),
            ..Self::new(tag)
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    pub fn id(self, value: impl Into<String>) -> Self {
        self.attr("id", value)
    }

    pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.push((property.into(), value.into()));
        self
    }

    pub fn child(mut self, child: Markup) -> Self {
        self.children.push(MarkupNode::Element(child));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(MarkupNode::Text(text.into()));
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn namespace(&self) -> Option<&'static str> {
        self.namespace
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn styles(&self) -> &[(String, String)] {
        &self.styles
    }

    pub fn children(&self) -> &[MarkupNode] {
        &self.children
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let style = style_attribute(&self.styles);
        let attributes = self
            .attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .chain(style.as_deref().map(|style| ("style", style)));
        open_tag(out, &self.tag, attributes);
        if is_void(&self.tag) {
            return;
        }
        let raw = is_raw_text(&self.tag);
        for child in &self.children {
            match child {
                MarkupNode::Element(element) => element.write_html(out),
                MarkupNode::Text(text) if raw => out.push_str(text),
                MarkupNode::Text(text) => out.push_str(&escape_text(text)),
            }
        }
        close_tag(out, &self.tag);
    }
}

pub(crate) fn open_tag<'a>(
    out: &mut String,
    tag: &str,
    attributes: impl IntoIterator<Item = (&'a str, &'a str)>,
) {
    out.push('<');
    out.push_str(tag);
    for (name, value) in attributes {
        let _ = write!(out, " {name}=\"{}\"", escape_attribute(value));
    }
    out.push('>');
}

pub(crate) fn close_tag(out: &mut String, tag: &str) {
    let _ = write!(out, "</{tag}>");
}

pub(crate) fn style_attribute(styles: &[(String, String)]) -> Option<String> {
    if styles.is_empty() {
        return None;
    }
    Some(
        styles
            .iter()
            .map(|(property, value)| format!("{property}: {value};"))
            .collect::<Vec<_>>()
            .join(" "),
    )
}

pub(crate) fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub(crate) fn is_raw_text(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

pub fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

/// Formats a number the way it reads in a style value: shortest round-trip
/// form, no trailing `.0`, and never `-0`.
pub fn css_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

pub fn px(value: f64) -> String {
    format!("{}px", css_number(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_elements_with_escaped_text() {
        let markup = Markup::new("div")
            .class("notification")
            .child(Markup::new("span").text("Tom & <Jerry>"));
        assert_eq!(
            markup.to_html(),
            "<div class=\"notification\"><span>Tom &amp; &lt;Jerry&gt;</span></div>"
        );
    }

    #[test]
    fn style_text_is_not_escaped_and_void_tags_do_not_close() {
        let style = Markup::new("style").text(".a > .b { color: red; }");
        assert_eq!(style.to_html(), "<style>.a > .b { color: red; }</style>");
        assert_eq!(
            Markup::new("input").attr("type", "text").to_html(),
            "<input type=\"text\">"
        );
    }

    #[test]
    fn inline_styles_render_as_a_style_attribute() {
        let markup = Markup::new("div")
            .style("position", "fixed")
            .style("z-index", "9999");
        assert_eq!(
            markup.to_html(),
            "<div style=\"position: fixed; z-index: 9999;\"></div>"
        );
    }

    #[test]
    fn svg_elements_carry_the_svg_namespace() {
        assert_eq!(Markup::svg("path").namespace(), Some(SVG_NAMESPACE));
        assert_eq!(Markup::new("div").namespace(), None);
    }

    #[test]
    fn css_numbers_match_script_number_formatting() {
        assert_eq!(css_number(-0.0), "0");
        assert_eq!(css_number(150.0), "150");
        assert_eq!(css_number(-60.5), "-60.5");
        assert_eq!(css_number(3.0 * 0.1), "0.30000000000000004");
        assert_eq!(px(-120.0), "-120px");
    }
}
