//! `Dom` and `EventHost` over the live document.
//!
//! Elements handed to the effects are stamped with a numeric property so that
//! event targets can be mapped back to their `NodeId` without a lookup table
//! on the JS side.

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    time::Duration,
};

use js_sys::{Array, Reflect};
use portfolio_core::{markup::MarkupNode, Dom, EventHost, Markup, ObserverOptions};
use shared::{
    domain::{EventKind, FrameId, ListenTarget, NodeId, ObserverId, TimerId},
    error::{PageError, PageResult},
    protocol::{EventOutcome, IntersectionEntry, PageEvent},
};
use tracing::debug;
use wasm_bindgen::{closure::Closure, JsCast as _, JsValue};
use web_sys::{
    CssStyleDeclaration, Document, Element, Event, EventTarget, FormData, HtmlElement,
    HtmlFormElement, HtmlInputElement, HtmlTextAreaElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, MouseEvent, ScrollBehavior,
    ScrollIntoViewOptions, ScrollLogicalPosition, SvgElement, Window,
};

use crate::runtime::Dispatcher;

const NODE_KEY: &str = "__portfolioNodeId";

#[derive(Default)]
struct Registry {
    nodes: HashMap<NodeId, Element>,
    next: u64,
}

impl Registry {
    fn register(&mut self, element: Element) -> NodeId {
        if let Some(id) = node_id_of(element.as_ref()) {
            self.nodes.entry(id).or_insert(element);
            return id;
        }
        self.next += 1;
        let id = NodeId(self.next);
        // Reflect::set only fails on frozen objects, which DOM elements never are.
        let _ = Reflect::set(
            element.as_ref(),
            &JsValue::from_str(NODE_KEY),
            &JsValue::from_f64(id.0 as f64),
        );
        self.nodes.insert(id, element);
        id
    }
}

pub(crate) fn node_id_of(value: &JsValue) -> Option<NodeId> {
    Reflect::get(value, &JsValue::from_str(NODE_KEY))
        .ok()?
        .as_f64()
        .map(|raw| NodeId(raw as u64))
}

/// Stamped ids from `event`'s target up to the document root, innermost first.
fn stamped_path(event: &Event) -> Vec<NodeId> {
    let mut path = Vec::new();
    let mut cursor = event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok());
    while let Some(element) = cursor {
        if let Some(id) = node_id_of(element.as_ref()) {
            path.push(id);
        }
        cursor = element.parent_element();
    }
    path
}

fn style_of(element: &Element) -> Option<CssStyleDeclaration> {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        return Some(html.style());
    }
    element.dyn_ref::<SvgElement>().map(SvgElement::style)
}

fn host_error(err: JsValue) -> PageError {
    PageError::Host(
        err.as_string()
            .or_else(|| {
                err.dyn_ref::<js_sys::Error>()
                    .map(|error| String::from(error.message()))
            })
            .unwrap_or_else(|| format!("{err:?}")),
    )
}

fn selector_error(selector: &str, err: JsValue) -> PageError {
    match host_error(err) {
        PageError::Host(reason) => PageError::invalid_selector(selector, reason),
        other => other,
    }
}

fn millis(duration: Duration) -> i32 {
    i32::try_from(duration.as_millis()).unwrap_or(i32::MAX)
}

pub struct WebPage {
    window: Window,
    document: Document,
    registry: RefCell<Registry>,
    listening: HashSet<(ListenTarget, EventKind)>,
    installed: HashSet<EventKind>,
    observers: HashMap<ObserverId, IntersectionObserver>,
    next_observer: u64,
    next_timer: u64,
    next_frame: u64,
    dispatcher: Dispatcher,
}

impl WebPage {
    pub fn new(window: Window, document: Document, dispatcher: Dispatcher) -> Self {
        Self {
            window,
            document,
            registry: RefCell::default(),
            listening: HashSet::new(),
            installed: HashSet::new(),
            observers: HashMap::new(),
            next_observer: 0,
            next_timer: 0,
            next_frame: 0,
            dispatcher,
        }
    }

    pub fn is_listening(&self, target: ListenTarget, kind: EventKind) -> bool {
        self.listening.contains(&(target, kind))
    }

    fn register(&self, element: Element) -> NodeId {
        self.registry.borrow_mut().register(element)
    }

    fn element(&self, node: NodeId) -> PageResult<Element> {
        self.registry
            .borrow()
            .nodes
            .get(&node)
            .cloned()
            .ok_or(PageError::UnknownNode(node))
    }

    /// Inline style of an HTML or SVG element.
    fn inline_style(&self, node: NodeId) -> PageResult<CssStyleDeclaration> {
        let element = self.element(node)?;
        style_of(&element)
            .ok_or_else(|| PageError::Host(format!("node {node} has no inline style")))
    }

    fn form(&self, node: NodeId) -> PageResult<HtmlFormElement> {
        self.element(node)?
            .dyn_into::<HtmlFormElement>()
            .map_err(|_| PageError::Host(format!("node {node} is not a form")))
    }

    fn create(&self, markup: &Markup) -> Result<Element, JsValue> {
        let element = match markup.namespace() {
            Some(namespace) => self
                .document
                .create_element_ns(Some(namespace), markup.tag())?,
            None => self.document.create_element(markup.tag())?,
        };
        for (name, value) in markup.attributes() {
            element.set_attribute(name, value)?;
        }
        if let Some(style) = style_of(&element) {
            for (property, value) in markup.styles() {
                style.set_property(property, value)?;
            }
        }
        for child in markup.children() {
            match child {
                MarkupNode::Element(nested) => {
                    let nested = self.create(nested)?;
                    element.append_child(&nested)?;
                }
                MarkupNode::Text(text) => {
                    element.append_child(&self.document.create_text_node(text))?;
                }
            }
        }
        Ok(element)
    }

    /// One document- or window-level listener per kind; events are routed to
    /// the runtime, which filters by what the effects asked for.
    fn install(&mut self, kind: EventKind) -> PageResult<()> {
        if !self.installed.insert(kind) {
            return Ok(());
        }
        let dispatcher = self.dispatcher.clone();
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let outcome = match kind {
                EventKind::Click => {
                    let path = stamped_path(&event);
                    dispatcher.with_runtime(|runtime| runtime.handle_click(path))
                }
                EventKind::Submit => match event
                    .target()
                    .and_then(|target| node_id_of(target.as_ref()))
                {
                    Some(form) => dispatcher.with_runtime(|runtime| runtime.handle_submit(form)),
                    None => EventOutcome::Ignored,
                },
                EventKind::Scroll => dispatcher.dispatch(PageEvent::Scroll),
                EventKind::PointerMove => match event.dyn_ref::<MouseEvent>() {
                    Some(mouse) => dispatcher.dispatch(PageEvent::PointerMove {
                        x: f64::from(mouse.client_x()),
                        y: f64::from(mouse.client_y()),
                    }),
                    None => EventOutcome::Ignored,
                },
            };
            if outcome.prevents_default() {
                event.prevent_default();
            }
        });
        let target: &EventTarget = match kind {
            EventKind::Scroll => self.window.as_ref(),
            _ => self.document.as_ref(),
        };
        target
            .add_event_listener_with_callback(kind.dom_name(), callback.as_ref().unchecked_ref())
            .map_err(host_error)?;
        callback.forget();
        debug!(event = kind.dom_name(), "installed page listener");
        Ok(())
    }
}

impl Dom for WebPage {
    fn head(&self) -> PageResult<NodeId> {
        let head = self.document.head().ok_or(PageError::Missing("document head"))?;
        Ok(self.register(head.into()))
    }

    fn body(&self) -> PageResult<NodeId> {
        let body = self.document.body().ok_or(PageError::Missing("document body"))?;
        Ok(self.register(body.into()))
    }

    fn query_all(&mut self, selector: &str) -> PageResult<Vec<NodeId>> {
        let list = self
            .document
            .query_selector_all(selector)
            .map_err(|err| selector_error(selector, err))?;
        let mut nodes = Vec::with_capacity(list.length() as usize);
        for index in 0..list.length() {
            if let Some(element) = list.item(index).and_then(|node| node.dyn_into::<Element>().ok()) {
                nodes.push(self.register(element));
            }
        }
        Ok(nodes)
    }

    fn query_within(&mut self, scope: NodeId, selector: &str) -> PageResult<Option<NodeId>> {
        let found = self
            .element(scope)?
            .query_selector(selector)
            .map_err(|err| selector_error(selector, err))?;
        Ok(found.map(|element| self.register(element)))
    }

    fn element_by_id(&mut self, id: &str) -> PageResult<Option<NodeId>> {
        Ok(self
            .document
            .get_element_by_id(id)
            .map(|element| self.register(element)))
    }

    fn attribute(&self, node: NodeId, name: &str) -> PageResult<Option<String>> {
        Ok(self.element(node)?.get_attribute(name))
    }

    fn build(&mut self, markup: &Markup) -> PageResult<NodeId> {
        let element = self.create(markup).map_err(host_error)?;
        Ok(self.register(element))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> PageResult<()> {
        let child = self.element(child)?;
        self.element(parent)?
            .append_child(&child)
            .map_err(host_error)?;
        Ok(())
    }

    fn remove(&mut self, node: NodeId) -> PageResult<()> {
        let element = self.element(node)?;
        if element.parent_node().is_none() {
            return Err(PageError::Detached(node));
        }
        element.remove();
        let mut registry = self.registry.borrow_mut();
        let removed = registry
            .nodes
            .iter()
            .filter(|(_, candidate)| element.contains(Some(candidate.as_ref())))
            .map(|(id, _)| *id)
            .collect::<HashSet<_>>();
        registry.nodes.retain(|id, _| !removed.contains(id));
        self.listening.retain(|(target, _)| match target {
            ListenTarget::Node(id) => !removed.contains(id),
            ListenTarget::Window | ListenTarget::Document => true,
        });
        Ok(())
    }

    fn is_attached(&self, node: NodeId) -> bool {
        self.element(node)
            .map(|element| element.is_connected())
            .unwrap_or(false)
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> PageResult<()> {
        self.inline_style(node)?
            .set_property(property, value)
            .map_err(host_error)
    }

    fn add_class(&mut self, node: NodeId, class: &str) -> PageResult<()> {
        self.element(node)?
            .class_list()
            .add_1(class)
            .map_err(host_error)
    }

    fn form_field(&self, form: NodeId, name: &str) -> PageResult<Option<String>> {
        let data = FormData::new_with_form(&self.form(form)?).map_err(host_error)?;
        Ok(data.get(name).as_string())
    }

    fn control_value(&self, control: NodeId) -> PageResult<Option<String>> {
        let element = self.element(control)?;
        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            return Ok(Some(input.value()));
        }
        Ok(element
            .dyn_ref::<HtmlTextAreaElement>()
            .map(HtmlTextAreaElement::value))
    }

    fn reset_form(&mut self, form: NodeId) -> PageResult<()> {
        self.form(form)?.reset();
        Ok(())
    }

    fn scroll_into_view(&mut self, node: NodeId) -> PageResult<()> {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        self.element(node)?
            .scroll_into_view_with_scroll_into_view_options(&options);
        Ok(())
    }

    fn scroll_offset(&self) -> f64 {
        self.window.page_y_offset().unwrap_or_default()
    }

    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .unwrap_or_default()
    }
}

impl EventHost for WebPage {
    fn listen(&mut self, target: ListenTarget, kind: EventKind) -> PageResult<()> {
        if let ListenTarget::Node(node) = target {
            self.element(node)?;
        }
        self.install(kind)?;
        self.listening.insert((target, kind));
        Ok(())
    }

    fn observe_intersections(
        &mut self,
        options: &ObserverOptions,
        nodes: &[NodeId],
    ) -> PageResult<ObserverId> {
        self.next_observer += 1;
        let id = ObserverId(self.next_observer);
        let dispatcher = self.dispatcher.clone();
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |records: Array, _observer: IntersectionObserver| {
                let entries = records
                    .iter()
                    .filter_map(|record| {
                        let record = record.unchecked_into::<IntersectionObserverEntry>();
                        Some(IntersectionEntry {
                            target: node_id_of(record.target().as_ref())?,
                            is_intersecting: record.is_intersecting(),
                        })
                    })
                    .collect::<Vec<_>>();
                if !entries.is_empty() {
                    dispatcher.dispatch(PageEvent::Intersection {
                        observer: id,
                        entries,
                    });
                }
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_root_margin(&options.root_margin);
        init.set_threshold(&JsValue::from_f64(options.threshold));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(host_error)?;
        callback.forget();

        for node in nodes {
            observer.observe(&self.element(*node)?);
        }
        self.observers.insert(id, observer);
        Ok(id)
    }

    fn unobserve(&mut self, observer: ObserverId, node: NodeId) -> PageResult<()> {
        let element = self.element(node)?;
        let observer = self
            .observers
            .get(&observer)
            .ok_or(PageError::Missing("intersection observer"))?;
        observer.unobserve(&element);
        Ok(())
    }

    fn set_timeout(&mut self, delay: Duration) -> PageResult<TimerId> {
        self.next_timer += 1;
        let id = TimerId(self.next_timer);
        let dispatcher = self.dispatcher.clone();
        let callback = Closure::once_into_js(move || {
            dispatcher.dispatch(PageEvent::Timer(id));
        });
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                millis(delay),
            )
            .map_err(host_error)?;
        Ok(id)
    }

    fn set_interval(&mut self, period: Duration) -> PageResult<TimerId> {
        self.next_timer += 1;
        let id = TimerId(self.next_timer);
        let dispatcher = self.dispatcher.clone();
        let callback = Closure::<dyn FnMut()>::new(move || {
            dispatcher.dispatch(PageEvent::Timer(id));
        });
        self.window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                millis(period),
            )
            .map_err(host_error)?;
        callback.forget();
        Ok(id)
    }

    fn request_animation_frame(&mut self) -> PageResult<FrameId> {
        self.next_frame += 1;
        let id = FrameId(self.next_frame);
        let dispatcher = self.dispatcher.clone();
        let callback = Closure::once_into_js(move |_timestamp: f64| {
            dispatcher.dispatch(PageEvent::AnimationFrame(id));
        });
        self.window
            .request_animation_frame(callback.unchecked_ref())
            .map_err(host_error)?;
        Ok(id)
    }
}
