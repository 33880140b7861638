//! In-memory document with a virtual clock.
//!
//! Records listeners, observers, timers and animation-frame requests so a
//! driver (see [`crate::harness::Harness`]) can replay DOM activity
//! deterministically.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    time::Duration,
};

use shared::{
    domain::{EventKind, FrameId, ListenTarget, NodeId, ObserverId, TimerId},
    error::{PageError, PageResult},
};

use crate::{
    markup::{self, Markup, MarkupNode},
    page::{Dom, EventHost, ObserverOptions},
    selector::Selector,
};

const ROOT: NodeId = NodeId(0);
const HEAD: NodeId = NodeId(1);
const BODY: NodeId = NodeId(2);
const DEFAULT_VIEWPORT_WIDTH: f64 = 1280.0;

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: String,
        namespace: Option<&'static str>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    attributes: BTreeMap<String, String>,
    styles: Vec<(String, String)>,
    value: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl NodeData {
    fn element(tag: &str, namespace: Option<&'static str>) -> Self {
        Self {
            kind: NodeKind::Element {
                tag: tag.to_string(),
                namespace,
            },
            attributes: BTreeMap::new(),
            styles: Vec::new(),
            value: String::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    fn is_control(&self) -> bool {
        matches!(self.tag(), Some("input" | "textarea" | "select"))
    }
}

#[derive(Debug, Clone)]
struct ScheduledTimer {
    id: TimerId,
    due: Duration,
    /// Arming order; breaks ties between timers due at the same instant.
    armed: u64,
    period: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct Observation {
    pub options: ObserverOptions,
    pub targets: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct MemoryPage {
    nodes: Vec<NodeData>,
    listeners: HashSet<(ListenTarget, EventKind)>,
    observers: HashMap<ObserverId, Observation>,
    timers: Vec<ScheduledTimer>,
    pending_frames: Vec<FrameId>,
    next_timer: u64,
    next_arm: u64,
    next_frame: u64,
    next_observer: u64,
    now: Duration,
    scroll_offset: f64,
    viewport_width: f64,
    scrolled_into_view: Vec<NodeId>,
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPage {
    pub fn new() -> Self {
        let mut root = NodeData::element("html", None);
        root.children = vec![HEAD, BODY];
        let mut head = NodeData::element("head", None);
        head.parent = Some(ROOT);
        let mut body = NodeData::element("body", None);
        body.parent = Some(ROOT);

        Self {
            nodes: vec![root, head, body],
            listeners: HashSet::new(),
            observers: HashMap::new(),
            timers: Vec::new(),
            pending_frames: Vec::new(),
            next_timer: 1,
            next_arm: 0,
            next_frame: 1,
            next_observer: 1,
            now: Duration::ZERO,
            scroll_offset: 0.0,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            scrolled_into_view: Vec::new(),
        }
    }

    pub fn with_viewport_width(mut self, width: f64) -> Self {
        self.viewport_width = width;
        self
    }

    /// Builds `markup` and appends it under `parent`.
    pub fn append_markup(&mut self, parent: NodeId, markup: &Markup) -> PageResult<NodeId> {
        let node = self.build(markup)?;
        self.append_child(parent, node)?;
        Ok(node)
    }

    fn node(&self, id: NodeId) -> PageResult<&NodeData> {
        usize::try_from(id.0)
            .ok()
            .and_then(|index| self.nodes.get(index))
            .ok_or(PageError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> PageResult<&mut NodeData> {
        usize::try_from(id.0)
            .ok()
            .and_then(|index| self.nodes.get_mut(index))
            .ok_or(PageError::UnknownNode(id))
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(data);
        NodeId(self.nodes.len() as u64 - 1)
    }

    fn build_node(&mut self, markup: &Markup) -> NodeId {
        let mut data = NodeData::element(markup.tag(), markup.namespace());
        for (name, value) in markup.attributes() {
            data.attributes.insert(name.clone(), value.clone());
        }
        data.styles = markup.styles().to_vec();
        let id = self.push(data);

        for child in markup.children() {
            let child_id = match child {
                MarkupNode::Element(element) => self.build_node(element),
                MarkupNode::Text(text) => self.push(NodeData {
                    kind: NodeKind::Text(text.clone()),
                    ..NodeData::element("", None)
                }),
            };
            self.nodes[child_id.0 as usize].parent = Some(id);
            self.nodes[id.0 as usize].children.push(child_id);
        }

        if let Ok(node) = self.node_mut(id) {
            if node.is_control() {
                node.value = node.attributes.get("value").cloned().unwrap_or_default();
            }
        }
        let textarea_default = (self.nodes[id.0 as usize].tag() == Some("textarea"))
            .then(|| self.text_content(id));
        if let Some(text) = textarea_default {
            self.nodes[id.0 as usize].value = text;
        }
        id
    }

    /// Element descendants of `scope` in document order, excluding `scope`.
    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.node(scope) {
            Ok(node) => node.children.iter().rev().copied().collect(),
            Err(_) => return out,
        };
        while let Some(id) = stack.pop() {
            let Ok(node) = self.node(id) else { continue };
            if node.tag().is_some() {
                out.push(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    fn matching(&self, scope: NodeId, selector: &str) -> PageResult<Vec<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .descendants(scope)
            .into_iter()
            .filter(|id| {
                self.node(*id).is_ok_and(|node| {
                    node.tag()
                        .is_some_and(|tag| selector.matches(tag, &node.attributes))
                })
            })
            .collect())
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.node(node).ok().and_then(NodeData::tag)
    }

    pub fn namespace(&self, node: NodeId) -> Option<&'static str> {
        match self.node(node).ok()?.kind {
            NodeKind::Element { namespace, .. } => namespace,
            NodeKind::Text(_) => None,
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).ok().and_then(|node| node.parent)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.node(node).ok().and_then(|node| {
            node.styles
                .iter()
                .find(|(name, _)| name == property)
                .map(|(_, value)| value.as_str())
        })
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node).is_ok_and(|node| {
            node.attributes
                .get("class")
                .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
        })
    }

    pub fn set_value(&mut self, control: NodeId, value: &str) -> PageResult<()> {
        let node = self.node_mut(control)?;
        node.value = value.to_string();
        Ok(())
    }

    pub fn text_content(&self, node: NodeId) -> String {
        let Ok(data) = self.node(node) else {
            return String::new();
        };
        match &data.kind {
            NodeKind::Text(text) => text.clone(),
            NodeKind::Element { .. } => data
                .children
                .iter()
                .map(|child| self.text_content(*child))
                .collect(),
        }
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        let Ok(data) = self.node(node) else { return };
        let (tag, namespace) = match &data.kind {
            NodeKind::Text(text) => {
                let raw = data
                    .parent
                    .and_then(|parent| self.tag(parent))
                    .is_some_and(markup::is_raw_text);
                if raw {
                    out.push_str(text);
                } else {
                    out.push_str(&markup::escape_text(text));
                }
                return;
            }
            NodeKind::Element { tag, namespace } => (tag, *namespace),
        };

        // Foreign subtrees declare their namespace once, at their root.
        let xmlns = namespace.filter(|namespace| {
            !data.attributes.contains_key("xmlns")
                && data.parent.and_then(|parent| self.namespace(parent)) != Some(*namespace)
        });
        let style = markup::style_attribute(&data.styles);
        let attributes = xmlns
            .map(|namespace| ("xmlns", namespace))
            .into_iter()
            .chain(
                data.attributes
                    .iter()
                    .filter(|(name, _)| name.as_str() != "style")
                    .map(|(name, value)| (name.as_str(), value.as_str())),
            )
            .chain(style.as_deref().map(|style| ("style", style)));
        markup::open_tag(out, tag, attributes);
        if markup::is_void(tag) {
            return;
        }
        for child in &data.children {
            self.write_html(*child, out);
        }
        markup::close_tag(out, tag);
    }

    pub fn is_listening(&self, target: ListenTarget, kind: EventKind) -> bool {
        self.listeners.contains(&(target, kind))
    }

    /// Listened nodes from `node` up to the root, innermost first.
    pub fn listened_path(&self, node: NodeId, kind: EventKind) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if self.is_listening(ListenTarget::Node(id), kind) {
                path.push(id);
            }
            cursor = self.parent(id);
        }
        path
    }

    pub fn observation(&self, observer: ObserverId) -> Option<&Observation> {
        self.observers.get(&observer)
    }

    /// Observers currently watching `node`.
    pub fn observers_of(&self, node: NodeId) -> Vec<ObserverId> {
        let mut observers: Vec<_> = self
            .observers
            .iter()
            .filter(|(_, observation)| observation.targets.contains(&node))
            .map(|(id, _)| *id)
            .collect();
        observers.sort();
        observers
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.pending_frames.len()
    }

    /// Pops the earliest timer due at or before `until`, moving the clock to it.
    /// Intervals are rescheduled one period later.
    pub fn fire_next_timer(&mut self, until: Duration) -> Option<TimerId> {
        let (index, _) = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= until)
            .min_by_key(|(_, timer)| (timer.due, timer.armed))?;
        let timer = self.timers.remove(index);
        self.now = self.now.max(timer.due);
        if let Some(period) = timer.period {
            let armed = self.arm();
            self.timers.push(ScheduledTimer {
                due: timer.due + period,
                armed,
                ..timer.clone()
            });
        }
        Some(timer.id)
    }

    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    pub fn take_frames(&mut self) -> Vec<FrameId> {
        std::mem::take(&mut self.pending_frames)
    }

    pub fn set_scroll_offset(&mut self, offset: f64) {
        self.scroll_offset = offset;
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width;
    }

    pub fn scrolled_into_view(&self) -> &[NodeId] {
        &self.scrolled_into_view
    }
}

impl Dom for MemoryPage {
    fn head(&self) -> PageResult<NodeId> {
        Ok(HEAD)
    }

    fn body(&self) -> PageResult<NodeId> {
        Ok(BODY)
    }

    fn query_all(&mut self, selector: &str) -> PageResult<Vec<NodeId>> {
        self.matching(ROOT, selector)
    }

    fn query_within(&mut self, scope: NodeId, selector: &str) -> PageResult<Option<NodeId>> {
        self.node(scope)?;
        Ok(self.matching(scope, selector)?.into_iter().next())
    }

    fn element_by_id(&mut self, id: &str) -> PageResult<Option<NodeId>> {
        Ok(self.descendants(ROOT).into_iter().find(|node| {
            self.node(*node)
                .is_ok_and(|data| data.attributes.get("id").map(String::as_str) == Some(id))
        }))
    }

    fn attribute(&self, node: NodeId, name: &str) -> PageResult<Option<String>> {
        Ok(self.node(node)?.attributes.get(name).cloned())
    }

    fn build(&mut self, markup: &Markup) -> PageResult<NodeId> {
        Ok(self.build_node(markup))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> PageResult<()> {
        self.node(parent)?;
        if let Some(previous) = self.node(child)?.parent {
            self.node_mut(previous)?.children.retain(|id| *id != child);
        }
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        Ok(())
    }

    fn remove(&mut self, node: NodeId) -> PageResult<()> {
        let parent = self.node(node)?.parent.ok_or(PageError::Detached(node))?;
        self.node_mut(parent)?.children.retain(|id| *id != node);
        self.node_mut(node)?.parent = None;

        let removed = self.subtree(node);
        self.listeners.retain(|(target, _)| match target {
            ListenTarget::Node(id) => !removed.contains(id),
            ListenTarget::Window | ListenTarget::Document => true,
        });
        Ok(())
    }

    fn is_attached(&self, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == ROOT {
                return true;
            }
            cursor = self.parent(id);
        }
        false
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> PageResult<()> {
        let styles = &mut self.node_mut(node)?.styles;
        match styles.iter_mut().find(|(name, _)| name == property) {
            Some((_, current)) => *current = value.to_string(),
            None => styles.push((property.to_string(), value.to_string())),
        }
        Ok(())
    }

    fn add_class(&mut self, node: NodeId, class: &str) -> PageResult<()> {
        if self.has_class(node, class) {
            return Ok(());
        }
        let classes = self
            .node_mut(node)?
            .attributes
            .entry("class".to_string())
            .or_default();
        if !classes.is_empty() {
            classes.push(' ');
        }
        classes.push_str(class);
        Ok(())
    }

    fn form_field(&self, form: NodeId, name: &str) -> PageResult<Option<String>> {
        self.node(form)?;
        Ok(self.descendants(form).into_iter().find_map(|id| {
            let node = self.node(id).ok()?;
            (node.is_control() && node.attributes.get("name").map(String::as_str) == Some(name))
                .then(|| node.value.clone())
        }))
    }

    fn control_value(&self, control: NodeId) -> PageResult<Option<String>> {
        let node = self.node(control)?;
        Ok(node.is_control().then(|| node.value.clone()))
    }

    fn reset_form(&mut self, form: NodeId) -> PageResult<()> {
        self.node(form)?;
        for id in self.descendants(form) {
            let default = match self.node(id)?.tag() {
                Some("textarea") => self.text_content(id),
                _ => self.node(id)?.attributes.get("value").cloned().unwrap_or_default(),
            };
            let node = self.node_mut(id)?;
            if node.is_control() {
                node.value = default;
            }
        }
        Ok(())
    }

    fn scroll_into_view(&mut self, node: NodeId) -> PageResult<()> {
        self.node(node)?;
        self.scrolled_into_view.push(node);
        Ok(())
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }
}

impl EventHost for MemoryPage {
    fn listen(&mut self, target: ListenTarget, kind: EventKind) -> PageResult<()> {
        if let ListenTarget::Node(node) = target {
            self.node(node)?;
        }
        self.listeners.insert((target, kind));
        Ok(())
    }

    fn observe_intersections(
        &mut self,
        options: &ObserverOptions,
        nodes: &[NodeId],
    ) -> PageResult<ObserverId> {
        for node in nodes {
            self.node(*node)?;
        }
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.insert(
            id,
            Observation {
                options: options.clone(),
                targets: nodes.to_vec(),
            },
        );
        Ok(id)
    }

    fn unobserve(&mut self, observer: ObserverId, node: NodeId) -> PageResult<()> {
        if let Some(observation) = self.observers.get_mut(&observer) {
            observation.targets.retain(|target| *target != node);
        }
        Ok(())
    }

    fn set_timeout(&mut self, delay: Duration) -> PageResult<TimerId> {
        Ok(self.schedule(delay, None))
    }

    fn set_interval(&mut self, period: Duration) -> PageResult<TimerId> {
        Ok(self.schedule(period, Some(period)))
    }

    fn request_animation_frame(&mut self) -> PageResult<FrameId> {
        let id = FrameId(self.next_frame);
        self.next_frame += 1;
        self.pending_frames.push(id);
        Ok(id)
    }
}

impl MemoryPage {
    fn schedule(&mut self, delay: Duration, period: Option<Duration>) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer += 1;
        let armed = self.arm();
        self.timers.push(ScheduledTimer {
            id,
            due: self.now + delay,
            armed,
            period,
        });
        id
    }

    fn subtree(&self, node: NodeId) -> HashSet<NodeId> {
        let mut found = HashSet::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if found.insert(id) {
                stack.extend(self.children(id));
            }
        }
        found
    }

    fn arm(&mut self) -> u64 {
        self.next_arm += 1;
        self.next_arm
    }
}

#[cfg(test)]
#[path = "tests/memory_tests.rs"]
mod tests;
