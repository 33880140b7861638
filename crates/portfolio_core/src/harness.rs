//! Deterministic driver pairing a [`PortfolioApp`] with a [`MemoryPage`].
//!
//! Drivers act the way a user or browser would: clicks bubble through
//! listened ancestors, timers fire in due order on a virtual clock, and
//! animation frames run only when asked.

use std::{collections::BTreeMap, time::Duration};

use serde::{Deserialize, Serialize};
use shared::{
    domain::{EventKind, ListenTarget, NodeId, NotificationKind, ObserverId},
    error::{PageError, PageResult},
    protocol::{EventOutcome, IntersectionEntry, PageEvent},
};

use crate::{
    controller::PortfolioApp,
    markup::Markup,
    memory::MemoryPage,
    page::Dom,
    settings::Settings,
};

/// One scripted interaction, as read by the replay tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ReplayStep {
    Load,
    Click { selector: String },
    Fill { selector: String, value: String },
    Submit { selector: String },
    Scroll { y: f64 },
    Frame,
    Advance { ms: u64 },
    Reveal { selector: String },
    Pointer { x: f64, y: f64 },
}

pub struct Harness {
    app: PortfolioApp,
    page: MemoryPage,
}

impl Harness {
    /// Wraps `page` and delivers `DomContentLoaded`.
    pub fn start(settings: Settings, page: MemoryPage) -> PageResult<Self> {
        let mut harness = Self {
            app: PortfolioApp::new(settings),
            page,
        };
        harness.dispatch(PageEvent::DomContentLoaded)?;
        Ok(harness)
    }

    pub fn app(&self) -> &PortfolioApp {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut PortfolioApp {
        &mut self.app
    }

    pub fn page(&self) -> &MemoryPage {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut MemoryPage {
        &mut self.page
    }

    pub fn dispatch(&mut self, event: PageEvent) -> PageResult<EventOutcome> {
        self.app.handle(&mut self.page, event)
    }

    pub fn find(&mut self, selector: &str) -> PageResult<NodeId> {
        self.page
            .query(selector)?
            .ok_or_else(|| PageError::Host(format!("no element matches `{selector}`")))
    }

    /// Shows a toast through the app's shared notification utility.
    pub fn notify(&mut self, message: &str, kind: NotificationKind) -> PageResult<NodeId> {
        self.app
            .notifications_mut()
            .show(&mut self.page, message, kind)
    }

    pub fn load(&mut self) -> PageResult<EventOutcome> {
        self.dispatch(PageEvent::Load)
    }

    pub fn click(&mut self, node: NodeId) -> PageResult<EventOutcome> {
        let mut outcome = EventOutcome::Ignored;
        for target in self.page.listened_path(node, EventKind::Click) {
            outcome = outcome.merge(self.dispatch(PageEvent::Click { target })?);
        }
        Ok(outcome)
    }

    pub fn fill(&mut self, control: NodeId, value: &str) -> PageResult<()> {
        self.page.set_value(control, value)
    }

    pub fn submit(&mut self, form: NodeId) -> PageResult<EventOutcome> {
        if !self
            .page
            .is_listening(ListenTarget::Node(form), EventKind::Submit)
        {
            return Ok(EventOutcome::Ignored);
        }
        self.dispatch(PageEvent::Submit { form })
    }

    pub fn scroll_to(&mut self, offset: f64) -> PageResult<EventOutcome> {
        self.page.set_scroll_offset(offset);
        if !self.page.is_listening(ListenTarget::Window, EventKind::Scroll) {
            return Ok(EventOutcome::Ignored);
        }
        self.dispatch(PageEvent::Scroll)
    }

    pub fn move_pointer(&mut self, x: f64, y: f64) -> PageResult<EventOutcome> {
        if !self
            .page
            .is_listening(ListenTarget::Document, EventKind::PointerMove)
        {
            return Ok(EventOutcome::Ignored);
        }
        self.dispatch(PageEvent::PointerMove { x, y })
    }

    /// Runs every animation frame requested so far; returns how many ran.
    pub fn run_frame(&mut self) -> PageResult<usize> {
        let frames = self.page.take_frames();
        for frame in &frames {
            self.dispatch(PageEvent::AnimationFrame(*frame))?;
        }
        Ok(frames.len())
    }

    /// Moves the virtual clock forward, firing due timers in order.
    pub fn advance(&mut self, by: Duration) -> PageResult<()> {
        let until = self.page.now() + by;
        while let Some(timer) = self.page.fire_next_timer(until) {
            self.dispatch(PageEvent::Timer(timer))?;
        }
        self.page.set_now(until);
        Ok(())
    }

    /// Reports `nodes` as entering the viewport to every observer watching them.
    pub fn intersect(&mut self, nodes: &[NodeId]) -> PageResult<()> {
        let mut batches: BTreeMap<ObserverId, Vec<IntersectionEntry>> = BTreeMap::new();
        for node in nodes {
            for observer in self.page.observers_of(*node) {
                batches.entry(observer).or_default().push(IntersectionEntry {
                    target: *node,
                    is_intersecting: true,
                });
            }
        }
        for (observer, entries) in batches {
            self.dispatch(PageEvent::Intersection { observer, entries })?;
        }
        Ok(())
    }

    pub fn run_step(&mut self, step: &ReplayStep) -> PageResult<()> {
        match step {
            ReplayStep::Load => {
                self.load()?;
            }
            ReplayStep::Click { selector } => {
                let node = self.find(selector)?;
                self.click(node)?;
            }
            ReplayStep::Fill { selector, value } => {
                let node = self.find(selector)?;
                self.fill(node, value)?;
            }
            ReplayStep::Submit { selector } => {
                let node = self.find(selector)?;
                self.submit(node)?;
            }
            ReplayStep::Scroll { y } => {
                self.scroll_to(*y)?;
            }
            ReplayStep::Frame => {
                self.run_frame()?;
            }
            ReplayStep::Advance { ms } => self.advance(Duration::from_millis(*ms))?,
            ReplayStep::Reveal { selector } => {
                let nodes = self.page.query_all(selector)?;
                self.intersect(&nodes)?;
            }
            ReplayStep::Pointer { x, y } => {
                self.move_pointer(*x, *y)?;
            }
        }
        Ok(())
    }

    pub fn run_script(&mut self, steps: &[ReplayStep]) -> PageResult<()> {
        steps.iter().try_for_each(|step| self.run_step(step))
    }

    pub fn body_html(&self) -> PageResult<String> {
        Ok(self.page.outer_html(self.page.body()?))
    }
}

fn card(class: &str, title: &str) -> Markup {
    Markup::new("div")
        .class(class)
        .child(Markup::new("h3").text(title))
}

/// A representative portfolio page carrying every hook the effects use.
pub fn fixture_page() -> PageResult<MemoryPage> {
    let mut page = MemoryPage::new();
    let body = page.body()?;

    let nav = ["about", "experience", "projects", "contact"]
        .into_iter()
        .fold(Markup::new("nav").class("nav"), |nav, section| {
            nav.child(Markup::new("a").attr("href", format!("#{section}")).text(section))
        });
    page.append_markup(body, &nav)?;

    let hero = Markup::new("header")
        .class("hero")
        .id("about")
        .child(Markup::new("div").class("floating shape-1"))
        .child(Markup::new("div").class("floating shape-2"))
        .child(Markup::new("div").class("floating shape-3"))
        .child(
            Markup::new("div")
                .class("photo-placeholder")
                .id("photoPlaceholder"),
        )
        .child(card("skill-card", "Leadership"))
        .child(card("skill-card", "Training Design"));
    page.append_markup(body, &hero)?;

    let experience = Markup::new("section")
        .id("experience")
        .child(card("timeline-item", "Learning Lead"))
        .child(card("timeline-item", "Facilitator"))
        .child(
            Markup::new("div")
                .class("video-preview")
                .child(Markup::new("span").text("Watch")),
        );
    page.append_markup(body, &experience)?;

    let projects = Markup::new("section")
        .id("projects")
        .child(card("project-card", "Onboarding Revamp"))
        .child(card("cert-card", "Certified Coach"))
        .child(card("testimonial-card", "Great mentor"))
        .child(card("testimonial-card", "Clear communicator"))
        .child(card("testimonial-card", "Inspiring sessions"));
    page.append_markup(body, &projects)?;

    let contact = Markup::new("section").id("contact").child(
        Markup::new("form")
            .class("contact-form")
            .child(Markup::new("input").attr("type", "text").attr("name", "name"))
            .child(Markup::new("input").attr("type", "email").attr("name", "email"))
            .child(Markup::new("textarea").attr("name", "message"))
            .child(Markup::new("button").attr("type", "submit").text("Send")),
    );
    page.append_markup(body, &contact)?;

    Ok(page)
}
