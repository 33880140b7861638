//! Page controller: owns every behavior and routes host events to them.

use shared::{
    domain::{FrameId, NodeId, ObserverId, TimerId},
    error::PageResult,
    protocol::{EventOutcome, IntersectionEntry, PageEvent},
};
use tracing::{debug, info, warn};

use crate::{
    effects::{
        contact_form::ContactForm, cursor_trail::CursorTrail, notifications::NotificationCenter,
        parallax::Parallax, photo::PhotoPlaceholder, reveal::RevealOnScroll,
        smooth_scroll::SmoothScroll, testimonials::TestimonialRotator, video_modal::VideoModal,
    },
    page::Page,
    settings::Settings,
};

/// Behaviors wired once the document structure is ready.
#[derive(Debug)]
pub struct Behaviors {
    pub reveal: Option<RevealOnScroll>,
    pub video_modal: Option<VideoModal>,
    pub contact_form: Option<ContactForm>,
    pub smooth_scroll: Option<SmoothScroll>,
    pub parallax: Option<Parallax>,
    pub testimonials: Option<TestimonialRotator>,
    pub photo: Option<PhotoPlaceholder>,
}

#[derive(Debug)]
pub struct PortfolioApp {
    settings: Settings,
    notifications: NotificationCenter,
    behaviors: Option<Behaviors>,
    trail: Option<CursorTrail>,
    loaded: bool,
}

impl PortfolioApp {
    pub fn new(settings: Settings) -> Self {
        Self {
            notifications: NotificationCenter::new(settings.notification_lifetime()),
            settings,
            behaviors: None,
            trail: None,
            loaded: false,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn behaviors(&self) -> Option<&Behaviors> {
        self.behaviors.as_ref()
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationCenter {
        &mut self.notifications
    }

    pub fn cursor_trail(&self) -> Option<&CursorTrail> {
        self.trail.as_ref()
    }

    pub fn handle<P: Page + ?Sized>(
        &mut self,
        page: &mut P,
        event: PageEvent,
    ) -> PageResult<EventOutcome> {
        debug!(event = event.name(), "page event");
        match event {
            PageEvent::DomContentLoaded => self.start(page),
            PageEvent::Load => self.on_load(page),
            PageEvent::Click { target } => self.on_click(page, target),
            PageEvent::Submit { form } => self.on_submit(page, form),
            PageEvent::Scroll => match self
                .behaviors
                .as_mut()
                .and_then(|behaviors| behaviors.parallax.as_mut())
            {
                Some(parallax) => parallax.on_scroll(page),
                None => Ok(EventOutcome::Ignored),
            },
            PageEvent::PointerMove { x, y } => match self.trail.as_mut() {
                Some(trail) => {
                    trail.on_pointer_move(x, y);
                    Ok(EventOutcome::Handled)
                }
                None => Ok(EventOutcome::Ignored),
            },
            PageEvent::Intersection { observer, entries } => {
                self.on_intersection(page, observer, &entries)
            }
            PageEvent::Timer(timer) => self.on_timer(page, timer),
            PageEvent::AnimationFrame(frame) => self.on_frame(page, frame),
        }
    }

    /// Wires the seven behaviors; a second call is ignored.
    pub fn start<P: Page + ?Sized>(&mut self, page: &mut P) -> PageResult<EventOutcome> {
        if self.behaviors.is_some() {
            debug!("page effects already started");
            return Ok(EventOutcome::Ignored);
        }

        let settings = &self.settings;
        let behaviors = Behaviors {
            reveal: isolated("reveal", RevealOnScroll::setup(page, settings)).flatten(),
            video_modal: isolated("video_modal", VideoModal::setup(page, settings)).flatten(),
            contact_form: isolated("contact_form", ContactForm::setup(page, settings)).flatten(),
            smooth_scroll: isolated("smooth_scroll", SmoothScroll::setup(page, settings)),
            parallax: isolated("parallax", Parallax::setup(page, settings)),
            testimonials: isolated("testimonials", TestimonialRotator::setup(page, settings))
                .flatten(),
            photo: isolated("photo", PhotoPlaceholder::setup(page, settings)).flatten(),
        };
        info!(
            reveal = behaviors.reveal.is_some(),
            video_modal = behaviors.video_modal.is_some(),
            contact_form = behaviors.contact_form.is_some(),
            smooth_scroll = behaviors.smooth_scroll.is_some(),
            parallax = behaviors.parallax.is_some(),
            testimonials = behaviors.testimonials.is_some(),
            photo = behaviors.photo.is_some(),
            "page effects started"
        );
        self.behaviors = Some(behaviors);
        Ok(EventOutcome::Handled)
    }

    fn on_load<P: Page + ?Sized>(&mut self, page: &mut P) -> PageResult<EventOutcome> {
        if self.loaded {
            return Ok(EventOutcome::Ignored);
        }
        self.loaded = true;
        let body = page.body()?;
        page.add_class(body, "loaded")?;
        self.trail = CursorTrail::start(page, &self.settings)?;
        Ok(EventOutcome::Handled)
    }

    fn on_click<P: Page + ?Sized>(
        &mut self,
        page: &mut P,
        target: NodeId,
    ) -> PageResult<EventOutcome> {
        let mut outcome = self.notifications.on_click(page, target)?;
        let Some(behaviors) = self.behaviors.as_mut() else {
            return Ok(outcome);
        };
        if let Some(modal) = behaviors.video_modal.as_mut() {
            outcome = outcome.merge(modal.on_click(page, target)?);
        }
        if let Some(photo) = behaviors.photo.as_ref() {
            outcome = outcome.merge(photo.on_click(page, target, &mut self.notifications)?);
        }
        if let Some(scroll) = behaviors.smooth_scroll.as_ref() {
            outcome = outcome.merge(scroll.on_click(page, target)?);
        }
        Ok(outcome)
    }

    fn on_submit<P: Page + ?Sized>(
        &mut self,
        page: &mut P,
        form: NodeId,
    ) -> PageResult<EventOutcome> {
        match self
            .behaviors
            .as_ref()
            .and_then(|behaviors| behaviors.contact_form.as_ref())
        {
            Some(contact) => contact.on_submit(page, form, &mut self.notifications),
            None => Ok(EventOutcome::Ignored),
        }
    }

    fn on_intersection<P: Page + ?Sized>(
        &mut self,
        page: &mut P,
        observer: ObserverId,
        entries: &[IntersectionEntry],
    ) -> PageResult<EventOutcome> {
        match self
            .behaviors
            .as_mut()
            .and_then(|behaviors| behaviors.reveal.as_mut())
        {
            Some(reveal) => reveal.on_intersection(page, observer, entries),
            None => Ok(EventOutcome::Ignored),
        }
    }

    fn on_timer<P: Page + ?Sized>(&mut self, page: &mut P, timer: TimerId) -> PageResult<EventOutcome> {
        if self.notifications.on_timer(page, timer)? {
            return Ok(EventOutcome::Handled);
        }
        let rotated = match self
            .behaviors
            .as_mut()
            .and_then(|behaviors| behaviors.testimonials.as_mut())
        {
            Some(rotator) => rotator.on_timer(page, timer)?,
            None => false,
        };
        Ok(if rotated {
            EventOutcome::Handled
        } else {
            EventOutcome::Ignored
        })
    }

    fn on_frame<P: Page + ?Sized>(&mut self, page: &mut P, frame: FrameId) -> PageResult<EventOutcome> {
        if let Some(parallax) = self
            .behaviors
            .as_mut()
            .and_then(|behaviors| behaviors.parallax.as_mut())
        {
            if parallax.on_frame(page, frame)? {
                return Ok(EventOutcome::Handled);
            }
        }
        if let Some(trail) = self.trail.as_mut() {
            if trail.on_frame(page, frame)? {
                return Ok(EventOutcome::Handled);
            }
        }
        Ok(EventOutcome::Ignored)
    }
}

/// A behavior whose setup fails is left off; the others still run.
fn isolated<T>(behavior: &'static str, setup: PageResult<T>) -> Option<T> {
    match setup {
        Ok(wired) => Some(wired),
        Err(err) => {
            warn!(behavior, error = %err, "behavior disabled");
            None
        }
    }
}
