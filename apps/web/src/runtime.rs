use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use portfolio_core::{PortfolioApp, Settings};
use shared::{
    domain::{EventKind, ListenTarget, NodeId},
    protocol::{EventOutcome, PageEvent},
};
use tracing::{debug, warn};
use web_sys::{Document, Window};

use crate::host::WebPage;

/// Owns the application state and the page it drives. Browser callbacks reach
/// it through a [`Dispatcher`].
pub struct Runtime {
    app: PortfolioApp,
    page: WebPage,
}

impl Runtime {
    pub fn install(window: Window, document: Document, settings: Settings) -> Rc<RefCell<Self>> {
        Rc::new_cyclic(|runtime| {
            let dispatcher = Dispatcher {
                runtime: runtime.clone(),
            };
            RefCell::new(Self {
                app: PortfolioApp::new(settings),
                page: WebPage::new(window, document, dispatcher),
            })
        })
    }

    pub fn deliver(runtime: &Rc<RefCell<Self>>, event: PageEvent) -> EventOutcome {
        Dispatcher {
            runtime: Rc::downgrade(runtime),
        }
        .dispatch(event)
    }

    pub fn handle(&mut self, event: PageEvent) -> EventOutcome {
        let name = event.name();
        match self.app.handle(&mut self.page, event) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(event = name, error = %err, "page event failed");
                EventOutcome::Ignored
            }
        }
    }

    /// Delivers a click once per listened ancestor on `path`, innermost first.
    pub fn handle_click(&mut self, path: Vec<NodeId>) -> EventOutcome {
        let listened = path
            .into_iter()
            .filter(|node| {
                self.page
                    .is_listening(ListenTarget::Node(*node), EventKind::Click)
            })
            .collect::<Vec<_>>();
        listened.into_iter().fold(EventOutcome::Ignored, |outcome, target| {
            outcome.merge(self.handle(PageEvent::Click { target }))
        })
    }

    pub fn handle_submit(&mut self, form: NodeId) -> EventOutcome {
        if !self
            .page
            .is_listening(ListenTarget::Node(form), EventKind::Submit)
        {
            return EventOutcome::Ignored;
        }
        self.handle(PageEvent::Submit { form })
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    runtime: Weak<RefCell<Runtime>>,
}

impl Dispatcher {
    pub fn with_runtime(&self, f: impl FnOnce(&mut Runtime) -> EventOutcome) -> EventOutcome {
        let Some(runtime) = self.runtime.upgrade() else {
            return EventOutcome::Ignored;
        };
        let Ok(mut state) = runtime.try_borrow_mut() else {
            debug!("dropping re-entrant page event");
            return EventOutcome::Ignored;
        };
        f(&mut state)
    }

    pub fn dispatch(&self, event: PageEvent) -> EventOutcome {
        self.with_runtime(|runtime| runtime.handle(event))
    }
}
