//! Client-side stand-in for a contact form backend: acknowledge and reset.

use shared::{
    domain::{EventKind, ListenTarget, NodeId, NotificationKind},
    error::PageResult,
    protocol::EventOutcome,
};
use tracing::{debug, info};

use crate::{effects::notifications::NotificationCenter, page::Page, settings::Settings};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

pub fn acknowledgement(name: &str) -> String {
    format!("Thanks {name}! Your message has been received. I'll get back to you soon.")
}

#[derive(Debug)]
pub struct ContactForm {
    form: NodeId,
}

impl ContactForm {
    pub fn setup<P: Page + ?Sized>(page: &mut P, settings: &Settings) -> PageResult<Option<Self>> {
        let Some(form) = page.query(&settings.contact_form_selector)? else {
            debug!(selector = %settings.contact_form_selector, "no contact form found");
            return Ok(None);
        };
        page.listen(ListenTarget::Node(form), EventKind::Submit)?;
        Ok(Some(Self { form }))
    }

    pub fn on_submit<P: Page + ?Sized>(
        &self,
        page: &mut P,
        form: NodeId,
        notifications: &mut NotificationCenter,
    ) -> PageResult<EventOutcome> {
        if form != self.form {
            return Ok(EventOutcome::Ignored);
        }

        let submission = read_submission(page, form)?;
        info!(
            name_len = submission.name.len(),
            email_len = submission.email.len(),
            message_len = submission.message.len(),
            "contact form accepted locally"
        );
        notifications.show(
            page,
            &acknowledgement(&submission.name),
            NotificationKind::Success,
        )?;
        page.reset_form(form)?;
        Ok(EventOutcome::DefaultPrevented)
    }
}

pub fn read_submission<P: Page + ?Sized>(page: &mut P, form: NodeId) -> PageResult<ContactSubmission> {
    Ok(ContactSubmission {
        name: field(page, form, "name", "input[type=\"text\"]")?,
        email: field(page, form, "email", "input[type=\"email\"]")?,
        message: field(page, form, "message", "textarea")?,
    })
}

/// Named form data first; an empty or missing value falls back to the first
/// control matching `fallback`.
fn field<P: Page + ?Sized>(
    page: &mut P,
    form: NodeId,
    name: &str,
    fallback: &str,
) -> PageResult<String> {
    if let Some(value) = page.form_field(form, name)?.filter(|value| !value.is_empty()) {
        return Ok(value);
    }
    let Some(control) = page.query_within(form, fallback)? else {
        return Ok(String::new());
    };
    Ok(page.control_value(control)?.unwrap_or_default())
}
