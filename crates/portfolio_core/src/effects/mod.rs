//! The independent page behaviors wired up by the controller.

pub mod contact_form;
pub mod cursor_trail;
pub mod notifications;
pub mod parallax;
pub mod photo;
pub mod reveal;
pub mod smooth_scroll;
pub mod testimonials;
pub mod video_modal;

#[cfg(test)]
#[path = "../tests/effects_tests.rs"]
mod tests;
