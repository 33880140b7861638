//! Types shared between the page-effects core and its hosts.

pub mod domain;
pub mod error;
pub mod protocol;
