//! Interactive effects for a static portfolio page.
//!
//! [`PortfolioApp`] wires seven independent behaviors against the page markup
//! and reacts to events a host delivers through the [`Dom`] and [`EventHost`]
//! seams. Everything runs on one thread; each behavior owns its own state.

pub mod controller;
pub mod effects;
pub mod harness;
pub mod markup;
pub mod memory;
pub mod page;
pub mod selector;
pub mod settings;
pub mod templates;

pub use controller::PortfolioApp;
pub use harness::{fixture_page, Harness, ReplayStep};
pub use markup::Markup;
pub use memory::MemoryPage;
pub use page::{Dom, EventHost, ObserverOptions, Page};
pub use settings::{load_settings, parse_settings, Settings, SettingsError};
