use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::selector::Selector;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("malformed settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub reveal_selector: String,
    pub reveal_threshold: f64,
    pub reveal_root_margin: String,
    pub reveal_offset_px: f64,
    pub reveal_stagger_secs: f64,
    pub video_trigger_selector: String,
    pub contact_form_selector: String,
    pub anchor_selector: String,
    pub parallax_selector: String,
    pub parallax_base_speed: f64,
    pub parallax_speed_step: f64,
    pub testimonial_selector: String,
    pub rotation_interval_ms: u64,
    pub notification_lifetime_ms: u64,
    pub photo_placeholder_id: String,
    pub trail_breakpoint: f64,
    pub trail_smoothing: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reveal_selector:
                ".skill-card, .timeline-item, .project-card, .cert-card, .testimonial-card".into(),
            reveal_threshold: 0.1,
            reveal_root_margin: "0px 0px -50px 0px".into(),
            reveal_offset_px: 30.0,
            reveal_stagger_secs: 0.1,
            video_trigger_selector: ".video-preview".into(),
            contact_form_selector: ".contact-form".into(),
            anchor_selector: "a[href^=\"#\"]".into(),
            parallax_selector: ".floating".into(),
            parallax_base_speed: 0.5,
            parallax_speed_step: 0.1,
            testimonial_selector: ".testimonial-card".into(),
            rotation_interval_ms: 5000,
            notification_lifetime_ms: 5000,
            photo_placeholder_id: "photoPlaceholder".into(),
            trail_breakpoint: 768.0,
            trail_smoothing: 0.1,
        }
    }
}

impl Settings {
    pub fn rotation_interval(&self) -> Duration {
        Duration::from_millis(self.rotation_interval_ms)
    }

    pub fn notification_lifetime(&self) -> Duration {
        Duration::from_millis(self.notification_lifetime_ms)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let selectors = [
            ("reveal_selector", &self.reveal_selector),
            ("video_trigger_selector", &self.video_trigger_selector),
            ("contact_form_selector", &self.contact_form_selector),
            ("anchor_selector", &self.anchor_selector),
            ("parallax_selector", &self.parallax_selector),
            ("testimonial_selector", &self.testimonial_selector),
            ("photo_placeholder_id", &self.photo_placeholder_id),
        ];
        for (field, value) in selectors {
            if value.trim().is_empty() {
                return Err(invalid(field, "must not be empty"));
            }
        }
        // The photo hook is an element id, not a selector.
        for &(field, value) in &selectors[..6] {
            if let Err(err) = Selector::parse(value) {
                return Err(invalid(field, &err.to_string()));
            }
        }

        if !(0.0..=1.0).contains(&self.reveal_threshold) {
            return Err(invalid("reveal_threshold", "must be within 0..=1"));
        }
        if !(self.trail_smoothing > 0.0 && self.trail_smoothing <= 1.0) {
            return Err(invalid("trail_smoothing", "must be within (0, 1]"));
        }
        if self.rotation_interval_ms == 0 {
            return Err(invalid("rotation_interval_ms", "must be positive"));
        }
        if self.notification_lifetime_ms == 0 {
            return Err(invalid("notification_lifetime_ms", "must be positive"));
        }

        let finite = [
            ("reveal_offset_px", self.reveal_offset_px),
            ("reveal_stagger_secs", self.reveal_stagger_secs),
            ("parallax_base_speed", self.parallax_base_speed),
            ("parallax_speed_step", self.parallax_speed_step),
            ("trail_breakpoint", self.trail_breakpoint),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(invalid(field, "must be a finite number"));
            }
        }
        if self.reveal_stagger_secs < 0.0 {
            return Err(invalid("reveal_stagger_secs", "must not be negative"));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> SettingsError {
    SettingsError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

/// Strict parse: unknown keys and out-of-range values are errors.
pub fn parse_settings(raw: &str) -> Result<Settings, SettingsError> {
    let settings: Settings = toml::from_str(raw)?;
    settings.validate()?;
    Ok(settings)
}

/// Overlays `raw` on the defaults, keeping the defaults when it is unusable.
pub fn load_settings(raw: Option<&str>) -> Settings {
    let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
        return Settings::default();
    };

    match parse_settings(raw) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!(error = %err, "ignoring page settings; using defaults");
            Settings::default()
        }
    }
}
