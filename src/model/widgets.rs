//! Switches for the interaction bindings

use serde::{Deserialize, Serialize};

/// Which bindings `attach` wires up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetSet {
    pub buttons: bool,
    pub tilt: bool,
    pub reveal: bool,
    pub particles: bool,
    /// Cards fade in as they first scroll into view
    pub scroll_reveal: bool,
    /// Touch emulation is off unless asked for
    pub touch: bool,
    pub tooltips: bool,
    pub forms: bool,
    pub social_auth: bool,
    pub chat: bool,
    pub repo_panel: bool,
    pub theme_toggle: bool,
    pub code_modal: bool,
    pub keyboard: bool,
}

impl Default for WidgetSet {
    fn default() -> Self {
        Self {
            buttons: true,
            tilt: true,
            reveal: true,
            particles: true,
            scroll_reveal: true,
            touch: false,
            tooltips: true,
            forms: true,
            social_auth: true,
            chat: true,
            repo_panel: true,
            theme_toggle: true,
            code_modal: true,
            keyboard: true,
        }
    }
}

impl WidgetSet {
    /// Every binding switched on, touch emulation included
    pub fn all() -> Self {
        Self {
            touch: true,
            ..Self::default()
        }
    }

    /// Every binding switched off
    pub fn none() -> Self {
        Self {
            buttons: false,
            tilt: false,
            reveal: false,
            particles: false,
            scroll_reveal: false,
            touch: false,
            tooltips: false,
            forms: false,
            social_auth: false,
            chat: false,
            repo_panel: false,
            theme_toggle: false,
            code_modal: false,
            keyboard: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let widgets: WidgetSet = serde_json::from_str(r#"{"chat": false, "touch": true}"#).unwrap();
        assert!(!widgets.chat);
        assert!(widgets.touch);
        assert!(widgets.buttons);
        assert!(widgets.repo_panel);
    }
}
