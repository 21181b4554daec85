//! Shared enums and callback types.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use url::Url;

/// How outbound links and new-window requests from web content are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LinkBehavior {
    /// Open in an in-app browser overlay on top of the current presentation.
    #[default]
    CustomTab,
    /// Hand the URL to the operating system.
    ExternalBrowser,
    /// Call the integrator's link handler and do nothing else.
    Custom,
}

impl fmt::Display for LinkBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::CustomTab => "custom-tab",
            Self::ExternalBrowser => "external-browser",
            Self::Custom => "custom",
        };
        f.write_str(s)
    }
}

impl LinkBehavior {
    /// The behavior actually applied: `Custom` without a handler falls back
    /// to `CustomTab`.
    pub fn effective(self, has_custom_handler: bool) -> Self {
        match self {
            Self::Custom if !has_custom_handler => Self::CustomTab,
            behavior => behavior,
        }
    }
}

/// Modal presentation style requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PresentationStyle {
    #[default]
    FullScreen,
    PageSheet,
    FormSheet,
    OverFullScreen,
    Automatic,
}

/// Integrator callback for `LinkBehavior::Custom`.
pub type LinkHandler = Arc<dyn Fn(&Url) + Send + Sync>;

/// Integrator callback for messages posted by web content.
pub type MessageHandler = Arc<dyn Fn(&str) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_behavior_defaults_to_custom_tab() {
        assert_eq!(LinkBehavior::default(), LinkBehavior::CustomTab);
    }

    #[test]
    fn link_behavior_kebab_case_serialization() {
        let json = serde_json::to_string(&LinkBehavior::ExternalBrowser).unwrap();
        assert_eq!(json, "\"external-browser\"");
        let parsed: LinkBehavior = serde_json::from_str("\"custom-tab\"").unwrap();
        assert_eq!(parsed, LinkBehavior::CustomTab);
    }

    #[test]
    fn custom_without_handler_is_effectively_custom_tab() {
        assert_eq!(LinkBehavior::Custom.effective(false), LinkBehavior::CustomTab);
        assert_eq!(LinkBehavior::Custom.effective(true), LinkBehavior::Custom);
        assert_eq!(LinkBehavior::ExternalBrowser.effective(false), LinkBehavior::ExternalBrowser);
        assert_eq!(LinkBehavior::CustomTab.effective(true), LinkBehavior::CustomTab);
    }

    #[test]
    fn link_behavior_display_matches_serde() {
        for behavior in [
            LinkBehavior::CustomTab,
            LinkBehavior::ExternalBrowser,
            LinkBehavior::Custom,
        ] {
            let json = serde_json::to_string(&behavior).unwrap();
            assert_eq!(json, format!("\"{behavior}\""));
        }
    }

    #[test]
    fn presentation_style_default_is_full_screen() {
        assert_eq!(PresentationStyle::default(), PresentationStyle::FullScreen);
        let json = serde_json::to_string(&PresentationStyle::OverFullScreen).unwrap();
        assert_eq!(json, "\"over-full-screen\"");
    }
}
