//! In-memory SDK configuration mutated by the integrator.
//!
//! A `Configuration` is plain data plus two optional callbacks. Renderers copy
//! the values they need when they are built, so mutating a `Configuration`
//! after a presentation has started does not affect that presentation.

use std::fmt;

use permisso_common::{LinkBehavior, LinkHandler, MessageHandler, PresentationStyle};

use crate::schema::PermissoSettings;

#[derive(Clone, Default)]
pub struct Configuration {
    /// Link handling behavior for outbound links. Defaults to `CustomTab`.
    pub link_behavior: LinkBehavior,
    /// Called for every outbound link when `link_behavior` is `Custom`.
    pub custom_link_handler: Option<LinkHandler>,
    /// Called for every message posted by web content on the bridge channel.
    pub message_handler: Option<MessageHandler>,
    pub presentation_style: PresentationStyle,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the data fields from a settings file. Handlers stay unset.
    pub fn from_settings(settings: &PermissoSettings) -> Self {
        Self {
            link_behavior: settings.links.behavior,
            custom_link_handler: None,
            message_handler: None,
            presentation_style: settings.presentation.style,
        }
    }

    /// Batch update: the mutator may assign any subset of fields.
    pub fn configure<F>(&mut self, mutator: F)
    where
        F: FnOnce(&mut Configuration),
    {
        mutator(self);
    }

    /// Set the link behavior and its handler together.
    pub fn set_link_behavior(&mut self, behavior: LinkBehavior, handler: Option<LinkHandler>) {
        self.link_behavior = behavior;
        self.custom_link_handler = handler;
    }

    /// `Custom` without a handler behaves like `CustomTab`.
    pub fn effective_link_behavior(&self) -> LinkBehavior {
        self.link_behavior
            .effective(self.custom_link_handler.is_some())
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("link_behavior", &self.link_behavior)
            .field("custom_link_handler", &self.custom_link_handler.is_some())
            .field("message_handler", &self.message_handler.is_some())
            .field("presentation_style", &self.presentation_style)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn default_configuration() {
        let config = Configuration::new();
        assert_eq!(config.link_behavior, LinkBehavior::CustomTab);
        assert!(config.custom_link_handler.is_none());
        assert!(config.message_handler.is_none());
        assert_eq!(config.presentation_style, PresentationStyle::FullScreen);
    }

    #[test]
    fn configure_applies_subset_of_fields() {
        let mut config = Configuration::new();
        config.configure(|c| {
            c.link_behavior = LinkBehavior::ExternalBrowser;
        });
        assert_eq!(config.link_behavior, LinkBehavior::ExternalBrowser);
        assert_eq!(config.presentation_style, PresentationStyle::FullScreen);

        config.configure(|c| c.presentation_style = PresentationStyle::PageSheet);
        assert_eq!(config.link_behavior, LinkBehavior::ExternalBrowser);
        assert_eq!(config.presentation_style, PresentationStyle::PageSheet);
    }

    #[test]
    fn custom_without_handler_degrades_to_custom_tab() {
        let mut config = Configuration::new();
        config.set_link_behavior(LinkBehavior::Custom, None);
        assert_eq!(config.link_behavior, LinkBehavior::Custom);
        assert_eq!(config.effective_link_behavior(), LinkBehavior::CustomTab);
    }

    #[test]
    fn custom_with_handler_stays_custom() {
        let mut config = Configuration::new();
        let handler: LinkHandler = Arc::new(|_url: &url::Url| {});
        config.set_link_behavior(LinkBehavior::Custom, Some(handler));
        assert_eq!(config.effective_link_behavior(), LinkBehavior::Custom);
    }

    #[test]
    fn set_link_behavior_clears_previous_handler() {
        let mut config = Configuration::new();
        config.set_link_behavior(LinkBehavior::Custom, Some(Arc::new(|_url: &url::Url| {})));
        config.set_link_behavior(LinkBehavior::ExternalBrowser, None);
        assert!(config.custom_link_handler.is_none());
    }

    #[test]
    fn from_settings_copies_data_fields() {
        let mut settings = PermissoSettings::default();
        settings.links.behavior = LinkBehavior::ExternalBrowser;
        settings.presentation.style = PresentationStyle::FormSheet;
        let config = Configuration::from_settings(&settings);
        assert_eq!(config.link_behavior, LinkBehavior::ExternalBrowser);
        assert_eq!(config.presentation_style, PresentationStyle::FormSheet);
        assert!(config.message_handler.is_none());
    }

    #[test]
    fn debug_hides_handlers() {
        let mut config = Configuration::new();
        config.message_handler = Some(Arc::new(|_msg: &str| {}));
        let dbg = format!("{config:?}");
        assert!(dbg.contains("message_handler: true"));
        assert!(dbg.contains("custom_link_handler: false"));
    }
}
