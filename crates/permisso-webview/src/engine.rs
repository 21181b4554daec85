//! Abstraction over the platform web content engine.

use permisso_common::Result;
use permisso_config::schema::RendererSettings;
use url::Url;

/// The part of a web engine a renderer drives directly.
///
/// Everything flowing the other way (script messages, new-window requests)
/// goes through the [`EngineSink`](crate::EngineSink) handed to the engine
/// when it is built.
pub trait ContentEngine {
    fn load_url(&mut self, url: &Url) -> Result<()>;

    /// Stop forwarding script messages. Called once during teardown.
    fn detach_message_hook(&mut self);
}

/// Options applied when an engine is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    pub user_agent: Option<String>,
    pub devtools: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::from(&RendererSettings::default())
    }
}

impl From<&RendererSettings> for EngineOptions {
    fn from(settings: &RendererSettings) -> Self {
        Self {
            user_agent: settings.user_agent.clone(),
            devtools: settings.devtools,
        }
    }
}
