//! Process-wide entry point.
//!
//! Most integrators only ever call [`Permisso::shared`]:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use permisso_common::LinkBehavior;
//! use permisso_webview::{ModalHost, Permisso};
//!
//! fn show(host: &Arc<dyn ModalHost>) -> permisso_common::Result<()> {
//!     Permisso::shared().configure(|config| {
//!         config.link_behavior = LinkBehavior::ExternalBrowser;
//!         config.message_handler = Some(Arc::new(|msg: &str| println!("{msg}")));
//!     });
//!     let _presentation = Permisso::shared().present(host, "https://example.com", None)?;
//!     Ok(())
//! }
//! ```

use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

use permisso_common::Result;
use permisso_config::Configuration;
use tracing::debug;
use url::Url;

use crate::presentation::{
    CompletionCallback, ModalHost, PresentOptions, Presentation, PresentationController,
};
use crate::presenter::{ExternalOpener, SystemOpener};

static SHARED: LazyLock<Permisso> = LazyLock::new(Permisso::new);

/// Shared configuration plus the presentation entry points.
///
/// Configuration changes apply to every later `present` call. A
/// presentation already on screen keeps the values it started with.
pub struct Permisso {
    configuration: Mutex<Configuration>,
    opener: Mutex<Arc<dyn ExternalOpener>>,
}

impl Permisso {
    fn new() -> Self {
        Self {
            configuration: Mutex::new(Configuration::default()),
            opener: Mutex::new(Arc::new(SystemOpener)),
        }
    }

    /// The process-wide instance, created on first access.
    pub fn shared() -> &'static Permisso {
        &SHARED
    }

    /// Apply `mutator` to the shared configuration.
    pub fn configure<F>(&self, mutator: F)
    where
        F: FnOnce(&mut Configuration),
    {
        let mut config = self.lock_configuration();
        config.configure(mutator);
        debug!(config = ?*config, "configuration updated");
    }

    /// A copy of the current configuration.
    pub fn configuration(&self) -> Configuration {
        self.lock_configuration().clone()
    }

    /// Replace what `OpenExternally` hands URLs to.
    pub fn set_external_opener(&self, opener: Arc<dyn ExternalOpener>) {
        *self.opener.lock().unwrap_or_else(|p| p.into_inner()) = opener;
    }

    /// The opener currently in effect. Hosts that fall back to an external
    /// open on their own should go through this too.
    pub fn external_opener(&self) -> Arc<dyn ExternalOpener> {
        Arc::clone(&*self.opener.lock().unwrap_or_else(|p| p.into_inner()))
    }

    /// Present `url` on `host` with default options.
    pub fn present(
        &self,
        host: &Arc<dyn ModalHost>,
        url: &str,
        on_complete: Option<CompletionCallback>,
    ) -> Result<Presentation> {
        let options = PresentOptions {
            on_complete,
            ..PresentOptions::default()
        };
        self.present_with(host, url, options)
    }

    pub fn present_with(
        &self,
        host: &Arc<dyn ModalHost>,
        url: &str,
        options: PresentOptions,
    ) -> Result<Presentation> {
        let url = Url::parse(url)?;
        let config = self.configuration();
        PresentationController::new(self.external_opener()).present(host, &url, &config, options)
    }

    fn lock_configuration(&self) -> MutexGuard<'_, Configuration> {
        self.configuration.lock().unwrap_or_else(|p| p.into_inner())
    }
}
