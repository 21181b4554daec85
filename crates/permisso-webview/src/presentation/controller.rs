use std::fmt;
use std::sync::Arc;

use permisso_common::{PresentationId, RendererId, Result};
use permisso_config::schema::{PermissoSettings, DEFAULT_TITLE};
use permisso_config::Configuration;
use tracing::{debug, info, warn};
use url::Url;

use crate::container::{Container, ContainerRef};
use crate::engine::EngineOptions;
use crate::events::{EventQueue, RendererHandle};
use crate::presenter::ExternalOpener;
use crate::renderer::{PumpOutcome, Renderer};

use super::completion::{Completion, CompletionCallback};
use super::host::{ModalHost, ModalRequest};

/// Per-call presentation options.
pub struct PresentOptions {
    pub animated: bool,
    pub title: String,
    pub engine: EngineOptions,
    /// Runs once: after the show transition, or at dismissal if that
    /// comes first.
    pub on_complete: Option<CompletionCallback>,
}

impl Default for PresentOptions {
    fn default() -> Self {
        Self {
            animated: true,
            title: DEFAULT_TITLE.to_string(),
            engine: EngineOptions::default(),
            on_complete: None,
        }
    }
}

impl PresentOptions {
    pub fn from_settings(settings: &PermissoSettings) -> Self {
        Self {
            animated: settings.presentation.animated,
            title: settings.presentation.title.clone(),
            engine: EngineOptions::from(&settings.renderer),
            on_complete: None,
        }
    }

    pub fn with_completion<F>(mut self, on_complete: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_complete = Some(Box::new(on_complete));
        self
    }
}

impl fmt::Debug for PresentOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentOptions")
            .field("animated", &self.animated)
            .field("title", &self.title)
            .field("engine", &self.engine)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// Builds renderers and shows them modally on a [`ModalHost`].
pub struct PresentationController {
    opener: Arc<dyn ExternalOpener>,
}

impl PresentationController {
    pub fn new(opener: Arc<dyn ExternalOpener>) -> Self {
        Self { opener }
    }

    /// Show `url` modally on `host` with a renderer bound to `config`.
    ///
    /// The configuration is copied; changing it afterwards does not affect
    /// the returned presentation. If the host is busy this fails with
    /// `PresentationUnavailable` and `on_complete` never runs.
    pub fn present(
        &self,
        host: &Arc<dyn ModalHost>,
        url: &Url,
        config: &Configuration,
        options: PresentOptions,
    ) -> Result<Presentation> {
        let id = PresentationId::new();
        let renderer_id = RendererId::new();
        let events = EventQueue::new();
        let completion = Completion::from_option(options.on_complete);

        let request = ModalRequest {
            id: id.clone(),
            style: config.presentation_style,
            title: options.title,
            animated: options.animated,
            on_shown: completion.clone(),
            dismiss: RendererHandle::new(renderer_id.clone(), events.clone()),
        };

        let surface = match host.begin_modal(request) {
            Ok(surface) => surface,
            Err(e) => {
                warn!(presentation = %id, url = %url, error = %e, "presentation refused");
                return Err(e);
            }
        };

        let engine_options = options.engine;
        let mut renderer = Renderer::build(
            renderer_id,
            events,
            config,
            Arc::clone(&self.opener),
            |sink| host.build_engine(&surface, sink, &engine_options),
        );
        renderer.set_container(ContainerRef::new(&surface));

        if let Err(e) = renderer.load(url) {
            warn!(presentation = %id, url = %url, error = %e, "initial load failed");
        }

        info!(
            presentation = %id,
            renderer = %renderer.id(),
            style = ?config.presentation_style,
            url = %url,
            "presented"
        );

        Ok(Presentation {
            id,
            renderer,
            host: Arc::clone(host),
            surface,
            completion,
            animated: options.animated,
            dismissed: false,
        })
    }
}

/// A renderer currently shown on a host. Dropping it dismisses it.
pub struct Presentation {
    id: PresentationId,
    renderer: Renderer,
    host: Arc<dyn ModalHost>,
    surface: Arc<dyn Container>,
    completion: Completion,
    animated: bool,
    dismissed: bool,
}

impl Presentation {
    pub fn id(&self) -> &PresentationId {
        &self.id
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    pub fn surface(&self) -> &Arc<dyn Container> {
        &self.surface
    }

    /// Handle for the close button, swipe-to-dismiss, or another thread.
    pub fn dismiss_handle(&self) -> RendererHandle {
        self.renderer.handle()
    }

    /// Service the renderer; dismisses if a dismiss was requested.
    pub fn pump(&mut self) -> PumpOutcome {
        let outcome = self.renderer.pump();
        if outcome.dismiss_requested {
            self.dismiss();
        }
        outcome
    }

    /// Tear down the renderer and hide the surface. Only the first call
    /// does anything; it returns `true`.
    pub fn dismiss(&mut self) -> bool {
        if self.dismissed {
            debug!(presentation = %self.id, "already dismissed");
            return false;
        }
        self.dismissed = true;
        self.renderer.teardown();
        self.host
            .end_modal(&self.id, self.animated, self.completion.clone());
        info!(presentation = %self.id, "dismissed");
        true
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }
}

impl fmt::Debug for Presentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Presentation")
            .field("id", &self.id)
            .field("renderer", self.renderer.id())
            .field("animated", &self.animated)
            .field("dismissed", &self.dismissed)
            .field("completion", &self.completion)
            .finish()
    }
}

impl Drop for Presentation {
    fn drop(&mut self) {
        self.dismiss();
    }
}
