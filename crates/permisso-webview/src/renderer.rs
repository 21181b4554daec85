//! A renderer: one content engine plus the link policy and message bridge
//! bound to it.
//!
//! `Renderer` lives on the UI thread. Other threads talk to it through a
//! [`RendererHandle`]; engines talk to it through an [`EngineSink`]. Both
//! only enqueue work, which [`Renderer::pump`] then processes in arrival
//! order.

use std::sync::Arc;

use permisso_common::{LinkBehavior, LinkHandler, MessageHandler, PermissoError, RendererId, Result};
use permisso_config::Configuration;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::bridge::MessageBridge;
use crate::container::ContainerRef;
use crate::engine::ContentEngine;
use crate::events::{EngineSink, EventQueue, RendererEvent, RendererHandle, Waker};
use crate::gate::CallbackGate;
use crate::policy::{LinkActionKind, LinkPolicy};
use crate::presenter::ExternalOpener;
use crate::queue::HandlerQueue;

/// What one [`Renderer::pump`] call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpOutcome {
    pub processed: usize,
    pub dismiss_requested: bool,
}

pub struct Renderer {
    id: RendererId,
    engine: Option<Box<dyn ContentEngine>>,
    /// Why the engine could not be built, if it could not.
    degraded: Option<String>,
    policy: LinkPolicy,
    bridge: MessageBridge,
    container: ContainerRef,
    opener: Arc<dyn ExternalOpener>,
    /// Shared with the bridge; closing it stops message and link callbacks.
    callbacks: CallbackGate,
    events: EventQueue,
    torn_down: bool,
}

impl Renderer {
    /// Build a renderer bound to a snapshot of `config`.
    ///
    /// `build_engine` receives the sink the engine must report into. If it
    /// fails the renderer is still returned, in a degraded state.
    pub fn new<F>(config: &Configuration, opener: Arc<dyn ExternalOpener>, build_engine: F) -> Self
    where
        F: FnOnce(EngineSink) -> Result<Box<dyn ContentEngine>>,
    {
        Self::build(RendererId::new(), EventQueue::new(), config, opener, build_engine)
    }

    pub(crate) fn build<F>(
        id: RendererId,
        events: EventQueue,
        config: &Configuration,
        opener: Arc<dyn ExternalOpener>,
        build_engine: F,
    ) -> Self
    where
        F: FnOnce(EngineSink) -> Result<Box<dyn ContentEngine>>,
    {
        let callbacks = CallbackGate::new(HandlerQueue::spawn(format!("permisso-handlers-{id}")));
        let bridge = MessageBridge::new(id.clone(), config.message_handler.clone(), callbacks.clone());
        let sink = EngineSink::new(id.clone(), events.clone(), bridge.clone());

        let (engine, degraded) = match build_engine(sink) {
            Ok(engine) => (Some(engine), None),
            Err(e) => {
                error!(renderer = %id, error = %e, "content engine could not be created");
                (None, Some(e.to_string()))
            }
        };

        debug!(
            renderer = %id,
            link_behavior = %config.effective_link_behavior(),
            message_handler = config.message_handler.is_some(),
            "renderer created"
        );

        Self {
            id,
            engine,
            degraded,
            policy: LinkPolicy::from_configuration(config),
            bridge,
            container: ContainerRef::detached(),
            opener,
            callbacks,
            events,
            torn_down: false,
        }
    }

    pub fn id(&self) -> &RendererId {
        &self.id
    }

    /// Handle other threads use to marshal loads and dismissals here.
    pub fn handle(&self) -> RendererHandle {
        RendererHandle::new(self.id.clone(), self.events.clone())
    }

    /// Sink for an engine attached after construction.
    pub fn sink(&self) -> EngineSink {
        EngineSink::new(self.id.clone(), self.events.clone(), self.bridge.clone())
    }

    /// Called whenever work is queued for [`pump`](Self::pump).
    pub fn set_waker(&self, waker: Option<Waker>) {
        self.events.set_waker(waker);
    }

    /// Point the renderer at the node it is attached to. Never owning.
    pub fn set_container(&mut self, container: ContainerRef) {
        self.container = container;
    }

    pub fn load(&mut self, url: &Url) -> Result<()> {
        if let Some(reason) = &self.degraded {
            return Err(PermissoError::RendererInitializationFailed(reason.clone()));
        }
        let engine = self
            .engine
            .as_mut()
            .ok_or_else(|| PermissoError::WebView("renderer has been torn down".into()))?;
        info!(renderer = %self.id, url = %url, "loading");
        engine.load_url(url)
    }

    pub fn configure_link_behavior(&mut self, behavior: LinkBehavior, handler: Option<LinkHandler>) {
        debug!(renderer = %self.id, behavior = %behavior, handler = handler.is_some(), "link behavior configured");
        self.policy = LinkPolicy::new(behavior, handler);
    }

    pub fn configure_message_handler(&mut self, handler: Option<MessageHandler>) {
        self.bridge.set_handler(handler);
    }

    pub fn link_policy(&self) -> &LinkPolicy {
        &self.policy
    }

    /// Apply the link policy to one new-window request. UI thread only.
    pub fn handle_new_window(&mut self, url: &Url) -> LinkActionKind {
        self.policy
            .navigate(url, &self.container, self.opener.as_ref(), &self.callbacks)
    }

    /// Process queued events in arrival order.
    ///
    /// Stops at a dismiss request; whatever follows it is left for the
    /// owner to discard.
    pub fn pump(&mut self) -> PumpOutcome {
        let mut outcome = PumpOutcome::default();
        if self.torn_down {
            return outcome;
        }
        for event in self.events.drain() {
            outcome.processed += 1;
            match event {
                RendererEvent::NewWindowRequested(url) => {
                    self.handle_new_window(&url);
                }
                RendererEvent::LoadRequested(url) => {
                    if let Err(e) = self.load(&url) {
                        warn!(renderer = %self.id, url = %url, error = %e, "load failed");
                    }
                }
                RendererEvent::DismissRequested => {
                    outcome.dismiss_requested = true;
                    break;
                }
            }
        }
        outcome
    }

    /// Wait until every callback queued so far has run.
    pub fn flush_handlers(&self) {
        self.callbacks.flush();
    }

    /// Detach from the engine. Idempotent.
    ///
    /// Order matters: the event queue is closed first, then the callback
    /// gate (message deliveries and custom link jobs alike), then the
    /// engine's message hook is removed and the engine destroyed. No
    /// handler can start after this returns.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.events.close();
        self.bridge.detach();
        if let Some(mut engine) = self.engine.take() {
            engine.detach_message_hook();
        }
        debug!(renderer = %self.id, "renderer torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }

    pub fn degraded_reason(&self) -> Option<&str> {
        self.degraded.as_deref()
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        self.teardown();
    }
}
