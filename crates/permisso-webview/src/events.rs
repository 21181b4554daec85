//! Renderer events and the sink engines push them through.
//!
//! Engine callbacks fire on whatever thread the platform chooses. Anything
//! that needs the UI thread (link navigation, loads, dismissal) is queued
//! here and drained by [`Renderer::pump`](crate::Renderer::pump). Script
//! messages skip the queue and go straight to the message bridge.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use permisso_common::RendererId;
use tracing::{debug, trace, warn};
use url::Url;

use crate::bridge::MessageBridge;
use crate::ipc::ScriptMessage;

/// Called after an event is queued so the host can schedule a pump.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Work for the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererEvent {
    /// Content asked for a new window or tab.
    NewWindowRequested(Url),
    /// Replace the current document.
    LoadRequested(Url),
    /// The user or the host asked to close the presentation.
    DismissRequested,
}

#[derive(Default)]
struct QueueState {
    events: VecDeque<RendererEvent>,
    closed: bool,
    waker: Option<Waker>,
}

/// Per-renderer event queue. Clones share state.
#[derive(Clone, Default)]
pub(crate) struct EventQueue {
    state: Arc<Mutex<QueueState>>,
}

impl EventQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue an event. Returns `false` once the queue is closed.
    pub(crate) fn push(&self, event: RendererEvent) -> bool {
        let waker = {
            let mut state = self.lock();
            if state.closed {
                return false;
            }
            state.events.push_back(event);
            state.waker.clone()
        };
        if let Some(wake) = waker {
            wake();
        }
        true
    }

    pub(crate) fn drain(&self) -> Vec<RendererEvent> {
        self.lock().events.drain(..).collect()
    }

    /// Drop pending events and refuse new ones.
    pub(crate) fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        state.events.clear();
        state.waker = None;
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub(crate) fn set_waker(&self, waker: Option<Waker>) {
        let mut state = self.lock();
        if !state.closed {
            state.waker = waker;
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }
}

/// What a content engine reports into. Safe to call from any thread.
#[derive(Clone)]
pub struct EngineSink {
    renderer: RendererId,
    events: EventQueue,
    bridge: MessageBridge,
}

impl EngineSink {
    pub(crate) fn new(renderer: RendererId, events: EventQueue, bridge: MessageBridge) -> Self {
        Self {
            renderer,
            events,
            bridge,
        }
    }

    pub fn renderer_id(&self) -> &RendererId {
        &self.renderer
    }

    /// Content requested a new window. The engine should then refuse to
    /// open one itself. Returns `true` if the request was queued.
    ///
    /// A target that does not parse as an absolute URL is the one request
    /// that is dropped rather than degraded: no overlay, opener or custom
    /// handler can act on it.
    pub fn new_window_requested(&self, raw_url: &str) -> bool {
        match Url::parse(raw_url) {
            Ok(url) => {
                debug!(renderer = %self.renderer, url = %url, "new window requested");
                self.events.push(RendererEvent::NewWindowRequested(url))
            }
            Err(e) => {
                warn!(
                    renderer = %self.renderer,
                    url = raw_url,
                    error = %e,
                    "dropping new window request with invalid URL"
                );
                false
            }
        }
    }

    /// Forward an already-decoded script message to the bridge.
    pub fn script_message(&self, message: ScriptMessage) -> bool {
        self.bridge.on_message(message)
    }

    /// Forward a raw IPC body. Bodies that are not bridge envelopes are
    /// ignored.
    pub fn ipc_body(&self, raw: &str) -> bool {
        match ScriptMessage::from_ipc_body(raw) {
            Some(message) => self.script_message(message),
            None => {
                trace!(renderer = %self.renderer, "ignoring IPC body that is not a script message");
                false
            }
        }
    }

    /// Whether messages are still being delivered.
    pub fn is_attached(&self) -> bool {
        self.bridge.is_attached()
    }
}

/// Thread-safe handle for asking a renderer to do UI-thread work.
#[derive(Clone)]
pub struct RendererHandle {
    renderer: RendererId,
    events: EventQueue,
}

impl RendererHandle {
    pub(crate) fn new(renderer: RendererId, events: EventQueue) -> Self {
        Self { renderer, events }
    }

    pub fn id(&self) -> &RendererId {
        &self.renderer
    }

    /// Ask the renderer to load `url` on its next pump.
    pub fn load(&self, url: Url) -> bool {
        self.events.push(RendererEvent::LoadRequested(url))
    }

    /// Ask the owning presentation to dismiss itself.
    pub fn request_dismiss(&self) -> bool {
        self.events.push(RendererEvent::DismissRequested)
    }

    /// Whether the renderer is gone.
    pub fn is_closed(&self) -> bool {
        self.events.is_closed()
    }
}
