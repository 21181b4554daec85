//! Message bridge: web content -> integrator message handler.
//!
//! The bridge filters intercepted messages by channel, normalizes the body
//! to a single string, and delivers it to the registered handler on the
//! renderer's handler queue. Nothing is buffered: a message that arrives
//! while no handler is registered is dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use permisso_common::{MessageHandler, PermissoError, RendererId};
use tracing::trace;

use crate::gate::CallbackGate;
use crate::ipc::{MessageBody, ScriptMessage, BRIDGE_CHANNEL};

/// Normalize a message body to the string handed to the integrator.
///
/// Text that parses as a JSON object or array is re-serialized compactly.
/// Any other text, including text that fails to parse, is passed through
/// unchanged.
pub fn normalize_payload(body: MessageBody) -> String {
    match body {
        MessageBody::Text(text) => match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(value) if value.is_object() || value.is_array() => {
                serde_json::to_string(&value).unwrap_or(text)
            }
            Ok(_) => text,
            Err(e) => {
                let err = PermissoError::MalformedMessagePayload(e.to_string());
                trace!(error = %err, "treating message as opaque text");
                text
            }
        },
        MessageBody::Structured(serde_json::Value::String(text)) => text,
        MessageBody::Structured(value) => value.to_string(),
    }
}

type HandlerSlot = Arc<Mutex<Option<MessageHandler>>>;

/// Cheap to clone; clones share the handler slot and gate.
#[derive(Clone)]
pub struct MessageBridge {
    renderer: RendererId,
    channel: Arc<str>,
    handler: HandlerSlot,
    gate: CallbackGate,
}

impl MessageBridge {
    pub fn new(renderer: RendererId, handler: Option<MessageHandler>, gate: CallbackGate) -> Self {
        Self {
            renderer,
            channel: Arc::from(BRIDGE_CHANNEL),
            handler: Arc::new(Mutex::new(handler)),
            gate,
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// The gate deliveries go through. Link callbacks share it.
    pub fn gate(&self) -> &CallbackGate {
        &self.gate
    }

    /// Replace the handler. Affects every delivery that has not started yet.
    pub fn set_handler(&self, handler: Option<MessageHandler>) {
        *lock(&self.handler) = handler;
    }

    pub fn has_handler(&self) -> bool {
        lock(&self.handler).is_some()
    }

    pub fn is_attached(&self) -> bool {
        self.gate.is_open()
    }

    /// Accept one intercepted message. Returns `true` if it was queued.
    ///
    /// Never waits on a handler; safe to call from the UI thread.
    pub fn on_message(&self, message: ScriptMessage) -> bool {
        if message.channel != *self.channel {
            trace!(
                renderer = %self.renderer,
                channel = %message.channel,
                "ignoring message on foreign channel"
            );
            return false;
        }
        if !self.is_attached() {
            trace!(renderer = %self.renderer, "bridge detached; message dropped");
            return false;
        }

        let payload = normalize_payload(message.body);
        trace!(renderer = %self.renderer, len = payload.len(), "message queued");

        let handler = Arc::clone(&self.handler);
        let renderer = self.renderer.clone();
        self.gate.submit(move || deliver(&handler, &renderer, &payload))
    }

    /// Stop delivering. Once this returns no handler invocation can start;
    /// a delivery already running on the worker is waited for.
    pub fn detach(&self) {
        if self.gate.close() {
            *lock(&self.handler) = None;
            trace!(renderer = %self.renderer, "bridge detached");
        }
    }
}

/// Runs on the worker with the gate held open.
fn deliver(slot: &Mutex<Option<MessageHandler>>, renderer: &RendererId, payload: &str) {
    // Clone out so the handler runs without the slot locked.
    let handler = lock(slot).clone();
    match handler {
        Some(handler) => handler(payload),
        None => trace!(renderer = %renderer, "no message handler; message discarded"),
    }
}

fn lock(slot: &Mutex<Option<MessageHandler>>) -> MutexGuard<'_, Option<MessageHandler>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
