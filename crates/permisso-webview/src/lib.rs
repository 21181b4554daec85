//! Embedded web content with a message bridge and a link navigation policy.
//!
//! - [`Renderer`] wraps one content engine and binds a [`LinkPolicy`] and a
//!   [`MessageBridge`] to it
//! - [`PresentationController`] shows a renderer modally on a [`ModalHost`]
//! - [`Permisso`] is the process-wide facade over both
//! - [`WryEngine`] is the `wry` backed engine

pub mod bridge;
pub mod container;
pub mod engine;
pub mod events;
pub mod facade;
pub mod gate;
pub mod ipc;
pub mod policy;
pub mod presentation;
pub mod presenter;
pub mod queue;
pub mod renderer;
pub mod wry_engine;

#[cfg(test)]
mod testing;

pub use bridge::{normalize_payload, MessageBridge};
pub use container::{Container, ContainerNode, ContainerRef};
pub use engine::{ContentEngine, EngineOptions};
pub use events::{EngineSink, RendererEvent, RendererHandle, Waker};
pub use facade::Permisso;
pub use gate::CallbackGate;
pub use ipc::{MessageBody, ScriptMessage, BRIDGE_CHANNEL};
pub use policy::{LinkAction, LinkActionKind, LinkPolicy};
pub use presentation::{
    Completion, ModalHost, ModalRequest, PresentOptions, Presentation, PresentationController,
};
pub use presenter::{ExternalOpener, OverlayPresenter, SystemOpener};
pub use queue::HandlerQueue;
pub use renderer::{PumpOutcome, Renderer};
pub use wry_engine::WryEngine;
