//! Modal presentation of a renderer on a host container.

mod completion;
mod controller;
mod host;


pub use completion::{Completion, CompletionCallback};
pub use controller::{PresentOptions, Presentation, PresentationController};
pub use host::{ModalHost, ModalRequest};
