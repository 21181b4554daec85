pub mod errors;
pub mod id;
pub mod types;

pub use errors::{ConfigError, PermissoError};
pub use id::{new_id, PresentationId, RendererId};
pub use types::{LinkBehavior, LinkHandler, MessageHandler, PresentationStyle};

pub type Result<T> = std::result::Result<T, PermissoError>;
