use std::sync::Arc;

use permisso_common::{PresentationId, PresentationStyle, Result};

use crate::container::Container;
use crate::engine::{ContentEngine, EngineOptions};
use crate::events::{EngineSink, RendererHandle};

use super::completion::Completion;

/// Everything a host needs to put a modal surface on screen.
pub struct ModalRequest {
    pub id: PresentationId,
    pub style: PresentationStyle,
    /// Navigation bar title.
    pub title: String,
    pub animated: bool,
    /// Fire once the show transition has finished.
    pub on_shown: Completion,
    /// Wire the close button and swipe-to-dismiss to this.
    pub dismiss: RendererHandle,
}

/// A container that can show one modal surface at a time.
pub trait ModalHost {
    /// Claim the host and show a surface for `request`.
    ///
    /// Fails with `PresentationUnavailable` if a modal is already up. The
    /// returned node is where the renderer attaches; it should expose an
    /// overlay presenter, directly or through its parents.
    fn begin_modal(&self, request: ModalRequest) -> Result<Arc<dyn Container>>;

    /// Create the content engine inside `surface`.
    fn build_engine(
        &self,
        surface: &Arc<dyn Container>,
        sink: EngineSink,
        options: &EngineOptions,
    ) -> Result<Box<dyn ContentEngine>>;

    /// Hide the surface and release the host. Fire `on_hidden` once the
    /// hide transition has finished.
    fn end_modal(&self, id: &PresentationId, animated: bool, on_hidden: Completion);
}
