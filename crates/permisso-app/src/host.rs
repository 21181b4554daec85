//! The demo window acting as a modal host.

use std::sync::{Arc, Mutex, MutexGuard};

use permisso_common::{PermissoError, PresentationId, PresentationStyle, Result};
use permisso_webview::{
    Completion, Container, ContainerNode, ContentEngine, EngineOptions, EngineSink, ModalHost,
    ModalRequest, OverlayPresenter, RendererHandle, WryEngine,
};
use tracing::{debug, info};
use url::Url;
use winit::window::Window;

use crate::layout;

/// Overlay URLs waiting for the event loop to open them.
#[derive(Default)]
pub struct OverlayQueue {
    pending: Mutex<Vec<Url>>,
}

impl OverlayQueue {
    pub fn take(&self) -> Vec<Url> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(|p| p.into_inner()))
    }
}

impl OverlayPresenter for OverlayQueue {
    fn present_overlay(&self, url: &Url) -> Result<()> {
        debug!(url = %url, "overlay queued");
        self.pending
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(url.clone());
        Ok(())
    }
}

struct ActiveModal {
    id: PresentationId,
    style: PresentationStyle,
    dismiss: RendererHandle,
}

pub struct WindowHost {
    window: Arc<Window>,
    /// Root of the containment chain; owns the overlay presenter.
    root: Arc<dyn Container>,
    overlays: Arc<OverlayQueue>,
    active: Mutex<Option<ActiveModal>>,
}

impl WindowHost {
    pub fn new(window: Arc<Window>) -> Arc<Self> {
        let overlays = Arc::new(OverlayQueue::default());
        let root: Arc<dyn Container> =
            ContainerNode::root(Some(Arc::clone(&overlays) as Arc<dyn OverlayPresenter>));
        Arc::new(Self {
            window,
            root,
            overlays,
            active: Mutex::new(None),
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn overlays(&self) -> &OverlayQueue {
        &self.overlays
    }

    /// What the close button and Escape key trigger.
    pub fn request_dismiss(&self) -> bool {
        match self.lock().as_ref() {
            Some(active) => active.dismiss.request_dismiss(),
            None => false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<ActiveModal>> {
        self.active.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn logical_size(&self) -> (f64, f64) {
        let size = self.window.inner_size().to_logical::<f64>(self.window.scale_factor());
        (size.width, size.height)
    }
}

impl ModalHost for WindowHost {
    fn begin_modal(&self, request: ModalRequest) -> Result<Arc<dyn Container>> {
        {
            let mut active = self.lock();
            if let Some(current) = active.as_ref() {
                return Err(PermissoError::PresentationUnavailable(format!(
                    "window is already presenting {}",
                    current.id
                )));
            }
            *active = Some(ActiveModal {
                id: request.id.clone(),
                style: request.style,
                dismiss: request.dismiss,
            });
        }

        self.window.set_title(&request.title);
        info!(presentation = %request.id, style = ?request.style, "modal shown");
        // No transition to wait for.
        request.on_shown.fire();

        let surface: Arc<dyn Container> = ContainerNode::child_of(&self.root, None);
        Ok(surface)
    }

    fn build_engine(
        &self,
        _surface: &Arc<dyn Container>,
        sink: EngineSink,
        options: &EngineOptions,
    ) -> Result<Box<dyn ContentEngine>> {
        let style = self
            .lock()
            .as_ref()
            .map(|active| active.style)
            .unwrap_or_default();
        let (width, height) = self.logical_size();
        let bounds = layout::surface_frame(style, width, height).to_wry();
        let engine = WryEngine::build_as_child(&*self.window, bounds, options, sink)?;
        Ok(Box::new(engine))
    }

    fn end_modal(&self, id: &PresentationId, _animated: bool, on_hidden: Completion) {
        {
            let mut active = self.lock();
            if active.as_ref().is_some_and(|a| &a.id == id) {
                *active = None;
            }
        }
        info!(presentation = %id, "modal hidden");
        on_hidden.fire();
    }
}
