//! Fakes shared by the unit tests.

use std::sync::{Arc, Mutex};

use permisso_common::{PermissoError, PresentationId, PresentationStyle, Result};
use url::Url;

use crate::container::{Container, ContainerNode};
use crate::engine::{ContentEngine, EngineOptions};
use crate::events::{EngineSink, RendererHandle};
use crate::presentation::{Completion, ModalHost, ModalRequest};
use crate::presenter::{ExternalOpener, OverlayPresenter};

pub(crate) fn test_url(raw: &str) -> Url {
    Url::parse(raw).expect("test URL")
}

#[derive(Default)]
pub(crate) struct RecordingOpener {
    opened: Mutex<Vec<Url>>,
    fail: bool,
}

impl RecordingOpener {
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(crate) fn opened(&self) -> Vec<Url> {
        self.opened.lock().unwrap().clone()
    }
}

impl ExternalOpener for RecordingOpener {
    fn open_external(&self, url: &Url) -> Result<()> {
        self.opened.lock().unwrap().push(url.clone());
        if self.fail {
            return Err(PermissoError::ExternalOpen("no handler for scheme".into()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct RecordingPresenter {
    presented: Mutex<Vec<Url>>,
    fail: bool,
}

impl RecordingPresenter {
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(crate) fn presented(&self) -> Vec<Url> {
        self.presented.lock().unwrap().clone()
    }
}

impl OverlayPresenter for RecordingPresenter {
    fn present_overlay(&self, url: &Url) -> Result<()> {
        if self.fail {
            return Err(PermissoError::Overlay("overlay refused".into()));
        }
        self.presented.lock().unwrap().push(url.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EngineCall {
    Load(Url),
    DetachHook,
}

#[derive(Clone, Default)]
pub(crate) struct EngineLog(Arc<Mutex<Vec<EngineCall>>>);

impl EngineLog {
    pub(crate) fn calls(&self) -> Vec<EngineCall> {
        self.0.lock().unwrap().clone()
    }

    fn push(&self, call: EngineCall) {
        self.0.lock().unwrap().push(call);
    }
}

pub(crate) struct FakeEngine {
    log: EngineLog,
}

impl FakeEngine {
    pub(crate) fn boxed(log: EngineLog) -> Box<dyn ContentEngine> {
        Box::new(Self { log })
    }
}

impl ContentEngine for FakeEngine {
    fn load_url(&mut self, url: &Url) -> Result<()> {
        self.log.push(EngineCall::Load(url.clone()));
        Ok(())
    }

    fn detach_message_hook(&mut self) {
        self.log.push(EngineCall::DetachHook);
    }
}

/// What a [`FakeHost`] was asked to show.
#[derive(Debug, Clone)]
pub(crate) struct ShownModal {
    pub(crate) id: PresentationId,
    pub(crate) style: PresentationStyle,
    pub(crate) title: String,
    pub(crate) animated: bool,
}

#[derive(Default)]
struct HostState {
    current: Option<PresentationId>,
    shown: Vec<ShownModal>,
    hidden: Vec<PresentationId>,
    pending_transition: Option<Completion>,
    dismiss: Option<RendererHandle>,
    sinks: Vec<EngineSink>,
    options: Vec<EngineOptions>,
}

/// Single-slot modal host. Transitions finish immediately unless built
/// with [`FakeHost::deferred`].
pub(crate) struct FakeHost {
    state: Mutex<HostState>,
    presenter: Arc<RecordingPresenter>,
    engine_log: EngineLog,
    fail_engine: bool,
    defer_transitions: bool,
}

impl FakeHost {
    fn with(fail_engine: bool, defer_transitions: bool) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(HostState::default()),
            presenter: Arc::new(RecordingPresenter::default()),
            engine_log: EngineLog::default(),
            fail_engine,
            defer_transitions,
        })
    }

    pub(crate) fn new() -> Arc<Self> {
        Self::with(false, false)
    }

    pub(crate) fn failing_engine() -> Arc<Self> {
        Self::with(true, false)
    }

    /// Show transitions stay pending until [`finish_transition`](Self::finish_transition).
    pub(crate) fn deferred() -> Arc<Self> {
        Self::with(false, true)
    }

    pub(crate) fn finish_transition(&self) -> bool {
        let pending = self.state.lock().unwrap().pending_transition.take();
        pending.is_some_and(|c| c.fire())
    }

    pub(crate) fn presenter(&self) -> &RecordingPresenter {
        &self.presenter
    }

    pub(crate) fn engine_log(&self) -> EngineLog {
        self.engine_log.clone()
    }

    pub(crate) fn is_presenting(&self) -> bool {
        self.state.lock().unwrap().current.is_some()
    }

    pub(crate) fn shown(&self) -> Vec<ShownModal> {
        self.state.lock().unwrap().shown.clone()
    }

    pub(crate) fn hidden(&self) -> Vec<PresentationId> {
        self.state.lock().unwrap().hidden.clone()
    }

    /// What the close button would call.
    pub(crate) fn dismiss_handle(&self) -> Option<RendererHandle> {
        self.state.lock().unwrap().dismiss.clone()
    }

    pub(crate) fn last_sink(&self) -> Option<EngineSink> {
        self.state.lock().unwrap().sinks.last().cloned()
    }

    pub(crate) fn engine_options(&self) -> Vec<EngineOptions> {
        self.state.lock().unwrap().options.clone()
    }
}

impl ModalHost for FakeHost {
    fn begin_modal(&self, request: ModalRequest) -> Result<Arc<dyn Container>> {
        let on_shown = {
            let mut state = self.state.lock().unwrap();
            if let Some(current) = &state.current {
                return Err(PermissoError::PresentationUnavailable(format!(
                    "already presenting {current}"
                )));
            }
            state.current = Some(request.id.clone());
            state.shown.push(ShownModal {
                id: request.id.clone(),
                style: request.style,
                title: request.title.clone(),
                animated: request.animated,
            });
            state.dismiss = Some(request.dismiss.clone());
            if self.defer_transitions {
                state.pending_transition = Some(request.on_shown.clone());
                None
            } else {
                Some(request.on_shown)
            }
        };
        if let Some(on_shown) = on_shown {
            on_shown.fire();
        }
        let surface: Arc<dyn Container> =
            ContainerNode::root(Some(Arc::clone(&self.presenter) as Arc<dyn OverlayPresenter>));
        Ok(surface)
    }

    fn build_engine(
        &self,
        _surface: &Arc<dyn Container>,
        sink: EngineSink,
        options: &EngineOptions,
    ) -> Result<Box<dyn ContentEngine>> {
        let mut state = self.state.lock().unwrap();
        state.sinks.push(sink);
        state.options.push(options.clone());
        if self.fail_engine {
            return Err(PermissoError::RendererInitializationFailed(
                "engine unavailable".into(),
            ));
        }
        Ok(FakeEngine::boxed(self.engine_log.clone()))
    }

    fn end_modal(&self, id: &PresentationId, _animated: bool, on_hidden: Completion) {
        {
            let mut state = self.state.lock().unwrap();
            if state.current.as_ref() == Some(id) {
                state.current = None;
                state.dismiss = None;
            }
            state.hidden.push(id.clone());
        }
        on_hidden.fire();
    }
}
