//! [`ContentEngine`] backed by a child `wry::WebView`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use permisso_common::{PermissoError, Result};
use tracing::{debug, trace, warn};
use url::Url;
use wry::raw_window_handle;
use wry::{WebView, WebViewBuilder};

use crate::engine::{ContentEngine, EngineOptions};
use crate::events::EngineSink;
use crate::ipc::{BRIDGE_DETACH_SCRIPT, BRIDGE_INIT_SCRIPT};

pub struct WryEngine {
    webview: WebView,
    /// Cleared on detach; the IPC handler checks it before forwarding.
    hooked: Arc<AtomicBool>,
}

impl WryEngine {
    /// Build a web view as a child of `window`, positioned at `bounds`.
    pub fn build_as_child<W: raw_window_handle::HasWindowHandle>(
        window: &W,
        bounds: wry::Rect,
        options: &EngineOptions,
        sink: EngineSink,
    ) -> Result<Self> {
        let hooked = Arc::new(AtomicBool::new(true));

        let mut builder = WebViewBuilder::new()
            .with_bounds(bounds)
            .with_devtools(options.devtools)
            .with_focused(true)
            .with_initialization_script(BRIDGE_INIT_SCRIPT);

        if let Some(ua) = &options.user_agent {
            builder = builder.with_user_agent(ua);
        }

        builder = attach_ipc_handler(builder, sink.clone(), Arc::clone(&hooked));
        builder = attach_new_window_handler(builder, sink.clone());
        builder = attach_page_load_handler(builder, &sink);

        let webview = builder
            .build_as_child(window)
            .map_err(|e| PermissoError::RendererInitializationFailed(e.to_string()))?;

        debug!(renderer = %sink.renderer_id(), "web view created");
        Ok(Self { webview, hooked })
    }
}

impl ContentEngine for WryEngine {
    fn load_url(&mut self, url: &Url) -> Result<()> {
        self.webview
            .load_url(url.as_str())
            .map_err(|e| PermissoError::WebView(e.to_string()))
    }

    fn detach_message_hook(&mut self) {
        if !self.hooked.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Err(e) = self.webview.evaluate_script(BRIDGE_DETACH_SCRIPT) {
            warn!(error = %e, "failed to remove script message hook");
        }
    }
}

fn attach_ipc_handler<'a>(
    builder: WebViewBuilder<'a>,
    sink: EngineSink,
    hooked: Arc<AtomicBool>,
) -> WebViewBuilder<'a> {
    builder.with_ipc_handler(move |request| {
        if !hooked.load(Ordering::SeqCst) {
            return;
        }
        let body = request.body();
        trace!(renderer = %sink.renderer_id(), body_len = body.len(), "IPC message from content");
        sink.ipc_body(body);
    })
}

/// Every new-window request is denied at the engine level and routed
/// through the link policy instead.
fn attach_new_window_handler<'a>(
    builder: WebViewBuilder<'a>,
    sink: EngineSink,
) -> WebViewBuilder<'a> {
    builder.with_new_window_req_handler(move |url| {
        sink.new_window_requested(&url);
        false
    })
}

fn attach_page_load_handler<'a>(builder: WebViewBuilder<'a>, sink: &EngineSink) -> WebViewBuilder<'a> {
    let renderer = sink.renderer_id().clone();
    builder.with_on_page_load_handler(move |event, url| {
        let state = match event {
            wry::PageLoadEvent::Started => "started",
            wry::PageLoadEvent::Finished => "finished",
        };
        debug!(renderer = %renderer, state, url = %url, "page load");
    })
}
