//! `ApplicationHandler` driving one presentation in one window.

use std::sync::{Arc, Mutex};

use permisso_config::schema::DEFAULT_TITLE;
use permisso_config::PermissoSettings;
use permisso_webview::{ModalHost, Permisso, PresentOptions, Presentation};
use tracing::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoopProxy};
use winit::keyboard::{Key, NamedKey};
use winit::window::{WindowAttributes, WindowId};
use wry::WebViewBuilder;

use crate::host::WindowHost;
use crate::layout;

#[derive(Debug, Clone, Copy)]
pub enum UserEvent {
    /// A renderer queued work for the UI thread.
    Wake,
}

pub struct DemoApp {
    url: String,
    settings: PermissoSettings,
    proxy: Arc<Mutex<EventLoopProxy<UserEvent>>>,
    host: Option<Arc<WindowHost>>,
    presentation: Option<Presentation>,
    /// Open overlay browsers, topmost last.
    overlays: Vec<wry::WebView>,
}

impl DemoApp {
    pub fn new(url: String, settings: PermissoSettings, proxy: EventLoopProxy<UserEvent>) -> Self {
        Self {
            url,
            settings,
            proxy: Arc::new(Mutex::new(proxy)),
            host: None,
            presentation: None,
            overlays: Vec::new(),
        }
    }

    fn present(&mut self, event_loop: &ActiveEventLoop) -> bool {
        let attrs = WindowAttributes::default()
            .with_title(DEFAULT_TITLE)
            .with_resizable(false)
            .with_inner_size(winit::dpi::LogicalSize::new(1024.0, 768.0));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                error!("Failed to create window: {e}");
                return false;
            }
        };

        let host = WindowHost::new(window);
        let modal_host: Arc<dyn ModalHost> = host.clone();
        let options = PresentOptions::from_settings(&self.settings)
            .with_completion(|| info!("presentation transition finished"));

        let presentation = match Permisso::shared().present_with(&modal_host, &self.url, options) {
            Ok(p) => p,
            Err(e) => {
                error!(url = %self.url, "Failed to present: {e}");
                return false;
            }
        };

        if let Some(reason) = presentation.renderer().degraded_reason() {
            error!(reason, "content engine unavailable");
            host.window()
                .set_title(&format!("{DEFAULT_TITLE} (content unavailable)"));
        }

        let proxy = Arc::clone(&self.proxy);
        presentation.renderer().set_waker(Some(Arc::new(move || {
            if let Ok(proxy) = proxy.lock() {
                let _ = proxy.send_event(UserEvent::Wake);
            }
        })));

        self.host = Some(host);
        self.presentation = Some(presentation);
        true
    }

    /// Service the presentation and open any overlays it asked for.
    fn pump(&mut self, event_loop: &ActiveEventLoop) {
        let Some(presentation) = self.presentation.as_mut() else {
            return;
        };
        let outcome = presentation.pump();
        if outcome.processed > 0 {
            debug!(processed = outcome.processed, "renderer events processed");
        }
        if presentation.is_dismissed() {
            self.shutdown(event_loop);
            return;
        }

        let Some(host) = self.host.clone() else {
            return;
        };
        for url in host.overlays().take() {
            self.open_overlay(&host, url);
        }
    }

    fn open_overlay(&mut self, host: &WindowHost, url: url::Url) {
        let size = host
            .window()
            .inner_size()
            .to_logical::<f64>(host.window().scale_factor());
        let bounds = layout::overlay_frame(size.width, size.height).to_wry();

        let built = WebViewBuilder::new()
            .with_url(url.as_str())
            .with_bounds(bounds)
            .with_focused(true)
            .build_as_child(host.window());

        match built {
            Ok(webview) => {
                info!(url = %url, "overlay opened");
                self.overlays.push(webview);
            }
            Err(e) => {
                warn!(url = %url, "Overlay failed, opening externally: {e}");
                if let Err(e) = Permisso::shared().external_opener().open_external(&url) {
                    warn!(url = %url, "External open failed: {e}");
                }
            }
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.overlays.clear();
        if let Some(mut presentation) = self.presentation.take() {
            presentation.dismiss();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler<UserEvent> for DemoApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.host.is_some() {
            return;
        }
        if !self.present(event_loop) {
            event_loop.exit();
            return;
        }
        // Anything queued before the waker was installed.
        self.pump(event_loop);
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::Wake => self.pump(event_loop),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Window close requested");
                self.shutdown(event_loop);
            }

            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape) =>
            {
                if self.overlays.pop().is_some() {
                    debug!("overlay closed");
                } else if let Some(host) = &self.host {
                    // Same path as the close button.
                    host.request_dismiss();
                }
            }

            _ => {}
        }
    }
}
