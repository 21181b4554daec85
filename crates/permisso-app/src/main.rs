mod app;
mod cli;
mod host;
mod layout;

use std::path::Path;
use std::sync::Arc;

use permisso_common::LinkBehavior;
use permisso_config::{toml_loader, Configuration, PermissoSettings};
use permisso_webview::Permisso;
use tracing_subscriber::EnvFilter;
use url::Url;
use winit::event_loop::EventLoop;

use crate::app::{DemoApp, UserEvent};

fn main() {
    let args = cli::parse();

    // Settings come first so their log level can seed the filter.
    let loaded = match &args.config {
        Some(path) => toml_loader::load_from_path(Path::new(path)),
        None => toml_loader::load_default(),
    };
    let settings = loaded.as_ref().cloned().unwrap_or_default();

    let log_directive = match &args.log_level {
        Some(level) => format!("permisso={level}"),
        None => format!("permisso={}", settings.logging.level.as_directive()),
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "permisso=info".parse().unwrap()),
            ),
        )
        .init();

    tracing::info!("Permisso demo v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Err(e) = &loaded {
        tracing::warn!("Settings load failed, using defaults: {e}");
    }

    configure(&settings, args.link_behavior.map(LinkBehavior::from));

    let event_loop = match EventLoop::<UserEvent>::with_user_event().build() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            tracing::error!("Failed to create event loop: {e}");
            std::process::exit(1);
        }
    };
    let mut app = DemoApp::new(args.url, settings, event_loop.create_proxy());

    tracing::info!("Entering event loop");
    if let Err(e) = event_loop.run_app(&mut app) {
        tracing::error!("Event loop error: {e}");
    }
    tracing::info!("Shutdown complete");
}

/// Seed the shared configuration from settings and wire up the demo handlers.
fn configure(settings: &PermissoSettings, link_behavior: Option<LinkBehavior>) {
    let seeded = Configuration::from_settings(settings);
    Permisso::shared().configure(|config| {
        config.link_behavior = link_behavior.unwrap_or(seeded.link_behavior);
        config.presentation_style = seeded.presentation_style;
        config.message_handler = Some(Arc::new(|msg: &str| {
            tracing::info!(len = msg.len(), "message from content");
        }));
        if config.link_behavior == LinkBehavior::Custom {
            config.custom_link_handler = Some(Arc::new(|url: &Url| {
                tracing::info!(url = %url, "custom link handler");
            }));
        }
    });
}
