//! Link navigation policy.
//!
//! Every outbound link or new-window request raised by web content ends up
//! here. The decision depends only on the configured behavior, whether a
//! custom handler is set, and whether a presenting container is resolvable:
//!
//! | behavior          | handler | container | action          |
//! |-------------------|---------|-----------|-----------------|
//! | `CustomTab`       | any     | yes       | open in overlay |
//! | `CustomTab`       | any     | no        | open externally |
//! | `ExternalBrowser` | any     | any       | open externally |
//! | `Custom`          | set     | any       | invoke handler  |
//! | `Custom`          | unset   | yes / no  | as `CustomTab`  |

use std::fmt;
use std::sync::Arc;

use permisso_common::{LinkBehavior, LinkHandler};
use permisso_config::Configuration;
use tracing::{debug, warn};
use url::Url;

use crate::container::{Container, ContainerRef};
use crate::gate::CallbackGate;
use crate::presenter::ExternalOpener;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkActionKind {
    OpenInOverlay,
    OpenExternally,
    Invoke,
}

/// Pure decision table.
pub fn decide(
    behavior: LinkBehavior,
    has_custom_handler: bool,
    container_resolvable: bool,
) -> LinkActionKind {
    match behavior.effective(has_custom_handler) {
        LinkBehavior::ExternalBrowser => LinkActionKind::OpenExternally,
        LinkBehavior::Custom => LinkActionKind::Invoke,
        LinkBehavior::CustomTab if container_resolvable => LinkActionKind::OpenInOverlay,
        LinkBehavior::CustomTab => LinkActionKind::OpenExternally,
    }
}

/// A decision together with what is needed to carry it out.
#[derive(Clone)]
pub enum LinkAction {
    OpenInOverlay(Arc<dyn Container>),
    OpenExternally,
    Invoke(LinkHandler),
}

impl LinkAction {
    pub fn kind(&self) -> LinkActionKind {
        match self {
            Self::OpenInOverlay(_) => LinkActionKind::OpenInOverlay,
            Self::OpenExternally => LinkActionKind::OpenExternally,
            Self::Invoke(_) => LinkActionKind::Invoke,
        }
    }
}

impl fmt::Debug for LinkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.kind(), f)
    }
}

/// Link behavior bound to one renderer.
#[derive(Clone, Default)]
pub struct LinkPolicy {
    behavior: LinkBehavior,
    handler: Option<LinkHandler>,
}

impl LinkPolicy {
    pub fn new(behavior: LinkBehavior, handler: Option<LinkHandler>) -> Self {
        Self { behavior, handler }
    }

    pub fn from_configuration(config: &Configuration) -> Self {
        Self::new(config.link_behavior, config.custom_link_handler.clone())
    }

    pub fn behavior(&self) -> LinkBehavior {
        self.behavior
    }

    pub fn has_custom_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Decide what to do with a link. The container is only resolved when
    /// the behavior can use an overlay.
    pub fn decide(&self, container: &ContainerRef) -> LinkAction {
        let has_handler = self.handler.is_some();
        let wants_overlay =
            self::decide(self.behavior, has_handler, true) == LinkActionKind::OpenInOverlay;
        let resolved = if wants_overlay { container.resolve() } else { None };

        let kind = self::decide(self.behavior, has_handler, resolved.is_some());
        match (kind, resolved, &self.handler) {
            (LinkActionKind::Invoke, _, Some(handler)) => LinkAction::Invoke(Arc::clone(handler)),
            (LinkActionKind::OpenInOverlay, Some(node), _) => LinkAction::OpenInOverlay(node),
            _ => {
                if wants_overlay {
                    debug!(
                        behavior = %self.behavior,
                        "no presenting container; falling back to external open"
                    );
                }
                LinkAction::OpenExternally
            }
        }
    }

    /// Decide and carry out the action for `url`.
    ///
    /// Must run on the UI thread. A custom handler is only queued here; it
    /// runs later on the handler worker, and not at all if `callbacks` has
    /// been closed by then.
    pub fn navigate(
        &self,
        url: &Url,
        container: &ContainerRef,
        opener: &dyn ExternalOpener,
        callbacks: &CallbackGate,
    ) -> LinkActionKind {
        let action = self.decide(container);
        debug!(url = %url, action = ?action, "link navigation");

        match action {
            LinkAction::OpenInOverlay(node) => {
                let presented = match node.overlay_presenter() {
                    Some(presenter) => presenter.present_overlay(url),
                    None => Err(permisso_common::PermissoError::NoPresentingContainer),
                };
                match presented {
                    Ok(()) => LinkActionKind::OpenInOverlay,
                    Err(e) => {
                        warn!(url = %url, error = %e, "overlay failed; opening externally");
                        open_externally(opener, url);
                        LinkActionKind::OpenExternally
                    }
                }
            }
            LinkAction::OpenExternally => {
                open_externally(opener, url);
                LinkActionKind::OpenExternally
            }
            LinkAction::Invoke(handler) => {
                let url = url.clone();
                if !callbacks.submit(move || handler(&url)) {
                    debug!("renderer detached; custom link handler not called");
                }
                LinkActionKind::Invoke
            }
        }
    }
}

fn open_externally(opener: &dyn ExternalOpener, url: &Url) {
    if let Err(e) = opener.open_external(url) {
        warn!(url = %url, error = %e, "external open failed");
    }
}
