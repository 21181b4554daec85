//! Outbound link targets: an in-app overlay browser or the operating system.

use permisso_common::{PermissoError, Result};
use url::Url;

/// A surface able to show a lightweight in-app browser on top of itself.
pub trait OverlayPresenter: Send + Sync {
    fn present_overlay(&self, url: &Url) -> Result<()>;
}

/// Hands URLs to something outside the SDK.
pub trait ExternalOpener: Send + Sync {
    fn open_external(&self, url: &Url) -> Result<()>;
}

/// Opens URLs with the platform's default handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl ExternalOpener for SystemOpener {
    fn open_external(&self, url: &Url) -> Result<()> {
        open::that(url.as_str()).map_err(|e| PermissoError::ExternalOpen(format!("{url}: {e}")))
    }
}
