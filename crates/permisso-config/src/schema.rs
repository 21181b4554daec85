//! On-disk settings schema.
//!
//! All structs use `serde(default)` so partial files work correctly.

use permisso_common::{LinkBehavior, PresentationStyle};
use serde::{Deserialize, Serialize};

/// Title shown on the presented surface's navigation bar.
pub const DEFAULT_TITLE: &str = "Permisso";

/// Root settings file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissoSettings {
    pub links: LinksSettings,
    pub presentation: PresentationSettings,
    pub renderer: RendererSettings,
    pub logging: LoggingSettings,
}

/// Link handling defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinksSettings {
    pub behavior: LinkBehavior,
}

/// Modal presentation defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationSettings {
    pub style: PresentationStyle,
    pub animated: bool,
    pub title: String,
}

impl Default for PresentationSettings {
    fn default() -> Self {
        Self {
            style: PresentationStyle::FullScreen,
            animated: true,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

/// Options passed to the content engine when a renderer is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    pub user_agent: Option<String>,
    /// Always on in debug builds.
    pub devtools: bool,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            user_agent: None,
            devtools: cfg!(debug_assertions),
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_sdk_defaults() {
        let settings = PermissoSettings::default();
        assert_eq!(settings.links.behavior, LinkBehavior::CustomTab);
        assert_eq!(settings.presentation.style, PresentationStyle::FullScreen);
        assert!(settings.presentation.animated);
        assert_eq!(settings.presentation.title, "Permisso");
        assert_eq!(settings.logging.level, LogLevel::Info);
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let settings: PermissoSettings = toml::from_str("").unwrap();
        assert_eq!(settings.links.behavior, LinkBehavior::CustomTab);
        assert_eq!(settings.presentation.title, DEFAULT_TITLE);
    }

    #[test]
    fn partial_section_preserves_sibling_defaults() {
        let toml_str = r#"
[presentation]
style = "page-sheet"
"#;
        let settings: PermissoSettings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.presentation.style, PresentationStyle::PageSheet);
        assert!(settings.presentation.animated);
        assert_eq!(settings.presentation.title, DEFAULT_TITLE);
    }

    #[test]
    fn unknown_link_behavior_is_rejected() {
        let toml_str = r#"
[links]
behavior = "carrier-pigeon"
"#;
        assert!(toml::from_str::<PermissoSettings>(toml_str).is_err());
    }

    #[test]
    fn log_level_directive() {
        assert_eq!(LogLevel::Warn.as_directive(), "warn");
        let settings: PermissoSettings = toml::from_str("[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(settings.logging.level, LogLevel::Debug);
    }
}
