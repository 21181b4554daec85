use clap::{Parser, ValueEnum};
use permisso_common::LinkBehavior;

/// Permisso demo: presents a URL in an embedded web view.
#[derive(Parser, Debug)]
#[command(name = "permisso-demo", version, about)]
pub struct Args {
    /// URL to present.
    #[arg(long, default_value = "https://example.com")]
    pub url: String,

    /// Override the link behavior from the settings file.
    #[arg(long, value_enum)]
    pub link_behavior: Option<LinkBehaviorArg>,

    /// Settings file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkBehaviorArg {
    CustomTab,
    ExternalBrowser,
    Custom,
}

impl From<LinkBehaviorArg> for LinkBehavior {
    fn from(arg: LinkBehaviorArg) -> Self {
        match arg {
            LinkBehaviorArg::CustomTab => LinkBehavior::CustomTab,
            LinkBehaviorArg::ExternalBrowser => LinkBehavior::ExternalBrowser,
            LinkBehaviorArg::Custom => LinkBehavior::Custom,
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
