//! Permisso configuration.
//!
//! Two layers:
//! - [`Configuration`]: the in-memory record the integrator mutates, holding
//!   the link behavior, presentation style, and optional callbacks.
//! - [`PermissoSettings`]: an optional TOML file that seeds the data fields of
//!   a `Configuration` and carries renderer and logging options.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use permisso_config::{toml_loader, Configuration};
//!
//! let settings = toml_loader::load_default().expect("failed to load settings");
//! let mut config = Configuration::from_settings(&settings);
//! config.configure(|c| c.message_handler = Some(std::sync::Arc::new(|msg: &str| println!("{msg}"))));
//! ```

pub mod configuration;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use configuration::Configuration;
pub use schema::PermissoSettings;
