//! Settings validation.
//!
//! Collects every problem into a single `ConfigError` so the user sees them
//! all at once.

use std::sync::LazyLock;

use permisso_common::ConfigError;
use regex::Regex;

use crate::schema::PermissoSettings;

const MAX_TITLE_LEN: usize = 64;
const MAX_USER_AGENT_LEN: usize = 256;

static USER_AGENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\x20-\x7e]+$").unwrap());

/// Run all validations on a settings record, collecting all errors.
pub fn validate(settings: &PermissoSettings) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_title(&mut errors, &settings.presentation.title);
    if let Some(ua) = &settings.renderer.user_agent {
        validate_user_agent(&mut errors, ua);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_title(errors: &mut Vec<String>, title: &str) {
    if title.trim().is_empty() {
        errors.push("presentation.title must not be empty".into());
    } else if title.chars().count() > MAX_TITLE_LEN {
        errors.push(format!(
            "presentation.title is longer than {MAX_TITLE_LEN} characters"
        ));
    }
}

fn validate_user_agent(errors: &mut Vec<String>, ua: &str) {
    if ua.is_empty() {
        errors.push("renderer.user_agent must not be empty when set".into());
        return;
    }
    if ua.len() > MAX_USER_AGENT_LEN {
        errors.push(format!(
            "renderer.user_agent is longer than {MAX_USER_AGENT_LEN} bytes"
        ));
    }
    if !USER_AGENT_RE.is_match(ua) {
        errors.push("renderer.user_agent contains non-printable characters".into());
    }
}
