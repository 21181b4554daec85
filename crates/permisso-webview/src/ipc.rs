//! Script-message protocol between web content and the message bridge.
//!
//! Content posts messages with `window.postMessage(data)`,
//! `window.permisso.postMessage(data)` or
//! `window.webkit.messageHandlers.permisso.postMessage(data)`. The injected
//! script wraps `data` in an envelope tagged with the bridge channel and
//! forwards it over the engine's IPC endpoint:
//!
//! ```json
//! {"channel": "permisso", "data": <string or any JSON value>}
//! ```

use serde::{Deserialize, Serialize};

/// The channel name the bridge listens on.
pub const BRIDGE_CHANNEL: &str = "permisso";

/// Body of a script message: a string or a structured JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageBody {
    Text(String),
    Structured(serde_json::Value),
}

impl Default for MessageBody {
    fn default() -> Self {
        Self::Structured(serde_json::Value::Null)
    }
}

/// One intercepted message, tagged with the channel it was posted to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptMessage {
    pub channel: String,
    #[serde(rename = "data", default)]
    pub body: MessageBody,
}

impl ScriptMessage {
    pub fn new(channel: impl Into<String>, body: MessageBody) -> Self {
        Self {
            channel: channel.into(),
            body,
        }
    }

    pub fn text(channel: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(channel, MessageBody::Text(text.into()))
    }

    pub fn structured(channel: impl Into<String>, value: serde_json::Value) -> Self {
        Self::new(channel, MessageBody::Structured(value))
    }

    /// Parse a raw IPC body. Anything that is not an envelope is `None`.
    pub fn from_ipc_body(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

/// Injected into every document before page scripts run.
pub const BRIDGE_INIT_SCRIPT: &str = r#"
(function() {
    if (window.permisso && window.permisso.__installed) {
        return;
    }
    var post = function(data) {
        window.ipc.postMessage(JSON.stringify({
            channel: "permisso",
            data: data === undefined ? null : data
        }));
    };
    var listener = function(event) {
        if (event.source !== window) {
            return;
        }
        post(event.data);
    };
    window.addEventListener("message", listener);
    window.permisso = {
        __installed: true,
        __listener: listener,
        postMessage: post
    };
    try {
        window.webkit = window.webkit || {};
        window.webkit.messageHandlers = window.webkit.messageHandlers || {};
        window.webkit.messageHandlers.permisso = { postMessage: post };
    } catch (e) {}
})();
"#;

/// Removes the message hook installed by [`BRIDGE_INIT_SCRIPT`].
pub const BRIDGE_DETACH_SCRIPT: &str = r#"
(function() {
    if (!window.permisso) {
        return;
    }
    if (window.permisso.__listener) {
        window.removeEventListener("message", window.permisso.__listener);
    }
    window.permisso.postMessage = function() {};
    try {
        if (window.webkit && window.webkit.messageHandlers) {
            delete window.webkit.messageHandlers.permisso;
        }
    } catch (e) {}
})();
"#;
