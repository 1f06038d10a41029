//! Window-based presenter and navigator.
//!
//! Minimal implementations over the browser's built-in dialogs, for
//! embeddings without a dialog library of their own.

use crate::ui::{DialogKind, Navigator, Prompter};
use async_trait::async_trait;
use wasm_bindgen::JsValue;

/// [`Prompter`] over `window.prompt` / `window.alert`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowPrompter;

impl WindowPrompter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl Prompter for WindowPrompter {
    async fn prompt_key_name(&self, title: &str, validation_message: &str) -> Option<String> {
        let window = web_sys::window()?;
        loop {
            match window.prompt_with_message(title).ok().flatten() {
                None => return None,
                Some(value) if value.trim().is_empty() => {
                    // Same contract as a dialog-library input validator:
                    // complain, then ask again.
                    window.alert_with_message(validation_message).ok();
                }
                Some(value) => return Some(value),
            }
        }
    }

    async fn alert(&self, _kind: DialogKind, title: &str, body: &str) {
        if let Some(window) = web_sys::window() {
            let message = if body.is_empty() {
                title.to_string()
            } else {
                format!("{title}\n\n{body}")
            };
            window.alert_with_message(&message).ok();
        }
    }

    fn notify(&self, message: &str) {
        web_sys::console::warn_1(&JsValue::from_str(message));
    }
}

/// [`Navigator`] over `window.location`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowNavigator;

impl WindowNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Navigator for WindowNavigator {
    fn reload(&self) {
        if let Some(window) = web_sys::window() {
            window.location().reload().ok();
        }
    }

    fn goto(&self, path: &str) {
        if let Some(window) = web_sys::window() {
            window.location().set_href(path).ok();
        }
    }
}
