//! Presentation seams: dialogs, notifications, and navigation.
//!
//! Messages must be safe to render and never include secrets or tokens.

use async_trait::async_trait;

/// Supported dialog styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Error,
    Success,
    Info,
}

/// Modal and non-blocking user interaction used by the flow controller.
#[async_trait(?Send)]
pub trait Prompter {
    /// Ask the user to name a new key via a modal text input.
    ///
    /// Returns `None` when the prompt is dismissed without a value. The
    /// `validation_message` is shown when the user submits empty input and
    /// is asked again.
    async fn prompt_key_name(&self, title: &str, validation_message: &str) -> Option<String>;

    /// Show a blocking dialog and return once the user dismisses it.
    async fn alert(&self, kind: DialogKind, title: &str, body: &str);

    /// Show a lightweight, non-blocking notification.
    fn notify(&self, message: &str);
}

/// Page navigation performed after a ceremony completes.
pub trait Navigator {
    /// Reload the current page.
    fn reload(&self);

    /// Navigate to an absolute path on the same origin.
    fn goto(&self, path: &str);
}
