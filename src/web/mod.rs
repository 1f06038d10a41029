//! Browser implementations of the crate's seams, via `web_sys`.
//!
//! Only compiled for `wasm32`: the bridge drives `navigator.credentials`,
//! the presenter uses `window` prompts and alerts, and the navigator uses
//! `window.location`.

pub mod bridge;
pub mod ui;

pub use bridge::WebCredentialsBridge;
pub use ui::{WindowNavigator, WindowPrompter};
