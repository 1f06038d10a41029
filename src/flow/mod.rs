//! Passkey ceremony flow controller.
//!
//! This is the only real logic in the crate: the ordering contract between
//! the relying party, the platform authenticator, and the user.
//!
//! Flow Overview:
//! 1) Collect a key name (registration only); nothing leaves the page until
//!    the user commits.
//! 2) Fetch challenge options from the relying party.
//! 3) Hand the options to the authenticator bridge and wait for the user.
//! 4) Post the authenticator's response back for verification.
//! 5) Report the outcome and reload or navigate.
//!
//! Failure semantics:
//! - Every failure is terminal for the invocation; the user re-triggers the
//!   flow. No retry, no partial-state recovery.
//! - A bridge failure never causes a second request to the relying party.
//! - All state is local to one call; concurrent invocations share nothing.

mod authenticate;
mod register;

use crate::bridge::AuthenticatorBridge;
use crate::config::FlowConfig;
use crate::rp::RelyingParty;
use crate::ui::{Navigator, Prompter};

pub const KEY_NAME_PROMPT_TITLE: &str = "Enter a name for this key";
pub const KEY_NAME_REQUIRED: &str = "You need to write something!";
pub const ERROR_TITLE: &str = "Oops...";
pub const ALREADY_REGISTERED: &str =
    "Error: Authenticator was probably already registered by user";
pub const REGISTRATION_SUCCESS: &str = "Passkey is now registered!";
pub const BROWSER_UNSUPPORTED: &str = "This browser does not support passkeys";
pub const AUTH_OPTIONS_EMPTY: &str = "No authentication options received";
pub const AUTH_FAILED: &str = "Authentication failed";

/// Drives the registration and authentication ceremonies against one
/// relying party.
///
/// The controller holds no mutable state; each method call is a complete,
/// independent ceremony that communicates through the presenter and
/// navigator it was built with.
pub struct PasskeyFlow<R, B, U, N> {
    rp: R,
    bridge: B,
    ui: U,
    nav: N,
    config: FlowConfig,
}

impl<R, B, U, N> PasskeyFlow<R, B, U, N>
where
    R: RelyingParty,
    B: AuthenticatorBridge,
    U: Prompter,
    N: Navigator,
{
    #[must_use]
    pub fn new(rp: R, bridge: B, ui: U, nav: N, config: FlowConfig) -> Self {
        Self {
            rp,
            bridge,
            ui,
            nav,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &FlowConfig {
        &self.config
    }
}

/// Trim a prompt value; whitespace-only input counts as no input.
fn normalize_key_name(value: Option<String>) -> Option<String> {
    value
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}
