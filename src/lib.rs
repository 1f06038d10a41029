//! Client-side driver for WebAuthn passkey ceremonies.
//!
//! This crate sequences the two passkey ceremonies of a relying party from
//! the client side: registering a new credential and authenticating with an
//! existing one. The cryptographic work happens elsewhere — inside the
//! platform's native WebAuthn implementation and on the relying party's
//! server. What lives here is the ordering contract between them:
//!
//! 1. Fetch challenge options from the relying party.
//! 2. Hand them to the platform authenticator and wait for the user.
//! 3. Post the authenticator's response back for verification.
//! 4. Report the outcome and navigate.
//!
//! The three collaborators are trait seams so the controller can be driven
//! from any embedding:
//!
//! - [`bridge::AuthenticatorBridge`] — the platform WebAuthn machinery.
//! - [`rp::RelyingParty`] — the two JSON endpoints, with a reqwest-backed
//!   implementation in [`rp::HttpRelyingParty`].
//! - [`ui::Prompter`] and [`ui::Navigator`] — dialogs, notifications, and
//!   page navigation.
//!
//! On `wasm32` the [`web`] module provides implementations of the bridge and
//! presentation seams over `navigator.credentials` and `window`.

pub mod bridge;
pub mod config;
pub mod flow;
pub mod rp;
pub mod ui;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use bridge::{AuthenticatorBridge, BridgeError, BridgeErrorKind};
pub use config::FlowConfig;
pub use flow::PasskeyFlow;
pub use rp::{CeremonyOptions, HttpRelyingParty, RelyingParty, Verification};
pub use ui::{DialogKind, Navigator, Prompter};

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
