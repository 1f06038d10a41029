//! Seam to the platform's native WebAuthn machinery.
//!
//! The bridge wraps whatever actually talks to an authenticator — the
//! browser's `navigator.credentials` on `wasm32`, a FIDO2 stack elsewhere.
//! Options arrive as the relying party produced them and are passed through
//! without validation; a malformed payload surfaces as a bridge failure when
//! the platform rejects it.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Machine-readable classification of a bridge failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeErrorKind {
    /// The authenticator already holds a credential for this relying party.
    CredentialExists,
    /// The user cancelled the prompt or it timed out.
    Cancelled,
    /// The platform has no WebAuthn support.
    Unsupported,
    Other,
}

/// Failure reported by an [`AuthenticatorBridge`] operation.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct BridgeError {
    kind: BridgeErrorKind,
    message: String,
}

impl BridgeError {
    #[must_use]
    pub fn new(kind: BridgeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::new(BridgeErrorKind::Other, message)
    }

    /// Classify a raw DOM exception string the way the browser reports it.
    ///
    /// `InvalidStateError` means the credential already exists on this
    /// authenticator; `NotAllowedError` covers cancellation and timeout.
    #[must_use]
    pub fn from_dom_error(raw: impl Into<String>) -> Self {
        let message = raw.into();
        let kind = if message.contains("InvalidStateError") {
            BridgeErrorKind::CredentialExists
        } else if message.contains("NotAllowedError") {
            BridgeErrorKind::Cancelled
        } else {
            BridgeErrorKind::Other
        };
        Self { kind, message }
    }

    #[must_use]
    pub fn kind(&self) -> BridgeErrorKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Unwrap the `publicKey` member of a challenge envelope, or return the
/// payload unchanged when the relying party sends the bare options.
#[must_use]
pub fn unwrap_public_key(options: &Value) -> &Value {
    options.get("publicKey").unwrap_or(options)
}

/// Platform WebAuthn operations used by the flow controller.
#[async_trait(?Send)]
pub trait AuthenticatorBridge {
    /// Whether the platform can run WebAuthn ceremonies at all.
    fn supported(&self) -> bool;

    /// Run the registration ceremony and return the attestation response,
    /// JSON-encoded the way the relying party expects it.
    async fn create_registration(&self, options: &Value) -> Result<Value, BridgeError>;

    /// Run the authentication ceremony and return the assertion response.
    ///
    /// `allow_autofill` requests autofill-assisted (conditional mediation)
    /// behavior where the platform supports it.
    async fn create_authentication(
        &self,
        options: &Value,
        allow_autofill: bool,
    ) -> Result<Value, BridgeError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dom_error_classifies_duplicate_credential() {
        let err = BridgeError::from_dom_error("DOMException { name: \"InvalidStateError\" }");
        assert_eq!(err.kind(), BridgeErrorKind::CredentialExists);
    }

    #[test]
    fn dom_error_classifies_cancellation() {
        let err = BridgeError::from_dom_error("NotAllowedError: operation was aborted");
        assert_eq!(err.kind(), BridgeErrorKind::Cancelled);
    }

    #[test]
    fn dom_error_defaults_to_other_and_keeps_message() {
        let err = BridgeError::from_dom_error("SecurityError: bad origin");
        assert_eq!(err.kind(), BridgeErrorKind::Other);
        assert_eq!(err.to_string(), "SecurityError: bad origin");
    }

    #[test]
    fn unwrap_public_key_prefers_envelope_member() {
        let envelope = json!({"publicKey": {"challenge": "abc"}});
        assert_eq!(unwrap_public_key(&envelope), &json!({"challenge": "abc"}));

        let bare = json!({"challenge": "abc"});
        assert_eq!(unwrap_public_key(&bare), &bare);
    }
}
