//! Relying-party endpoints and their wire records.
//!
//! Each ceremony uses one endpoint path twice: a `GET` returning challenge
//! options and a `POST` of the authenticator's response returning a
//! verification result. Payloads are duck-typed JSON on the wire; the two
//! record types here pin down the fields the controller actually inspects
//! (`error`, `verified`) and keep the rest opaque.

pub mod http;

pub use http::HttpRelyingParty;

use anyhow::Result;
use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::Value;

/// Server-issued challenge options for one ceremony.
///
/// Opaque to the controller apart from the optional `error` member; the
/// payload is handed to the bridge unmodified.
#[derive(Debug, Clone)]
pub struct CeremonyOptions {
    raw: Value,
}

impl CeremonyOptions {
    #[must_use]
    pub fn from_value(raw: Value) -> Self {
        Self { raw }
    }

    /// Error reported by the relying party instead of options.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.raw.get("error").and_then(Value::as_str)
    }

    /// Whether the relying party returned no options at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.raw {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }

    /// The payload as received, envelope included.
    #[must_use]
    pub fn payload(&self) -> &Value {
        &self.raw
    }
}

/// Verification result returned by a ceremony `POST`.
///
/// Only `verified` and `error` are interpreted; the raw payload is retained
/// so failures can be shown to the user for diagnosis.
#[derive(Debug, Clone)]
pub struct Verification {
    raw: Value,
}

impl Verification {
    #[must_use]
    pub fn from_value(raw: Value) -> Self {
        Self { raw }
    }

    /// The server's `verified` flag; absent counts as not verified.
    #[must_use]
    pub fn verified(&self) -> bool {
        self.raw
            .get("verified")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.raw.get("error").and_then(Value::as_str)
    }

    #[must_use]
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

/// The relying party's four ceremony endpoints.
///
/// The CSRF token must be attached to every state-changing (`POST`) request;
/// the `GET`s carry no token. The key name travels only in the registration
/// `POST` query string, never in a body.
#[async_trait(?Send)]
pub trait RelyingParty {
    /// `GET` the registration challenge options.
    async fn registration_options(&self) -> Result<CeremonyOptions>;

    /// `POST` the authenticator's registration response for verification.
    async fn verify_registration(
        &self,
        key_name: &str,
        csrf_token: &SecretString,
        response: &Value,
    ) -> Result<Verification>;

    /// `GET` the authentication challenge options.
    async fn authentication_options(&self) -> Result<CeremonyOptions>;

    /// `POST` the authenticator's assertion response for verification.
    async fn verify_authentication(
        &self,
        csrf_token: &SecretString,
        response: &Value,
    ) -> Result<Verification>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn options_error_member_is_exposed() {
        let options = CeremonyOptions::from_value(json!({"error": "no credentials"}));
        assert_eq!(options.error(), Some("no credentials"));
        assert!(!options.is_empty());
    }

    #[test]
    fn empty_object_and_null_count_as_empty() {
        assert!(CeremonyOptions::from_value(json!({})).is_empty());
        assert!(CeremonyOptions::from_value(Value::Null).is_empty());
        assert!(!CeremonyOptions::from_value(json!({"publicKey": {}})).is_empty());
    }

    #[test]
    fn verification_defaults_to_not_verified() {
        assert!(!Verification::from_value(json!({})).verified());
        assert!(!Verification::from_value(json!({"verified": "yes"})).verified());
        assert!(Verification::from_value(json!({"verified": true})).verified());
    }

    #[test]
    fn verification_keeps_raw_payload() {
        let raw = json!({"verified": false, "detail": {"code": 7}});
        let verification = Verification::from_value(raw.clone());
        assert_eq!(verification.raw(), &raw);
        assert_eq!(verification.error(), None);
    }
}
