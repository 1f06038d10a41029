//! Bridge to the browser's `navigator.credentials` API.
//!
//! Handles the conversion between the relying party's JSON-based challenge
//! options and the browser's binary-oriented WebAuthn types:
//!
//! 1. **Preparation**: unwraps the `publicKey` envelope and decodes Base64URL
//!    fields (challenges, user IDs, credential IDs) into `Uint8Array` buffers.
//! 2. **Interaction**: calls `navigator.credentials.create` (registration) or
//!    `.get` (authentication), triggering the browser's authenticator dialog.
//! 3. **Finalization**: captures the binary response, encodes it back to
//!    Base64URL, and returns the JSON structure the relying party verifies.

use crate::bridge::{unwrap_public_key, AuthenticatorBridge, BridgeError, BridgeErrorKind};
use async_trait::async_trait;
use base64ct::{Base64, Base64UrlUnpadded, Encoding};
use js_sys::{Array, Object, Reflect, Uint8Array};
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AuthenticatorAssertionResponse, AuthenticatorAttestationResponse, CredentialCreationOptions,
    CredentialRequestOptions, PublicKeyCredential, Window,
};

/// [`AuthenticatorBridge`] backed by the browser's native WebAuthn
/// implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebCredentialsBridge;

impl WebCredentialsBridge {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl AuthenticatorBridge for WebCredentialsBridge {
    fn supported(&self) -> bool {
        web_sys::window().is_some_and(|window| {
            Reflect::has(window.as_ref(), &JsValue::from_str("PublicKeyCredential"))
                .unwrap_or(false)
        })
    }

    async fn create_registration(&self, options: &Value) -> Result<Value, BridgeError> {
        let window = window()?;
        let credentials = window.navigator().credentials();

        let js_options = creation_options(unwrap_public_key(options))?;

        let wrapper = Object::new();
        set(&wrapper, "publicKey", &js_options);
        let create_options = wrapper.unchecked_into::<CredentialCreationOptions>();

        let promise = credentials
            .create_with_options(&create_options)
            .map_err(|e| BridgeError::other(format!("WebAuthn create failed: {e:?}")))?;

        let result = JsFuture::from(promise)
            .await
            .map_err(|e| BridgeError::from_dom_error(format!("{e:?}")))?;

        let credential = result
            .dyn_into::<PublicKeyCredential>()
            .map_err(|_| BridgeError::other("Invalid credential type"))?;

        let raw_id = encode_buffer(credential.raw_id());
        let response = credential
            .response()
            .dyn_into::<AuthenticatorAttestationResponse>()
            .map_err(|_| BridgeError::other("Invalid response type"))?;

        Ok(serde_json::json!({
            "id": credential.id(),
            "rawId": raw_id,
            "type": credential.type_(),
            "response": {
                "attestationObject": encode_buffer(response.attestation_object()),
                "clientDataJSON": encode_buffer(response.client_data_json()),
            }
        }))
    }

    async fn create_authentication(
        &self,
        options: &Value,
        allow_autofill: bool,
    ) -> Result<Value, BridgeError> {
        let window = window()?;
        let credentials = window.navigator().credentials();

        let js_options = request_options(unwrap_public_key(options))?;

        let wrapper = Object::new();
        set(&wrapper, "publicKey", &js_options);
        if allow_autofill {
            set(&wrapper, "mediation", &"conditional".into());
        }
        let get_options = wrapper.unchecked_into::<CredentialRequestOptions>();

        let promise = credentials
            .get_with_options(&get_options)
            .map_err(|e| BridgeError::other(format!("WebAuthn get failed: {e:?}")))?;

        let result = JsFuture::from(promise)
            .await
            .map_err(|e| BridgeError::from_dom_error(format!("{e:?}")))?;

        let credential = result
            .dyn_into::<PublicKeyCredential>()
            .map_err(|_| BridgeError::other("Invalid credential type"))?;

        let raw_id = encode_buffer(credential.raw_id());
        let response = credential
            .response()
            .dyn_into::<AuthenticatorAssertionResponse>()
            .map_err(|_| BridgeError::other("Invalid response type"))?;

        Ok(serde_json::json!({
            "id": credential.id(),
            "rawId": raw_id,
            "type": credential.type_(),
            "response": {
                "authenticatorData": encode_buffer(response.authenticator_data()),
                "clientDataJSON": encode_buffer(response.client_data_json()),
                "signature": encode_buffer(response.signature()),
                "userHandle": response.user_handle().map(encode_buffer),
            }
        }))
    }
}

fn window() -> Result<Window, BridgeError> {
    web_sys::window().ok_or_else(|| BridgeError::new(BridgeErrorKind::Unsupported, "No window"))
}

/// Build the `publicKey` member for `navigator.credentials.create`.
fn creation_options(pk: &Value) -> Result<Object, BridgeError> {
    let js_options = Object::new();

    set(&js_options, "challenge", &decoded_buffer(pk, "challenge")?);

    if let Some(user) = pk.get("user") {
        let js_user = Object::new();
        copy_str(user, "name", &js_user);
        copy_str(user, "displayName", &js_user);
        if user.get("id").and_then(Value::as_str).is_some() {
            set(&js_user, "id", &decoded_buffer(user, "id")?);
        }
        set(&js_options, "user", &js_user);
    }

    if let Some(rp) = pk.get("rp") {
        let js_rp = Object::new();
        copy_str(rp, "name", &js_rp);
        copy_str(rp, "id", &js_rp);
        set(&js_options, "rp", &js_rp);
    }

    if let Some(params) = pk.get("pubKeyCredParams").and_then(Value::as_array) {
        let js_params = Array::new();
        for param in params {
            let js_param = Object::new();
            if let Some(alg) = param.get("alg").and_then(Value::as_i64) {
                set(&js_param, "alg", &(alg as f64).into());
            }
            copy_str(param, "type", &js_param);
            js_params.push(&js_param);
        }
        set(&js_options, "pubKeyCredParams", &js_params);
    }

    copy_timeout(pk, &js_options);
    copy_str(pk, "attestation", &js_options);

    if let Some(selection) = pk.get("authenticatorSelection") {
        let js_selection = Object::new();
        copy_str(selection, "authenticatorAttachment", &js_selection);
        copy_str(selection, "residentKey", &js_selection);
        copy_str(selection, "userVerification", &js_selection);
        if let Some(required) = selection.get("requireResidentKey").and_then(Value::as_bool) {
            set(&js_selection, "requireResidentKey", &required.into());
        }
        set(&js_options, "authenticatorSelection", &js_selection);
    }

    copy_descriptor_list(pk, "excludeCredentials", &js_options)?;
    copy_extensions(pk, &js_options);

    Ok(js_options)
}

/// Build the `publicKey` member for `navigator.credentials.get`.
fn request_options(pk: &Value) -> Result<Object, BridgeError> {
    let js_options = Object::new();

    set(&js_options, "challenge", &decoded_buffer(pk, "challenge")?);
    copy_timeout(pk, &js_options);
    copy_str(pk, "rpId", &js_options);
    copy_str(pk, "userVerification", &js_options);
    copy_descriptor_list(pk, "allowCredentials", &js_options)?;
    copy_extensions(pk, &js_options);

    Ok(js_options)
}

/// Copy a credential descriptor list, decoding each `id` into a buffer.
/// Used for both `excludeCredentials` and `allowCredentials`.
fn copy_descriptor_list(pk: &Value, key: &str, dst: &Object) -> Result<(), BridgeError> {
    let Some(descriptors) = pk.get(key).and_then(Value::as_array) else {
        return Ok(());
    };

    let js_descriptors = Array::new();
    for descriptor in descriptors {
        let js_descriptor = Object::new();
        copy_str(descriptor, "type", &js_descriptor);
        if descriptor.get("id").and_then(Value::as_str).is_some() {
            set(&js_descriptor, "id", &decoded_buffer(descriptor, "id")?);
        }
        if let Some(transports) = descriptor.get("transports").and_then(Value::as_array) {
            let js_transports = Array::new();
            for transport in transports {
                if let Some(transport) = transport.as_str() {
                    js_transports.push(&transport.into());
                }
            }
            set(&js_descriptor, "transports", &js_transports);
        }
        js_descriptors.push(&js_descriptor);
    }
    set(dst, key, &js_descriptors);

    Ok(())
}

/// Naive copy for simple extensions, via the JS JSON parser.
fn copy_extensions(pk: &Value, dst: &Object) {
    if let Some(extensions) = pk.get("extensions") {
        if let Ok(js_ext) = js_sys::JSON::parse(&extensions.to_string()) {
            set(dst, "extensions", &js_ext);
        }
    }
}

fn copy_timeout(pk: &Value, dst: &Object) {
    if let Some(timeout) = pk.get("timeout").and_then(Value::as_u64) {
        set(dst, "timeout", &(timeout as f64).into());
    }
}

fn copy_str(src: &Value, key: &str, dst: &Object) {
    if let Some(value) = src.get(key).and_then(Value::as_str) {
        set(dst, key, &value.into());
    }
}

fn set(target: &Object, key: &str, value: &JsValue) {
    Reflect::set(target, &key.into(), value).ok();
}

fn decoded_buffer(src: &Value, key: &str) -> Result<JsValue, BridgeError> {
    let b64 = src
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| BridgeError::other(format!("Missing {key}")))?;

    // webauthn servers commonly use URL-safe without padding; fall back to
    // standard base64 for the rest.
    let bytes = Base64UrlUnpadded::decode_vec(b64)
        .or_else(|_| Base64::decode_vec(b64))
        .map_err(|e| BridgeError::other(format!("Invalid base64 in {key}: {e}")))?;

    Ok(Uint8Array::from(&bytes[..]).into())
}

fn encode_buffer(buffer: js_sys::ArrayBuffer) -> String {
    let bytes = Uint8Array::new(&buffer).to_vec();
    Base64UrlUnpadded::encode_string(&bytes)
}
