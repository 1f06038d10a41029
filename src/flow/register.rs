//! Registration ceremony: add a new passkey for the signed-in user.

use super::{
    normalize_key_name, PasskeyFlow, ALREADY_REGISTERED, ERROR_TITLE, KEY_NAME_PROMPT_TITLE,
    KEY_NAME_REQUIRED, REGISTRATION_SUCCESS,
};
use crate::bridge::{AuthenticatorBridge, BridgeErrorKind};
use crate::rp::RelyingParty;
use crate::ui::{DialogKind, Navigator, Prompter};
use secrecy::SecretString;
use tracing::{debug, error};

impl<R, B, U, N> PasskeyFlow<R, B, U, N>
where
    R: RelyingParty,
    B: AuthenticatorBridge,
    U: Prompter,
    N: Navigator,
{
    /// Run the registration ceremony.
    ///
    /// Prompts for a key name, fetches registration options, asks the
    /// authenticator to create a credential, and posts the attestation back
    /// with the key name in the query string and the CSRF token in the
    /// header. On a verified result the page is reloaded once the user
    /// dismisses the success dialog; every failure is surfaced as a dialog
    /// and ends the ceremony.
    pub async fn register(&self, csrf_token: &SecretString) {
        let key_name = self
            .ui
            .prompt_key_name(KEY_NAME_PROMPT_TITLE, KEY_NAME_REQUIRED)
            .await;
        let Some(key_name) = normalize_key_name(key_name) else {
            // User abandoned the prompt; nothing has left the page yet.
            debug!("key name prompt dismissed, registration aborted");
            return;
        };

        let options = match self.rp.registration_options().await {
            Ok(options) => options,
            Err(err) => {
                error!("failed to fetch registration options: {err}");
                self.ui
                    .alert(DialogKind::Error, ERROR_TITLE, &format!("Error: {err}"))
                    .await;
                return;
            }
        };

        // The options are passed through unvalidated; a malformed payload
        // surfaces as a bridge failure.
        let response = match self.bridge.create_registration(options.payload()).await {
            Ok(response) => response,
            Err(err) => {
                debug!("registration bridge failed: {err}");
                match err.kind() {
                    BridgeErrorKind::CredentialExists => {
                        self.ui
                            .alert(DialogKind::Error, ERROR_TITLE, ALREADY_REGISTERED)
                            .await;
                    }
                    _ => {
                        self.ui
                            .alert(DialogKind::Error, ERROR_TITLE, &format!("Error: {err}"))
                            .await;
                    }
                }
                return;
            }
        };

        let verification = match self
            .rp
            .verify_registration(&key_name, csrf_token, &response)
            .await
        {
            Ok(verification) => verification,
            Err(err) => {
                error!("registration verification request failed: {err}");
                self.ui
                    .alert(DialogKind::Error, ERROR_TITLE, &format!("Error: {err}"))
                    .await;
                return;
            }
        };

        if verification.verified() {
            self.ui
                .alert(DialogKind::Success, REGISTRATION_SUCCESS, "")
                .await;
            // Reload so the page reflects the newly added credential.
            self.nav.reload();
        } else {
            self.ui
                .alert(
                    DialogKind::Error,
                    ERROR_TITLE,
                    &format!("Unexpected error response: {}", verification.raw()),
                )
                .await;
        }
    }
}
