//! Authentication ceremony: log in with an existing passkey.

use super::{PasskeyFlow, AUTH_FAILED, AUTH_OPTIONS_EMPTY, BROWSER_UNSUPPORTED, ERROR_TITLE};
use crate::bridge::AuthenticatorBridge;
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
    /// Run the authentication ceremony.
    ///
    /// Checks platform support, fetches authentication options, asks the
    /// authenticator for an assertion, and posts it back with the CSRF token
    /// in the header. A verified result navigates to the dashboard path;
    /// every failure is surfaced to the user and ends the ceremony.
    ///
    /// `allow_autofill` requests autofill-assisted (conditional mediation)
    /// behavior from the bridge where the platform supports it.
    pub async fn authenticate(&self, csrf_token: &SecretString, allow_autofill: bool) {
        if !self.bridge.supported() {
            debug!("platform reports no WebAuthn support");
            self.ui
                .alert(DialogKind::Error, BROWSER_UNSUPPORTED, "")
                .await;
            return;
        }

        let options = match self.rp.authentication_options().await {
            Ok(options) => options,
            Err(err) => {
                error!("failed to fetch authentication options: {err}");
                self.ui.notify(&format!("Error: {err}"));
                return;
            }
        };

        if let Some(message) = options.error() {
            debug!("relying party declined to issue options: {message}");
            self.ui.notify(message);
            return;
        }
        if options.is_empty() {
            self.ui.notify(AUTH_OPTIONS_EMPTY);
            return;
        }

        let response = match self
            .bridge
            .create_authentication(options.payload(), allow_autofill)
            .await
        {
            Ok(response) => response,
            Err(err) => {
                debug!("authentication bridge failed: {err}");
                self.ui
                    .alert(DialogKind::Error, ERROR_TITLE, &format!("Error: {err}"))
                    .await;
                return;
            }
        };

        let verification = match self.rp.verify_authentication(csrf_token, &response).await {
            Ok(verification) => verification,
            Err(err) => {
                error!("authentication verification request failed: {err}");
                self.ui
                    .alert(DialogKind::Error, ERROR_TITLE, &format!("Error: {err}"))
                    .await;
                return;
            }
        };

        if verification.verified() {
            self.nav.goto(self.config.dashboard_path());
        } else if let Some(message) = verification.error() {
            self.ui
                .alert(DialogKind::Error, ERROR_TITLE, message)
                .await;
        } else {
            self.ui.notify(AUTH_FAILED);
        }
    }
}
