//! HTTP implementation of [`RelyingParty`] over reqwest.

use crate::config::FlowConfig;
use crate::rp::{CeremonyOptions, RelyingParty, Verification};
use crate::APP_USER_AGENT;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, info_span, Instrument};
use url::Url;

/// Header carrying the embedding page's CSRF token on state-changing requests.
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// Query parameter naming a newly registered key.
pub const KEY_NAME_PARAM: &str = "key_name";

/// Relying-party client over HTTP/JSON.
pub struct HttpRelyingParty {
    base_url: String,
    config: FlowConfig,
    client: Client,
}

impl HttpRelyingParty {
    /// Create a client for the relying party at `base_url`.
    ///
    /// # Errors
    /// Returns error if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, config: FlowConfig) -> Result<Self> {
        let client = Client::builder().user_agent(APP_USER_AGENT).build()?;

        Ok(Self {
            base_url: base_url.into(),
            config,
            client,
        })
    }

    async fn get_options(&self, path: &str, operation: &str) -> Result<CeremonyOptions> {
        let url = endpoint_url(&self.base_url, path)?;

        let span = info_span!(
            "rp.options",
            http.method = "GET",
            url = %url,
            operation = operation
        );
        let response = self.client.get(&url).send().instrument(span).await?;

        if !response.status().is_success() {
            let status = response.status();
            let json_response: Value = response.json().await?;

            return Err(anyhow!(
                "{} - {}, {}",
                url,
                status,
                rp_error_message(&json_response)
            ));
        }

        Ok(CeremonyOptions::from_value(response.json().await?))
    }

    async fn post_response(
        &self,
        path: &str,
        operation: &str,
        key_name: Option<&str>,
        csrf_token: &SecretString,
        body: &Value,
    ) -> Result<Verification> {
        let url = endpoint_url(&self.base_url, path)?;

        let span = info_span!(
            "rp.verify",
            http.method = "POST",
            url = %url,
            operation = operation
        );

        let mut request = self
            .client
            .post(&url)
            .header(CSRF_HEADER, csrf_token.expose_secret())
            .json(body);
        if let Some(key_name) = key_name {
            request = request.query(&[(KEY_NAME_PARAM, key_name)]);
        }

        let response = request.send().instrument(span).await?;

        if !response.status().is_success() {
            let status = response.status();
            let json_response: Value = response.json().await?;

            return Err(anyhow!(
                "{} - {}, {}",
                url,
                status,
                rp_error_message(&json_response)
            ));
        }

        Ok(Verification::from_value(response.json().await?))
    }
}

#[async_trait(?Send)]
impl RelyingParty for HttpRelyingParty {
    async fn registration_options(&self) -> Result<CeremonyOptions> {
        self.get_options(self.config.register_path(), "registration")
            .await
    }

    async fn verify_registration(
        &self,
        key_name: &str,
        csrf_token: &SecretString,
        response: &Value,
    ) -> Result<Verification> {
        self.post_response(
            self.config.register_path(),
            "registration",
            Some(key_name),
            csrf_token,
            response,
        )
        .await
    }

    async fn authentication_options(&self) -> Result<CeremonyOptions> {
        self.get_options(self.config.login_path(), "authentication")
            .await
    }

    async fn verify_authentication(
        &self,
        csrf_token: &SecretString,
        response: &Value,
    ) -> Result<Verification> {
        self.post_response(
            self.config.login_path(),
            "authentication",
            None,
            csrf_token,
            response,
        )
        .await
    }
}

fn rp_error_message(json_response: &Value) -> &str {
    json_response
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("")
}

/// # Errors
/// Returns an error if `url` cannot be parsed, has no host, or uses an unsupported scheme.
pub fn endpoint_url(url: &str, path: &str) -> Result<String> {
    let url = Url::parse(url)?;

    let scheme = url.scheme();

    let host = url
        .host()
        .ok_or_else(|| anyhow!("Error parsing URL: no host specified"))?
        .to_owned();

    let port = match url.port() {
        Some(p) => p,
        None => match scheme {
            "http" => 80,
            "https" => 443,
            _ => return Err(anyhow!("Error parsing URL: unsupported scheme {scheme}")),
        },
    };

    let endpoint_url = format!("{scheme}://{host}:{port}{path}");

    debug!("endpoint URL: {}", endpoint_url);

    Ok(endpoint_url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn rp(server_uri: &str) -> Result<HttpRelyingParty> {
        HttpRelyingParty::new(server_uri, FlowConfig::default())
    }

    #[test]
    fn endpoint_url_defaults_http_port() -> Result<()> {
        let url = endpoint_url("http://example.com", "/webauthn/register")?;
        assert_eq!(url, "http://example.com:80/webauthn/register");
        Ok(())
    }

    #[test]
    fn endpoint_url_rejects_unsupported_scheme() -> Result<()> {
        let err = endpoint_url("ftp://example.com", "/webauthn/register")
            .err()
            .ok_or_else(|| anyhow!("expected error"))?;
        assert!(err.to_string().contains("unsupported scheme"));
        Ok(())
    }

    #[tokio::test]
    async fn registration_options_returns_envelope() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/webauthn/register"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "publicKey": {"challenge": "Y2hhbGxlbmdl"}
            })))
            .mount(&server)
            .await;

        let options = rp(&server.uri())?.registration_options().await?;
        assert_eq!(
            options.payload(),
            &json!({"publicKey": {"challenge": "Y2hhbGxlbmdl"}})
        );
        assert_eq!(options.error(), None);
        Ok(())
    }

    #[tokio::test]
    async fn verify_registration_sends_name_in_query_and_token_in_header() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let attestation = json!({
            "id": "cred-1",
            "rawId": "AA",
            "type": "public-key",
            "response": {"attestationObject": "AA", "clientDataJSON": "AA"}
        });

        Mock::given(method("POST"))
            .and(path("/webauthn/register"))
            .and(query_param("key_name", "yubikey-5c"))
            .and(header(CSRF_HEADER, "csrf-123"))
            .and(body_json(attestation.clone()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"verified": true})))
            .mount(&server)
            .await;

        let token = SecretString::from("csrf-123".to_string());
        let verification = rp(&server.uri())?
            .verify_registration("yubikey-5c", &token, &attestation)
            .await?;
        assert!(verification.verified());
        Ok(())
    }

    #[tokio::test]
    async fn authentication_options_pass_error_payload_through() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/webauthn/login"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"error": "no credentials"})),
            )
            .mount(&server)
            .await;

        let options = rp(&server.uri())?.authentication_options().await?;
        assert_eq!(options.error(), Some("no credentials"));
        Ok(())
    }

    #[tokio::test]
    async fn verify_authentication_omits_key_name_param() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let assertion = json!({"id": "cred-1", "type": "public-key"});

        Mock::given(method("POST"))
            .and(path("/webauthn/login"))
            .and(header(CSRF_HEADER, "csrf-123"))
            .and(body_json(assertion.clone()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "verified": false,
                "error": "unknown credential"
            })))
            .mount(&server)
            .await;

        let token = SecretString::from("csrf-123".to_string());
        let verification = rp(&server.uri())?
            .verify_authentication(&token, &assertion)
            .await?;
        assert!(!verification.verified());
        assert_eq!(verification.error(), Some("unknown credential"));
        Ok(())
    }

    #[tokio::test]
    async fn options_error_on_failure_status() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/webauthn/register"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"error": "server on fire"})),
            )
            .mount(&server)
            .await;

        let result = rp(&server.uri())?.registration_options().await;
        let err = result.err().ok_or_else(|| anyhow!("expected error"))?;
        assert!(err.to_string().contains("server on fire"));
        Ok(())
    }
}
