//! The client gateway seam: merchant configuration and JSON POSTs.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    errors::{Error, ValidationError},
    types::AnyJson,
};

/// Merchant configuration served by `v1/configuration`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Base URL every client API path is joined to.
    pub client_api_url: Url,
    pub environment: String,
    pub merchant_id: String,
    /// Whether PayPal, and with it Local Payments, is enabled for the merchant.
    #[serde(default)]
    pub paypal_enabled: bool,
}

impl Configuration {
    /// Resolve a client API path such as `v1/sepa_debit`.
    pub fn resolve(&self, path: &str) -> Result<Url, Error> {
        let mut base = self.client_api_url.clone();
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        Ok(base.join(path.trim_start_matches('/'))?)
    }
}

/// Braintree client gateway interface.
///
/// Implementations own transport concerns (TLS, headers, authorization).
/// Neither method retries.
pub trait Gateway {
    /// Fetch the merchant configuration.
    fn configuration(&self) -> impl Future<Output = Result<Configuration, Error>>;

    /// POST a JSON body to a client API path and return the raw response body.
    ///
    /// Returns [`Error::Validation`] when the gateway reports a business error,
    /// even inside a 2xx response.
    fn post(&self, path: &str, body: AnyJson) -> impl Future<Output = Result<String, Error>>;
}

/// Map an HTTP status and body to the gateway result contract.
pub fn check_response(status: u16, body: String) -> Result<String, Error> {
    match status {
        200..=299 => match ValidationError::from_body(&body) {
            Some(err) => Err(Error::Validation(err)),
            None => Ok(body),
        },
        422 => Err(Error::Validation(ValidationError::from_body(&body).unwrap_or(
            ValidationError {
                message: body,
                field_errors: Vec::new(),
            },
        ))),
        _ => {
            let message = ValidationError::from_body(&body)
                .map(|e| e.message)
                .unwrap_or_else(|| default_status_message(status).to_string());
            Err(Error::Http { status, message })
        }
    }
}

fn default_status_message(status: u16) -> &'static str {
    match status {
        401 => "Authentication failed",
        403 => "Authorization failed",
        426 => "Client SDK version is no longer supported",
        429 => "You are being rate-limited",
        503 => "The gateway is temporarily unavailable",
        _ => "An unexpected error occurred on the gateway",
    }
}
