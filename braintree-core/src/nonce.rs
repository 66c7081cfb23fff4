//! Payment method nonces and tokenize outcomes.

use serde::de::{DeserializeOwned, Error as _};

use crate::errors::Error;

/// A single-use token representing a tokenized payment method.
pub trait PaymentMethodNonce {
    /// The nonce string to send to the merchant server.
    fn nonce(&self) -> &str;

    /// Whether this is the customer's default payment method.
    fn is_default(&self) -> bool;
}

/// Terminal state of a browser-switch flow that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome<N> {
    Success(N),
    /// The user canceled; no tokenize request was sent.
    Canceled,
    /// The return did not belong to this flow; no tokenize request was sent.
    NoResult,
}

impl<N> PaymentOutcome<N> {
    pub fn is_success(&self) -> bool {
        matches!(self, PaymentOutcome::Success(_))
    }

    pub fn as_success(&self) -> Option<&N> {
        match self {
            PaymentOutcome::Success(n) => Some(n),
            _ => None,
        }
    }

    pub fn into_success(self) -> Option<N> {
        match self {
            PaymentOutcome::Success(n) => Some(n),
            _ => None,
        }
    }
}

/// Parse the first resource of a tokenize response.
///
/// Accepts the array shape `{"<resource_key>": [{"nonce": ...}]}` and the
/// bare object shape `{"nonce": ...}`.
///
/// ```
/// use serde::Deserialize;
/// use braintree_core::nonce::parse_resource;
///
/// #[derive(Deserialize)]
/// struct Nonce { nonce: String }
///
/// let wrapped: Nonce = parse_resource(r#"{"paypalAccounts":[{"nonce":"a"}]}"#, "paypalAccounts").unwrap();
/// let bare: Nonce = parse_resource(r#"{"nonce":"b"}"#, "paypalAccounts").unwrap();
/// assert_eq!(wrapped.nonce, "a");
/// assert_eq!(bare.nonce, "b");
/// ```
pub fn parse_resource<T: DeserializeOwned>(body: &str, resource_key: &str) -> Result<T, Error> {
    let mut json: serde_json::Value = serde_json::from_str(body)?;

    let resource = match json.get_mut(resource_key).map(serde_json::Value::take) {
        Some(serde_json::Value::Array(mut items)) => {
            if items.is_empty() {
                return Err(serde_json::Error::custom(format!(
                    "'{resource_key}' contains no resources"
                ))
                .into());
            }
            items.swap_remove(0)
        }
        Some(_) => {
            return Err(
                serde_json::Error::custom(format!("'{resource_key}' is not an array")).into(),
            );
        }
        None => json,
    };

    Ok(serde_json::from_value(resource)?)
}
