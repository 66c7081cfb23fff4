//! Client-side authorization strings: tokenization keys and client tokens.

use std::{fmt::Display, str::FromStr};

use base64::{Engine, prelude::BASE64_STANDARD};
use serde::Deserialize;
use url::Url;

use crate::errors::Error;

/// Gateway environment a tokenization key targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    Development,
    Sandbox,
    Production,
}

impl Environment {
    /// Base URL of the gateway for this environment.
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Development => "http://localhost:3000/",
            Environment::Sandbox => "https://api.sandbox.braintreegateway.com/",
            Environment::Production => "https://api.braintreegateway.com/",
        }
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Environment::Development),
            "sandbox" => Ok(Environment::Sandbox),
            "production" => Ok(Environment::Production),
            _ => Err(Error::Configuration(
                "Tokenization Key contained invalid environment".to_string(),
            )),
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Sandbox => write!(f, "sandbox"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// A static tokenization key of the form `<environment>_<segment>_<merchantId>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizationKey {
    pub raw: String,
    pub environment: Environment,
    pub merchant_id: String,
}

impl TokenizationKey {
    /// Base URL of the merchant's client API.
    pub fn client_api_url(&self) -> Result<Url, Error> {
        Ok(Url::parse(self.environment.base_url())?
            .join(&format!("merchants/{}/client_api/", self.merchant_id))?)
    }

    pub fn config_url(&self) -> Result<Url, Error> {
        Ok(self.client_api_url()?.join("v1/configuration")?)
    }
}

fn is_key_segment(s: &str, allow_underscore: bool) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || (allow_underscore && c == '_'))
}

impl FromStr for TokenizationKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '_');
        let (Some(environment), Some(segment), Some(merchant_id)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(Error::Configuration(
                "Tokenization Key is malformed".to_string(),
            ));
        };

        if !is_key_segment(environment, false)
            || !is_key_segment(segment, false)
            || !is_key_segment(merchant_id, true)
        {
            return Err(Error::Configuration(
                "Tokenization Key is malformed".to_string(),
            ));
        }

        Ok(TokenizationKey {
            raw: s.to_string(),
            environment: environment.parse()?,
            merchant_id: merchant_id.to_string(),
        })
    }
}

/// A client token issued by the merchant server, base64-encoded JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientToken {
    pub raw: String,
    pub authorization_fingerprint: String,
    pub config_url: Url,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClientTokenJson {
    config_url: Url,
    authorization_fingerprint: String,
}

impl FromStr for ClientToken {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = String::from_utf8(BASE64_STANDARD.decode(s.trim())?)?;
        let json: ClientTokenJson = serde_json::from_str(&decoded)?;
        Ok(ClientToken {
            raw: s.to_string(),
            authorization_fingerprint: json.authorization_fingerprint,
            config_url: json.config_url,
        })
    }
}

/// How the client authenticates against the gateway.
///
/// ```
/// use braintree_core::authorization::{Authorization, Environment};
///
/// let auth: Authorization = "sandbox_tmxhyf7d_dcpspy2brwdjr3qn".parse().unwrap();
/// let Authorization::TokenizationKey(key) = &auth else { panic!() };
/// assert_eq!(key.environment, Environment::Sandbox);
/// assert_eq!(
///     auth.config_url().unwrap().as_str(),
///     "https://api.sandbox.braintreegateway.com/merchants/dcpspy2brwdjr3qn/client_api/v1/configuration"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    TokenizationKey(TokenizationKey),
    ClientToken(ClientToken),
}

impl Authorization {
    pub fn config_url(&self) -> Result<Url, Error> {
        match self {
            Authorization::TokenizationKey(key) => key.config_url(),
            Authorization::ClientToken(token) => Ok(token.config_url.clone()),
        }
    }

    /// The credential presented to the gateway.
    pub fn bearer(&self) -> &str {
        match self {
            Authorization::TokenizationKey(key) => &key.raw,
            Authorization::ClientToken(token) => &token.authorization_fingerprint,
        }
    }
}

impl FromStr for Authorization {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains('_') {
            if let Ok(key) = s.parse::<TokenizationKey>() {
                return Ok(Authorization::TokenizationKey(key));
            }
        }

        s.parse::<ClientToken>()
            .map(Authorization::ClientToken)
            .map_err(|_| Error::Configuration("Authorization provided is invalid".to_string()))
    }
}
