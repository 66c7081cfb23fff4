use std::fmt::Display;

use base64::{Engine, prelude::BASE64_STANDARD};
use bon::Builder;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{errors::Error, types::Metadata};

/// Integer discriminator identifying which module started a browser switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestCode(pub i32);

impl RequestCode {
    pub const THREE_D_SECURE: RequestCode = RequestCode(13487);
    pub const VENMO: RequestCode = RequestCode(13488);
    pub const PAYPAL: RequestCode = RequestCode(13591);
    pub const VISA_CHECKOUT: RequestCode = RequestCode(13592);
    pub const GOOGLE_PAY: RequestCode = RequestCode(13593);
    pub const LOCAL_PAYMENT: RequestCode = RequestCode(13596);
    pub const SEPA_DEBIT: RequestCode = RequestCode(13597);
}

impl Display for RequestCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parameters for opening an approval URL in an external user agent.
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct BrowserSwitchOptions {
    /// The URL to open.
    pub url: Url,
    /// Scheme of the deep link the user agent returns through.
    #[builder(into)]
    pub return_url_scheme: String,
    /// Module discriminator checked on return.
    pub request_code: RequestCode,
    /// Correlation data needed when the switch resolves.
    #[builder(default)]
    pub metadata: Metadata,
}

/// The durable record of an in-flight browser switch.
///
/// This is the JSON document behind a [`PendingRequestString`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserSwitchRequest {
    pub request_code: RequestCode,
    pub url: Url,
    pub return_url_scheme: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl From<BrowserSwitchOptions> for BrowserSwitchRequest {
    fn from(options: BrowserSwitchOptions) -> Self {
        BrowserSwitchRequest {
            request_code: options.request_code,
            url: options.url,
            return_url_scheme: options.return_url_scheme,
            metadata: options.metadata,
        }
    }
}

impl BrowserSwitchRequest {
    /// Whether `url` returns through this request's scheme.
    pub fn matches_deep_link(&self, url: &Url) -> bool {
        url.scheme().eq_ignore_ascii_case(&self.return_url_scheme)
    }
}

/// Base64-encoded JSON form of a [`BrowserSwitchRequest`].
///
/// Safe to write to app-private storage and read back after the process
/// has been restarted.
///
/// ```
/// use braintree_core::{
///     switch::{BrowserSwitchRequest, PendingRequestString, RequestCode},
///     types::Metadata,
/// };
///
/// let request = BrowserSwitchRequest {
///     request_code: RequestCode::SEPA_DEBIT,
///     url: "https://example.com/approve?token=1".parse().unwrap(),
///     return_url_scheme: "com.example.app.payments".to_string(),
///     metadata: Metadata::new().with("ibanLastFour", "6610"),
/// };
///
/// let stored = PendingRequestString::try_from(&request).unwrap();
/// let restored = BrowserSwitchRequest::try_from(&stored).unwrap();
/// assert_eq!(restored, request);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingRequestString(pub String);

impl Display for PendingRequestString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PendingRequestString {
    fn from(value: String) -> Self {
        PendingRequestString(value)
    }
}

impl TryFrom<&BrowserSwitchRequest> for PendingRequestString {
    type Error = serde_json::Error;

    fn try_from(value: &BrowserSwitchRequest) -> Result<Self, Self::Error> {
        let json = serde_json::to_string(value)?;
        Ok(PendingRequestString(BASE64_STANDARD.encode(json)))
    }
}

impl TryFrom<&PendingRequestString> for BrowserSwitchRequest {
    type Error = Error;

    fn try_from(value: &PendingRequestString) -> Result<Self, Self::Error> {
        let decoded_bytes = BASE64_STANDARD.decode(value.0.trim())?;
        let json_str = String::from_utf8(decoded_bytes)?;
        Ok(serde_json::from_str(&json_str)?)
    }
}

/// Outcome of starting a browser switch.
#[derive(Debug)]
pub enum PendingRequest {
    /// The user agent was opened; persist the string until the app is resumed.
    Started(PendingRequestString),
    /// The user agent could not be opened.
    Failure(Error),
}

impl PendingRequest {
    pub fn is_started(&self) -> bool {
        matches!(self, PendingRequest::Started(_))
    }

    pub fn as_started(&self) -> Option<&PendingRequestString> {
        match self {
            PendingRequest::Started(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_failure(&self) -> Option<&Error> {
        match self {
            PendingRequest::Failure(e) => Some(e),
            _ => None,
        }
    }
}
