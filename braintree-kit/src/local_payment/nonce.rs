use serde::Deserialize;

use crate::{nonce::PaymentMethodNonce, types::PostalAddress};

/// Nonce returned by a completed Local Payment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawLocalPaymentNonce")]
pub struct LocalPaymentNonce {
    pub nonce: String,
    pub is_default: bool,
    pub email: Option<String>,
    pub given_name: Option<String>,
    pub surname: Option<String>,
    pub phone: Option<String>,
    pub payer_id: Option<String>,
    /// Correlation id sent with the tokenize request, echoed back.
    pub client_metadata_id: Option<String>,
    pub billing_address: Option<PostalAddress>,
    pub shipping_address: Option<PostalAddress>,
}

impl PaymentMethodNonce for LocalPaymentNonce {
    fn nonce(&self) -> &str {
        &self.nonce
    }

    fn is_default(&self) -> bool {
        self.is_default
    }
}

#[derive(Deserialize)]
struct RawLocalPaymentNonce {
    nonce: String,
    #[serde(default)]
    default: bool,
    #[serde(default)]
    details: RawDetails,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDetails {
    email: Option<String>,
    correlation_id: Option<String>,
    #[serde(default)]
    payer_info: RawPayerInfo,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPayerInfo {
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    phone: Option<String>,
    payer_id: Option<String>,
    billing_address: Option<PostalAddress>,
    shipping_address: Option<PostalAddress>,
}

impl From<RawLocalPaymentNonce> for LocalPaymentNonce {
    fn from(raw: RawLocalPaymentNonce) -> Self {
        let details = raw.details;
        let payer = details.payer_info;
        LocalPaymentNonce {
            nonce: raw.nonce,
            is_default: raw.default,
            email: details.email.or(payer.email),
            given_name: payer.first_name,
            surname: payer.last_name,
            phone: payer.phone,
            payer_id: payer.payer_id,
            client_metadata_id: details.correlation_id,
            billing_address: payer.billing_address.filter(|a| !a.is_empty()),
            shipping_address: payer.shipping_address.filter(|a| !a.is_empty()),
        }
    }
}
