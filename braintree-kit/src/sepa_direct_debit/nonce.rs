use serde::Deserialize;

use crate::{nonce::PaymentMethodNonce, sepa_direct_debit::SepaDirectDebitMandateType};

/// Nonce returned by a tokenized SEPA Direct Debit mandate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawSepaDirectDebitNonce")]
pub struct SepaDirectDebitNonce {
    pub nonce: String,
    pub is_default: bool,
    /// Last four characters of the customer's IBAN.
    pub iban_last_four: Option<String>,
    pub customer_id: Option<String>,
    pub mandate_type: Option<SepaDirectDebitMandateType>,
}

impl PaymentMethodNonce for SepaDirectDebitNonce {
    fn nonce(&self) -> &str {
        &self.nonce
    }

    fn is_default(&self) -> bool {
        self.is_default
    }
}

#[derive(Deserialize)]
struct RawSepaDirectDebitNonce {
    nonce: String,
    #[serde(default)]
    default: bool,
    #[serde(default)]
    details: RawDetails,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDetails {
    iban_last_chars: Option<String>,
    merchant_or_partner_customer_id: Option<String>,
    mandate_type: Option<SepaDirectDebitMandateType>,
}

impl From<RawSepaDirectDebitNonce> for SepaDirectDebitNonce {
    fn from(raw: RawSepaDirectDebitNonce) -> Self {
        SepaDirectDebitNonce {
            nonce: raw.nonce,
            is_default: raw.default,
            iban_last_four: raw.details.iban_last_chars,
            customer_id: raw.details.merchant_or_partner_customer_id,
            mandate_type: raw.details.mandate_type,
        }
    }
}
