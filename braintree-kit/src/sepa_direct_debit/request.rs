use std::{fmt::Display, str::FromStr};

use bon::Builder;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{errors::Error, types::PostalAddress};

/// Whether a SEPA mandate covers one debit or many.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SepaDirectDebitMandateType {
    #[default]
    #[serde(rename = "ONE_OFF")]
    OneOff,
    #[serde(rename = "RECURRENT")]
    Recurrent,
}

impl Display for SepaDirectDebitMandateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SepaDirectDebitMandateType::OneOff => write!(f, "ONE_OFF"),
            SepaDirectDebitMandateType::Recurrent => write!(f, "RECURRENT"),
        }
    }
}

impl FromStr for SepaDirectDebitMandateType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ONE_OFF" => Ok(SepaDirectDebitMandateType::OneOff),
            "RECURRENT" => Ok(SepaDirectDebitMandateType::Recurrent),
            _ => Err(Error::Unexpected(format!("Unknown mandate type '{s}'"))),
        }
    }
}

/// Parameters for creating a SEPA Direct Debit mandate.
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
pub struct SepaDirectDebitRequest {
    #[builder(into)]
    pub account_holder_name: Option<String>,
    #[builder(into)]
    pub iban: Option<String>,
    /// Merchant or partner customer id.
    #[builder(into)]
    pub customer_id: Option<String>,
    #[builder(default)]
    pub mandate_type: SepaDirectDebitMandateType,
    pub billing_address: Option<PostalAddress>,
    #[builder(into)]
    pub merchant_account_id: Option<String>,
    /// Locale of the mandate page, e.g. `"en-US"`.
    #[builder(into)]
    pub locale: Option<String>,
}

#[derive(Serialize)]
struct BillingAddressBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    address_line_1: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address_line_2: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    admin_area_1: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    admin_area_2: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    postal_code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    country_code: Option<&'a str>,
}

impl<'a> From<&'a PostalAddress> for BillingAddressBody<'a> {
    fn from(address: &'a PostalAddress) -> Self {
        BillingAddressBody {
            address_line_1: address.street_address.as_deref(),
            address_line_2: address.extended_address.as_deref(),
            admin_area_1: address.locality.as_deref(),
            admin_area_2: address.region.as_deref(),
            postal_code: address.postal_code.as_deref(),
            country_code: address.country_code_alpha2.as_deref(),
        }
    }
}

#[derive(Serialize)]
struct SepaDebitBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    merchant_or_partner_customer_id: Option<&'a str>,
    mandate_type: SepaDirectDebitMandateType,
    #[serde(skip_serializing_if = "Option::is_none")]
    account_holder_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    iban: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    billing_address: Option<BillingAddressBody<'a>>,
}

/// Body of `v1/sepa_debit`.
#[derive(Serialize)]
pub(crate) struct CreateMandateBody<'a> {
    sepa_debit: SepaDebitBody<'a>,
    cancel_url: &'a str,
    return_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    merchant_account_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    locale: Option<&'a str>,
}

impl SepaDirectDebitRequest {
    pub(crate) fn create_mandate_body<'a>(
        &'a self,
        return_url: &'a Url,
        cancel_url: &'a Url,
    ) -> CreateMandateBody<'a> {
        CreateMandateBody {
            sepa_debit: SepaDebitBody {
                merchant_or_partner_customer_id: self.customer_id.as_deref(),
                mandate_type: self.mandate_type,
                account_holder_name: self.account_holder_name.as_deref(),
                iban: self.iban.as_deref(),
                billing_address: self.billing_address.as_ref().map(BillingAddressBody::from),
            },
            cancel_url: cancel_url.as_str(),
            return_url: return_url.as_str(),
            merchant_account_id: self.merchant_account_id.as_deref(),
            locale: self.locale.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use url_macro::url;

    use super::*;

    #[test]
    fn test_create_mandate_body() {
        let request = SepaDirectDebitRequest::builder()
            .account_holder_name("John Doe")
            .iban("FR7618106000321234566666610")
            .customer_id("a-customer-id")
            .mandate_type(SepaDirectDebitMandateType::Recurrent)
            .merchant_account_id("eur_pwpp_multi_account_merchant_account")
            .locale("fr-FR")
            .billing_address(
                PostalAddress::builder()
                    .street_address("Kantstraße 70")
                    .extended_address("#170")
                    .locality("Freistaat Sachsen")
                    .region("Annaberg-buchholz")
                    .postal_code("09456")
                    .country_code_alpha2("FR")
                    .build(),
            )
            .build();

        let body = serde_json::to_value(request.create_mandate_body(
            &url!("com.merchant.app://sepa/success"),
            &url!("com.merchant.app://sepa/cancel"),
        ))
        .unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "sepa_debit": {
                    "merchant_or_partner_customer_id": "a-customer-id",
                    "mandate_type": "RECURRENT",
                    "account_holder_name": "John Doe",
                    "iban": "FR7618106000321234566666610",
                    "billing_address": {
                        "address_line_1": "Kantstraße 70",
                        "address_line_2": "#170",
                        "admin_area_1": "Freistaat Sachsen",
                        "admin_area_2": "Annaberg-buchholz",
                        "postal_code": "09456",
                        "country_code": "FR"
                    }
                },
                "cancel_url": "com.merchant.app://sepa/cancel",
                "return_url": "com.merchant.app://sepa/success",
                "merchant_account_id": "eur_pwpp_multi_account_merchant_account",
                "locale": "fr-FR"
            })
        );
    }

    #[test]
    fn test_mandate_type_defaults_to_one_off() {
        let request = SepaDirectDebitRequest::builder().build();
        assert_eq!(request.mandate_type, SepaDirectDebitMandateType::OneOff);
        assert_eq!(request.mandate_type.to_string(), "ONE_OFF");
        assert_eq!(
            "RECURRENT".parse::<SepaDirectDebitMandateType>().unwrap(),
            SepaDirectDebitMandateType::Recurrent
        );
        assert!("WEEKLY".parse::<SepaDirectDebitMandateType>().is_err());
    }
}
