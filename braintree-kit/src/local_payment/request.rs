use bon::Builder;
use serde::Serialize;
use url::Url;

use crate::{
    errors::{Error, ValidationError},
    types::PostalAddress,
};

/// Parameters for a Local Payment Method (iDEAL, Sofort, bancontact, ...).
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
pub struct LocalPaymentRequest {
    /// The local payment type, e.g. `"ideal"`. Required.
    #[builder(into)]
    pub payment_type: String,
    /// The amount to charge, e.g. `"1.10"`. Required.
    #[builder(into)]
    pub amount: String,
    /// ISO 4217 currency code.
    #[builder(into)]
    pub currency_code: Option<String>,
    /// ISO 3166-1 alpha-2 country code of the payment type.
    #[builder(into)]
    pub payment_type_country_code: Option<String>,
    #[builder(into)]
    pub merchant_account_id: Option<String>,
    /// Merchant name shown on the bank page.
    #[builder(into)]
    pub display_name: Option<String>,
    #[builder(into)]
    pub given_name: Option<String>,
    #[builder(into)]
    pub surname: Option<String>,
    #[builder(into)]
    pub email: Option<String>,
    #[builder(into)]
    pub phone: Option<String>,
    /// Bank identification code, for payment types that need one.
    #[builder(into)]
    pub bic: Option<String>,
    pub address: Option<PostalAddress>,
    #[builder(default)]
    pub is_shipping_address_required: bool,
    /// Whether the customer consented to location data being collected.
    #[builder(default)]
    pub has_user_location_consent: bool,
}

#[derive(Serialize)]
struct ExperienceProfile<'a> {
    no_shipping: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    brand_name: Option<&'a str>,
}

/// Body of `v1/local_payments/create`.
#[derive(Serialize)]
pub(crate) struct CreatePaymentBody<'a> {
    intent: &'static str,
    return_url: &'a str,
    cancel_url: &'a str,
    funding_source: &'a str,
    amount: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    currency_iso_code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_type_country_code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    merchant_account_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payer_email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bic: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line1: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line2: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    postal_code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    country_code: Option<&'a str>,
    experience_profile: ExperienceProfile<'a>,
}

impl LocalPaymentRequest {
    /// Payment type and amount must be present.
    pub fn validate(&self) -> Result<(), Error> {
        if self.payment_type.trim().is_empty() || self.amount.trim().is_empty() {
            return Err(Error::Validation(ValidationError {
                message: "LocalPaymentRequest is invalid, paymentType and amount are required."
                    .to_string(),
                field_errors: Vec::new(),
            }));
        }
        Ok(())
    }

    pub(crate) fn create_body<'a>(
        &'a self,
        return_url: &'a Url,
        cancel_url: &'a Url,
    ) -> CreatePaymentBody<'a> {
        let address = self.address.as_ref();
        let field = |f: fn(&PostalAddress) -> &Option<String>| {
            address.and_then(|a| f(a).as_deref())
        };

        CreatePaymentBody {
            intent: "sale",
            return_url: return_url.as_str(),
            cancel_url: cancel_url.as_str(),
            funding_source: &self.payment_type,
            amount: &self.amount,
            currency_iso_code: self.currency_code.as_deref(),
            payment_type_country_code: self.payment_type_country_code.as_deref(),
            merchant_account_id: self.merchant_account_id.as_deref(),
            first_name: self.given_name.as_deref(),
            last_name: self.surname.as_deref(),
            payer_email: self.email.as_deref(),
            phone: self.phone.as_deref(),
            bic: self.bic.as_deref(),
            line1: field(|a| &a.street_address),
            line2: field(|a| &a.extended_address),
            city: field(|a| &a.locality),
            state: field(|a| &a.region),
            postal_code: field(|a| &a.postal_code),
            country_code: field(|a| &a.country_code_alpha2),
            experience_profile: ExperienceProfile {
                no_shipping: !self.is_shipping_address_required,
                brand_name: self.display_name.as_deref(),
            },
        }
    }
}
