use bon::Builder;
use serde::{Deserialize, Serialize};

/// A postal address, used both as request input and in nonce details.
///
/// Deserializes from the PayPal-style address object returned by the
/// gateway, accepting either `line1`/`line2`/`countryCode` or
/// `street1`/`street2`/`country` keys.
#[derive(Builder, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    #[builder(into)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,

    #[builder(into)]
    #[serde(
        default,
        rename = "line1",
        alias = "street1",
        skip_serializing_if = "Option::is_none"
    )]
    pub street_address: Option<String>,

    #[builder(into)]
    #[serde(
        default,
        rename = "line2",
        alias = "street2",
        skip_serializing_if = "Option::is_none"
    )]
    pub extended_address: Option<String>,

    #[builder(into)]
    #[serde(default, rename = "city", skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,

    #[builder(into)]
    #[serde(default, rename = "state", skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[builder(into)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    #[builder(into)]
    #[serde(
        default,
        rename = "countryCode",
        alias = "country",
        skip_serializing_if = "Option::is_none"
    )]
    pub country_code_alpha2: Option<String>,
}

impl PostalAddress {
    /// `true` when no field carries a value.
    pub fn is_empty(&self) -> bool {
        self.recipient_name.is_none()
            && self.street_address.is_none()
            && self.extended_address.is_none()
            && self.locality.is_none()
            && self.region.is_none()
            && self.postal_code.is_none()
            && self.country_code_alpha2.is_none()
    }
}
