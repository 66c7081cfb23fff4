//! Local Payment Methods: bank redirects such as iDEAL or Sofort.
//!
//! The flow is:
//!
//! 1. [`LocalPaymentClient::create_payment_auth_request`] creates a payment
//!    resource and returns [`LocalPaymentAuthRequestParams`].
//! 2. [`BrowserSwitchLauncher::launch`](crate::switch::BrowserSwitchLauncher::launch)
//!    opens the bank page and returns a pending request to persist.
//! 3. [`LocalPaymentClient::parse_result`] reconciles the stored pending
//!    request with the deep link the app was resumed through.
//! 4. [`LocalPaymentClient::tokenize`] exchanges the result for a [`LocalPaymentNonce`].

mod nonce;
mod request;

pub use nonce::*;
pub use request::*;

use bon::Builder;
use serde::Deserialize;
use url::Url;

use crate::{
    errors::Error,
    gateway::Gateway,
    nonce::{PaymentOutcome, parse_resource},
    switch::{
        AuthResult, AuthSuccess, BrowserSwitchOptions, LaunchParams, PendingRequestString,
        RequestCode, SwitchModule, SwitchReturn, complete_request,
    },
    types::Metadata,
};

const CREATE_PATH: &str = "v1/local_payments/create";
const TOKENIZE_PATH: &str = "v1/payment_methods/paypal_accounts";

/// Metadata key for the merchant account id.
pub const MERCHANT_ACCOUNT_ID_KEY: &str = "merchant-account-id";
/// Metadata key for the payment type.
pub const PAYMENT_TYPE_KEY: &str = "payment-type";
/// Metadata key for the location consent flag.
pub const HAS_USER_LOCATION_CONSENT_KEY: &str = "has-user-location-consent";

/// The Local Payment browser-switch module.
#[derive(Debug, Clone, Copy)]
pub struct LocalPayment;

impl SwitchModule for LocalPayment {
    const MODULE_HOST: &'static str = "local-payment";
    const REQUEST_CODE: RequestCode = RequestCode::LOCAL_PAYMENT;
}

/// A created Local Payment, ready to be opened in a browser.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalPaymentAuthRequestParams {
    pub request: LocalPaymentRequest,
    /// Bank page the customer approves the payment on.
    pub approval_url: Url,
    /// Gateway payment token.
    pub payment_id: String,
    pub browser_switch_options: BrowserSwitchOptions,
}

impl LaunchParams for LocalPaymentAuthRequestParams {
    fn browser_switch_options(&self) -> &BrowserSwitchOptions {
        &self.browser_switch_options
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePaymentResponse {
    payment_resource: PaymentResource,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentResource {
    redirect_url: Url,
    payment_token: String,
}

/// Client for Local Payment Method flows.
#[derive(Builder, Debug, Clone)]
pub struct LocalPaymentClient<G: Gateway> {
    pub gateway: G,
    /// Scheme the bank page redirects back through.
    #[builder(into)]
    pub return_url_scheme: String,
    /// Correlation id from a data collector, sent with the tokenize request.
    #[builder(into)]
    pub client_metadata_id: Option<String>,
}

impl<G: Gateway> LocalPaymentClient<G> {
    /// Create a payment resource on the gateway.
    ///
    /// Fails with a configuration error when PayPal is disabled for the merchant.
    pub async fn create_payment_auth_request(
        &self,
        request: LocalPaymentRequest,
    ) -> Result<LocalPaymentAuthRequestParams, Error> {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            event = "local-payment.start-payment.selected",
            "Creating local payment: payment_type='{}'",
            request.payment_type
        );

        let result = self.create_payment(request).await;

        #[cfg(feature = "tracing")]
        match &result {
            Ok(params) => tracing::debug!(
                event = "local-payment.create.succeeded",
                "Local payment created: payment_id='{}'",
                params.payment_id
            ),
            Err(err) => tracing::warn!(
                event = "local-payment.webswitch.initiate.failed",
                "Failed to create local payment: {err}"
            ),
        }

        result
    }

    async fn create_payment(
        &self,
        request: LocalPaymentRequest,
    ) -> Result<LocalPaymentAuthRequestParams, Error> {
        request.validate()?;

        let configuration = self.gateway.configuration().await?;
        if !configuration.paypal_enabled {
            return Err(Error::Configuration(
                "Local payments are not enabled for this merchant.".to_string(),
            ));
        }

        let return_url = LocalPayment::success_url(&self.return_url_scheme)?;
        let cancel_url = LocalPayment::cancel_url(&self.return_url_scheme)?;
        let body = serde_json::to_value(request.create_body(&return_url, &cancel_url))?;

        let response = self.gateway.post(CREATE_PATH, body).await?;
        let CreatePaymentResponse {
            payment_resource: resource,
        } = serde_json::from_str(&response)?;

        let mut metadata = Metadata::new();
        if let Some(merchant_account_id) = &request.merchant_account_id {
            metadata.insert(MERCHANT_ACCOUNT_ID_KEY, merchant_account_id.as_str());
        }
        metadata.insert(PAYMENT_TYPE_KEY, request.payment_type.as_str());
        metadata.insert(
            HAS_USER_LOCATION_CONSENT_KEY,
            request.has_user_location_consent,
        );

        let browser_switch_options = BrowserSwitchOptions::builder()
            .url(resource.redirect_url.clone())
            .return_url_scheme(self.return_url_scheme.as_str())
            .request_code(LocalPayment::REQUEST_CODE)
            .metadata(metadata)
            .build();

        Ok(LocalPaymentAuthRequestParams {
            request,
            approval_url: resource.redirect_url,
            payment_id: resource.payment_token,
            browser_switch_options,
        })
    }

    /// Reconcile a stored pending request with the app's return.
    pub fn parse_result(
        &self,
        pending: &PendingRequestString,
        incoming: &SwitchReturn,
    ) -> AuthResult {
        let result = complete_request::<LocalPayment>(pending, incoming);

        #[cfg(feature = "tracing")]
        match &result {
            AuthResult::Cancel => {
                tracing::debug!(event = "local-payment.webswitch.canceled", "Local payment canceled")
            }
            AuthResult::NoResult => tracing::debug!(
                event = "local-payment.browser-switch.no-result",
                "Return does not match the pending local payment"
            ),
            AuthResult::Failure(err) => tracing::warn!(
                event = "local-payment.webswitch-response.invalid",
                "Local payment return failed: {err}"
            ),
            AuthResult::Success(_) => {}
        }

        result
    }

    /// Exchange the result of a browser switch for a nonce.
    ///
    /// Canceled and unmatched returns resolve without contacting the gateway.
    pub async fn tokenize(
        &self,
        auth_result: AuthResult,
    ) -> Result<PaymentOutcome<LocalPaymentNonce>, Error> {
        let success = match auth_result {
            AuthResult::Success(success) => success,
            AuthResult::Cancel => return Ok(PaymentOutcome::Canceled),
            AuthResult::NoResult => return Ok(PaymentOutcome::NoResult),
            AuthResult::Failure(err) => return Err(err),
        };

        let result = self.tokenize_success(&success).await;

        #[cfg(feature = "tracing")]
        match &result {
            Ok(_) => tracing::debug!(event = "local-payment.tokenize.succeeded", "Local payment tokenized"),
            Err(err) => tracing::warn!(
                event = "local-payment.tokenize.failed",
                "Failed to tokenize local payment: {err}"
            ),
        }

        result.map(PaymentOutcome::Success)
    }

    async fn tokenize_success(&self, success: &AuthSuccess) -> Result<LocalPaymentNonce, Error> {
        let mut paypal_account = serde_json::json!({
            "intent": "sale",
            "response": { "webURL": success.return_url.as_str() },
            "options": { "validate": false },
            "response_type": "web",
        });
        if let Some(client_metadata_id) = &self.client_metadata_id {
            paypal_account["correlation_id"] = client_metadata_id.as_str().into();
        }

        let mut body = serde_json::json!({ "paypal_account": paypal_account });
        if let Some(merchant_account_id) = success.metadata.get_str(MERCHANT_ACCOUNT_ID_KEY) {
            body["merchant_account_id"] = merchant_account_id.into();
        }

        let response = self.gateway.post(TOKENIZE_PATH, body).await?;
        parse_resource(&response, "paypalAccounts")
    }
}
