//! SEPA Direct Debit: mandate approval through a browser switch.
//!
//! [`SepaDirectDebitClient::create_payment_auth_request`] creates a mandate.
//! If the gateway reports it as already approved, the mandate is tokenized
//! straight away and no browser switch is needed. Otherwise the returned
//! parameters are launched, and the app's return is resolved with
//! [`SepaDirectDebitClient::parse_result`] and [`SepaDirectDebitClient::tokenize`].

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
        AuthResult, BrowserSwitchOptions, LaunchParams, PendingRequestString, RequestCode,
        SwitchModule, SwitchReturn, complete_request,
    },
    types::Metadata,
};

const CREATE_MANDATE_PATH: &str = "v1/sepa_debit";
const TOKENIZE_PATH: &str = "v1/payment_methods/sepa_debit_accounts";

/// Approval URL value meaning the mandate needs no customer approval.
const ALREADY_APPROVED: &str = "null";

pub const IBAN_LAST_FOUR_KEY: &str = "ibanLastFour";
pub const CUSTOMER_ID_KEY: &str = "customerId";
pub const BANK_REFERENCE_TOKEN_KEY: &str = "bankReferenceToken";
pub const MANDATE_TYPE_KEY: &str = "mandateType";

/// The SEPA Direct Debit browser-switch module.
#[derive(Debug, Clone, Copy)]
pub struct SepaDirectDebit;

impl SwitchModule for SepaDirectDebit {
    const MODULE_HOST: &'static str = "sepa";
    const REQUEST_CODE: RequestCode = RequestCode::SEPA_DEBIT;
}

/// Identifiers linking a created mandate to its tokenize request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SepaDebitMandate {
    #[serde(rename = "last4")]
    pub iban_last_four: String,
    #[serde(rename = "merchantOrPartnerCustomerId")]
    pub customer_id: String,
    pub bank_reference_token: String,
    pub mandate_type: SepaDirectDebitMandateType,
}

impl SepaDebitMandate {
    /// The fields carried through a browser switch.
    pub fn to_metadata(&self) -> Metadata {
        Metadata::new()
            .with(IBAN_LAST_FOUR_KEY, self.iban_last_four.as_str())
            .with(CUSTOMER_ID_KEY, self.customer_id.as_str())
            .with(BANK_REFERENCE_TOKEN_KEY, self.bank_reference_token.as_str())
            .with(MANDATE_TYPE_KEY, self.mandate_type.to_string())
    }

    pub fn from_metadata(metadata: &Metadata) -> Result<Self, Error> {
        let field = |key: &str| {
            metadata.get_str(key).map(str::to_string).ok_or_else(|| {
                Error::Unexpected(format!("Pending request metadata is missing '{key}'"))
            })
        };

        Ok(SepaDebitMandate {
            iban_last_four: field(IBAN_LAST_FOUR_KEY)?,
            customer_id: field(CUSTOMER_ID_KEY)?,
            bank_reference_token: field(BANK_REFERENCE_TOKEN_KEY)?,
            mandate_type: field(MANDATE_TYPE_KEY)?.parse()?,
        })
    }
}

/// Response of `v1/sepa_debit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMandateResult {
    /// The approval URL. `None` or the literal `"null"` for an approved mandate.
    pub approval_url: Option<String>,
    pub mandate: SepaDebitMandate,
}

impl CreateMandateResult {
    pub fn is_already_approved(&self) -> bool {
        self.approval_url
            .as_deref()
            .is_none_or(|url| url == ALREADY_APPROVED)
    }
}

#[derive(Deserialize)]
struct CreateMandateResponse {
    message: CreateMandateMessage,
}

#[derive(Deserialize)]
struct CreateMandateMessage {
    body: CreateMandateMessageBody,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateMandateMessageBody {
    sepa_debit_account: SepaDebitAccount,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SepaDebitAccount {
    #[serde(default)]
    approval_url: Option<String>,
    #[serde(flatten)]
    mandate: SepaDebitMandate,
}

impl TryFrom<&str> for CreateMandateResult {
    type Error = serde_json::Error;

    fn try_from(body: &str) -> Result<Self, Self::Error> {
        let response: CreateMandateResponse = serde_json::from_str(body)?;
        let account = response.message.body.sepa_debit_account;
        Ok(CreateMandateResult {
            approval_url: account.approval_url,
            mandate: account.mandate,
        })
    }
}

/// A created mandate awaiting customer approval.
#[derive(Debug, Clone, PartialEq)]
pub struct SepaDirectDebitAuthRequestParams {
    pub approval_url: Url,
    pub browser_switch_options: BrowserSwitchOptions,
}

impl LaunchParams for SepaDirectDebitAuthRequestParams {
    fn browser_switch_options(&self) -> &BrowserSwitchOptions {
        &self.browser_switch_options
    }
}

/// What to do after creating a mandate.
#[derive(Debug, Clone, PartialEq)]
pub enum SepaDirectDebitAuthRequest {
    /// Open the approval URL in a browser.
    ReadyToLaunch(SepaDirectDebitAuthRequestParams),
    /// The mandate was already approved and has been tokenized.
    LaunchNotRequired(SepaDirectDebitNonce),
}

/// Client for SEPA Direct Debit flows.
#[derive(Builder, Debug, Clone)]
pub struct SepaDirectDebitClient<G: Gateway> {
    pub gateway: G,
    /// Scheme the mandate page redirects back through.
    #[builder(into)]
    pub return_url_scheme: String,
}

impl<G: Gateway> SepaDirectDebitClient<G> {
    /// Create a mandate and decide whether it needs a browser switch.
    pub async fn create_payment_auth_request(
        &self,
        request: SepaDirectDebitRequest,
    ) -> Result<SepaDirectDebitAuthRequest, Error> {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            event = "sepa-direct-debit.selected.started",
            "Creating SEPA mandate: mandate_type='{}'",
            request.mandate_type
        );

        let result = self.create_mandate(&request).await?;

        if result.is_already_approved() {
            let nonce = self.tokenize_mandate(&result.mandate).await?;
            return Ok(SepaDirectDebitAuthRequest::LaunchNotRequired(nonce));
        }

        let approval_url = match result.approval_url.as_deref().map(Url::parse) {
            Some(Ok(url)) if matches!(url.scheme(), "http" | "https") => url,
            _ => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    event = "sepa-direct-debit.create-mandate.failed",
                    "Unexpected approval URL: {:?}",
                    result.approval_url
                );
                return Err(Error::unexpected());
            }
        };

        let browser_switch_options = BrowserSwitchOptions::builder()
            .url(approval_url.clone())
            .return_url_scheme(self.return_url_scheme.as_str())
            .request_code(SepaDirectDebit::REQUEST_CODE)
            .metadata(result.mandate.to_metadata())
            .build();

        Ok(SepaDirectDebitAuthRequest::ReadyToLaunch(
            SepaDirectDebitAuthRequestParams {
                approval_url,
                browser_switch_options,
            },
        ))
    }

    /// POST `v1/sepa_debit`.
    pub async fn create_mandate(
        &self,
        request: &SepaDirectDebitRequest,
    ) -> Result<CreateMandateResult, Error> {
        let return_url = SepaDirectDebit::success_url(&self.return_url_scheme)?;
        let cancel_url = SepaDirectDebit::cancel_url(&self.return_url_scheme)?;
        let body = serde_json::to_value(request.create_mandate_body(&return_url, &cancel_url))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            event = "sepa-direct-debit.create-mandate.requested",
            "Requesting SEPA mandate"
        );

        let result = match self.gateway.post(CREATE_MANDATE_PATH, body).await {
            Ok(response) => CreateMandateResult::try_from(response.as_str()).map_err(Error::from),
            Err(err) => Err(err),
        };

        #[cfg(feature = "tracing")]
        match &result {
            Ok(result) => tracing::debug!(
                event = "sepa-direct-debit.create-mandate.success",
                "SEPA mandate created: already_approved={}",
                result.is_already_approved()
            ),
            Err(err) => tracing::warn!(
                event = "sepa-direct-debit.create-mandate.failed",
                "Failed to create SEPA mandate: {err}"
            ),
        }

        result
    }

    /// Reconcile a stored pending request with the app's return.
    pub fn parse_result(
        &self,
        pending: &PendingRequestString,
        incoming: &SwitchReturn,
    ) -> AuthResult {
        let result = complete_request::<SepaDirectDebit>(pending, incoming);

        #[cfg(feature = "tracing")]
        match &result {
            AuthResult::Cancel => tracing::debug!(
                event = "sepa-direct-debit.browser-login.canceled",
                "SEPA mandate approval canceled"
            ),
            AuthResult::NoResult => tracing::debug!(
                event = "sepa-direct-debit.browser-switch.no-result",
                "Return does not match the pending SEPA mandate"
            ),
            AuthResult::Failure(err) => tracing::warn!(
                event = "sepa-direct-debit.browser-login.failed",
                "SEPA mandate return failed: {err}"
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
    ) -> Result<PaymentOutcome<SepaDirectDebitNonce>, Error> {
        let success = match auth_result {
            AuthResult::Success(success) => success,
            AuthResult::Cancel => return Ok(PaymentOutcome::Canceled),
            AuthResult::NoResult => return Ok(PaymentOutcome::NoResult),
            AuthResult::Failure(err) => return Err(err),
        };

        let mandate = SepaDebitMandate::from_metadata(&success.metadata)?;
        self.tokenize_mandate(&mandate)
            .await
            .map(PaymentOutcome::Success)
    }

    /// POST `v1/payment_methods/sepa_debit_accounts`.
    pub async fn tokenize_mandate(
        &self,
        mandate: &SepaDebitMandate,
    ) -> Result<SepaDirectDebitNonce, Error> {
        let body = serde_json::json!({
            "sepa_debit_account": {
                "iban_last_chars": mandate.iban_last_four,
                "customer_id": mandate.customer_id,
                "bank_reference_token": mandate.bank_reference_token,
                "mandate_type": mandate.mandate_type,
            }
        });

        let result = match self.gateway.post(TOKENIZE_PATH, body).await {
            Ok(response) => parse_resource(&response, "sepaDebitAccounts"),
            Err(err) => Err(err),
        };

        #[cfg(feature = "tracing")]
        match &result {
            Ok(_) => tracing::debug!(
                event = "sepa-direct-debit.tokenize.succeeded",
                "SEPA mandate tokenized"
            ),
            Err(err) => tracing::warn!(
                event = "sepa-direct-debit.tokenize.failed",
                "Failed to tokenize SEPA mandate: {err}"
            ),
        }

        result
    }
}
