//! # Braintree Kit
//!
//! Browser-switch payment flows for the Braintree client gateway: Local
//! Payment Methods and SEPA Direct Debit.
//!
//! Both flows send the customer to an external approval page and resume
//! when the app is reopened through a deep link. The app process may be
//! killed in between, so the only state carried across the switch is a
//! [`PendingRequestString`](switch::PendingRequestString) the caller persists.
//!
//! ## Core Components Overview
//!
//! - **[`authorization`]**: Tokenization keys and client tokens.
//! - **[`gateway`]**: The [`Gateway`](gateway::Gateway) seam and merchant configuration.
//! - **[`switch`]**: The browser-switch state machine shared by every module.
//! - **[`nonce`]**: Payment method nonces and flow outcomes.
//! - **[`types`]**: Metadata and postal addresses.
//! - **[`errors`]**: The error taxonomy.
//!
//! ## Payment Modules
//!
//! - **[`local_payment`]**: iDEAL, Sofort and other bank redirects.
//! - **[`sepa_direct_debit`]**: SEPA mandates.
//!
//! ## A Full Flow
//!
//! ```no_run
//! use braintree_kit::{
//!     gateway_client::HttpGateway,
//!     sepa_direct_debit::{SepaDirectDebitAuthRequest, SepaDirectDebitClient, SepaDirectDebitRequest},
//!     switch::{BrowserSwitchLauncher, PendingRequest, SwitchReturn, UrlLauncher},
//! };
//! use url::Url;
//!
//! struct SystemBrowser;
//!
//! impl UrlLauncher for SystemBrowser {
//!     type Error = std::io::Error;
//!
//!     fn open(&self, _url: &Url) -> Result<(), Self::Error> {
//!         Ok(())
//!     }
//! }
//!
//! # async fn run() -> Result<(), braintree_kit::errors::Error> {
//! let client = SepaDirectDebitClient::builder()
//!     .gateway(HttpGateway::from_authorization_str("sandbox_tmxhyf7d_dcpspy2brwdjr3qn")?)
//!     .return_url_scheme("com.merchant.app")
//!     .build();
//!
//! let request = SepaDirectDebitRequest::builder()
//!     .account_holder_name("John Doe")
//!     .iban("FR7618106000321234566666610")
//!     .customer_id("a-customer-id")
//!     .build();
//!
//! let params = match client.create_payment_auth_request(request).await? {
//!     SepaDirectDebitAuthRequest::ReadyToLaunch(params) => params,
//!     SepaDirectDebitAuthRequest::LaunchNotRequired(nonce) => {
//!         println!("Mandate already approved: {}", nonce.nonce);
//!         return Ok(());
//!     }
//! };
//!
//! // Persist this string; the app may be killed while the browser is open.
//! let pending = match BrowserSwitchLauncher::new(SystemBrowser).launch(&params) {
//!     PendingRequest::Started(pending) => pending,
//!     PendingRequest::Failure(err) => return Err(err),
//! };
//!
//! // Later, when the app is reopened through a deep link:
//! let deep_link = Url::parse("com.merchant.app://sepa/success").unwrap();
//! let result = client.parse_result(&pending, &SwitchReturn::DeepLink(deep_link));
//! let outcome = client.tokenize(result).await?;
//! # let _ = outcome;
//! # Ok(())
//! # }
//! ```

pub mod authorization {
    pub use braintree_core::authorization::*;
}

pub mod errors {
    pub use braintree_core::errors::*;
}

pub mod gateway {
    pub use braintree_core::gateway::*;
}

pub mod nonce {
    pub use braintree_core::nonce::*;
}

pub mod switch {
    pub use braintree_core::switch::*;
}

pub mod types {
    pub use braintree_core::types::*;
}

pub mod local_payment;
pub mod sepa_direct_debit;

#[cfg(feature = "gateway-client")]
pub mod gateway_client;
