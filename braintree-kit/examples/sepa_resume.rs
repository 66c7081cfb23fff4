//! Runs a SEPA Direct Debit mandate flow across two process invocations.
//!
//! ```text
//! BRAINTREE_AUTHORIZATION=sandbox_xxx_yyy cargo run --example sepa_resume
//! cargo run --example sepa_resume -- 'com.merchant.app://sepa/success'
//! ```
//!
//! The first run creates a mandate, "opens" the approval page by printing
//! it, and writes the pending request to disk. The second run reads it back
//! and resolves it with the deep link passed on the command line.

use std::path::PathBuf;

use braintree_kit::{
    gateway_client::HttpGateway,
    nonce::PaymentOutcome,
    sepa_direct_debit::{SepaDirectDebitAuthRequest, SepaDirectDebitClient, SepaDirectDebitRequest},
    switch::{BrowserSwitchLauncher, PendingRequest, PendingRequestString, SwitchReturn, UrlLauncher},
};
use url::Url;

struct PrintLauncher;

impl UrlLauncher for PrintLauncher {
    type Error = std::io::Error;

    fn open(&self, url: &Url) -> Result<(), Self::Error> {
        println!("Approve the mandate at: {url}");
        Ok(())
    }
}

fn pending_path() -> PathBuf {
    std::env::temp_dir().join("braintree-sepa-pending")
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let gateway = HttpGateway::from_authorization_str(
        &std::env::var("BRAINTREE_AUTHORIZATION").expect("BRAINTREE_AUTHORIZATION not set"),
    )
    .expect("Invalid BRAINTREE_AUTHORIZATION");

    let client = SepaDirectDebitClient::builder()
        .gateway(gateway)
        .return_url_scheme("com.merchant.app")
        .build();

    match std::env::args().nth(1) {
        None => start(&client).await,
        Some(deep_link) => resume(&client, &deep_link).await,
    }
}

async fn start(client: &SepaDirectDebitClient<HttpGateway>) {
    let request = SepaDirectDebitRequest::builder()
        .account_holder_name("John Doe")
        .iban("FR7618106000321234566666610")
        .customer_id("a-customer-id")
        .build();

    let params = match client
        .create_payment_auth_request(request)
        .await
        .expect("Failed to create mandate")
    {
        SepaDirectDebitAuthRequest::ReadyToLaunch(params) => params,
        SepaDirectDebitAuthRequest::LaunchNotRequired(nonce) => {
            tracing::info!("Mandate already approved, nonce: {}", nonce.nonce);
            return;
        }
    };

    match BrowserSwitchLauncher::new(PrintLauncher).launch(&params) {
        PendingRequest::Started(pending) => {
            std::fs::write(pending_path(), pending.to_string())
                .expect("Failed to persist pending request");
            tracing::info!("Pending request stored at {}", pending_path().display());
        }
        PendingRequest::Failure(err) => tracing::error!("Browser switch failed: {err}"),
    }
}

async fn resume(client: &SepaDirectDebitClient<HttpGateway>, deep_link: &str) {
    let pending = PendingRequestString::from(
        std::fs::read_to_string(pending_path()).expect("No pending request stored"),
    );
    let deep_link = Url::parse(deep_link).expect("Invalid deep link");

    let result = client.parse_result(&pending, &SwitchReturn::DeepLink(deep_link));
    // The stored request is resolved exactly once.
    let _ = std::fs::remove_file(pending_path());

    match client.tokenize(result).await {
        Ok(PaymentOutcome::Success(nonce)) => tracing::info!("Nonce: {}", nonce.nonce),
        Ok(PaymentOutcome::Canceled) => tracing::info!("Customer canceled the mandate"),
        Ok(PaymentOutcome::NoResult) => tracing::info!("Deep link does not belong to this flow"),
        Err(err) => tracing::error!("Mandate failed: {err}"),
    }
}
