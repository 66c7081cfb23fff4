mod common;

use braintree_kit::{
    errors::{Error, ErrorKind},
    local_payment::{LocalPayment, LocalPaymentClient, LocalPaymentRequest},
    nonce::{PaymentMethodNonce, PaymentOutcome},
    sepa_direct_debit::SepaDirectDebit,
    switch::{
        BrowserSwitchLauncher, BrowserSwitchRequest, PendingRequest, PendingRequestString,
        SwitchModule, SwitchReturn,
    },
    types::PostalAddress,
};
use common::{MockGateway, TestLauncher};
use serde_json::json;
use url_macro::url;

const CREATE: &str = "v1/local_payments/create";
const TOKENIZE: &str = "v1/payment_methods/paypal_accounts";

fn create_response() -> serde_json::Value {
    json!({
        "paymentResource": {
            "paymentToken": "local-payment-id-123",
            "intent": "sale",
            "redirectUrl": "https://checkout.paypal.com/latinum?token=payment-token",
            "merchantAccountId": "local-merchant-account-id"
        }
    })
}

fn tokenize_response() -> serde_json::Value {
    json!({
        "paypalAccounts": [{
            "type": "PayPalAccount",
            "nonce": "e11c9c39-d6a4-0305-791d-bfe680ef2d5d",
            "description": "PayPal",
            "consumed": false,
            "default": false,
            "details": {
                "correlationId": "a-correlation-id",
                "payerInfo": {
                    "email": "jon@getbraintree.com",
                    "firstName": "Jon",
                    "lastName": "Doe",
                    "payerId": "9KQSUZTL7YZQ4"
                }
            }
        }]
    })
}

fn ideal_request() -> LocalPaymentRequest {
    LocalPaymentRequest::builder()
        .payment_type("ideal")
        .amount("1.10")
        .currency_code("EUR")
        .payment_type_country_code("NL")
        .merchant_account_id("local-merchant-account-id")
        .given_name("Jon")
        .surname("Doe")
        .email("jon@getbraintree.com")
        .address(
            PostalAddress::builder()
                .street_address("836486 of 22321 Park Lake")
                .locality("Den Haag")
                .postal_code("2585 GJ")
                .country_code_alpha2("NL")
                .build(),
        )
        .has_user_location_consent(true)
        .build()
}

fn client(gateway: MockGateway) -> LocalPaymentClient<MockGateway> {
    LocalPaymentClient::builder()
        .gateway(gateway)
        .return_url_scheme("com.merchant.app")
        .client_metadata_id("a-correlation-id")
        .build()
}

#[tokio::test]
async fn test_create_payment_auth_request() {
    let gateway = MockGateway::new(true).respond(CREATE, create_response());
    let client = client(gateway.clone());

    let params = client
        .create_payment_auth_request(ideal_request())
        .await
        .unwrap();

    assert_eq!(params.payment_id, "local-payment-id-123");
    assert_eq!(
        params.approval_url,
        url!("https://checkout.paypal.com/latinum?token=payment-token")
    );

    let options = &params.browser_switch_options;
    assert_eq!(options.url, params.approval_url);
    assert_eq!(options.request_code, LocalPayment::REQUEST_CODE);
    assert_eq!(
        serde_json::to_value(&options.metadata).unwrap(),
        json!({
            "merchant-account-id": "local-merchant-account-id",
            "payment-type": "ideal",
            "has-user-location-consent": true
        })
    );

    let requests = gateway.requests();
    assert_eq!(requests.len(), 1);
    let (path, body) = &requests[0];
    assert_eq!(path, CREATE);
    assert_eq!(body["intent"], "sale");
    assert_eq!(body["funding_source"], "ideal");
    assert_eq!(body["amount"], "1.10");
    assert_eq!(body["currency_iso_code"], "EUR");
    assert_eq!(body["return_url"], "com.merchant.app://local-payment/success");
    assert_eq!(body["cancel_url"], "com.merchant.app://local-payment/cancel");
    assert_eq!(body["city"], "Den Haag");
    assert_eq!(body["experience_profile"]["no_shipping"], true);
}

#[tokio::test]
async fn test_paypal_disabled_is_configuration_error() {
    let gateway = MockGateway::new(false);

    let err = client(gateway.clone())
        .create_payment_auth_request(ideal_request())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(
        err.to_string(),
        "Configuration error: Local payments are not enabled for this merchant."
    );
    assert!(gateway.requests().is_empty());
}

#[tokio::test]
async fn test_missing_amount_is_validation_error() {
    let gateway = MockGateway::new(true);
    let request = LocalPaymentRequest::builder()
        .payment_type("ideal")
        .amount("")
        .build();

    let err = client(gateway.clone())
        .create_payment_auth_request(request)
        .await
        .unwrap_err();

    let Error::Validation(validation) = err else {
        panic!("expected a validation error, got {err:?}");
    };
    assert_eq!(
        validation.message,
        "LocalPaymentRequest is invalid, paymentType and amount are required."
    );
    assert!(gateway.requests().is_empty());
}

#[tokio::test]
async fn test_launch_resume_and_tokenize() {
    let gateway = MockGateway::new(true)
        .respond(CREATE, create_response())
        .respond(TOKENIZE, tokenize_response());
    let client = client(gateway.clone());

    let params = client
        .create_payment_auth_request(ideal_request())
        .await
        .unwrap();

    let launcher = BrowserSwitchLauncher::new(TestLauncher::default());
    let PendingRequest::Started(pending) = launcher.launch(&params) else {
        panic!("expected the switch to start");
    };

    let stored = BrowserSwitchRequest::try_from(&pending).unwrap();
    assert_eq!(stored.url, params.approval_url);
    assert_eq!(stored.return_url_scheme, "com.merchant.app");
    assert_eq!(stored.request_code, LocalPayment::REQUEST_CODE);
    assert_eq!(stored.metadata, params.browser_switch_options.metadata);

    let deep_link = url!("com.merchant.app://local-payment/success?paymentId=PAY-123&token=EC-123");
    let result = client.parse_result(&pending, &SwitchReturn::DeepLink(deep_link.clone()));

    let success = result.as_success().unwrap();
    assert_eq!(success.return_url, deep_link);
    assert_eq!(success.metadata.get_str("paymentId"), Some("PAY-123"));
    assert_eq!(success.metadata.get_str("payment-type"), Some("ideal"));

    let outcome = client.tokenize(result).await.unwrap();
    let nonce = outcome.as_success().unwrap();
    assert_eq!(nonce.nonce(), "e11c9c39-d6a4-0305-791d-bfe680ef2d5d");
    assert_eq!(nonce.client_metadata_id.as_deref(), Some("a-correlation-id"));
    assert_eq!(nonce.given_name.as_deref(), Some("Jon"));

    let requests = gateway.requests();
    assert_eq!(requests.len(), 2);
    let (path, body) = &requests[1];
    assert_eq!(path, TOKENIZE);
    assert_eq!(
        body,
        &json!({
            "paypal_account": {
                "intent": "sale",
                "response": { "webURL": deep_link.as_str() },
                "options": { "validate": false },
                "response_type": "web",
                "correlation_id": "a-correlation-id"
            },
            "merchant_account_id": "local-merchant-account-id"
        })
    );
}

#[tokio::test]
async fn test_cancel_sends_no_tokenize_request() {
    let gateway = MockGateway::new(true).respond(CREATE, create_response());
    let client = client(gateway.clone());

    let params = client
        .create_payment_auth_request(ideal_request())
        .await
        .unwrap();
    let PendingRequest::Started(pending) =
        BrowserSwitchLauncher::new(TestLauncher::default()).launch(&params)
    else {
        panic!("expected the switch to start");
    };

    let result = client.parse_result(
        &pending,
        &SwitchReturn::DeepLink(url!("com.merchant.app://local-payment/cancel")),
    );
    let outcome = client.tokenize(result).await.unwrap();

    assert_eq!(outcome, PaymentOutcome::Canceled);
    assert_eq!(gateway.requests().len(), 1);
}

#[tokio::test]
async fn test_mismatched_returns_are_no_result() {
    let gateway = MockGateway::new(true).respond(CREATE, create_response());
    let client = client(gateway.clone());

    let params = client
        .create_payment_auth_request(ideal_request())
        .await
        .unwrap();
    let PendingRequest::Started(pending) =
        BrowserSwitchLauncher::new(TestLauncher::default()).launch(&params)
    else {
        panic!("expected the switch to start");
    };

    // Another app's scheme.
    let result = client.parse_result(
        &pending,
        &SwitchReturn::DeepLink(url!("com.other.app://local-payment/success")),
    );
    assert_eq!(
        client.tokenize(result).await.unwrap(),
        PaymentOutcome::NoResult
    );

    // A pending request stored by the SEPA module.
    let mut sepa = BrowserSwitchRequest::try_from(&pending).unwrap();
    sepa.request_code = SepaDirectDebit::REQUEST_CODE;
    let sepa_pending = PendingRequestString::try_from(&sepa).unwrap();
    let result = client.parse_result(
        &sepa_pending,
        &SwitchReturn::DeepLink(url!("com.merchant.app://local-payment/success")),
    );
    assert_eq!(
        client.tokenize(result).await.unwrap(),
        PaymentOutcome::NoResult
    );

    assert_eq!(gateway.requests().len(), 1);
}

#[tokio::test]
async fn test_corrupt_pending_request_is_failure() {
    let client = client(MockGateway::new(true));

    let result = client.parse_result(
        &PendingRequestString::from("not base64!".to_string()),
        &SwitchReturn::DeepLink(url!("com.merchant.app://local-payment/success")),
    );

    let err = client.tokenize(result).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}
