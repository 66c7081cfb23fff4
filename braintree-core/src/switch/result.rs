use url::Url;

use crate::{
    errors::Error,
    switch::{BrowserSwitchRequest, PendingRequestString, RequestCode, SwitchModule},
    types::Metadata,
};

/// What the host observed when the app came back to the foreground.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchReturn {
    /// The app was opened through a deep link.
    DeepLink(Url),
    /// The app was resumed without a deep link, e.g. the user navigated back.
    Resumed,
    /// The host reported that the switch itself failed.
    Failed(String),
}

/// Payload of a successful return.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSuccess {
    pub request_code: RequestCode,
    /// The deep link the user agent returned through.
    pub return_url: Url,
    /// The bag stored at launch, plus the deep link's query parameters.
    pub metadata: Metadata,
}

/// Result of reconciling a pending request with the app's return.
#[derive(Debug)]
pub enum AuthResult {
    Success(AuthSuccess),
    /// The user canceled in the external user agent.
    Cancel,
    /// The return does not belong to the stored pending request.
    NoResult,
    Failure(Error),
}

impl AuthResult {
    pub fn is_success(&self) -> bool {
        matches!(self, AuthResult::Success(_))
    }

    pub fn as_success(&self) -> Option<&AuthSuccess> {
        match self {
            AuthResult::Success(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_failure(&self) -> Option<&Error> {
        match self {
            AuthResult::Failure(e) => Some(e),
            _ => None,
        }
    }
}

/// Reconcile a stored pending request with what the host observed on return.
///
/// Pure function of its inputs. The caller clears the stored string once
/// this has resolved it; resolving the same string twice is not supported.
pub fn complete_request<M: SwitchModule>(
    pending: &PendingRequestString,
    incoming: &SwitchReturn,
) -> AuthResult {
    if let SwitchReturn::Failed(reason) = incoming {
        return AuthResult::Failure(Error::BrowserSwitch(reason.clone()));
    }

    let request = match BrowserSwitchRequest::try_from(pending) {
        Ok(request) => request,
        Err(err) => return AuthResult::Failure(err),
    };

    if request.request_code != M::REQUEST_CODE {
        return AuthResult::NoResult;
    }

    let url = match incoming {
        SwitchReturn::DeepLink(url) if request.matches_deep_link(url) => url,
        _ => return AuthResult::NoResult,
    };

    if M::is_cancel(url) {
        return AuthResult::Cancel;
    }

    if !M::is_success(url) {
        return AuthResult::Failure(Error::BrowserSwitch("Unknown error".to_string()));
    }

    let mut metadata = request.metadata;
    for (key, value) in url.query_pairs() {
        if !metadata.contains_key(&key) {
            metadata.insert(key.into_owned(), value.into_owned());
        }
    }

    AuthResult::Success(AuthSuccess {
        request_code: request.request_code,
        return_url: url.clone(),
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use url_macro::url;

    use super::*;

    struct Sepa;
    impl SwitchModule for Sepa {
        const MODULE_HOST: &'static str = "sepa";
        const REQUEST_CODE: RequestCode = RequestCode::SEPA_DEBIT;
    }

    struct Venmo;
    impl SwitchModule for Venmo {
        const MODULE_HOST: &'static str = "venmo";
        const REQUEST_CODE: RequestCode = RequestCode::VENMO;
    }

    fn pending() -> PendingRequestString {
        let request = BrowserSwitchRequest {
            request_code: RequestCode::SEPA_DEBIT,
            url: url!("https://example.com/approve"),
            return_url_scheme: "com.merchant.app".to_string(),
            metadata: Metadata::new()
                .with("ibanLastFour", "6610")
                .with("customerId", "customer-1"),
        };
        PendingRequestString::try_from(&request).unwrap()
    }

    #[test]
    fn test_success_merges_query_parameters() {
        let result = complete_request::<Sepa>(
            &pending(),
            &SwitchReturn::DeepLink(url!(
                "com.merchant.app://sepa/success?paymentToken=tok-1&customerId=spoofed"
            )),
        );

        let success = result.as_success().expect("expected success");
        assert_eq!(success.metadata.get_str("ibanLastFour"), Some("6610"));
        assert_eq!(success.metadata.get_str("paymentToken"), Some("tok-1"));
        // Stored values win over the deep link.
        assert_eq!(success.metadata.get_str("customerId"), Some("customer-1"));
    }

    #[test]
    fn test_cancel() {
        let result = complete_request::<Sepa>(
            &pending(),
            &SwitchReturn::DeepLink(url!("com.merchant.app://sepa/cancel")),
        );
        assert!(matches!(result, AuthResult::Cancel));
    }

    #[test]
    fn test_request_code_mismatch_is_no_result() {
        for incoming in [
            SwitchReturn::DeepLink(url!("com.merchant.app://venmo/success")),
            SwitchReturn::DeepLink(url!("com.merchant.app://sepa/cancel")),
            SwitchReturn::Resumed,
        ] {
            let result = complete_request::<Venmo>(&pending(), &incoming);
            assert!(matches!(result, AuthResult::NoResult), "{incoming:?}");
        }
    }

    #[test]
    fn test_scheme_mismatch_or_missing_deep_link_is_no_result() {
        let other_app = complete_request::<Sepa>(
            &pending(),
            &SwitchReturn::DeepLink(url!("com.other.app://sepa/success")),
        );
        assert!(matches!(other_app, AuthResult::NoResult));

        let resumed = complete_request::<Sepa>(&pending(), &SwitchReturn::Resumed);
        assert!(matches!(resumed, AuthResult::NoResult));
    }

    #[test]
    fn test_failures() {
        let failed = complete_request::<Sepa>(
            &pending(),
            &SwitchReturn::Failed("activity not found".to_string()),
        );
        assert!(matches!(failed.as_failure(), Some(Error::BrowserSwitch(m)) if m == "activity not found"));

        let unknown = complete_request::<Sepa>(
            &pending(),
            &SwitchReturn::DeepLink(url!("com.merchant.app://elsewhere/success")),
        );
        assert!(matches!(unknown.as_failure(), Some(Error::BrowserSwitch(m)) if m == "Unknown error"));

        let corrupt = complete_request::<Sepa>(
            &PendingRequestString("%%%".to_string()),
            &SwitchReturn::DeepLink(url!("com.merchant.app://sepa/success")),
        );
        assert!(matches!(corrupt, AuthResult::Failure(_)));
    }
}
