//! The browser-switch authorization state machine.
//!
//! A switch moves through three steps, each of which may happen in a
//! different process:
//!
//! 1. [`BrowserSwitchLauncher::start`] opens an approval URL and returns a
//!    [`PendingRequest`]. Its [`PendingRequestString`] is persisted by the caller.
//! 2. The user completes or abandons the flow in the external user agent.
//! 3. [`complete_request`] reconciles the stored string with the app's
//!    [`SwitchReturn`] and produces an [`AuthResult`].
//!
//! No state is held in memory between the steps.

mod launcher;
mod request;
mod result;

pub use launcher::*;
pub use request::*;
pub use result::*;

use url::Url;

use crate::errors::Error;

/// A payment module that authorizes through a browser switch.
///
/// The module's deep links are `{scheme}://{MODULE_HOST}/success` and
/// `{scheme}://{MODULE_HOST}/cancel`.
pub trait SwitchModule {
    /// Host segment of the module's deep links.
    const MODULE_HOST: &'static str;
    /// Discriminator stored in the pending request.
    const REQUEST_CODE: RequestCode;

    fn success_url(return_url_scheme: &str) -> Result<Url, Error> {
        validate_return_url_scheme(return_url_scheme)?;
        Ok(Url::parse(&format!(
            "{return_url_scheme}://{}/success",
            Self::MODULE_HOST
        ))?)
    }

    fn cancel_url(return_url_scheme: &str) -> Result<Url, Error> {
        validate_return_url_scheme(return_url_scheme)?;
        Ok(Url::parse(&format!(
            "{return_url_scheme}://{}/cancel",
            Self::MODULE_HOST
        ))?)
    }

    fn is_cancel(url: &Url) -> bool {
        url.host_str()
            .is_some_and(|h| h.eq_ignore_ascii_case(Self::MODULE_HOST))
            && url.path().contains("cancel")
    }

    fn is_success(url: &Url) -> bool {
        url.host_str()
            .is_some_and(|h| h.eq_ignore_ascii_case(Self::MODULE_HOST))
            && url.path().contains("success")
    }
}
