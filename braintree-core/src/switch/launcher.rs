use url::Url;

use crate::{
    errors::Error,
    switch::{BrowserSwitchOptions, BrowserSwitchRequest, PendingRequest, PendingRequestString},
};

/// Host-provided capability to open a URL in an external user agent.
pub trait UrlLauncher {
    type Error: std::error::Error;

    /// Whether any user agent on the host can open `url`.
    fn can_open(&self, url: &Url) -> bool {
        let _ = url;
        true
    }

    /// Open `url`. Returns once the user agent has been asked to open it.
    fn open(&self, url: &Url) -> Result<(), Self::Error>;
}

/// Anything that carries the options for a browser switch, e.g. the
/// `ReadyToLaunch` parameters of a payment module.
pub trait LaunchParams {
    fn browser_switch_options(&self) -> &BrowserSwitchOptions;
}

impl LaunchParams for BrowserSwitchOptions {
    fn browser_switch_options(&self) -> &BrowserSwitchOptions {
        self
    }
}

/// Starts browser switches and encodes them for persistence.
#[derive(Debug, Clone)]
pub struct BrowserSwitchLauncher<L: UrlLauncher> {
    pub launcher: L,
}

impl<L: UrlLauncher> BrowserSwitchLauncher<L> {
    pub fn new(launcher: L) -> Self {
        BrowserSwitchLauncher { launcher }
    }

    /// Open the approval URL carried by `params`.
    pub fn launch(&self, params: &impl LaunchParams) -> PendingRequest {
        self.start(params.browser_switch_options())
    }

    /// Validate `options`, encode them, then open the URL.
    ///
    /// The request is encoded before the user agent is opened, so a started
    /// switch always has a pending string to return with.
    pub fn start(&self, options: &BrowserSwitchOptions) -> PendingRequest {
        let pending = self.try_start(options);

        #[cfg(feature = "tracing")]
        match &pending {
            PendingRequest::Started(_) => tracing::debug!(
                event = "browser-switch.started",
                "Browser switch started: request_code={}, url='{}'",
                options.request_code,
                options.url
            ),
            PendingRequest::Failure(err) => tracing::warn!(
                event = "browser-switch.failed",
                "Browser switch failed: request_code={}, {err}",
                options.request_code
            ),
        }

        pending
    }

    fn try_start(&self, options: &BrowserSwitchOptions) -> PendingRequest {
        if let Err(err) = validate_return_url_scheme(&options.return_url_scheme) {
            return PendingRequest::Failure(err);
        }

        if !self.launcher.can_open(&options.url) {
            return PendingRequest::Failure(Error::BrowserSwitch(format!(
                "No installed activities can open this URL: {}",
                options.url
            )));
        }

        let request = BrowserSwitchRequest::from(options.clone());
        let pending = match PendingRequestString::try_from(&request) {
            Ok(pending) => pending,
            Err(err) => return PendingRequest::Failure(err.into()),
        };

        match self.launcher.open(&options.url) {
            Ok(()) => PendingRequest::Started(pending),
            Err(err) => PendingRequest::Failure(Error::BrowserSwitch(format!(
                "Unable to open {}: {err}",
                options.url
            ))),
        }
    }
}

/// A return URL scheme must be non-empty, start with a letter, and
/// contain only letters, digits, `+`, `-` and `.`.
pub fn validate_return_url_scheme(scheme: &str) -> Result<(), Error> {
    let mut chars = scheme.chars();
    let Some(first) = chars.next() else {
        return Err(Error::BrowserSwitch(
            "A returnUrlScheme is required to perform a browser switch.".to_string(),
        ));
    };

    if !first.is_ascii_alphabetic()
        || !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    {
        return Err(Error::BrowserSwitch(format!(
            "'{scheme}' is not a valid URL scheme."
        )));
    }

    Ok(())
}
