use std::sync::OnceLock;

use http::{HeaderMap, HeaderName, HeaderValue, header::USER_AGENT};
use url::Url;

use crate::{
    authorization::Authorization,
    errors::Error,
    gateway::{Configuration, Gateway, check_response},
    types::AnyJson,
};

/// A [`Gateway`] that talks to the Braintree client API over HTTP.
///
/// The merchant configuration is fetched on first use and cached for the
/// lifetime of the client.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    pub authorization: Authorization,
    pub client: reqwest::Client,
    pub headers: HeaderMap,
    configuration: OnceLock<Configuration>,
}

impl HttpGateway {
    pub fn from_authorization(authorization: Authorization) -> Self {
        HttpGateway {
            authorization,
            client: reqwest::Client::new(),
            headers: HeaderMap::new(),
            configuration: OnceLock::new(),
        }
    }

    /// Parse a tokenization key or client token and build a gateway for it.
    pub fn from_authorization_str(authorization: &str) -> Result<Self, Error> {
        Ok(HttpGateway::from_authorization(authorization.parse()?))
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn header(mut self, key: &HeaderName, value: &HeaderValue) -> Self {
        self.headers.insert(key, value.to_owned());
        self
    }

    fn request_headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = self.headers.clone();
        headers
            .entry(USER_AGENT)
            .or_insert(HeaderValue::from_static(concat!(
                "braintree/rust/",
                env!("CARGO_PKG_VERSION")
            )));

        if let Authorization::TokenizationKey(_) = &self.authorization {
            let value = HeaderValue::from_str(self.authorization.bearer()).map_err(|_| {
                Error::Configuration("Tokenization Key is not a valid header value".to_string())
            })?;
            headers.insert(HeaderName::from_static("client-key"), value);
        }
        Ok(headers)
    }

    fn configuration_url(&self) -> Result<Url, Error> {
        let mut url = self.authorization.config_url()?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("configVersion", "3");
            if let Authorization::ClientToken(token) = &self.authorization {
                query.append_pair("authorizationFingerprint", &token.authorization_fingerprint);
            }
        }
        Ok(url)
    }

    async fn read(response: reqwest::Response) -> Result<String, Error> {
        let status = response.status().as_u16();
        let body = response.text().await.map_err(Error::transport)?;
        check_response(status, body)
    }
}

impl Gateway for HttpGateway {
    async fn configuration(&self) -> Result<Configuration, Error> {
        if let Some(configuration) = self.configuration.get() {
            return Ok(configuration.clone());
        }

        let response = self
            .client
            .get(self.configuration_url()?)
            .headers(self.request_headers()?)
            .send()
            .await
            .map_err(Error::transport)?;

        let configuration: Configuration = serde_json::from_str(&Self::read(response).await?)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Fetched configuration: merchant_id='{}', environment='{}'",
            configuration.merchant_id,
            configuration.environment
        );

        Ok(self.configuration.get_or_init(|| configuration).clone())
    }

    async fn post(&self, path: &str, mut body: AnyJson) -> Result<String, Error> {
        let url = self.configuration().await?.resolve(path)?;

        if let (Authorization::ClientToken(token), Some(object)) =
            (&self.authorization, body.as_object_mut())
        {
            object.insert(
                "authorizationFingerprint".to_string(),
                AnyJson::String(token.authorization_fingerprint.clone()),
            );
        }

        let response = self
            .client
            .post(url)
            .headers(self.request_headers()?)
            .json(&body)
            .send()
            .await
            .map_err(Error::transport)?;

        Self::read(response).await
    }
}
