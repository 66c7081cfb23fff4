#![allow(dead_code)]

use std::{
    cell::RefCell,
    sync::{Arc, Mutex},
};

use braintree_kit::{
    errors::Error,
    gateway::{Configuration, Gateway},
    switch::UrlLauncher,
    types::AnyJson,
};
use url::Url;
use url_macro::url;

#[derive(Debug, Default)]
struct MockState {
    responses: Mutex<Vec<(String, Result<String, Error>)>>,
    requests: Mutex<Vec<(String, AnyJson)>>,
}

/// A gateway with canned responses that records every POST.
#[derive(Debug, Clone)]
pub struct MockGateway {
    pub configuration: Configuration,
    state: Arc<MockState>,
}

impl MockGateway {
    pub fn new(paypal_enabled: bool) -> Self {
        MockGateway {
            configuration: Configuration {
                client_api_url: url!(
                    "https://api.sandbox.braintreegateway.com/merchants/dcpspy2brwdjr3qn/client_api"
                ),
                environment: "sandbox".to_string(),
                merchant_id: "dcpspy2brwdjr3qn".to_string(),
                paypal_enabled,
            },
            state: Arc::default(),
        }
    }

    /// Queue a response for the next POST to `path`.
    pub fn respond(self, path: &str, body: serde_json::Value) -> Self {
        self.push(path, Ok(body.to_string()))
    }

    pub fn fail(self, path: &str, err: Error) -> Self {
        self.push(path, Err(err))
    }

    fn push(self, path: &str, response: Result<String, Error>) -> Self {
        self.state
            .responses
            .lock()
            .unwrap()
            .push((path.to_string(), response));
        self
    }

    pub fn requests(&self) -> Vec<(String, AnyJson)> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn request_paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|(path, _)| path).collect()
    }
}

impl Gateway for MockGateway {
    async fn configuration(&self) -> Result<Configuration, Error> {
        Ok(self.configuration.clone())
    }

    async fn post(&self, path: &str, body: AnyJson) -> Result<String, Error> {
        self.state
            .requests
            .lock()
            .unwrap()
            .push((path.to_string(), body));

        let mut responses = self.state.responses.lock().unwrap();
        match responses.iter().position(|(p, _)| p == path) {
            Some(index) => responses.remove(index).1,
            None => Err(Error::transport(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                format!("no response queued for {path}"),
            ))),
        }
    }
}

/// A launcher that records the URLs it was asked to open.
#[derive(Debug, Default)]
pub struct TestLauncher {
    pub opened: RefCell<Vec<Url>>,
}

impl UrlLauncher for TestLauncher {
    type Error = std::io::Error;

    fn open(&self, url: &Url) -> Result<(), Self::Error> {
        self.opened.borrow_mut().push(url.clone());
        Ok(())
    }
}
