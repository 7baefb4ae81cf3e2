//! `HttpTransport` over `reqwest`.

use std::time::Duration;

use anyhow::{Context, Result};
use wsagent_common::ProbeMethod;

use crate::application::ports::HttpTransport;
use crate::domain::{ProbeRequest, TransportError};

/// Production transport backed by one shared `reqwest::Client`.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a client whose connect phase is bounded by `connect_timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(connect_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }
}

fn method(method: ProbeMethod) -> reqwest::Method {
    match method {
        ProbeMethod::Options => reqwest::Method::OPTIONS,
        ProbeMethod::Head => reqwest::Method::HEAD,
    }
}

fn classify(err: &reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Protocol(err.to_string())
    }
}

impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &ProbeRequest) -> Result<u16, TransportError> {
        let response = self
            .client
            .request(method(request.method), request.url.clone())
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| classify(&e))?;
        Ok(response.status().as_u16())
    }
}
