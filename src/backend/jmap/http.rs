//! JMAP HTTP transport module.
//!
//! This module contains the [`Transport`] implementation posting
//! batch requests over HTTP.

use log::{debug, trace};
use reqwest::blocking::{Client, RequestBuilder};

use super::{
    config::JmapConfig,
    request::Request,
    transport::{Error, Result, Transport},
};

enum Auth {
    Basic { login: String, passwd: String },
    Bearer(String),
}

/// Represents the HTTP transport, backed by a pooled blocking client.
pub struct HttpTransport {
    client: Client,
    auth: Auth,
    api_url: String,
}

impl HttpTransport {
    /// Builds the transport from the backend config and the resolved
    /// password. The API URL is unknown until the session is
    /// discovered, see [`HttpTransport::with_api_url`].
    pub fn new(config: &JmapConfig, passwd: String) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("jmap-lib/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .danger_accept_invalid_certs(config.insecure())
            .build()
            .map_err(Error::BuildClientError)?;

        let auth = if config.bearer(&passwd) {
            Auth::Bearer(passwd)
        } else {
            Auth::Basic {
                login: config.login.clone(),
                passwd,
            }
        };

        Ok(Self {
            client,
            auth,
            api_url: String::new(),
        })
    }

    pub fn with_api_url<U: ToString>(mut self, api_url: U) -> Self {
        self.api_url = api_url.to_string();
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            Auth::Basic { login, passwd } => builder.basic_auth(login, Some(passwd)),
            Auth::Bearer(token) => builder.bearer_auth(token),
        }
    }

    fn send(&self, builder: RequestBuilder, url: &str) -> Result<String> {
        let res = self
            .authorize(builder)
            .send()
            .map_err(|err| Error::SendRequestError(err, url.to_owned()))?;

        let status = res.status();
        debug!("http response from {}: {}", url, status);

        if !status.is_success() {
            return Err(Error::StatusError(status.as_u16(), url.to_owned()));
        }

        let body = res
            .text()
            .map_err(|err| Error::ReadResponseError(err, url.to_owned()))?;
        trace!("http response body: {}", body);

        Ok(body)
    }

    /// Gets the given resource, used to fetch the session.
    pub fn fetch(&self, url: &str) -> Result<String> {
        debug!("fetching {}", url);
        self.send(self.client.get(url), url)
    }
}

impl Transport for HttpTransport {
    fn submit(&self, request: &Request) -> Result<String> {
        debug!("posting jmap request to {}", self.api_url);
        self.send(self.client.post(&self.api_url).json(request), &self.api_url)
    }
}
