//! JMAP engine module.
//!
//! This module turns method calls into one batch request, submits it
//! through a [`Transport`] and turns the batch response back into
//! results. A single failed call fails the whole batch.

use log::{debug, trace, warn};
use std::result;
use thiserror::Error;

use super::{
    config::{CORE_CAPABILITY, MAIL_CAPABILITY},
    request::{MethodCall, Request},
    response::{self, MethodError, Response, ERROR_METHOD},
    transport::{self, Transport},
};

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot submit jmap request")]
    SubmitRequestError(#[source] transport::Error),
    #[error("cannot parse jmap response")]
    ParseResponseError(#[source] serde_json::Error),
    #[error("jmap method {method} failed ({kind}): {description}")]
    MethodError {
        method: String,
        call_id: String,
        kind: String,
        description: String,
    },
    #[error(transparent)]
    ResponseError(#[from] response::Error),
}

/// Represents the category of an engine error.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ErrorCategory {
    /// The server could not be reached.
    Network,
    /// The server answered something that is not a valid batch
    /// response.
    Server,
    /// The server rejected one of the calls.
    Method,
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SubmitRequestError(_) => ErrorCategory::Network,
            Self::ParseResponseError(_) | Self::ResponseError(_) => ErrorCategory::Server,
            Self::MethodError { .. } => ErrorCategory::Method,
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Represents the protocol engine.
pub struct Engine<T> {
    transport: T,
    using: Vec<String>,
}

impl<T: Transport> Engine<T> {
    /// Builds an engine declaring the core and mail capabilities.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            using: vec![CORE_CAPABILITY.into(), MAIL_CAPABILITY.into()],
        }
    }

    /// Replaces the capabilities declared by [`Engine::submit`].
    pub fn capabilities(mut self, using: Vec<String>) -> Self {
        if !using.is_empty() {
            self.using = using;
        }
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Submits the calls declaring the default capabilities.
    pub fn submit(&self, calls: Vec<MethodCall>) -> Result<Response> {
        self.submit_batch(calls, &self.using)
    }

    /// Submits the calls as one batch declaring the given
    /// capabilities, or the default ones if empty.
    ///
    /// Returns the whole response, unless one of the calls failed:
    /// the first error response aborts the batch.
    pub fn submit_batch(&self, calls: Vec<MethodCall>, using: &[String]) -> Result<Response> {
        let using = if using.is_empty() {
            self.using.as_slice()
        } else {
            using
        };
        let request = Request::new(using.to_vec(), calls);

        debug!(
            "submitting jmap batch: {}",
            request
                .method_calls
                .iter()
                .map(|call| format!("{} ({})", call.name(), call.call_id()))
                .collect::<Vec<_>>()
                .join(", ")
        );
        trace!("jmap request: {:#?}", request);

        let body = self
            .transport
            .submit(&request)
            .map_err(Error::SubmitRequestError)?;
        let response: Response = serde_json::from_str(&body).map_err(Error::ParseResponseError)?;

        trace!("jmap response: {:#?}", response);

        for res in &response.method_responses {
            let method = request.method_name(res.call_id());
            if method.is_none() {
                warn!("jmap response with unknown call id {}", res.call_id());
            }

            if res.name() == ERROR_METHOD {
                let err = MethodError::from(res.arguments());
                return Err(Error::MethodError {
                    method: method.unwrap_or("unknown").to_owned(),
                    call_id: res.call_id().to_owned(),
                    kind: err.kind,
                    description: err.description,
                });
            }
        }

        Ok(response)
    }
}
