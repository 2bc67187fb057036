//! JMAP response module.
//!
//! This module contains the representation of a batch response and
//! helpers to pick the result of one method out of it.

use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use std::result;
use thiserror::Error;

use super::request::Invocation;

/// Name used by the server in place of the method name when a call
/// failed.
pub const ERROR_METHOD: &str = "error";

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot find {0} response in jmap batch")]
    FindMethodResponseError(String),
    #[error("cannot parse {1} response")]
    ParseMethodResponseError(#[source] serde_json::Error, String),
}

pub type Result<T> = result::Result<T, Error>;

/// Represents a batch response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub method_responses: Vec<Invocation>,
    #[serde(default)]
    pub session_state: Option<String>,
}

impl Response {
    /// Gets the arguments of the first response of the given method.
    pub fn method_result(&self, name: &str) -> Option<&Value> {
        self.method_responses
            .iter()
            .find(|res| res.name() == name)
            .map(Invocation::arguments)
    }

    /// Gets the response answering the given call id.
    pub fn call_result(&self, call_id: &str) -> Option<&Invocation> {
        self.method_responses
            .iter()
            .find(|res| res.call_id() == call_id)
    }

    /// Parses the arguments of the first response of the given
    /// method.
    pub fn parse_method_result<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let args = self
            .method_result(name)
            .ok_or_else(|| Error::FindMethodResponseError(name.to_owned()))?;
        T::deserialize(args).map_err(|err| Error::ParseMethodResponseError(err, name.to_owned()))
    }
}

/// Represents the arguments of an error response.
///
/// Missing fields fall back to `unknown` and `Unknown error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodError {
    pub kind: String,
    pub description: String,
}

impl MethodError {
    fn default_kind() -> String {
        String::from("unknown")
    }

    fn default_description() -> String {
        String::from("Unknown error")
    }
}

impl From<&Value> for MethodError {
    fn from(args: &Value) -> Self {
        let field = |key: &str| args.get(key).and_then(Value::as_str).map(String::from);
        Self {
            kind: field("type").unwrap_or_else(Self::default_kind),
            description: field("description").unwrap_or_else(Self::default_description),
        }
    }
}
