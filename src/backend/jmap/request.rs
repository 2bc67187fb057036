//! JMAP request module.
//!
//! This module contains the representation of a batch request: the
//! declared capabilities and the ordered list of method calls.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::call_id::next_call_id;

/// Represents one method invocation as sent on the wire:
/// `[name, arguments, call id]`. Responses use the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation(pub String, pub Value, pub String);

impl Invocation {
    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn arguments(&self) -> &Value {
        &self.1
    }

    pub fn call_id(&self) -> &str {
        &self.2
    }
}

/// Represents a method call before it gets its call id.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub name: String,
    pub arguments: Value,
    pub call_id: Option<String>,
}

impl MethodCall {
    pub fn new<N: ToString>(name: N, arguments: Value) -> Self {
        Self {
            name: name.to_string(),
            arguments,
            call_id: None,
        }
    }

    /// Sets a caller-chosen call id, for example to reference the
    /// result of this call from a later call of the same batch.
    pub fn call_id<I: ToString>(mut self, call_id: I) -> Self {
        self.call_id = Some(call_id.to_string());
        self
    }

    /// Turns the call into an invocation, generating the call id if
    /// none was chosen.
    pub fn into_invocation(self) -> Invocation {
        let call_id = self.call_id.unwrap_or_else(next_call_id);
        Invocation(self.name, self.arguments, call_id)
    }
}

/// Represents a batch request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub using: Vec<String>,
    pub method_calls: Vec<Invocation>,
}

impl Request {
    pub fn new(using: Vec<String>, calls: Vec<MethodCall>) -> Self {
        Self {
            using,
            method_calls: calls.into_iter().map(MethodCall::into_invocation).collect(),
        }
    }

    /// Finds the name of the method invoked with the given call id.
    pub fn method_name(&self, call_id: &str) -> Option<&str> {
        self.method_calls
            .iter()
            .find(|call| call.call_id() == call_id)
            .map(Invocation::name)
    }
}
