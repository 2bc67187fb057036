//! JMAP backend module.
//!
//! This module contains everything needed to talk to a JMAP server:
//! the backend config, the session discovery, the protocol engine
//! batching method calls and the backend built on top of them. Only
//! the HTTP transport and the backend need the `jmap-backend`
//! feature.

pub mod call_id;
pub mod request;
pub mod response;

pub mod config;
pub use config::{JmapConfig, CORE_CAPABILITY, MAIL_CAPABILITY, SUBMISSION_CAPABILITY};

pub mod transport;
pub use transport::Transport;

#[cfg(feature = "jmap-backend")]
pub mod http;
#[cfg(feature = "jmap-backend")]
pub use http::HttpTransport;

pub mod session;
pub use session::Session;

pub mod engine;
pub use engine::{Engine, ErrorCategory};

#[cfg(feature = "jmap-backend")]
pub mod backend;
#[cfg(feature = "jmap-backend")]
pub use backend::{JmapBackend, JmapBackendBuilder};
