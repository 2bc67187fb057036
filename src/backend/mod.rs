mod backend;
mod config;

pub mod jmap;

pub use self::backend::{Backend, BackendBuilder, Error, Result};
pub use self::config::BackendConfig;
pub use self::jmap::JmapConfig;
#[cfg(feature = "jmap-backend")]
pub use self::jmap::{JmapBackend, JmapBackendBuilder};
