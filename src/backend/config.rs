//! Backend config module.
//!
//! This module contains the representation of the backend
//! configuration of the user account.

use crate::JmapConfig;

/// Represents the backend configuration of the user account.
///
/// Building a backend from [`BackendConfig::Jmap`] needs the
/// `jmap-backend` feature.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum BackendConfig<'a> {
    None,
    Jmap(&'a JmapConfig),
}

impl Default for BackendConfig<'_> {
    fn default() -> Self {
        Self::None
    }
}
