//! Backend module.
//!
//! This module exposes the backend trait, which can be used to create
//! custom backend implementations.

use std::result;
use thiserror::Error;

use crate::{account, AccountConfig, BackendConfig, Folders, MailboxTree};

#[cfg(feature = "jmap-backend")]
use std::borrow::Cow;

#[cfg(feature = "jmap-backend")]
use crate::{backend, JmapBackendBuilder};

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot build backend: empty config or backend feature disabled")]
    BuildBackendError,
    #[error("cannot paginate: page {0} of size {1} is out of range")]
    PaginateError(usize, usize),

    #[error(transparent)]
    ConfigError(#[from] account::config::Error),

    #[cfg(feature = "jmap-backend")]
    #[error(transparent)]
    JmapBackendError(#[from] backend::jmap::backend::Error),
}

pub type Result<T> = result::Result<T, Error>;

pub trait Backend {
    fn list_folders(&self) -> Result<Folders>;
    fn mailbox_tree(&self) -> Result<MailboxTree>;

    fn list_email_ids(&self, folder: &str, page_size: usize, page: usize) -> Result<Vec<String>>;
}

#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct BackendBuilder;

impl BackendBuilder {
    pub fn build<'a>(
        account_config: &'a AccountConfig,
        backend_config: &BackendConfig<'a>,
    ) -> Result<Box<dyn Backend + 'a>> {
        match backend_config {
            #[cfg(feature = "jmap-backend")]
            BackendConfig::Jmap(jmap_config) => Ok(Box::new(JmapBackendBuilder::new().build(
                Cow::Borrowed(account_config),
                Cow::Borrowed(*jmap_config),
            )?)),
            #[cfg(not(feature = "jmap-backend"))]
            BackendConfig::Jmap(_) => Err(Error::BuildBackendError),
            BackendConfig::None => Err(Error::BuildBackendError),
        }
    }
}
