//! JMAP backend module.
//!
//! This module contains the definition of the JMAP backend.

use log::{debug, info};
use serde::Deserialize;
use serde_json::{json, Value};
use std::{borrow::Cow, result};
use thiserror::Error;

use crate::{
    account, backend, folder::tree, AccountConfig, Backend, Folders, JmapConfig, Mailbox,
    MailboxNode, MailboxTree, Role,
};

use super::{
    config::{self, SUBMISSION_CAPABILITY},
    engine::{self, Engine},
    http::HttpTransport,
    request::MethodCall,
    response,
    session::{self, Session},
    transport::{self, Transport},
};

const EMAIL_SUBMISSION_CREATION_ID: &str = "submission";
const EMAIL_CREATION_ID: &str = "draft";

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot find folder {0}")]
    FindFolderError(String),
    #[error("cannot find any sending identity")]
    FindIdentityError,
    #[error("cannot send email ({0}): {1}")]
    SendEmailError(String, String),

    #[error(transparent)]
    ConfigError(#[from] account::config::Error),
    #[error(transparent)]
    JmapConfigError(#[from] config::Error),
    #[error(transparent)]
    TransportError(#[from] transport::Error),
    #[error(transparent)]
    SessionError(#[from] session::Error),
    #[error(transparent)]
    EngineError(#[from] engine::Error),
    #[error(transparent)]
    MailboxTreeError(#[from] tree::Error),
}

impl From<response::Error> for Error {
    fn from(err: response::Error) -> Self {
        Self::EngineError(err.into())
    }
}

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, Deserialize)]
struct GetResult<T> {
    list: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct QueryResult {
    ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Identity {
    id: String,
    #[serde(default)]
    email: String,
}

#[derive(Default)]
pub struct JmapBackendBuilder;

impl JmapBackendBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the backend over HTTP: resolves the password, discovers
    /// the session then points the transport at the API URL.
    pub fn build<'a>(
        &self,
        account_config: Cow<'a, AccountConfig>,
        jmap_config: Cow<'a, JmapConfig>,
    ) -> Result<JmapBackend<'a>> {
        let transport = HttpTransport::new(&jmap_config, jmap_config.passwd()?)?;
        let session = Session::discover(&transport, &jmap_config.session_url())?;
        let transport = transport.with_api_url(&session.api_url);

        JmapBackend::with_transport(account_config, jmap_config, session, transport)
    }
}

/// Represents the JMAP backend.
pub struct JmapBackend<'a, T = HttpTransport> {
    account_config: Cow<'a, AccountConfig>,
    jmap_config: Cow<'a, JmapConfig>,
    session: Session,
    account_id: String,
    engine: Engine<T>,
}

impl<'a, T: Transport> JmapBackend<'a, T> {
    /// Builds the backend from an already discovered session and the
    /// given transport.
    pub fn with_transport(
        account_config: Cow<'a, AccountConfig>,
        jmap_config: Cow<'a, JmapConfig>,
        session: Session,
        transport: T,
    ) -> Result<Self> {
        let account_id = match &jmap_config.account_id {
            Some(id) => id.clone(),
            None => session.account_id()?.to_owned(),
        };
        info!("using jmap account {}", account_id);

        let engine = Engine::new(transport).capabilities(jmap_config.capabilities());

        Ok(Self {
            account_config,
            jmap_config,
            session,
            account_id,
            engine,
        })
    }

    pub fn account_config(&self) -> &AccountConfig {
        &self.account_config
    }

    pub fn jmap_config(&self) -> &JmapConfig {
        &self.jmap_config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn engine(&self) -> &Engine<T> {
        &self.engine
    }

    /// Gets all the mailboxes of the account.
    pub fn get_mailboxes(&self) -> Result<Vec<Mailbox>> {
        let res = self.engine.submit(vec![MethodCall::new(
            "Mailbox/get",
            json!({ "accountId": self.account_id, "ids": null }),
        )])?;
        let mailboxes: GetResult<Mailbox> = res.parse_method_result("Mailbox/get")?;
        debug!("found {} mailbox(es)", mailboxes.list.len());
        Ok(mailboxes.list)
    }

    /// Gets all the mailboxes of the account, arranged as a tree.
    pub fn get_mailbox_tree(&self) -> Result<MailboxTree> {
        Ok(MailboxTree::build(self.get_mailboxes()?)?)
    }

    /// Finds a mailbox from a folder name. The folder is first
    /// resolved through the account aliases, then matched against
    /// well-known roles and finally against mailbox paths.
    ///
    /// Names containing the delimiter cannot be walked segment by
    /// segment, so full paths as listed by
    /// [`Backend::list_folders`] are matched as a last resort.
    pub fn find_folder<'t>(&self, tree: &'t MailboxTree, folder: &str) -> Result<&'t MailboxNode> {
        let folder = self.account_config.folder_alias(folder)?;

        Some(Role::from(folder.as_str()))
            .filter(Role::is_well_known)
            .and_then(|role| tree.get_by_role(role))
            .or_else(|| tree.find_by_path(&folder))
            .or_else(|| tree.get_by_path(&folder))
            .ok_or(Error::FindFolderError(folder))
    }

    /// Queries email ids. Without `sort` the server order applies.
    pub fn query_emails(
        &self,
        filter: Option<Value>,
        sort: Option<Value>,
        position: Option<usize>,
        limit: Option<usize>,
    ) -> Result<Vec<String>> {
        let mut args = json!({ "accountId": self.account_id });
        if let Some(filter) = filter {
            args["filter"] = filter;
        }
        if let Some(sort) = sort {
            args["sort"] = sort;
        }
        if let Some(position) = position {
            args["position"] = json!(position);
        }
        if let Some(limit) = limit {
            args["limit"] = json!(limit);
        }

        let res = self.engine.submit(vec![MethodCall::new("Email/query", args)])?;
        let query: QueryResult = res.parse_method_result("Email/query")?;
        Ok(query.ids)
    }

    /// Gets raw email objects, restricted to the given properties if
    /// any.
    pub fn get_emails(&self, ids: &[String], properties: Option<&[&str]>) -> Result<Vec<Value>> {
        let mut args = json!({ "accountId": self.account_id, "ids": ids });
        if let Some(properties) = properties {
            args["properties"] = json!(properties);
        }

        let res = self.engine.submit(vec![MethodCall::new("Email/get", args)])?;
        let emails: GetResult<Value> = res.parse_method_result("Email/get")?;
        Ok(emails.list)
    }

    fn submission_capabilities(&self) -> Vec<String> {
        let mut using = self.jmap_config.capabilities();
        if !using.iter().any(|cap| cap == SUBMISSION_CAPABILITY) {
            using.push(SUBMISSION_CAPABILITY.into());
        }
        using
    }

    /// Gets the id of the identity matching the account email, or the
    /// first identity.
    pub fn get_identity_id(&self) -> Result<String> {
        let res = self.engine.submit_batch(
            vec![MethodCall::new(
                "Identity/get",
                json!({ "accountId": self.account_id, "ids": null }),
            )],
            &self.submission_capabilities(),
        )?;
        let identities: GetResult<Identity> = res.parse_method_result("Identity/get")?;

        let email = &self.account_config.email;
        let identity = identities
            .list
            .iter()
            .find(|identity| !email.is_empty() && identity.email.eq_ignore_ascii_case(email))
            .or_else(|| identities.list.first())
            .ok_or(Error::FindIdentityError)?;

        Ok(identity.id.clone())
    }

    /// Creates the given email object and submits it for delivery in
    /// the same batch, then returns the created submission.
    pub fn send_email(&self, email: Value, identity_id: Option<&str>) -> Result<Value> {
        let identity_id = match identity_id {
            Some(id) => id.to_owned(),
            None => self.get_identity_id()?,
        };

        let calls = vec![
            MethodCall::new(
                "Email/set",
                json!({
                    "accountId": self.account_id,
                    "create": { EMAIL_CREATION_ID: email },
                }),
            ),
            MethodCall::new(
                "EmailSubmission/set",
                json!({
                    "accountId": self.account_id,
                    "create": {
                        EMAIL_SUBMISSION_CREATION_ID: {
                            "emailId": format!("#{}", EMAIL_CREATION_ID),
                            "identityId": identity_id,
                        }
                    },
                    "onSuccessDestroyEmail": [format!("#{}", EMAIL_SUBMISSION_CREATION_ID)],
                }),
            ),
        ];

        let res = self
            .engine
            .submit_batch(calls, &self.submission_capabilities())?;

        for method in ["Email/set", "EmailSubmission/set"] {
            let result: Value = res.parse_method_result(method)?;
            let creation_id = if method == "Email/set" {
                EMAIL_CREATION_ID
            } else {
                EMAIL_SUBMISSION_CREATION_ID
            };

            if let Some(err) = result.get("notCreated").and_then(|err| err.get(creation_id)) {
                let kind = err.get("type").and_then(Value::as_str).unwrap_or("unknown");
                let desc = err
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or("Unknown error");
                return Err(Error::SendEmailError(kind.to_owned(), desc.to_owned()));
            }

            if method == "EmailSubmission/set" {
                if let Some(submission) = result.get("created").and_then(|c| c.get(creation_id)) {
                    return Ok(submission.clone());
                }
            }
        }

        Err(Error::SendEmailError(
            "unknown".into(),
            "submission missing from response".into(),
        ))
    }
}

impl<'a, T: Transport> Backend for JmapBackend<'a, T> {
    fn list_folders(&self) -> backend::Result<Folders> {
        Ok(self.get_mailbox_tree()?.to_folders())
    }

    fn mailbox_tree(&self) -> backend::Result<MailboxTree> {
        Ok(self.get_mailbox_tree()?)
    }

    fn list_email_ids(
        &self,
        folder: &str,
        page_size: usize,
        page: usize,
    ) -> backend::Result<Vec<String>> {
        let position = page
            .checked_mul(page_size)
            .ok_or(backend::Error::PaginateError(page, page_size))?;

        let tree = self.get_mailbox_tree()?;
        let mailbox = self.find_folder(&tree, folder)?;
        Ok(self.query_emails(
            Some(json!({ "inMailbox": mailbox.id() })),
            Some(json!([{ "property": "receivedAt", "isAscending": false }])),
            Some(position),
            Some(page_size),
        )?)
    }
}
