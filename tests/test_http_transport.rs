#[cfg(feature = "jmap-backend")]
use mockito::{Matcher, Server};
#[cfg(feature = "jmap-backend")]
use serde_json::json;
#[cfg(feature = "jmap-backend")]
use std::{borrow::Cow, net::TcpListener};

#[cfg(feature = "jmap-backend")]
use jmap_lib::{
    jmap::{request::MethodCall, Engine, ErrorCategory, HttpTransport},
    AccountConfig, Backend, JmapBackendBuilder, JmapConfig,
};

#[cfg(feature = "jmap-backend")]
fn engine(api_url: &str, passwd: &str) -> Engine<HttpTransport> {
    let config = JmapConfig {
        login: "alice@localhost".into(),
        timeout: Some(5),
        ..JmapConfig::default()
    };
    let transport = HttpTransport::new(&config, passwd.into())
        .unwrap()
        .with_api_url(api_url);
    Engine::new(transport)
}

#[cfg(feature = "jmap-backend")]
#[test]
fn test_http_transport_unreachable_server() {
    // bind then release a port so that nothing listens on it
    let addr = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();

    let err = engine(&format!("http://{}/api", addr), "passwd")
        .submit(vec![MethodCall::new("Mailbox/get", json!({}))])
        .unwrap_err();
    assert_eq!(ErrorCategory::Network, err.category());
}

#[cfg(feature = "jmap-backend")]
#[test]
fn test_http_transport_error_status() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/api/")
        .with_status(503)
        .with_body("{}")
        .create();

    let err = engine(&format!("{}/api/", server.url()), "passwd")
        .submit(vec![])
        .unwrap_err();
    assert_eq!(ErrorCategory::Network, err.category());
    mock.assert();
}

#[cfg(feature = "jmap-backend")]
#[test]
fn test_http_transport_invalid_body() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/api/")
        .with_status(200)
        .with_body("<html>oops</html>")
        .create();

    let err = engine(&format!("{}/api/", server.url()), "passwd")
        .submit(vec![])
        .unwrap_err();
    assert_eq!(ErrorCategory::Server, err.category());
    mock.assert();
}

#[cfg(feature = "jmap-backend")]
#[test]
fn test_http_transport_bearer_auth() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/api/")
        .match_header("authorization", "Bearer fmu1-token")
        .match_body(Matcher::PartialJson(json!({
            "using": ["urn:ietf:params:jmap:core", "urn:ietf:params:jmap:mail"]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "methodResponses": [] }).to_string())
        .create();

    engine(&format!("{}/api/", server.url()), "fmu1-token")
        .submit(vec![])
        .unwrap();
    mock.assert();
}

#[cfg(all(feature = "jmap-backend", unix))]
#[test]
fn test_jmap_backend_builder() {
    let mut server = Server::new();
    let api_url = format!("{}/api/", server.url());
    let session = server
        .mock("GET", "/.well-known/jmap")
        .match_header("authorization", Matcher::Regex("^Basic ".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "capabilities": { "urn:ietf:params:jmap:core": {}, "urn:ietf:params:jmap:mail": {} },
                "accounts": { "u1": { "name": "alice@localhost" } },
                "primaryAccounts": { "urn:ietf:params:jmap:mail": "u1" },
                "apiUrl": api_url
            })
            .to_string(),
        )
        .create();
    let api = server
        .mock("POST", "/api/")
        .match_header("authorization", Matcher::Regex("^Basic ".into()))
        .match_body(Matcher::Regex(
            r#"\["Mailbox/get",\{"accountId":"u1","ids":null\},"req\d+"\]"#.into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "methodResponses": [[
                    "Mailbox/get",
                    { "list": [{ "id": "a", "name": "Inbox", "role": "inbox" }] },
                    "c0"
                ]]
            })
            .to_string(),
        )
        .create();

    let account_config = AccountConfig::default();
    let jmap_config = JmapConfig {
        url: server.url(),
        login: "alice@localhost".into(),
        passwd_cmd: "echo 'hunter2'".into(),
        timeout: Some(5),
        ..JmapConfig::default()
    };

    let backend = JmapBackendBuilder::new()
        .build(Cow::Borrowed(&account_config), Cow::Borrowed(&jmap_config))
        .unwrap();
    assert_eq!("u1", backend.account_id());

    let folders = backend.list_folders().unwrap();
    assert_eq!("Inbox", folders[0].name);

    session.assert();
    api.assert();
}
