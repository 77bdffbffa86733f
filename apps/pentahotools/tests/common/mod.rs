//! Shared fixtures for integration tests

#![allow(dead_code)]

use pentahotools::api::PentahoClient;
use pentahotools::config::Config;
use pentahotools::logging::Logger;
use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Web application root on the mock server
pub const CONTEXT: &str = "/pentaho";

/// Mock Pentaho server with a client pointed at it
pub struct TestContext {
    pub server: MockServer,
}

impl TestContext {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn base_url(&self) -> String {
        format!("{}{}", self.server.uri(), CONTEXT)
    }

    pub fn config(&self) -> Config {
        Config {
            url: self.base_url(),
            user: "admin".to_string(),
            password: "password".to_string(),
            timeout_secs: 5,
        }
    }

    pub fn client(&self) -> PentahoClient {
        PentahoClient::new(self.config(), Arc::new(Logger::disabled()))
            .expect("Failed to create client")
    }

    pub async fn mock_users(&self, users: &[&str]) {
        Mock::given(method("GET"))
            .and(path(endpoint("api/userrolelist/users")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "users": users })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_all_roles(&self, roles: &[&str]) {
        Mock::given(method("GET"))
            .and(path(endpoint("api/userrolelist/allRoles")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "roles": roles })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_roles_for_user(&self, user: &str, roles: &[&str]) {
        Mock::given(method("GET"))
            .and(path(endpoint("api/userrolelist/getRolesForUser")))
            .and(query_param("user", user))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "roles": roles })))
            .mount(&self.server)
            .await;
    }

    /// Accept a PUT to a `userroledao` endpoint exactly `times` times
    pub async fn expect_put(&self, operation: &str, times: u64) {
        Mock::given(method("PUT"))
            .and(path(endpoint(&format!("api/userroledao/{operation}"))))
            .respond_with(ResponseTemplate::new(200))
            .expect(times)
            .named(operation)
            .mount(&self.server)
            .await;
    }
}

/// Absolute request path of an API endpoint
pub fn endpoint(api_path: &str) -> String {
    format!("{CONTEXT}/{api_path}")
}

/// Temporary users file with the given extension
pub fn users_file(extension: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(&format!(".{extension}"))
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temp file");
    file.flush().expect("Failed to flush temp file");
    file
}
