//! HTTP client wrapper for the Pentaho REST API

use crate::config::Config;
use crate::error::{CliError, CliResult};
use crate::logging::Logger;
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub(crate) const FORBIDDEN_MESSAGE: &str =
    "Only users with administrative privileges can access this method";

/// Client for the Pentaho server, authenticated with HTTP basic auth
pub struct PentahoClient {
    client: Client,
    config: Config,
    logger: Arc<Logger>,
}

/// Status and body of a completed request
pub(crate) struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn json<T: DeserializeOwned>(&self) -> CliResult<T> {
        if self.body.trim().is_empty() {
            return serde_json::from_str("{}").map_err(Into::into);
        }
        serde_json::from_str(&self.body)
            .map_err(|e| CliError::Network(format!("Unexpected response from server: {e}")))
    }
}

/// Request body variants used by the endpoints
pub(crate) enum RequestBody<'a> {
    Empty,
    Json(String),
    Text(&'a str),
}

impl<'a> RequestBody<'a> {
    pub fn json<T: Serialize>(value: &T) -> CliResult<Self> {
        Ok(Self::Json(serde_json::to_string(value)?))
    }
}

impl PentahoClient {
    /// Create a new API client
    pub fn new(config: Config, logger: Arc<Logger>) -> CliResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CliError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            logger,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> CliResult<Url> {
        let endpoint = self.config.endpoint(path);
        let parsed = if query.is_empty() {
            Url::parse(&endpoint)
        } else {
            Url::parse_with_params(&endpoint, query)
        };
        parsed.map_err(|e| CliError::Config(format!("Invalid server URL '{endpoint}': {e}")))
    }

    /// Send an authenticated request and read the whole response body
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: RequestBody<'_>,
    ) -> CliResult<ApiResponse> {
        let url = self.url(path, query)?;
        let method_name = method.to_string();
        let url_text = url.to_string();

        let mut request = self
            .client
            .request(method, url)
            .basic_auth(&self.config.user, Some(&self.config.password))
            .header(reqwest::header::ACCEPT, "application/json");

        match body {
            RequestBody::Empty => {}
            RequestBody::Json(json) => {
                self.logger.trace_request_body(&method_name, &url_text, &json);
                request = request
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .body(json);
            }
            RequestBody::Text(text) => {
                self.logger.trace_request_body(&method_name, &url_text, text);
                request = request
                    .header(reqwest::header::CONTENT_TYPE, "text/plain")
                    .body(text.to_string());
            }
        }

        self.logger.debug_request(&method_name, &url_text);
        let started = Instant::now();
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        let elapsed = started.elapsed().as_millis() as u64;

        self.logger.debug_response(status.as_u16(), elapsed);
        self.logger
            .trace_response_body(status.as_u16(), elapsed, &body);

        Ok(ApiResponse { status, body })
    }

    pub(crate) async fn get(&self, path: &str, query: &[(&str, &str)]) -> CliResult<ApiResponse> {
        let response = self
            .send(Method::GET, path, query, RequestBody::Empty)
            .await?;
        check_status(response, &[])
    }

    pub(crate) async fn put(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: RequestBody<'_>,
        messages: &[(u16, &str)],
    ) -> CliResult<ApiResponse> {
        let response = self.send(Method::PUT, path, query, body).await?;
        check_status(response, messages)
    }
}

/// Map a non-2xx response to an error, preferring the endpoint's own message
pub(crate) fn check_status(
    response: ApiResponse,
    messages: &[(u16, &str)],
) -> CliResult<ApiResponse> {
    if response.status.is_success() {
        return Ok(response);
    }

    let status = response.status.as_u16();
    let message = messages
        .iter()
        .find(|(code, _)| *code == status)
        .map(|(_, message)| message.to_string())
        .or_else(|| match status {
            401 => Some("Authentication failed".to_string()),
            403 => Some(FORBIDDEN_MESSAGE.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| {
            let body = response.body.trim();
            if body.is_empty() {
                format!("Unknown error. statusCode={status}")
            } else {
                body.to_string()
            }
        });

    Err(CliError::Api { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> ApiResponse {
        ApiResponse {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_check_status_success() {
        assert!(check_status(response(200, ""), &[]).is_ok());
    }

    #[test]
    fn test_check_status_endpoint_message() {
        let err = check_status(response(412, ""), &[(412, "Unable to create user")])
            .err()
            .unwrap();
        assert!(matches!(
            err,
            CliError::Api { status: 412, ref message } if message == "Unable to create user"
        ));
    }

    #[test]
    fn test_check_status_forbidden_default() {
        let err = check_status(response(403, "<html/>"), &[]).err().unwrap();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("administrative privileges"));
    }

    #[test]
    fn test_check_status_falls_back_to_body() {
        let err = check_status(response(500, "boom"), &[]).err().unwrap();
        assert!(err.to_string().contains("boom"));
        let err = check_status(response(418, ""), &[]).err().unwrap();
        assert!(err.to_string().contains("statusCode=418"));
    }

    #[test]
    fn test_empty_body_parses_as_empty_object() {
        let list: crate::api::UserList = response(200, "").json().unwrap();
        assert!(list.users.is_empty());
    }

    #[test]
    fn test_url_encodes_query() {
        let client = PentahoClient::new(Config::default(), Arc::new(Logger::disabled())).unwrap();
        let url = client
            .url("api/userroledao/deleteUsers", &[("userNames", "a\tb\t")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/pentaho/api/userroledao/deleteUsers?userNames=a%09b%09"
        );
    }
}
