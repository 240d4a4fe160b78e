//! HTTP client for the NFTfi offers API.

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::providers::{Api, SdkFuture};
use serde_json::Value;

/// Header carrying the API key.
const API_KEY_HEADER: &str = "X-API-Key";

/// NFTfi API client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Arguments
    /// * `config` - Base URL (e.g., "https://sdk-api.nftfi.com") and optional API key
    pub fn new(config: ApiConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            client: reqwest::Client::new(),
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, uri: &str) -> String {
        format!("{}/{}", self.base_url, uri.trim_start_matches('/'))
    }

    fn with_api_key(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    // Helper methods

    async fn get_json(&self, uri: &str, params: &[(String, String)]) -> Result<Value> {
        let url = self.url(uri);
        let request = self.with_api_key(self.client.get(&url).query(params));
        self.send("GET", &url, request).await
    }

    async fn post_json(&self, uri: &str, payload: &Value) -> Result<Value> {
        let url = self.url(uri);
        let request = self.with_api_key(self.client.post(&url).json(payload));
        self.send("POST", &url, request).await
    }

    async fn delete_json(&self, uri: &str) -> Result<Value> {
        let url = self.url(uri);
        let request = self.with_api_key(self.client.delete(&url));
        self.send("DELETE", &url, request).await
    }

    async fn send(
        &self,
        method: &str,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Value> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to send request to {}: {}", url, e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Network(format!("Failed to read response: {}", e)))?;

        log::debug!("{} {} response ({}): {}", method, url, status, text);

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text)
            .map_err(|e| Error::Parse(format!("Failed to parse response: {}. Body: {}", e, text)))
    }
}

impl Api for ApiClient {
    fn get<'a>(&'a self, uri: &'a str, params: &'a [(String, String)]) -> SdkFuture<'a, Value> {
        Box::pin(self.get_json(uri, params))
    }

    fn post<'a>(&'a self, uri: &'a str, payload: &'a Value) -> SdkFuture<'a, Value> {
        Box::pin(self.post_json(uri, payload))
    }

    fn delete<'a>(&'a self, uri: &'a str) -> SdkFuture<'a, Value> {
        Box::pin(self.delete_json(uri))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(ApiConfig::new(format!("{}/", server.uri())).with_api_key("test-key"))
    }

    #[tokio::test]
    async fn test_get_sends_query_and_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/offers"))
            .and(query_param("nftAddress", "0xabc"))
            .and(header("X-API-Key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let params = vec![("nftAddress".to_string(), "0xabc".to_string())];
        let response = Api::get(&client, "offers", &params).await.unwrap();

        assert_eq!(response, json!({ "results": [] }));
    }

    #[tokio::test]
    async fn test_post_sends_json_payload() {
        let server = MockServer::start().await;
        let payload = json!({ "nftfi": { "contract": { "name": "v2-1.loan.fixed" } } });
        Mock::given(method("POST"))
            .and(path("/offers"))
            .and(body_json(payload.clone()))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "result": { "id": "1" } })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = Api::post(&client, "/offers", &payload).await.unwrap();

        assert_eq!(response["result"]["id"], json!("1"));
    }

    #[tokio::test]
    async fn test_delete_with_empty_body_returns_null() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/offers/abc"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = Api::delete(&client, "offers/abc").await.unwrap();

        assert_eq!(response, Value::Null);
    }

    #[tokio::test]
    async fn test_error_status_is_reported_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/offers"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = Api::get(&client, "offers", &[]).await.unwrap_err();

        match err {
            Error::Api { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_unparseable_body_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/offers"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = Api::get(&client, "offers", &[]).await.unwrap_err();

        assert!(matches!(err, Error::Parse(_)));
    }
}
