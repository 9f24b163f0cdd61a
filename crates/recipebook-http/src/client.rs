//! JSON-over-HTTP client for the recipe book service.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use recipebook_core::error::{Error, InvalidInputError, ProtocolError, TransportError};
use recipebook_core::{AccessToken, Result, ServiceUrl};

use crate::endpoints::ApiErrorResponse;

/// Convert a reqwest failure into the unified error type.
pub(crate) fn map_reqwest(err: reqwest::Error) -> Error {
    let transport = if err.is_timeout() {
        TransportError::Timeout { duration_ms: 0 }
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(transport)
}

/// HTTP client bound to one service root.
#[derive(Debug, Clone)]
pub(crate) struct ApiClient {
    client: reqwest::Client,
    service: ServiceUrl,
}

impl ApiClient {
    /// Create a new client for the given service.
    pub(crate) fn new(service: ServiceUrl) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("recipebook/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(map_reqwest)?;

        Ok(Self { client, service })
    }

    /// Returns the service URL this client is configured for.
    pub(crate) fn service(&self) -> &ServiceUrl {
        &self.service
    }

    /// Unauthenticated POST with a JSON body.
    #[instrument(skip(self, body), fields(service = %self.service))]
    pub(crate) async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.service.endpoint(path);
        debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest)?;

        self.handle_response(response).await
    }

    /// Authenticated GET with query parameters.
    #[instrument(skip(self, token), fields(service = %self.service))]
    pub(crate) async fn get_authed<Q, R>(
        &self,
        path: &str,
        query: Option<&Q>,
        token: &AccessToken,
    ) -> Result<R>
    where
        Q: Serialize + std::fmt::Debug,
        R: DeserializeOwned,
    {
        let url = self.service.endpoint(path);
        debug!(%url, "authenticated GET");
        trace!(?query, "query parameters");

        let mut request = self.client.get(&url).headers(self.auth_headers(token)?);
        if let Some(query) = query {
            request = request.query(query);
        }

        let response = request.send().await.map_err(map_reqwest)?;

        self.handle_response(response).await
    }

    /// Authenticated POST with a JSON body.
    #[instrument(skip(self, body, token), fields(service = %self.service))]
    pub(crate) async fn post_authed<B, R>(
        &self,
        path: &str,
        body: &B,
        token: &AccessToken,
    ) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.service.endpoint(path);
        debug!(%url, "authenticated POST");

        let response = self
            .client
            .post(&url)
            .json(body)
            .headers(self.auth_headers(token)?)
            .send()
            .await
            .map_err(map_reqwest)?;

        self.handle_response(response).await
    }

    /// Authenticated PUT with a JSON body.
    #[instrument(skip(self, body, token), fields(service = %self.service))]
    pub(crate) async fn put_authed<B, R>(
        &self,
        path: &str,
        body: &B,
        token: &AccessToken,
    ) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.service.endpoint(path);
        debug!(%url, "authenticated PUT");

        let response = self
            .client
            .put(&url)
            .json(body)
            .headers(self.auth_headers(token)?)
            .send()
            .await
            .map_err(map_reqwest)?;

        self.handle_response(response).await
    }

    /// Authenticated DELETE that returns no content.
    #[instrument(skip(self, token), fields(service = %self.service))]
    pub(crate) async fn delete_authed(&self, path: &str, token: &AccessToken) -> Result<()> {
        let url = self.service.endpoint(path);
        debug!(%url, "authenticated DELETE");

        let response = self
            .client
            .delete(&url)
            .headers(self.auth_headers(token)?)
            .send()
            .await
            .map_err(map_reqwest)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Error::Protocol(self.parse_error_response(response).await))
        }
    }

    /// Create authorization headers for authenticated requests.
    fn auth_headers(&self, token: &AccessToken) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&format!("Bearer {}", token.as_str())).map_err(|_| {
            InvalidInputError::Other {
                message: "access token contains invalid header characters".to_string(),
            }
        })?;
        headers.insert(AUTHORIZATION, value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Handle a response, parsing the body or error.
    async fn handle_response<R: DeserializeOwned>(&self, response: reqwest::Response) -> Result<R> {
        let status = response.status();
        trace!(status = %status, "response");

        if status.is_success() {
            response.json::<R>().await.map_err(map_reqwest)
        } else {
            Err(Error::Protocol(self.parse_error_response(response).await))
        }
    }

    /// Parse the service's error body, tolerating anything that is not JSON.
    async fn parse_error_response(&self, response: reqwest::Response) -> ProtocolError {
        let status = response.status().as_u16();

        match response.json::<ApiErrorResponse>().await {
            Ok(body) => {
                let details = body.field_messages();
                ProtocolError::new(status, body.message).with_details(details)
            }
            Err(_) => ProtocolError::new(status, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let service = ServiceUrl::new("http://localhost:8080").unwrap();
        let client = ApiClient::new(service.clone()).unwrap();
        assert_eq!(client.service().as_str(), service.as_str());
    }

    #[test]
    fn auth_header_rejects_newlines() {
        let service = ServiceUrl::new("http://localhost:8080").unwrap();
        let client = ApiClient::new(service).unwrap();
        assert!(client.auth_headers(&AccessToken::new("bad\ntoken")).is_err());
        assert!(client.auth_headers(&AccessToken::new("good-token")).is_ok());
    }
}
