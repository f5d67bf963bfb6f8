//! Spotify Web API client implementation.

use std::sync::Arc;

use reqwest::{Method, Response, StatusCode};
use reqwest_middleware::{ClientWithMiddleware, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::auth::Session;
use crate::error::{ClientError, Result};

/// Error envelope returned by the Web API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

/// Follower summary of a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Followers {
    pub total: u64,
}

/// Profile of the current user (`GET /me`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub followers: Option<Followers>,
}

/// Client for the main API, running on the authorized transport.
#[derive(Clone)]
pub struct SpotifyApi {
    client: ClientWithMiddleware,
    base_url: Url,
    session: Arc<Session>,
}

impl SpotifyApi {
    /// Create an API client over a main transport.
    #[must_use]
    pub fn new(client: ClientWithMiddleware, base_url: Url, session: Arc<Session>) -> Self {
        Self {
            client,
            base_url,
            session,
        }
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `path` against the base URL.
    ///
    /// A leading `/` is ignored so `/me` and `me` both land under the versioned base.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Start a request to `path`.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        Ok(self.client.request(method, self.endpoint(path)?))
    }

    /// Send a request and map error responses.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            // The authenticator clears the session when the refresh exchange is rejected.
            return Err(if self.session.is_authenticated().await {
                ClientError::Unauthorized
            } else {
                ClientError::ReauthenticationRequired
            });
        }

        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(ClientError::ApiUnavailable);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.error.message)
            .ok()
            .filter(|m| !m.is_empty())
            .or_else(|| (!body.is_empty()).then_some(body))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// `GET` a JSON resource.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(self.request(Method::GET, path)?).await?;
        response
            .json()
            .await
            .map_err(|e| ClientError::Serialization(e.to_string()))
    }

    /// Send a JSON body and decode a JSON response.
    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(method, path)?.json(body);
        let response = self.send(builder).await?;
        response
            .json()
            .await
            .map_err(|e| ClientError::Serialization(e.to_string()))
    }

    /// Profile of the authenticated user.
    pub async fn current_user(&self) -> Result<UserProfile> {
        self.get_json("me").await
    }
}
