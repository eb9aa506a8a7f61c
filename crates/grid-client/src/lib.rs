//! grid-client — HTTP client for the platform API.
//!
//! | Method | Path | Returns |
//! |---|---|---|
//! | GET | `/v4/info/` | [`InstallationInfo`] |
//! | POST | `/v4/auth-tokens/` | new token |
//! | DELETE | `/v4/auth-tokens/` | nothing |
//! | GET | `/v4/clusters/` | [`ClusterListItem`] list |
//! | GET | `/v4/clusters/{id}/` | [`ClusterDetails`] |
//! | GET | `/v4/clusters/{id}/status/` | [`ClusterStatus`] |
//! | PATCH | `/v4/clusters/{id}/` | [`ClusterDetails`] |
//! | DELETE | `/v4/clusters/{id}/` | nothing |
//!
//! Requests carry `Authorization: <scheme> <token>` once a token is known, a `User-Agent`,
//! an `X-Request-ID` shared by all requests of one client, and
//! `X-Activity-Name` when an activity is set.

pub mod error;

use std::time::Duration;

use base64::Engine;
use grid_core::{
    AuthTokenRequest, AuthTokenResponse, ClusterDetails, ClusterListItem, ClusterStatus,
    InstallationInfo, ModifyClusterRequest,
};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

pub use error::{ClientError, ClientResult};

pub const REQUEST_ID_HEADER: &str = "X-Request-ID";
pub const ACTIVITY_HEADER: &str = "X-Activity-Name";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub scheme: String,
    pub token: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(endpoint: &str, scheme: &str, token: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            scheme: scheme.to_string(),
            token: token.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("gridctl/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Error payload returned by the API.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

pub struct GridClient {
    http: reqwest::Client,
    base: Url,
    authorization: Option<String>,
    request_id: String,
    activity: Option<String>,
}

impl GridClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let invalid = |reason: String| ClientError::InvalidEndpoint {
            endpoint: config.endpoint.clone(),
            reason,
        };

        let mut base = Url::parse(&config.endpoint).map_err(|e| invalid(e.to_string()))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(invalid("not an http(s) URL".to_string()));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()?;

        Ok(Self {
            http,
            base,
            authorization: (!config.token.is_empty())
                .then(|| format!("{} {}", config.scheme, config.token)),
            request_id: uuid::Uuid::new_v4().to_string(),
            activity: None,
        })
    }

    /// Tag subsequent requests with an activity name.
    pub fn with_activity(mut self, activity: &str) -> Self {
        self.activity = Some(activity.to_string());
        self
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub async fn get_info(&self) -> ClientResult<InstallationInfo> {
        let url = self.url(&["v4", "info"]);
        self.send(self.request(Method::GET, url), "installation info").await
    }

    /// Exchange email and password for a token of the default scheme.
    pub async fn create_auth_token(&self, email: &str, password: &str) -> ClientResult<String> {
        let url = self.url(&["v4", "auth-tokens"]);
        let body = AuthTokenRequest {
            email: email.to_string(),
            password_base64: base64::engine::general_purpose::STANDARD.encode(password),
        };
        let response: AuthTokenResponse = self
            .send(self.request(Method::POST, url).json(&body), "auth token")
            .await?;
        Ok(response.auth_token)
    }

    /// Invalidate the token this client authenticates with.
    pub async fn delete_auth_token(&self) -> ClientResult<()> {
        let url = self.url(&["v4", "auth-tokens"]);
        self.check(self.request(Method::DELETE, url), "auth token")
            .await
            .map(drop)
    }

    pub async fn list_clusters(&self) -> ClientResult<Vec<ClusterListItem>> {
        let url = self.url(&["v4", "clusters"]);
        self.send(self.request(Method::GET, url), "clusters").await
    }

    pub async fn get_cluster(&self, cluster_id: &str) -> ClientResult<ClusterDetails> {
        let url = self.url(&["v4", "clusters", cluster_id]);
        self.send(self.request(Method::GET, url), &format!("cluster {cluster_id}"))
            .await
    }

    pub async fn get_cluster_status(&self, cluster_id: &str) -> ClientResult<ClusterStatus> {
        let url = self.url(&["v4", "clusters", cluster_id, "status"]);
        self.send(
            self.request(Method::GET, url),
            &format!("status of cluster {cluster_id}"),
        )
        .await
    }

    /// Submit a modification and return the updated cluster details.
    pub async fn modify_cluster(
        &self,
        cluster_id: &str,
        body: &ModifyClusterRequest,
    ) -> ClientResult<ClusterDetails> {
        let url = self.url(&["v4", "clusters", cluster_id]);
        self.send(
            self.request(Method::PATCH, url).json(body),
            &format!("cluster {cluster_id}"),
        )
        .await
    }

    /// Request deletion of a cluster. The API answers before the cluster is gone.
    pub async fn delete_cluster(&self, cluster_id: &str) -> ClientResult<()> {
        let url = self.url(&["v4", "clusters", cluster_id]);
        self.check(
            self.request(Method::DELETE, url),
            &format!("cluster {cluster_id}"),
        )
        .await
        .map(drop)
    }

    /// Base URL plus `segments`, each percent-encoded, with a trailing slash.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments).push("");
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, request_id = %self.request_id, "api request");

        let mut builder = self
            .http
            .request(method, url)
            .header(REQUEST_ID_HEADER, &self.request_id);

        if let Some(authorization) = &self.authorization {
            builder = builder.header(reqwest::header::AUTHORIZATION, authorization);
        }
        if let Some(activity) = &self.activity {
            builder = builder.header(ACTIVITY_HEADER, activity);
        }
        builder
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder, what: &str) -> ClientResult<T> {
        let response = self.check(builder, what).await?;
        Ok(response.json::<T>().await?)
    }

    /// Send and map non-success statuses onto [`ClientError`].
    async fn check(&self, builder: RequestBuilder, what: &str) -> ClientResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), "api response");

        match status {
            s if s.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ClientError::Unauthorized),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(what.to_string())),
            _ => {
                let text = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ErrorBody>(&text)
                    .map(|body| body.message)
                    .ok()
                    .filter(|m| !m.is_empty())
                    .unwrap_or(text);
                Err(ClientError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}
