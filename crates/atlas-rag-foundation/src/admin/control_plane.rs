//! Atlas Admin API client for cluster lifecycle operations
//!
//! Requests are authenticated with HTTP Digest using the programmatic API
//! key pair: the first attempt goes out bare, a 401 challenge is answered
//! once with an `Authorization` header.

use async_trait::async_trait;
use atlas_rag_kernel::admin::{ClusterControl, ClusterStatus};
use atlas_rag_kernel::config::{ControlPlaneConfig, RagConfig};
use atlas_rag_kernel::error::{RagError, RagResult, ServiceKind};
use digest_auth::{AuthContext, HttpMethod};
use reqwest::header::{ACCEPT, AUTHORIZATION, WWW_AUTHENTICATE};
use reqwest::{Method, StatusCode};
use std::time::Duration;
use tracing::debug;

const SERVICE: ServiceKind = ServiceKind::ControlPlane;

/// Client for one cluster of one Atlas project.
pub struct AtlasControlPlane {
    client: reqwest::Client,
    cluster_url: String,
    cluster_name: String,
    public_key: Option<String>,
    private_key: Option<String>,
}

impl AtlasControlPlane {
    /// Client for the cluster named in `config`, with the shared HTTP
    /// timeout.
    pub fn from_config(config: &RagConfig) -> RagResult<Self> {
        Self::new(
            &config.control_plane,
            Duration::from_secs(config.models.timeout_secs),
        )
    }

    /// Fails with a configuration error when the project id or cluster
    /// name is missing. Missing keys are reported per call instead.
    pub fn new(config: &ControlPlaneConfig, timeout: Duration) -> RagResult<Self> {
        let (Some(project_id), Some(cluster_name)) = (&config.project_id, &config.cluster_name)
        else {
            return Err(RagError::config(
                "Missing ATLAS_PROJECT_ID or ATLAS_CLUSTER_NAME",
            ));
        };

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RagError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            cluster_url: format!(
                "{}/groups/{}/clusters/{}",
                config.base_url.trim_end_matches('/'),
                project_id,
                cluster_name
            ),
            cluster_name: cluster_name.clone(),
            public_key: config.public_key.clone(),
            private_key: config.private_key.clone(),
        })
    }

    pub fn cluster_url(&self) -> &str {
        &self.cluster_url
    }

    fn credentials(&self) -> RagResult<(&str, &str)> {
        match (&self.public_key, &self.private_key) {
            (Some(public), Some(private)) => Ok((public, private)),
            _ => Err(RagError::config(
                "Missing ATLAS_PUBLIC_KEY or ATLAS_PRIVATE_KEY",
            )),
        }
    }

    fn request(&self, method: &Method, body: Option<&serde_json::Value>) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(method.clone(), &self.cluster_url)
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            builder = builder.json(body);
        }
        builder
    }

    fn authorization(
        &self,
        challenge: &str,
        method: &Method,
        body: Option<&[u8]>,
    ) -> RagResult<String> {
        let (public, private) = self.credentials()?;
        let url = reqwest::Url::parse(&self.cluster_url)
            .map_err(|e| RagError::config(format!("invalid Atlas API URL: {e}")))?;
        let uri = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };

        let mut prompt = digest_auth::parse(challenge)
            .map_err(|e| RagError::malformed(SERVICE, format!("bad digest challenge: {e}")))?;
        let context = AuthContext::new_with_method(
            public,
            private,
            uri,
            body,
            HttpMethod::from(method.as_str()),
        );
        let answer = prompt
            .respond(&context)
            .map_err(|e| RagError::malformed(SERVICE, format!("digest response failed: {e}")))?;
        Ok(answer.to_header_string())
    }

    /// Send a request, answering a digest challenge if one comes back.
    /// Returns the final status and body text.
    async fn send(
        &self,
        method: Method,
        body: Option<serde_json::Value>,
    ) -> RagResult<(StatusCode, String)> {
        self.credentials()?;
        let body_bytes = body.as_ref().map(serde_json::to_vec).transpose()?;

        debug!("{} {}", method, self.cluster_url);
        let first = self
            .request(&method, body.as_ref())
            .send()
            .await
            .map_err(|e| RagError::transport(SERVICE, e.to_string()))?;

        let resp = if first.status() == StatusCode::UNAUTHORIZED {
            let challenge = first
                .headers()
                .get(WWW_AUTHENTICATE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
                .ok_or_else(|| {
                    RagError::malformed(SERVICE, "401 without a WWW-Authenticate challenge")
                })?;
            let header = self.authorization(&challenge, &method, body_bytes.as_deref())?;

            self.request(&method, body.as_ref())
                .header(AUTHORIZATION, header)
                .send()
                .await
                .map_err(|e| RagError::transport(SERVICE, e.to_string()))?
        } else {
            first
        };

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| RagError::transport(SERVICE, e.to_string()))?;
        Ok((status, text))
    }

    fn expect(status: StatusCode, expected: StatusCode, body: String) -> RagResult<String> {
        if status == expected {
            Ok(body)
        } else {
            Err(RagError::ControlPlane {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl ClusterControl for AtlasControlPlane {
    fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    async fn status(&self) -> RagResult<ClusterStatus> {
        let (status, body) = self.send(Method::GET, None).await?;
        let body = Self::expect(status, StatusCode::OK, body)?;
        serde_json::from_str(&body).map_err(|e| RagError::malformed(SERVICE, e.to_string()))
    }

    async fn set_paused(&self, paused: bool) -> RagResult<()> {
        let (status, body) = self
            .send(Method::PATCH, Some(serde_json::json!({ "paused": paused })))
            .await?;
        Self::expect(status, StatusCode::OK, body).map(|_| ())
    }

    async fn terminate(&self) -> RagResult<()> {
        let (status, body) = self.send(Method::DELETE, None).await?;
        Self::expect(status, StatusCode::ACCEPTED, body).map(|_| ())
    }
}
