use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::config::GatewayConfig;
use crate::model::GameObject;

pub const RESOURCE: &str = "game-objects";
pub const SEARCH_RESOURCE: &str = "_search/game-objects";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid service url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("Request failed with status code {}", status.as_u16())]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("game object has no id")]
    MissingId,
}

impl ClientError {
    /// Problem `detail` (or `title`) the service sent with a failed status.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ClientError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// Status plus decoded body of a successful call.
#[derive(Debug, Clone)]
pub struct ServiceResponse<T> {
    pub status: StatusCode,
    pub data: T,
}

/// Thin wrapper around the game service's `game-objects` endpoints.
#[derive(Clone, Debug)]
pub struct GameObjectClient {
    http: reqwest::Client,
    api_root: Url,
    token: Option<String>,
}

impl GameObjectClient {
    pub fn new(config: &GatewayConfig) -> Result<Self, ClientError> {
        Self::with_http(reqwest::Client::new(), config)
    }

    pub fn with_http(http: reqwest::Client, config: &GatewayConfig) -> Result<Self, ClientError> {
        let invalid = |reason: String| ClientError::InvalidUrl {
            url: config.service_url.clone(),
            reason,
        };
        let mut base = Url::parse(&config.service_url).map_err(|e| invalid(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("not a base url".to_string()));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let api_path = format!("{}/", config.api_path.trim_matches('/'));
        let api_root = base.join(&api_path).map_err(|e| invalid(e.to_string()))?;
        Ok(Self {
            http,
            api_root,
            token: config.api_token.clone(),
        })
    }

    pub fn resource_url(&self) -> Url {
        self.endpoint(RESOURCE)
    }

    pub fn search_url(&self) -> Url {
        self.endpoint(SEARCH_RESOURCE)
    }

    pub fn entity_url(&self, id: i64) -> Url {
        self.endpoint(&format!("{RESOURCE}/{id}"))
    }

    fn endpoint(&self, relative: &str) -> Url {
        let mut url = self.api_root.clone();
        let path = format!("{}{}", self.api_root.path(), relative);
        url.set_path(&path);
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match self.token.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn list(&self) -> Result<ServiceResponse<Vec<GameObject>>, ClientError> {
        let cache_buster = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        tracing::debug!("GET {} (cacheBuster={cache_buster})", self.resource_url());
        let req = self
            .request(Method::GET, self.resource_url())
            .query(&[("cacheBuster", cache_buster.to_string())]);
        send_json(req).await
    }

    pub async fn search(&self, query: &str) -> Result<ServiceResponse<Vec<GameObject>>, ClientError> {
        tracing::debug!("GET {} query={query:?}", self.search_url());
        let req = self
            .request(Method::GET, self.search_url())
            .query(&[("query", query)]);
        send_json(req).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<ServiceResponse<GameObject>, ClientError> {
        tracing::debug!("GET {}", self.entity_url(id));
        send_json(self.request(Method::GET, self.entity_url(id))).await
    }

    pub async fn create(&self, record: &GameObject) -> Result<ServiceResponse<GameObject>, ClientError> {
        tracing::debug!("POST {}", self.resource_url());
        send_json(self.request(Method::POST, self.resource_url()).json(record)).await
    }

    pub async fn update(&self, record: &GameObject) -> Result<ServiceResponse<GameObject>, ClientError> {
        let id = record.id.ok_or(ClientError::MissingId)?;
        tracing::debug!("PUT {}", self.entity_url(id));
        send_json(self.request(Method::PUT, self.entity_url(id)).json(record)).await
    }

    pub async fn partial_update(
        &self,
        record: &GameObject,
    ) -> Result<ServiceResponse<GameObject>, ClientError> {
        let id = record.id.ok_or(ClientError::MissingId)?;
        tracing::debug!("PATCH {}", self.entity_url(id));
        let req = self
            .request(Method::PATCH, self.entity_url(id))
            .header(reqwest::header::CONTENT_TYPE, "application/merge-patch+json")
            .body(serde_json::to_vec(record)?);
        send_json(req).await
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<ServiceResponse<()>, ClientError> {
        tracing::debug!("DELETE {}", self.entity_url(id));
        let res = checked(self.request(Method::DELETE, self.entity_url(id)).send().await?).await?;
        Ok(ServiceResponse {
            status: res.status(),
            data: (),
        })
    }
}

async fn send_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<ServiceResponse<T>, ClientError> {
    let res = checked(req.send().await?).await?;
    let status = res.status();
    let bytes = res.bytes().await?;
    let data = serde_json::from_slice(&bytes)?;
    Ok(ServiceResponse { status, data })
}

/// Non-2xx responses become `ClientError::Status`, keeping the problem detail if any.
async fn checked(res: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            v.get("detail")
                .or_else(|| v.get("title"))
                .and_then(|d| d.as_str())
                .map(str::to_string)
        });
    Err(ClientError::Status { status, detail })
}
