// REST client for the API gateway
use crate::application::error::{DashboardError, Result};
use crate::application::gateway::RemoteGateway;
use crate::domain::collection::{Collection, EntityId};
use crate::domain::entity::Entity;
use crate::domain::form::Fields;
use crate::infrastructure::config::GatewaySettings;
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpGateway {
    base_url: String,
    client: reqwest::Client,
}

/// Error body of the backing services: `{"error": ...}` or `{"message": ...}`.
/// Framework default bodies carry both, with the status phrase in `error`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

fn transport(e: reqwest::Error) -> DashboardError {
    if e.is_timeout() {
        DashboardError::TransportFailed(format!("request timed out: {}", e))
    } else {
        DashboardError::TransportFailed(e.to_string())
    }
}

fn rejection(collection: Collection, id: Option<EntityId>, status: StatusCode, body: &str) -> DashboardError {
    if status == StatusCode::NOT_FOUND {
        if let Some(id) = id {
            return DashboardError::NotFound { collection, id };
        }
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| {
            let non_empty = |m: Option<String>| m.filter(|m| !m.trim().is_empty());
            non_empty(b.message).or(non_empty(b.error))
        })
        .unwrap_or_else(|| format!("request failed with status {}", status));

    DashboardError::RemoteRejected {
        status: status.as_u16(),
        message,
    }
}

impl HttpGateway {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(transport)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_settings(settings: &GatewaySettings) -> Result<Self> {
        Self::new(&settings.base_url, settings.timeout())
    }

    fn collection_url(&self, collection: Collection) -> String {
        format!("{}/{}", self.base_url, collection.path())
    }

    fn item_url(&self, collection: Collection, id: EntityId) -> String {
        format!("{}/{}", self.collection_url(collection), id)
    }

    async fn execute(
        &self,
        collection: Collection,
        id: Option<EntityId>,
        request: RequestBuilder,
    ) -> Result<Response> {
        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(transport)?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let err = rejection(collection, id, status, &body);
        tracing::warn!(%collection, %status, error = %err, "gateway rejected request");
        Err(err)
    }

    async fn decode_one(collection: Collection, response: Response) -> Result<Entity> {
        let value: Value = response
            .json()
            .await
            .map_err(|e| DashboardError::InvalidPayload(e.to_string()))?;
        Entity::decode(collection, value).map_err(|e| DashboardError::InvalidPayload(e.to_string()))
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn list(&self, collection: Collection) -> Result<Vec<Entity>> {
        let url = self.collection_url(collection);
        tracing::debug!(%url, "listing");
        let response = self.execute(collection, None, self.client.get(&url)).await?;

        let values: Vec<Value> = response
            .json()
            .await
            .map_err(|e| DashboardError::InvalidPayload(e.to_string()))?;

        values
            .into_iter()
            .map(|v| Entity::decode(collection, v).map_err(|e| DashboardError::InvalidPayload(e.to_string())))
            .collect()
    }

    async fn create(&self, collection: Collection, fields: &Fields) -> Result<Entity> {
        let url = self.collection_url(collection);
        tracing::debug!(%url, "creating");
        let response = self
            .execute(collection, None, self.client.post(&url).json(fields))
            .await?;
        Self::decode_one(collection, response).await
    }

    async fn update(&self, collection: Collection, id: EntityId, fields: &Fields) -> Result<Entity> {
        let url = self.item_url(collection, id);
        tracing::debug!(%url, "updating");
        let response = self
            .execute(collection, Some(id), self.client.put(&url).json(fields))
            .await?;
        Self::decode_one(collection, response).await
    }

    async fn delete(&self, collection: Collection, id: EntityId) -> Result<()> {
        let url = self.item_url(collection, id);
        tracing::debug!(%url, "deleting");
        self.execute(collection, Some(id), self.client.delete(&url))
            .await?;
        Ok(())
    }
}
