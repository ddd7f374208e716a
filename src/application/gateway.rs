// Port to the remote API gateway
use crate::application::error::Result;
use crate::domain::collection::{Collection, EntityId};
use crate::domain::entity::Entity;
use crate::domain::form::Fields;
use async_trait::async_trait;

/// CRUD calls against one collection of the gateway. Nothing is retried.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Full listing of a collection
    async fn list(&self, collection: Collection) -> Result<Vec<Entity>>;

    /// Create and return the persisted entity with its server-assigned id
    async fn create(&self, collection: Collection, fields: &Fields) -> Result<Entity>;

    async fn update(&self, collection: Collection, id: EntityId, fields: &Fields) -> Result<Entity>;

    async fn delete(&self, collection: Collection, id: EntityId) -> Result<()>;
}
