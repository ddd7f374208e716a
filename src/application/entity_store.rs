// In-memory cache of the last listing of each collection
use crate::application::error::Result;
use crate::application::gateway::RemoteGateway;
use crate::domain::collection::{Collection, EntityId};
use crate::domain::energy::{ConsumptionRecord, Pump};
use crate::domain::entity::Entity;
use crate::domain::water::{FlowRecord, Reservoir};
use std::collections::{HashMap, HashSet};

/// Handle for one outstanding reload. Only the newest ticket of a collection
/// may replace its cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadTicket {
    pub collection: Collection,
    generation: u64,
}

#[derive(Debug, Default)]
struct CollectionCache {
    entities: Vec<Entity>,
    issued: u64,
    settled: u64,
}

#[derive(Debug, Default)]
pub struct EntityStore {
    caches: HashMap<Collection, CollectionCache>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached entities; empty until the first successful reload.
    pub fn get(&self, collection: Collection) -> &[Entity] {
        self.caches
            .get(&collection)
            .map(|c| c.entities.as_slice())
            .unwrap_or_default()
    }

    pub fn find(&self, collection: Collection, id: EntityId) -> Option<&Entity> {
        self.get(collection).iter().find(|e| e.id() == id)
    }

    pub fn pumps(&self) -> impl Iterator<Item = &Pump> {
        self.get(Collection::Pumps).iter().filter_map(Entity::as_pump)
    }

    pub fn consumptions(&self) -> impl Iterator<Item = &ConsumptionRecord> {
        self.get(Collection::Consumptions)
            .iter()
            .filter_map(Entity::as_consumption)
    }

    pub fn reservoirs(&self) -> impl Iterator<Item = &Reservoir> {
        self.get(Collection::Reservoirs)
            .iter()
            .filter_map(Entity::as_reservoir)
    }

    pub fn flow_records(&self) -> impl Iterator<Item = &FlowRecord> {
        self.get(Collection::FlowRecords).iter().filter_map(Entity::as_flow)
    }

    pub fn pump_ids(&self) -> HashSet<EntityId> {
        self.pumps().map(|p| p.id).collect()
    }

    pub fn is_reloading(&self, collection: Collection) -> bool {
        self.caches
            .get(&collection)
            .is_some_and(|c| c.issued > c.settled)
    }

    /// Start a reload. Any reload still pending for the collection is superseded.
    pub fn begin_reload(&mut self, collection: Collection) -> ReloadTicket {
        let cache = self.caches.entry(collection).or_default();
        if cache.issued > cache.settled {
            tracing::debug!(%collection, generation = cache.issued, "superseding pending reload");
        }
        cache.issued += 1;
        ReloadTicket {
            collection,
            generation: cache.issued,
        }
    }

    /// Settle a reload. Returns `Ok(true)` when the listing replaced the cache and
    /// `Ok(false)` when the ticket was superseded and its outcome dropped.
    /// A failed current reload leaves the cache as it was.
    pub fn complete_reload(&mut self, ticket: ReloadTicket, outcome: Result<Vec<Entity>>) -> Result<bool> {
        let cache = self.caches.entry(ticket.collection).or_default();
        if ticket.generation != cache.issued {
            tracing::debug!(
                collection = %ticket.collection,
                generation = ticket.generation,
                latest = cache.issued,
                "discarding superseded reload"
            );
            return Ok(false);
        }

        cache.settled = ticket.generation;
        let entities = outcome?;
        tracing::debug!(collection = %ticket.collection, count = entities.len(), "cache replaced");
        cache.entities = entities;
        Ok(true)
    }

    /// Settle a reload without using its outcome.
    pub fn abandon(&mut self, ticket: ReloadTicket) {
        if let Some(cache) = self.caches.get_mut(&ticket.collection) {
            if cache.issued == ticket.generation {
                cache.settled = ticket.generation;
            }
        }
    }

    pub async fn reload(&mut self, gateway: &dyn RemoteGateway, collection: Collection) -> Result<()> {
        let ticket = self.begin_reload(collection);
        let outcome = gateway.list(collection).await;
        self.complete_reload(ticket, outcome).map(|_| ())
    }
}
