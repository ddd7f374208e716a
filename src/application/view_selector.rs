//! Active tab, its form session and the reloads that keep its data current.
//!
//! The selector owns the entity store and one [`EditSession`] per collection.
//! Every mutation waits for the gateway and then reloads the active collection.
//! Listing results are applied only while the view that requested them is still
//! the current one.

use crate::application::edit_session::EditSession;
use crate::application::entity_store::{EntityStore, ReloadTicket};
use crate::application::error::{DashboardError, Result};
use crate::application::gateway::RemoteGateway;
use crate::application::views::ViewPolicies;
use crate::domain::collection::{Collection, EntityId, Operation};
use crate::domain::entity::Entity;
use std::sync::Arc;

/// Reloads requested by one tab switch or refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRefresh {
    epoch: u64,
    pub tickets: Vec<ReloadTicket>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Declined,
}

/// A mutation the gateway accepted, with the outcome of the reload that followed.
/// A failed `refresh` does not undo `outcome`; the cache just keeps the previous listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation<T> {
    pub outcome: T,
    pub refresh: Result<()>,
}

pub struct ViewSelector {
    gateway: Arc<dyn RemoteGateway>,
    store: EntityStore,
    sessions: [EditSession; 4],
    active: Collection,
    epoch: u64,
    policies: ViewPolicies,
}

impl ViewSelector {
    /// Nothing is loaded until the first [`switch_to`](Self::switch_to) or
    /// [`refresh`](Self::refresh).
    pub fn new(gateway: Arc<dyn RemoteGateway>, policies: ViewPolicies, initial: Collection) -> Self {
        let sessions = Collection::ALL.map(EditSession::new);
        Self {
            gateway,
            store: EntityStore::new(),
            sessions,
            active: initial,
            epoch: 0,
            policies,
        }
    }

    pub fn active(&self) -> Collection {
        self.active
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn policies(&self) -> &ViewPolicies {
        &self.policies
    }

    pub fn session(&self) -> &EditSession {
        &self.sessions[self.active.index()]
    }

    fn session_mut(&mut self) -> &mut EditSession {
        &mut self.sessions[self.active.index()]
    }

    /// Make `collection` active and issue its reloads. The previous tab's draft is
    /// discarded even when the collection does not change.
    pub fn select(&mut self, collection: Collection) -> ViewRefresh {
        self.session_mut().cancel();
        if collection != self.active {
            tracing::info!(from = %self.active, to = %collection, "switching view");
        }
        self.active = collection;
        self.plan_refresh()
    }

    fn plan_refresh(&mut self) -> ViewRefresh {
        self.epoch += 1;
        let mut tickets = vec![self.store.begin_reload(self.active)];
        for companion in self.active.companions() {
            tickets.push(self.store.begin_reload(*companion));
        }
        ViewRefresh {
            epoch: self.epoch,
            tickets,
        }
    }

    /// Settle one reload of a [`ViewRefresh`]. Returns `Ok(false)` when the view
    /// moved on since the refresh was issued; its outcome is then dropped.
    pub fn apply_reload(
        &mut self,
        refresh: &ViewRefresh,
        ticket: ReloadTicket,
        outcome: Result<Vec<Entity>>,
    ) -> Result<bool> {
        if refresh.epoch != self.epoch {
            tracing::debug!(
                collection = %ticket.collection,
                epoch = refresh.epoch,
                current = self.epoch,
                "dropping listing for a stale view"
            );
            self.store.abandon(ticket);
            return Ok(false);
        }
        self.store.complete_reload(ticket, outcome)
    }

    /// Settles every ticket, then reports the first failure.
    async fn run(&mut self, refresh: ViewRefresh) -> Result<()> {
        let mut first_error = None;
        for ticket in refresh.tickets.iter().copied() {
            let outcome = self.gateway.list(ticket.collection).await;
            if let Err(e) = self.apply_reload(&refresh, ticket, outcome) {
                tracing::warn!(collection = %ticket.collection, error = %e, "reload failed");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    pub async fn switch_to(&mut self, collection: Collection) -> Result<()> {
        let refresh = self.select(collection);
        self.run(refresh).await
    }

    /// Reload the active collection without touching its session.
    pub async fn refresh(&mut self) -> Result<()> {
        let refresh = self.plan_refresh();
        self.run(refresh).await
    }

    pub fn start_create(&mut self) -> Result<()> {
        self.session_mut().start_create()
    }

    /// Edit a cached entity of the active collection.
    pub fn start_edit(&mut self, id: EntityId) -> Result<()> {
        let collection = self.active;
        let entity = self
            .store
            .find(collection, id)
            .cloned()
            .ok_or(DashboardError::NotFound { collection, id })?;
        self.session_mut().start_edit(&entity)
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        self.session_mut().set_field(name, value)
    }

    pub fn cancel(&mut self) {
        self.session_mut().cancel();
    }

    /// Submit the active draft. Once the gateway has saved it the active view is
    /// reloaded; a reload failure is reported in [`Mutation::refresh`].
    pub async fn submit(&mut self) -> Result<Mutation<Entity>> {
        let known_pumps = self.store.pump_ids();
        let gateway = Arc::clone(&self.gateway);
        let saved = self.session_mut().submit(gateway.as_ref(), &known_pumps).await?;
        Ok(Mutation {
            outcome: saved,
            refresh: self.refresh().await,
        })
    }

    /// Delete a cached entity of the active collection after `confirm` accepts the
    /// prompt. Ids missing from the cache fail with `NotFound` before any call.
    pub async fn delete<F>(&mut self, id: EntityId, confirm: F) -> Result<Mutation<DeleteOutcome>>
    where
        F: FnOnce(&str) -> bool,
    {
        let collection = self.active;
        if !collection.supports(Operation::Delete) {
            return Err(DashboardError::Unsupported {
                collection,
                operation: Operation::Delete,
            });
        }
        if self.store.find(collection, id).is_none() {
            return Err(DashboardError::NotFound { collection, id });
        }
        if !confirm(&collection.delete_prompt(id)) {
            tracing::debug!(%collection, %id, "delete declined");
            return Ok(Mutation {
                outcome: DeleteOutcome::Declined,
                refresh: Ok(()),
            });
        }

        self.gateway.delete(collection, id).await?;
        tracing::info!(%collection, %id, "deleted");
        Ok(Mutation {
            outcome: DeleteOutcome::Deleted,
            refresh: self.refresh().await,
        })
    }
}
