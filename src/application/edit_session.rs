//! Create/edit form state machine for a single collection.
//!
//! `Idle -> Editing -> Submitting -> Idle` on success, or back to `Editing` with the
//! failure attached. Submission is split into [`EditSession::begin_submit`] and
//! [`EditSession::finish_submit`] so a caller owning the gateway can drive it.

use crate::application::error::{DashboardError, Result};
use crate::application::gateway::RemoteGateway;
use crate::domain::collection::{Collection, EntityId, Operation};
use crate::domain::entity::Entity;
use crate::domain::form::{Draft, Fields};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Create,
    Update,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Editing {
        mode: EditMode,
        draft: Draft,
        target: Option<EntityId>,
        last_error: Option<DashboardError>,
    },
    Submitting {
        mode: EditMode,
        draft: Draft,
        target: Option<EntityId>,
    },
}

/// Request produced by a validated draft, ready for the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitRequest {
    pub collection: Collection,
    pub target: Option<EntityId>,
    pub fields: Fields,
}

impl SubmitRequest {
    pub async fn send(&self, gateway: &dyn RemoteGateway) -> Result<Entity> {
        match self.target {
            Some(id) => gateway.update(self.collection, id, &self.fields).await,
            None => gateway.create(self.collection, &self.fields).await,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EditSession {
    collection: Collection,
    state: SessionState,
}

impl EditSession {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            state: SessionState::Idle,
        }
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, SessionState::Idle)
    }

    pub fn draft(&self) -> Option<&Draft> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Editing { draft, .. } | SessionState::Submitting { draft, .. } => Some(draft),
        }
    }

    pub fn last_error(&self) -> Option<&DashboardError> {
        match &self.state {
            SessionState::Editing { last_error, .. } => last_error.as_ref(),
            _ => None,
        }
    }

    fn ensure_not_submitting(&self) -> Result<()> {
        if matches!(self.state, SessionState::Submitting { .. }) {
            return Err(DashboardError::SubmitInProgress);
        }
        Ok(())
    }

    pub fn start_create(&mut self) -> Result<()> {
        self.ensure_not_submitting()?;
        tracing::debug!(collection = %self.collection, "start create");
        self.state = SessionState::Editing {
            mode: EditMode::Create,
            draft: Draft::new(self.collection),
            target: None,
            last_error: None,
        };
        Ok(())
    }

    pub fn start_edit(&mut self, entity: &Entity) -> Result<()> {
        self.ensure_not_submitting()?;
        if !self.collection.supports(Operation::Update) || entity.collection() != self.collection {
            return Err(DashboardError::Unsupported {
                collection: entity.collection(),
                operation: Operation::Update,
            });
        }
        tracing::debug!(collection = %self.collection, id = %entity.id(), "start edit");
        self.state = SessionState::Editing {
            mode: EditMode::Update,
            draft: Draft::from_entity(entity),
            target: Some(entity.id()),
            last_error: None,
        };
        Ok(())
    }

    /// Update one draft value. Outside of `Editing` this does nothing.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        if let SessionState::Editing { draft, .. } = &mut self.state {
            draft.set(name, value)?;
        }
        Ok(())
    }

    /// Validate the draft and move to `Submitting`. A validation failure keeps the
    /// session in `Editing` with the error attached.
    pub fn begin_submit(&mut self, known_pumps: &HashSet<EntityId>) -> Result<SubmitRequest> {
        match self.state {
            SessionState::Idle => return Err(DashboardError::NotEditing),
            SessionState::Submitting { .. } => return Err(DashboardError::SubmitInProgress),
            SessionState::Editing { .. } => {}
        }
        let SessionState::Editing {
            mode,
            draft,
            target,
            last_error,
        } = &mut self.state
        else {
            return Err(DashboardError::NotEditing);
        };

        let fields = match draft.to_fields(known_pumps) {
            Ok(fields) => fields,
            Err(e) => {
                let err = DashboardError::from(e);
                tracing::debug!(collection = %self.collection, error = %err, "draft rejected");
                *last_error = Some(err.clone());
                return Err(err);
            }
        };

        let (mode, draft, target) = (*mode, draft.clone(), *target);
        self.state = SessionState::Submitting { mode, draft, target };
        Ok(SubmitRequest {
            collection: self.collection,
            target,
            fields,
        })
    }

    /// Settle a submission started with [`begin_submit`](Self::begin_submit).
    pub fn finish_submit(&mut self, outcome: Result<Entity>) -> Result<Entity> {
        let (mode, draft, target) = match std::mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::Submitting { mode, draft, target } => (mode, draft, target),
            other => {
                self.state = other;
                return Err(DashboardError::NotEditing);
            }
        };

        match outcome {
            Ok(entity) => {
                tracing::info!(collection = %self.collection, id = %entity.id(), ?mode, "saved");
                Ok(entity)
            }
            Err(err) => {
                tracing::warn!(collection = %self.collection, error = %err, "save failed");
                self.state = SessionState::Editing {
                    mode,
                    draft,
                    target,
                    last_error: Some(err.clone()),
                };
                Err(err)
            }
        }
    }

    pub async fn submit(&mut self, gateway: &dyn RemoteGateway, known_pumps: &HashSet<EntityId>) -> Result<Entity> {
        let request = self.begin_submit(known_pumps)?;
        let outcome = request.send(gateway).await;
        self.finish_submit(outcome)
    }

    pub fn cancel(&mut self) {
        if !self.is_idle() {
            tracing::debug!(collection = %self.collection, "draft discarded");
        }
        self.state = SessionState::Idle;
    }
}
