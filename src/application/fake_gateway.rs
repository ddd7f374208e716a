// In-memory gateway used by the application tests
use crate::application::error::{DashboardError, Result};
use crate::application::gateway::RemoteGateway;
use crate::domain::collection::{Collection, EntityId, Operation};
use crate::domain::energy::{Pump, PumpStatus};
use crate::domain::entity::Entity;
use crate::domain::form::Fields;
use crate::domain::water::Reservoir;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Default)]
struct State {
    next_id: i64,
    rows: BTreeMap<(Collection, EntityId), Entity>,
    calls: usize,
    fail_next: Option<DashboardError>,
    fail_on: Vec<(Operation, DashboardError)>,
}

#[derive(Default)]
pub struct FakeGateway {
    state: Mutex<State>,
}

pub fn pump(id: i64, reference: &str) -> Pump {
    Pump {
        id: EntityId(id),
        reference: reference.to_string(),
        power_kw: 5.0,
        status: PumpStatus::Active,
        service_date: None,
        energy_status: None,
    }
}

pub fn reservoir(id: i64, name: &str) -> Reservoir {
    Reservoir {
        id: EntityId(id),
        name: name.to_string(),
        total_capacity_l: 1000.0,
        current_volume_l: 500.0,
        location: "Field 1".to_string(),
    }
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, entity: Entity) {
        let mut state = self.state.lock().unwrap();
        state.next_id = state.next_id.max(entity.id().0);
        state.rows.insert((entity.collection(), entity.id()), entity);
    }

    pub fn remove(&self, collection: Collection, id: EntityId) {
        self.state.lock().unwrap().rows.remove(&(collection, id));
    }

    /// Number of gateway calls made so far.
    pub fn calls(&self) -> usize {
        self.state.lock().unwrap().calls
    }

    pub fn fail_next(&self, error: DashboardError) {
        self.state.lock().unwrap().fail_next = Some(error);
    }

    /// Fail the next call of one kind only; other calls go through.
    pub fn fail_next_on(&self, operation: Operation, error: DashboardError) {
        self.state.lock().unwrap().fail_on.push((operation, error));
    }

    fn persist(state: &mut State, collection: Collection, id: EntityId, fields: &Fields) -> Result<Entity> {
        if let Some(pump_id) = fields.get("pompeId").and_then(Value::as_i64) {
            if !state.rows.contains_key(&(Collection::Pumps, EntityId(pump_id))) {
                return Err(DashboardError::RemoteRejected {
                    status: 400,
                    message: format!("Pompe not found with id: {}", pump_id),
                });
            }
        }
        let mut body = fields.clone();
        body.insert("id".to_string(), Value::from(id.0));
        let entity = Entity::decode(collection, Value::Object(body))
            .map_err(|e| DashboardError::InvalidPayload(e.to_string()))?;
        state.rows.insert((collection, id), entity.clone());
        Ok(entity)
    }

    fn enter(&self, operation: Operation) -> Result<std::sync::MutexGuard<'_, State>> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        if let Some(e) = state.fail_next.take() {
            return Err(e);
        }
        if let Some(pos) = state.fail_on.iter().position(|(op, _)| *op == operation) {
            return Err(state.fail_on.remove(pos).1);
        }
        Ok(state)
    }
}

#[async_trait]
impl RemoteGateway for FakeGateway {
    async fn list(&self, collection: Collection) -> Result<Vec<Entity>> {
        let state = self.enter(Operation::List)?;
        Ok(state
            .rows
            .iter()
            .filter(|((c, _), _)| *c == collection)
            .map(|(_, e)| e.clone())
            .collect())
    }

    async fn create(&self, collection: Collection, fields: &Fields) -> Result<Entity> {
        let mut state = self.enter(Operation::Create)?;
        state.next_id += 1;
        let id = EntityId(state.next_id);
        Self::persist(&mut state, collection, id, fields)
    }

    async fn update(&self, collection: Collection, id: EntityId, fields: &Fields) -> Result<Entity> {
        let mut state = self.enter(Operation::Update)?;
        if !state.rows.contains_key(&(collection, id)) {
            return Err(DashboardError::NotFound { collection, id });
        }
        Self::persist(&mut state, collection, id, fields)
    }

    async fn delete(&self, collection: Collection, id: EntityId) -> Result<()> {
        let mut state = self.enter(Operation::Delete)?;
        match state.rows.remove(&(collection, id)) {
            Some(_) => Ok(()),
            None => Err(DashboardError::NotFound { collection, id }),
        }
    }
}
