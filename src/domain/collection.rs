// Managed collections and their remote capabilities
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned by the remote service. The client never mints one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub i64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EntityId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(EntityId)
    }
}

/// Dashboard section grouping two collections each.
/// Backing service a collection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Energy,
    Water,
}

impl Section {
    pub fn label(self) -> &'static str {
        match self {
            Section::Energy => "Energy",
            Section::Water => "Water",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Pumps,
    Consumptions,
    Reservoirs,
    FlowRecords,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Pumps,
        Collection::Consumptions,
        Collection::Reservoirs,
        Collection::FlowRecords,
    ];

    /// Path of the collection relative to the gateway base address.
    pub fn path(self) -> &'static str {
        match self {
            Collection::Pumps => "energy/pompes",
            Collection::Consumptions => "energy/consommations",
            Collection::Reservoirs => "water/reservoirs",
            Collection::FlowRecords => "water/debits",
        }
    }

    pub fn section(self) -> Section {
        match self {
            Collection::Pumps | Collection::Consumptions => Section::Energy,
            Collection::Reservoirs | Collection::FlowRecords => Section::Water,
        }
    }

    /// Consumption records are create-only on the gateway.
    pub fn supports(self, operation: Operation) -> bool {
        match operation {
            Operation::List | Operation::Create => true,
            Operation::Update | Operation::Delete => self != Collection::Consumptions,
        }
    }

    /// Other collections the view of this one reads: the pump picker for
    /// pump-linked records, and the per-pump usage columns for pumps.
    pub fn companions(self) -> &'static [Collection] {
        match self {
            Collection::Pumps => &[Collection::Consumptions, Collection::FlowRecords],
            Collection::Consumptions | Collection::FlowRecords => &[Collection::Pumps],
            Collection::Reservoirs => &[],
        }
    }

    /// Position in [`Collection::ALL`].
    pub fn index(self) -> usize {
        match self {
            Collection::Pumps => 0,
            Collection::Consumptions => 1,
            Collection::Reservoirs => 2,
            Collection::FlowRecords => 3,
        }
    }

    /// Singular noun used in prompts and log lines.
    pub fn noun(self) -> &'static str {
        match self {
            Collection::Pumps => "pump",
            Collection::Consumptions => "consumption record",
            Collection::Reservoirs => "reservoir",
            Collection::FlowRecords => "flow record",
        }
    }

    pub fn delete_prompt(self, id: EntityId) -> String {
        format!("Delete {} #{}?", self.noun(), id)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consumptions_are_create_only() {
        assert!(Collection::Consumptions.supports(Operation::Create));
        assert!(!Collection::Consumptions.supports(Operation::Update));
        assert!(!Collection::Consumptions.supports(Operation::Delete));
        assert!(Collection::FlowRecords.supports(Operation::Delete));
    }

    #[test]
    fn test_companions_and_index() {
        assert_eq!(
            Collection::Pumps.companions(),
            &[Collection::Consumptions, Collection::FlowRecords]
        );
        assert_eq!(Collection::FlowRecords.companions(), &[Collection::Pumps]);
        assert!(Collection::Reservoirs.companions().is_empty());
        for (i, c) in Collection::ALL.into_iter().enumerate() {
            assert_eq!(c.index(), i);
            assert!(c.companions().iter().all(|other| *other != c));
        }
    }

    #[test]
    fn test_sections_and_paths() {
        assert_eq!(Collection::Pumps.section().label(), "Energy");
        assert_eq!(Collection::Pumps.section(), Section::Energy);
        assert_eq!(Collection::FlowRecords.section(), Section::Water);
        assert_eq!(Collection::FlowRecords.path(), "water/debits");
        assert_eq!(
            Collection::Reservoirs.delete_prompt(EntityId(4)),
            "Delete reservoir #4?"
        );
    }

    #[test]
    fn test_entity_id_parses_trimmed() {
        assert_eq!(" 12 ".parse::<EntityId>().unwrap(), EntityId(12));
        assert!("pump".parse::<EntityId>().is_err());
    }
}
