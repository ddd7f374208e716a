// Domain layer - Entities, form schemas and derived values
pub mod collection;
pub mod derivation;
pub mod energy;
pub mod entity;
pub mod form;
pub mod timestamp;
pub mod water;
