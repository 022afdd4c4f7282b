//! Core domain types for stagewalk.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies:
//! the category registry, the stage graph built from it, and the incompatibility rules
//! resolved against it. Everything here is validated at construction and read-only after.

mod graph;
mod ids;
mod registry;
mod rules;

pub use graph::{AdjacencyGraph, Connection, Direction, GraphError};
pub use ids::{ConnectionIndex, UtilityId, UtilityIndex};
pub use registry::{Category, CategoryRegistry, CategorySpec, RegistryError, Utility};
pub use rules::{IncompatibilityMap, RuleError};
