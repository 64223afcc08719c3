// Core graph model for Lifetrace: ids, edges, occurrences and node records.

pub mod edge;
pub mod graph;
pub mod ids;
pub mod occurrence;
pub mod value;
