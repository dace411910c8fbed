//! # Core Module
//!
//! Stateless building blocks of the dissociation engine.
//!
//! - **Structure Representation** ([`models`]) - Atoms, elements and ordered structures
//! - **Geometry & Index Helpers** ([`utils`]) - Distance matrices, centroids and index coercion
//! - **Topology Descriptors** ([`topology`]) - Neighbour-count to label tables

pub mod models;
pub mod topology;
pub mod utils;
