//! # Workflows Module
//!
//! High-level entry points that tie the [`engine`](crate::engine) and [`core`](crate::core)
//! layers together into complete procedures.
//!
//! - **Dissociation Workflow** ([`dissociate`]) - Selects core atoms, pairs them with ligand
//!   anchors and prepares every dissociated structure, reporting progress per phase.

pub mod dissociate;
