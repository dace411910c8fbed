//! # Engine Module
//!
//! This module implements the dissociation engine: the stateful layer that decides which
//! core atoms and ligand groups are removed together and produces the resulting structures.
//!
//! ## Overview
//!
//! A [`Dissociater`](dissociater::Dissociater) owns a structure together with the set of
//! dissociable core atoms, the core-core neighbour distance and a partition of the atoms
//! into indivisible removal groups. Its methods drive the individual tasks in order:
//!
//! 1. **Bulk filtering** removes core atoms buried inside the core.
//! 2. **Topology assignment** labels core atoms by their number of core neighbours.
//! 3. **Pairing** associates every core atom with ligand anchors, either the closest ones
//!    or every combination within a distance threshold.
//! 4. **Expansion** turns anchors into full ligand groups and, optionally, core atoms into
//!    whole substructure matches.
//! 5. **Generation** lazily yields one dissociated copy of the structure per combination
//!    ([`generator`]).
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Dissociation parameters, builder and TOML loading
//! - **Collaborators** ([`traits`]) - Distance estimation and substructure matching seams
//! - **Partitioning** ([`partition`]) - Grouping of atoms into removal units
//! - **Progress Monitoring** ([`progress`]) - Phase events for long-running workflows
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod config;
pub(crate) mod context;
pub mod dissociater;
pub mod error;
pub mod generator;
pub mod partition;
pub mod progress;
pub(crate) mod tasks;
pub mod traits;

pub use tasks::combinations::CombinationRecord;
pub use tasks::pairing::PairRecord;
