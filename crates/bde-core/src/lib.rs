//! # BDE Core Library
//!
//! Enumerates dissociation variants of core/ligand assemblies such as passivated nanocrystals:
//! structures from which one core atom (or core fragment) and a fixed number of attached
//! ligands have been removed, as needed for bond dissociation energy calculations.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Structure`, `Atom`, `Element`),
//!   geometry and index helpers, and topology label tables.
//!
//! - **[`engine`]: The Logic Core.** The stateful `Dissociater` with its bulk filter,
//!   topology classifier, pairing strategies, combination expansion and the lazy generator
//!   of dissociated structures. Distance estimation and substructure matching are
//!   delegated to caller-provided implementations of the traits in [`engine::traits`].
//!
//! - **[`workflows`]: The Public API.** Complete procedures driven by a
//!   `DissociationConfig`, such as [`workflows::dissociate::run`].

pub mod core;
pub mod engine;
pub mod workflows;
