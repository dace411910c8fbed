//! # Core Models Module
//!
//! This module contains the data structures used to represent core/ligand
//! structures during the dissociation workflow.
//!
//! ## Key Components
//!
//! - [`atom`] - Individual atom with position, element and named properties
//! - [`element`] - Chemical elements with symbol and atomic-number parsing
//! - [`structure`] - Ordered atom collection with identity-based deletion
//! - [`ids`] - Stable identifier type for atoms
//!
//! ## Usage
//!
//! ```ignore
//! use bde::core::models::{atom::Atom, element::Element, structure::Structure};
//!
//! let mut structure = Structure::new();
//! let cd = structure.add_atom(Atom::new(Element::Cd, Point3::origin(), 1));
//! let o = structure.add_atom(Atom::new(Element::O, Point3::new(2.2, 0.0, 0.0), 2).anchored());
//! ```

pub mod atom;
pub mod element;
pub mod ids;
pub mod structure;
