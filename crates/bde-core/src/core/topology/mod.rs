//! # Topology Module
//!
//! Neighbour-count based topology descriptors for core atoms.
//!
//! A core atom on a nanocrystal surface is characterised by how many other core
//! atoms lie within the core-core distance threshold. The [`registry`] module maps
//! those counts to user-defined descriptors such as `"vertice"`, `"edge"` or
//! `"face"`, optionally loaded from a TOML file.
//!
//! ```ignore
//! use bde::core::topology::registry::TopologyMap;
//!
//! let topology = TopologyMap::load(Path::new("topology.toml"))?;
//! assert_eq!(topology.label(7), "7_neighbours");
//! ```

pub mod registry;
