use crate::core::utils::geometry::{pairwise_distance, take_points};
use nalgebra::{DMatrix, Point3};

/// Read-only view of the geometric state shared by all engine tasks.
#[derive(Clone, Copy)]
pub struct CoreContext<'a> {
    /// Positions of every atom in structure order (0-based).
    pub positions: &'a [Point3<f64>],
    /// Sorted 0-based indices of the core atoms.
    pub core_idx: &'a [usize],
    /// Core-core neighbour distance.
    pub max_dist: f64,
    /// Number of ligands dissociated per core atom.
    pub ligand_count: usize,
}

impl<'a> CoreContext<'a> {
    pub fn new(
        positions: &'a [Point3<f64>],
        core_idx: &'a [usize],
        max_dist: f64,
        ligand_count: usize,
    ) -> Self {
        Self {
            positions,
            core_idx,
            max_dist,
            ligand_count,
        }
    }

    pub fn core_positions(&self) -> Vec<Point3<f64>> {
        take_points(self.positions, self.core_idx)
    }

    /// Distance matrix between all core atoms and the atoms at `other` (0-based).
    pub fn distances_to(&self, other: &[usize]) -> DMatrix<f64> {
        pairwise_distance(&self.core_positions(), &take_points(self.positions, other))
    }

    /// For every core atom, the positions (within `core_idx`) of all other core
    /// atoms at a distance of at most `max_dist`. An atom is never its own neighbour.
    pub fn core_neighbours(&self) -> Vec<Vec<usize>> {
        let dist = self.distances_to(self.core_idx);
        (0..dist.nrows())
            .map(|i| {
                (0..dist.ncols())
                    .filter(|&j| j != i && dist[(i, j)] <= self.max_dist)
                    .collect()
            })
            .collect()
    }
}
