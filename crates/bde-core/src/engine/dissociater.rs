use super::context::CoreContext;
use super::error::EngineError;
use super::generator::{self, Dissociations};
use super::partition::{Partition, partition_by};
use super::tasks::combinations::{self, CombinationRecord};
use super::tasks::pairing::{self, PairRecord};
use super::tasks::{bulk_filter, topology};
use super::traits::{CoreDistanceEstimator, SubstructureMatcher};
use crate::core::models::atom::Atom;
use crate::core::models::structure::Structure;
use crate::core::topology::registry::TopologyMap;
use crate::core::utils::indices::{AtomIndex, coerce_indices};
use nalgebra::Point3;
use std::collections::BTreeSet;
use tracing::{info, instrument};

/// Decides which core atoms and ligands of a structure are removed together.
///
/// A `Dissociater` owns the source structure and the set of dissociable core
/// atoms. Core atoms can be narrowed down with [`remove_bulk`](Self::remove_bulk)
/// and labelled with [`assign_topology`](Self::assign_topology); afterwards one
/// of the pairing strategies selects ligands for every core atom, the pairs are
/// expanded into full removal groups and finally turned into new structures by
/// [`dissociate`](Self::dissociate).
#[derive(Debug, Clone)]
pub struct Dissociater {
    structure: Structure,
    positions: Vec<Point3<f64>>,
    core_idx: Vec<usize>,
    ligand_count: usize,
    max_dist: f64,
    topology: TopologyMap,
    partition_key: fn(&Atom) -> isize,
    partition: Partition<isize>,
}

impl Dissociater {
    /// Creates a new engine for `structure`.
    ///
    /// `core_idx` holds 1-based indices of the dissociable core atoms. When
    /// `max_dist` is `None` the core-core neighbour distance is requested from
    /// `estimator`, using the lowest-index core atom as representative.
    ///
    /// # Errors
    ///
    /// * [`EngineError::InvalidIndex`] for core indices outside the structure.
    /// * [`EngineError::InvalidArgument`] for an empty core, a `ligand_count` of
    ///   zero or a non-positive distance.
    /// * Any error raised by the estimator.
    #[instrument(skip_all, name = "dissociater_setup", fields(ligand_count = ligand_count))]
    pub fn new<I, E>(
        structure: Structure,
        core_idx: I,
        ligand_count: usize,
        max_dist: Option<f64>,
        topology: TopologyMap,
        estimator: &E,
    ) -> Result<Self, EngineError>
    where
        I: IntoIterator,
        I::Item: AtomIndex,
        E: CoreDistanceEstimator + ?Sized,
    {
        if ligand_count == 0 {
            return Err(EngineError::invalid_argument(
                "ligand_count",
                "at least one ligand must be dissociated per core atom",
            ));
        }

        let core_idx = coerce_indices(core_idx, structure.len())?;
        let Some(&first) = core_idx.first() else {
            return Err(EngineError::invalid_argument(
                "core_idx",
                "at least one core atom is required",
            ));
        };

        let max_dist = match max_dist {
            Some(dist) => dist,
            None => {
                let representative = structure.id_at(first + 1).ok_or_else(|| {
                    EngineError::Internal(format!("core atom {} has no atom id", first + 1))
                })?;
                let dist = estimator.estimate_core_distance(&structure, representative)?;
                info!(max_dist = dist, "Estimated core-core neighbour distance.");
                dist
            }
        };
        if !max_dist.is_finite() || max_dist <= 0.0 {
            return Err(EngineError::invalid_argument(
                "max_dist",
                format!("expected a finite, positive distance, got {max_dist}"),
            ));
        }

        let partition_key: fn(&Atom) -> isize = Atom::residue_number;
        let partition = partition_by(&structure, partition_key);

        info!(
            atoms = structure.len(),
            core_atoms = core_idx.len(),
            groups = partition.len(),
            "Dissociater initialized."
        );

        Ok(Self {
            positions: structure.positions(),
            structure,
            core_idx,
            ligand_count,
            max_dist,
            topology,
            partition_key,
            partition,
        })
    }

    /// Replaces the key used to group atoms into indivisible removal units.
    pub fn with_partition_key(mut self, key: fn(&Atom) -> isize) -> Self {
        self.partition_key = key;
        self.partition = partition_by(&self.structure, key);
        self
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    /// Sorted 0-based indices of the current core atoms.
    pub fn core_idx(&self) -> &[usize] {
        &self.core_idx
    }

    pub fn ligand_count(&self) -> usize {
        self.ligand_count
    }

    pub fn max_dist(&self) -> f64 {
        self.max_dist
    }

    pub fn topology(&self) -> &TopologyMap {
        &self.topology
    }

    pub fn partition(&self) -> &Partition<isize> {
        &self.partition
    }

    fn context(&self) -> CoreContext<'_> {
        CoreContext::new(
            &self.positions,
            &self.core_idx,
            self.max_dist,
            self.ligand_count,
        )
    }

    /// Drops core atoms in the bulk of the core, keeping only surface atoms.
    pub fn remove_bulk(&mut self, max_vec_len: f64) -> Result<(), EngineError> {
        if !max_vec_len.is_finite() || max_vec_len < 0.0 {
            return Err(EngineError::invalid_argument(
                "max_vec_len",
                format!("expected a finite, non-negative length, got {max_vec_len}"),
            ));
        }
        let retained = bulk_filter::run(&self.context(), max_vec_len);
        self.core_idx = retained;
        Ok(())
    }

    /// Labels every core atom by its number of neighbouring core atoms.
    ///
    /// The label is stored in [`AtomProperties::topology`](crate::core::models::atom::AtomProperties::topology).
    /// Run after [`remove_bulk`](Self::remove_bulk) so that removed atoms no longer
    /// count as neighbours.
    pub fn assign_topology(&mut self) {
        let labels = topology::run(&self.context(), &self.topology);
        for (&i, label) in self.core_idx.iter().zip(labels) {
            if let Some(atom) = self.structure.atom_at_mut(i + 1) {
                atom.properties.topology = Some(label);
            }
        }
    }

    /// Pairs every core atom with its closest ligand anchors (1-based `lig_idx`).
    ///
    /// With `n_pairs == 1` each core atom gets its two nearest ligands. Larger
    /// values rank every `ligand_count`-sized subset of the `n_pairs + ligand_count`
    /// nearest ligands by the norm of their distances and keep the best `n_pairs`.
    pub fn get_pairs_closest<I>(
        &self,
        lig_idx: I,
        n_pairs: usize,
    ) -> Result<Vec<PairRecord>, EngineError>
    where
        I: IntoIterator,
        I::Item: AtomIndex,
    {
        let lig_idx = coerce_indices(lig_idx, self.structure.len())?;
        pairing::closest(&self.context(), &lig_idx, n_pairs)
    }

    /// Pairs every core atom with all ligand combinations closer than `max_pair_dist`.
    pub fn get_pairs_distance<I>(
        &self,
        lig_idx: I,
        max_pair_dist: f64,
    ) -> Result<Vec<PairRecord>, EngineError>
    where
        I: IntoIterator,
        I::Item: AtomIndex,
    {
        let lig_idx = coerce_indices(lig_idx, self.structure.len())?;
        pairing::within_distance(&self.context(), &lig_idx, max_pair_dist)
    }

    /// Expands pairs into full removal groups.
    ///
    /// With a `core_query`, every core atom is replaced by the first substructure
    /// match containing it; all current core atoms must be covered by a match.
    pub fn get_combinations<'a, M>(
        &'a self,
        pairs: Vec<PairRecord>,
        core_query: Option<&str>,
        matcher: &M,
    ) -> Result<impl Iterator<Item = CombinationRecord> + use<'a, M>, EngineError>
    where
        M: SubstructureMatcher + ?Sized,
    {
        let core_groups = match core_query {
            Some(query) => {
                let mut core: BTreeSet<usize> = self.core_idx.iter().map(|&i| i + 1).collect();
                core.extend(pairs.iter().map(|pair| pair.core));
                Some(combinations::substructure_groups(
                    &self.structure,
                    &core,
                    query,
                    matcher,
                )?)
            }
            None => None,
        };

        combinations::expand(
            &self.structure,
            &self.partition,
            self.partition_key,
            pairs,
            core_groups,
        )
    }

    /// Lazily removes every combination from a fresh copy of the structure.
    pub fn dissociate<I>(&self, combinations: I) -> Dissociations<'_, I::IntoIter>
    where
        I: IntoIterator<Item = CombinationRecord>,
    {
        Dissociations::new(
            &self.structure,
            &self.partition,
            self.ligand_count,
            combinations.into_iter(),
        )
    }

    /// Bookkeeping indices assigned to every dissociated structure.
    pub fn new_indices(&self) -> Vec<usize> {
        generator::new_indices(&self.structure, &self.partition, self.ligand_count)
    }
}
