use super::partition::Partition;
use super::tasks::combinations::CombinationRecord;
use crate::core::models::ids::AtomId;
use crate::core::models::structure::Structure;
use tracing::{debug, trace, warn};

/// Lazily produces one dissociated copy of a structure per [`CombinationRecord`].
///
/// Every yielded [`Structure`] is an independent clone of the source with the
/// core and ligand atoms of one combination removed and its provenance recorded
/// in [`Structure::properties`].
pub struct Dissociations<'a, I> {
    source: &'a Structure,
    combinations: I,
    indices: Vec<usize>,
}

impl<'a, I> Dissociations<'a, I>
where
    I: Iterator<Item = CombinationRecord>,
{
    pub(crate) fn new(
        source: &'a Structure,
        partition: &Partition<isize>,
        ligand_count: usize,
        combinations: I,
    ) -> Self {
        Self {
            source,
            combinations,
            indices: new_indices(source, partition, ligand_count),
        }
    }

    /// The bookkeeping index list assigned to every yielded structure.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    fn dissociate(&self, record: CombinationRecord) -> Structure {
        let mut structure = self.source.clone();

        let mut remove: Vec<usize> = record
            .core
            .iter()
            .chain(record.ligands.iter().flatten())
            .copied()
            .collect();
        remove.sort_unstable();
        remove.dedup();

        // Positional indices shift on every deletion, so all ids are resolved up front.
        let ids: Vec<AtomId> = remove
            .iter()
            .filter_map(|&i| {
                let id = self.source.id_at(i);
                if id.is_none() {
                    warn!(index = i, "Atom index outside the structure; nothing to remove.");
                }
                id
            })
            .collect();

        let core_index = record.core.first().copied();
        let core_topology = core_index.map(|i| {
            match self.source.atom_at(i).and_then(|a| a.properties.topology.as_deref()) {
                Some(label) => format!("{label}_{i}"),
                None => i.to_string(),
            }
        });

        let mut lig_residue: Vec<isize> = record
            .ligands
            .iter()
            .filter_map(|group| group.first())
            .filter_map(|&i| self.source.atom_at(i))
            .map(|atom| atom.properties.residue_number)
            .collect();
        lig_residue.sort_unstable();

        let residues = lig_residue
            .iter()
            .map(isize::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        let df_index = core_topology
            .as_deref()
            .map(|topology| format!("{topology}{residues}"));

        for id in ids {
            structure.remove_atom(id);
        }

        let properties = &mut structure.properties;
        properties.indices = self.indices.clone();
        properties.core_topology = core_topology;
        properties.lig_residue = lig_residue;
        properties.df_index = df_index;

        trace!(
            removed = remove.len(),
            df_index = ?properties.df_index,
            "Generated dissociated structure."
        );
        structure
    }
}

impl<I> Iterator for Dissociations<'_, I>
where
    I: Iterator<Item = CombinationRecord>,
{
    type Item = Structure;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.combinations.next()?;
        Some(self.dissociate(record))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.combinations.size_hint()
    }
}

/// Updates the source's bookkeeping indices for a structure that lost one core
/// atom and `ligand_count` ligands.
///
/// An empty list stays empty. Otherwise the last `ligand_count` entries and the
/// highest index of the first partition group are dropped.
pub(crate) fn new_indices(
    source: &Structure,
    partition: &Partition<isize>,
    ligand_count: usize,
) -> Vec<usize> {
    let mut indices = source.properties.indices.clone();
    if indices.is_empty() {
        return indices;
    }

    indices.truncate(indices.len().saturating_sub(ligand_count));

    match partition.first().and_then(|(_, group)| group.last()) {
        Some(core_max) => match indices.iter().position(|i| i == core_max) {
            Some(pos) => {
                indices.remove(pos);
            }
            None => warn!(
                index = core_max,
                "Highest core index is absent from the bookkeeping list; leaving it unchanged."
            ),
        },
        None => warn!("Structure has no partition groups; bookkeeping list left unchanged."),
    }

    debug!(remaining = indices.len(), "Computed bookkeeping indices.");
    indices
}
