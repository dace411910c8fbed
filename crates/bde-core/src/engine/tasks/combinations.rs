use super::pairing::PairRecord;
use crate::core::models::atom::Atom;
use crate::core::models::structure::Structure;
use crate::engine::error::EngineError;
use crate::engine::partition::Partition;
use crate::engine::traits::SubstructureMatcher;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, instrument};

/// All atoms removed in a single dissociation event (1-based indices).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinationRecord {
    /// The dissociated core atom, or every atom of its substructure match.
    pub core: Vec<usize>,
    /// One removal group (a full residue) per paired ligand.
    pub ligands: Vec<Vec<usize>>,
}

/// Maps every core atom to the first substructure match that contains it.
///
/// `core` holds 1-based indices. Fails with [`EngineError::SubstructureMismatch`]
/// listing, sorted, every core atom that is absent from all matches.
#[instrument(skip_all, name = "substructure_task", fields(query = query))]
pub fn substructure_groups<M>(
    structure: &Structure,
    core: &BTreeSet<usize>,
    query: &str,
    matcher: &M,
) -> Result<HashMap<usize, Vec<usize>>, EngineError>
where
    M: SubstructureMatcher + ?Sized,
{
    let matches = matcher.match_substructure(structure, query)?;
    if let Some(bad) = matches
        .iter()
        .flatten()
        .find(|&&i| i == 0 || i > structure.len())
    {
        return Err(EngineError::Matcher(format!(
            "match for '{query}' refers to atom {bad}, outside the structure of {} atoms",
            structure.len()
        )));
    }

    let mut groups = HashMap::with_capacity(core.len());
    let mut unmatched = Vec::new();
    for &atom in core {
        match matches.iter().find(|m| m.contains(&atom)) {
            Some(group) => {
                groups.insert(atom, group.clone());
            }
            None => unmatched.push(atom),
        }
    }

    if !unmatched.is_empty() {
        return Err(EngineError::SubstructureMismatch {
            query: query.to_string(),
            unmatched,
        });
    }

    info!(
        matches = matches.len(),
        core_atoms = core.len(),
        "Expanded core atoms into substructure matches."
    );
    Ok(groups)
}

/// Expands core/ligand pairs into full removal groups.
///
/// Every ligand anchor is replaced by all atoms of its partition group (the group
/// whose key `key` assigns to the anchor). Core atoms stay singletons unless
/// `core_groups` provides a substructure for them.
///
/// All indices are validated before this returns; the expansion itself happens
/// lazily as the returned iterator is consumed.
#[instrument(skip_all, name = "combinations_task", fields(pairs = pairs.len()))]
pub fn expand<'a>(
    structure: &'a Structure,
    partition: &'a Partition<isize>,
    key: fn(&Atom) -> isize,
    pairs: Vec<PairRecord>,
    core_groups: Option<HashMap<usize, Vec<usize>>>,
) -> Result<impl Iterator<Item = CombinationRecord> + 'a, EngineError> {
    for pair in &pairs {
        if let Some(groups) = &core_groups {
            if !groups.contains_key(&pair.core) {
                return Err(EngineError::Internal(format!(
                    "core atom {} has no substructure group",
                    pair.core
                )));
            }
        } else {
            atom_at(structure, pair.core)?;
        }
        for &lig in &pair.ligands {
            let anchor = atom_at(structure, lig)?;
            if partition.get(&key(anchor)).is_none() {
                return Err(EngineError::Internal(format!(
                    "ligand anchor {lig} belongs to no partition group"
                )));
            }
        }
    }

    debug!(combinations = pairs.len(), "Core/ligand pairs validated.");

    Ok(pairs.into_iter().map(move |pair| {
        let core = match &core_groups {
            Some(groups) => groups.get(&pair.core).cloned().unwrap_or_else(|| vec![pair.core]),
            None => vec![pair.core],
        };
        let ligands = pair
            .ligands
            .iter()
            .map(|&lig| {
                structure
                    .atom_at(lig)
                    .and_then(|anchor| partition.get(&key(anchor)))
                    .map(<[usize]>::to_vec)
                    .unwrap_or_else(|| vec![lig])
            })
            .collect();
        CombinationRecord { core, ligands }
    }))
}

fn atom_at(structure: &Structure, index: usize) -> Result<&Atom, EngineError> {
    structure.atom_at(index).ok_or_else(|| {
        EngineError::from(crate::core::utils::indices::InvalidIndexError {
            value: index.to_string(),
            atom_count: structure.len(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::element::Element;
    use crate::engine::partition::partition_by_residue;
    use nalgebra::Point3;

    /// Residue 1: core atoms 1-3; residue 2: atoms 4-5; residue 3: atoms 6-7.
    fn create_structure() -> Structure {
        [1, 1, 1, 2, 2, 3, 3]
            .iter()
            .enumerate()
            .map(|(i, &r)| Atom::new(Element::C, Point3::new(i as f64, 0.0, 0.0), r))
            .collect()
    }

    fn matcher_two_fragments(
        _: &Structure,
        _: &str,
    ) -> Result<Vec<Vec<usize>>, EngineError> {
        Ok(vec![vec![1, 2], vec![3, 2]])
    }

    #[test]
    fn identity_expansion_keeps_single_core_atom() {
        let structure = create_structure();
        let partition = partition_by_residue(&structure);
        let pairs = vec![PairRecord::new(2, vec![4, 6])];

        let records: Vec<_> = expand(&structure, &partition, Atom::residue_number, pairs, None)
            .unwrap()
            .collect();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].core, vec![2]);
        assert_eq!(records[0].ligands, vec![vec![4, 5], vec![6, 7]]);
    }

    #[test]
    fn anchors_anywhere_in_a_residue_expand_to_the_full_residue() {
        let structure = create_structure();
        let partition = partition_by_residue(&structure);
        let pairs = vec![PairRecord::new(1, vec![5]), PairRecord::new(3, vec![7])];

        let records: Vec<_> = expand(&structure, &partition, Atom::residue_number, pairs, None)
            .unwrap()
            .collect();

        assert_eq!(records[0].ligands, vec![vec![4, 5]]);
        assert_eq!(records[1].ligands, vec![vec![6, 7]]);
    }

    #[test]
    fn out_of_range_indices_are_rejected_eagerly() {
        let structure = create_structure();
        let partition = partition_by_residue(&structure);
        let pairs = vec![PairRecord::new(1, vec![8])];

        let result = expand(&structure, &partition, Atom::residue_number, pairs, None);
        assert!(matches!(result, Err(EngineError::InvalidIndex(_))));
    }

    #[test]
    fn substructure_groups_replace_core_atoms() {
        let structure = create_structure();
        let partition = partition_by_residue(&structure);
        let core: BTreeSet<usize> = [1, 3].into_iter().collect();

        let groups =
            substructure_groups(&structure, &core, "[Cd]", &matcher_two_fragments).unwrap();
        let pairs = vec![PairRecord::new(1, vec![4]), PairRecord::new(3, vec![6])];
        let records: Vec<_> =
            expand(&structure, &partition, Atom::residue_number, pairs, Some(groups))
                .unwrap()
                .collect();

        assert_eq!(records[0].core, vec![1, 2]);
        assert_eq!(records[1].core, vec![3, 2]);
    }

    #[test]
    fn substructure_mismatch_lists_exactly_the_missing_atoms() {
        let structure = create_structure();
        let core: BTreeSet<usize> = [1, 3, 4].into_iter().collect();

        let result = substructure_groups(&structure, &core, "[Cd]", &matcher_two_fragments);
        match result {
            Err(EngineError::SubstructureMismatch { query, unmatched }) => {
                assert_eq!(query, "[Cd]");
                assert_eq!(unmatched, vec![4]);
            }
            other => panic!("expected a substructure mismatch, got {other:?}"),
        }
    }

    #[test]
    fn matches_outside_the_structure_are_rejected() {
        fn bad_matcher(_: &Structure, _: &str) -> Result<Vec<Vec<usize>>, EngineError> {
            Ok(vec![vec![1, 99]])
        }
        let structure = create_structure();
        let core: BTreeSet<usize> = [1].into_iter().collect();

        let result = substructure_groups(&structure, &core, "[Cd]", &bad_matcher);
        assert!(matches!(result, Err(EngineError::Matcher(_))));
    }

    #[test]
    fn expansion_is_lazy_and_one_record_per_pair() {
        let structure = create_structure();
        let partition = partition_by_residue(&structure);
        let pairs = vec![
            PairRecord::new(1, vec![4]),
            PairRecord::new(2, vec![4]),
            PairRecord::new(3, vec![6]),
        ];

        let mut records =
            expand(&structure, &partition, Atom::residue_number, pairs, None).unwrap();
        assert_eq!(records.next().unwrap().core, vec![1]);
        assert_eq!(records.count(), 2);
    }
}
