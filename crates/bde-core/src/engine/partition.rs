use crate::core::models::atom::Atom;
use crate::core::models::structure::Structure;
use std::collections::HashMap;
use std::hash::Hash;

/// Atom indices grouped by a key, in order of first appearance.
///
/// Every group lists the 1-based indices of its atoms in structure order.
#[derive(Debug, Clone)]
pub struct Partition<K> {
    groups: Vec<(K, Vec<usize>)>,
    lookup: HashMap<K, usize>,
}

impl<K: Hash + Eq + Clone> Partition<K> {
    pub fn get(&self, key: &K) -> Option<&[usize]> {
        self.lookup
            .get(key)
            .map(|&slot| self.groups[slot].1.as_slice())
    }

    /// The group that appeared first in the structure.
    pub fn first(&self) -> Option<(&K, &[usize])> {
        self.groups
            .first()
            .map(|(key, indices)| (key, indices.as_slice()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[usize])> {
        self.groups
            .iter()
            .map(|(key, indices)| (key, indices.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Partitions the atoms of `structure` by `key`.
pub fn partition_by<K, F>(structure: &Structure, key: F) -> Partition<K>
where
    K: Hash + Eq + Clone,
    F: Fn(&Atom) -> K,
{
    let mut groups: Vec<(K, Vec<usize>)> = Vec::new();
    let mut lookup: HashMap<K, usize> = HashMap::new();

    for (i, (_, atom)) in structure.atoms_iter().enumerate() {
        let k = key(atom);
        let slot = *lookup.entry(k.clone()).or_insert_with(|| {
            groups.push((k, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(i + 1);
    }

    Partition { groups, lookup }
}

/// Partitions the atoms of `structure` by residue number.
pub fn partition_by_residue(structure: &Structure) -> Partition<isize> {
    partition_by(structure, Atom::residue_number)
}
