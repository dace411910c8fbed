use super::atom::Atom;
use super::ids::AtomId;
use nalgebra::Point3;
use slotmap::SlotMap;

/// Provenance recorded on a structure produced by the dissociation workflow.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructureProperties {
    /// Original (1-based) indices still present after successive dissociation rounds.
    pub indices: Vec<usize>,
    /// Topology label of the dissociated core atom joined with its index (e.g., `"vertice_12"`).
    pub core_topology: Option<String>,
    /// Sorted residue numbers of all removed ligands.
    pub lig_residue: Vec<isize>,
    /// Identifier combining `core_topology` and `lig_residue`, used to label outputs.
    pub df_index: Option<String>,
}

/// An ordered collection of atoms with stable identities.
///
/// Atoms live in a slot map so that they can be deleted by [`AtomId`] without
/// invalidating the ids of the remaining atoms; a separate ordering vector keeps
/// the 1-based positional indices used at the public boundary.
#[derive(Debug, Clone, Default)]
pub struct Structure {
    atoms: SlotMap<AtomId, Atom>,
    order: Vec<AtomId>,
    /// Structure-wide provenance and bookkeeping.
    pub properties: StructureProperties,
}

impl Structure {
    /// Creates a new, empty structure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an atom and returns its stable ID.
    pub fn add_atom(&mut self, atom: Atom) -> AtomId {
        let id = self.atoms.insert(atom);
        self.order.push(id);
        id
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    pub fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.atoms.get_mut(id)
    }

    /// Resolves a 1-based positional index to the ID of the atom currently at that position.
    pub fn id_at(&self, index: usize) -> Option<AtomId> {
        index
            .checked_sub(1)
            .and_then(|i| self.order.get(i))
            .copied()
    }

    /// Retrieves the atom at a 1-based positional index.
    pub fn atom_at(&self, index: usize) -> Option<&Atom> {
        self.id_at(index).and_then(|id| self.atoms.get(id))
    }

    /// Retrieves a mutable reference to the atom at a 1-based positional index.
    pub fn atom_at_mut(&mut self, index: usize) -> Option<&mut Atom> {
        let id = self.id_at(index)?;
        self.atoms.get_mut(id)
    }

    /// Returns the 1-based positional index of an atom.
    pub fn index_of(&self, id: AtomId) -> Option<usize> {
        self.order.iter().position(|&other| other == id).map(|i| i + 1)
    }

    /// Iterates over all atoms in positional order.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.order.iter().map(move |&id| (id, &self.atoms[id]))
    }

    /// Returns the positions of all atoms in positional order (0-based array layout).
    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.order.iter().map(|&id| self.atoms[id].position).collect()
    }

    /// Removes an atom by identity.
    ///
    /// Positional indices of all atoms after the removed one shift down by one,
    /// but the IDs of the remaining atoms are unaffected.
    pub fn remove_atom(&mut self, id: AtomId) -> Option<Atom> {
        let atom = self.atoms.remove(id)?;
        self.order.retain(|&other| other != id);
        Some(atom)
    }
}

impl FromIterator<Atom> for Structure {
    fn from_iter<T: IntoIterator<Item = Atom>>(iter: T) -> Self {
        let mut structure = Structure::new();
        for atom in iter {
            structure.add_atom(atom);
        }
        structure
    }
}
