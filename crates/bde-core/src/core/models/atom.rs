use super::element::Element;
use nalgebra::Point3;

/// Named per-atom metadata carried through the dissociation workflow.
///
/// Every field that the workflow reads or writes has an explicit slot here,
/// so no free-form property lookup is needed anywhere in the engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AtomProperties {
    /// Residue sequence number; atoms sharing a number form one removal unit.
    pub residue_number: isize,
    /// Marks the atom through which a ligand is attached to the core.
    pub anchor: bool,
    /// Neighbour-count classification written by the topology classifier.
    pub topology: Option<String>,
    /// Index of the substructure match this atom belongs to, if any.
    pub substructure: Option<usize>,
}

/// Represents a single atom of a core/ligand structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The chemical element of the atom.
    pub element: Element,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Residue membership, anchor flag and workflow annotations.
    pub properties: AtomProperties,
}

impl Atom {
    /// Creates a new `Atom` belonging to residue `residue_number`.
    ///
    /// All remaining properties take their default values and can be set afterwards.
    pub fn new(element: Element, position: Point3<f64>, residue_number: isize) -> Self {
        Self {
            element,
            position,
            properties: AtomProperties {
                residue_number,
                ..AtomProperties::default()
            },
        }
    }

    /// Builder-style helper to flag the atom as a ligand anchor.
    pub fn anchored(mut self) -> Self {
        self.properties.anchor = true;
        self
    }

    pub fn residue_number(&self) -> isize {
        self.properties.residue_number
    }
}
