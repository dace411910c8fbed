use super::error::EngineError;
use crate::core::models::ids::AtomId;
use crate::core::models::structure::Structure;

/// Provides a core-core neighbour distance for a structure.
///
/// Implementations typically inspect the radial distribution of distances around
/// `representative` and return the position of its first minimum.
pub trait CoreDistanceEstimator {
    /// Returns the distance (in Angstroms) below which two core atoms are neighbours.
    fn estimate_core_distance(
        &self,
        structure: &Structure,
        representative: AtomId,
    ) -> Result<f64, EngineError>;
}

/// Finds all matches of a substructure query within a structure.
pub trait SubstructureMatcher {
    /// Returns one tuple of 1-based atom indices per match; the atom order within
    /// a tuple follows the query and is consistent across matches.
    fn match_substructure(
        &self,
        structure: &Structure,
        query: &str,
    ) -> Result<Vec<Vec<usize>>, EngineError>;
}

impl<F> CoreDistanceEstimator for F
where
    F: Fn(&Structure, AtomId) -> Result<f64, EngineError>,
{
    fn estimate_core_distance(
        &self,
        structure: &Structure,
        representative: AtomId,
    ) -> Result<f64, EngineError> {
        self(structure, representative)
    }
}

impl<F> SubstructureMatcher for F
where
    F: Fn(&Structure, &str) -> Result<Vec<Vec<usize>>, EngineError>,
{
    fn match_substructure(
        &self,
        structure: &Structure,
        query: &str,
    ) -> Result<Vec<Vec<usize>>, EngineError> {
        self(structure, query)
    }
}

/// An estimator that always returns the same distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedDistance(pub f64);

impl CoreDistanceEstimator for FixedDistance {
    fn estimate_core_distance(&self, _: &Structure, _: AtomId) -> Result<f64, EngineError> {
        Ok(self.0)
    }
}

/// A matcher for workflows that never dissociate substructures; every query fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMatcher;

impl SubstructureMatcher for NoMatcher {
    fn match_substructure(
        &self,
        _: &Structure,
        query: &str,
    ) -> Result<Vec<Vec<usize>>, EngineError> {
        Err(EngineError::Matcher(format!(
            "no substructure matcher available for query '{query}'"
        )))
    }
}
