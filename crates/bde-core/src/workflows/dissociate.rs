use crate::core::models::structure::Structure;
use crate::engine::config::{CoreSelection, DissociationConfig};
use crate::engine::dissociater::Dissociater;
use crate::engine::error::EngineError;
use crate::engine::generator::Dissociations;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::traits::{CoreDistanceEstimator, SubstructureMatcher};
use crate::engine::CombinationRecord;
use std::iter::Cloned;
use std::slice::Iter;
use tracing::{info, instrument, warn};

/// The prepared outcome of a dissociation workflow.
///
/// Holds the engine together with every core/ligand combination it selected.
/// Dissociated structures are produced on demand by [`structures`](Self::structures).
#[derive(Debug, Clone)]
pub struct DissociationPlan {
    pub dissociater: Dissociater,
    pub combinations: Vec<CombinationRecord>,
}

impl DissociationPlan {
    /// Lazily yields one dissociated structure per combination.
    pub fn structures(&self) -> Dissociations<'_, Cloned<Iter<'_, CombinationRecord>>> {
        self.dissociater.dissociate(self.combinations.iter().cloned())
    }

    pub fn len(&self) -> usize {
        self.combinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combinations.is_empty()
    }
}

/// Runs the complete dissociation workflow on `structure`.
///
/// Core atoms come from `config.core`; selecting them by element additionally
/// discards bulk core atoms. Ligand anchors are all atoms flagged with
/// [`AtomProperties::anchor`](crate::core::models::atom::AtomProperties::anchor).
/// Pairs are formed by distance when `config.max_lig_dist` is set and by
/// proximity rank otherwise.
#[instrument(skip_all, name = "dissociation_workflow")]
pub fn run<E, M>(
    structure: Structure,
    config: &DissociationConfig,
    estimator: &E,
    matcher: &M,
    reporter: &ProgressReporter,
) -> Result<DissociationPlan, EngineError>
where
    E: CoreDistanceEstimator + ?Sized,
    M: SubstructureMatcher + ?Sized,
{
    config.validate()?;

    // === Phase 1: Core selection ===
    let (core_idx, filter_bulk) = match &config.core {
        CoreSelection::Indices(indices) => (indices.clone(), false),
        CoreSelection::Element(element) => {
            let indices: Vec<usize> = structure
                .atoms_iter()
                .enumerate()
                .filter(|(_, (_, atom))| atom.element == *element)
                .map(|(i, _)| i + 1)
                .collect();
            if indices.is_empty() {
                return Err(EngineError::invalid_argument(
                    "core",
                    format!("the structure contains no {element} atoms"),
                ));
            }
            (indices, true)
        }
    };
    let lig_idx: Vec<usize> = structure
        .atoms_iter()
        .enumerate()
        .filter(|(_, (_, atom))| atom.properties.anchor)
        .map(|(i, _)| i + 1)
        .collect();
    if lig_idx.is_empty() {
        warn!("No atoms are flagged as ligand anchors.");
    }

    let mut dissociater = reporter.phase("Preparation", || {
        Dissociater::new(
            structure,
            core_idx,
            config.ligand_count,
            config.max_core_dist,
            config.topology.clone(),
            estimator,
        )
    })?;

    if filter_bulk {
        reporter.phase("Bulk filtering", || dissociater.remove_bulk(config.max_vec_len))?;
    }
    reporter.report(Progress::CoreSelected {
        count: dissociater.core_idx().len(),
    });

    // === Phase 2: Topology ===
    reporter.phase("Topology", || dissociater.assign_topology());

    // === Phase 3: Pairing ===
    let anchors = lig_idx.iter().copied();
    let pairs = reporter.phase("Pairing", || match config.max_lig_dist {
        Some(max_pair_dist) => dissociater.get_pairs_distance(anchors, max_pair_dist),
        None => dissociater.get_pairs_closest(anchors, config.lig_pairs),
    })?;
    reporter.report(Progress::PairsFound { count: pairs.len() });

    // === Phase 4: Expansion ===
    let combinations: Vec<CombinationRecord> = reporter.phase("Expansion", || {
        dissociater
            .get_combinations(pairs, config.core_query.as_deref(), matcher)
            .map(|records| records.collect::<Vec<_>>())
    })?;

    info!(
        combinations = combinations.len(),
        "Workflow complete. Dissociation plan ready."
    );
    Ok(DissociationPlan {
        dissociater,
        combinations,
    })
}

/// Labels every atom of the `i`-th match of `query` with substructure `i`.
///
/// Returns the number of matches. The structure is left untouched when the
/// matcher reports an atom outside of it.
#[instrument(skip_all, name = "mark_substructure", fields(query = query))]
pub fn mark_substructure<M>(
    structure: &mut Structure,
    query: &str,
    matcher: &M,
) -> Result<usize, EngineError>
where
    M: SubstructureMatcher + ?Sized,
{
    let matches = matcher.match_substructure(structure, query)?;
    if let Some(&bad) = matches
        .iter()
        .flatten()
        .find(|&&i| structure.atom_at(i).is_none())
    {
        return Err(EngineError::Matcher(format!(
            "match for '{query}' refers to atom {bad}, outside the structure of {} atoms",
            structure.len()
        )));
    }

    for (partition, indices) in matches.iter().enumerate() {
        for &i in indices {
            if let Some(atom) = structure.atom_at_mut(i) {
                atom.properties.substructure = Some(partition);
            }
        }
    }

    info!(matches = matches.len(), "Marked substructure matches.");
    Ok(matches.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::element::Element;
    use crate::core::topology::registry::TopologyMap;
    use crate::engine::config::DissociationConfigBuilder;
    use crate::engine::traits::{FixedDistance, NoMatcher};
    use nalgebra::Point3;
    use std::sync::Mutex;

    /// A 3x3 Cd grid (residue 1, atoms 1-9, spacing 2) with one O-H ligand above
    /// each corner atom. Ligands are residues 2-5 with anchors at 10, 12, 14, 16.
    fn create_structure() -> Structure {
        let mut structure = Structure::new();
        for x in 0..3 {
            for y in 0..3 {
                structure.add_atom(Atom::new(
                    Element::Cd,
                    Point3::new(2.0 * x as f64, 2.0 * y as f64, 0.0),
                    1,
                ));
            }
        }
        let corners = [(0.0, 0.0), (0.0, 4.0), (4.0, 0.0), (4.0, 4.0)];
        for (r, (x, y)) in corners.into_iter().enumerate() {
            let residue = r as isize + 2;
            structure.add_atom(Atom::new(Element::O, Point3::new(x, y, 1.0), residue).anchored());
            structure.add_atom(Atom::new(Element::H, Point3::new(x, y, 2.0), residue));
        }
        structure
    }

    #[test]
    fn run_with_explicit_core_indices_uses_closest_pairs() {
        let config = DissociationConfigBuilder::new()
            .ligand_count(1)
            .core_indices(vec![1, 9])
            .max_core_dist(2.5)
            .build()
            .unwrap();

        let plan = run(
            create_structure(),
            &config,
            &FixedDistance(1.0),
            &NoMatcher,
            &ProgressReporter::silent(),
        )
        .unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.combinations[0].core, vec![1]);
        assert_eq!(plan.combinations[0].ligands, vec![vec![10, 11], vec![12, 13]]);
        assert_eq!(plan.combinations[1].core, vec![9]);
        assert_eq!(plan.combinations[1].ligands[0], vec![16, 17]);

        let structures: Vec<Structure> = plan.structures().collect();
        assert_eq!(structures.len(), 2);
        assert!(structures.iter().all(|s| s.len() == 12));
        assert_eq!(structures[0].properties.core_topology.as_deref(), Some("0_neighbours_1"));
    }

    #[test]
    fn run_with_core_element_filters_bulk_and_uses_distance_pairs() {
        let topology: TopologyMap = [(2, "vertice"), (3, "edge")].into_iter().collect();
        let config = DissociationConfigBuilder::new()
            .ligand_count(1)
            .core_element(Element::Cd)
            .max_lig_dist(1.5)
            .topology(topology)
            .build()
            .unwrap();

        let plan = run(
            create_structure(),
            &config,
            &FixedDistance(2.5),
            &NoMatcher,
            &ProgressReporter::silent(),
        )
        .unwrap();

        // The grid centre is bulk; only the four corners have a ligand in range.
        assert!(!plan.dissociater.core_idx().contains(&4));
        assert_eq!(plan.dissociater.core_idx().len(), 8);
        let cores: Vec<usize> = plan.combinations.iter().map(|c| c.core[0]).collect();
        assert_eq!(cores, vec![1, 3, 7, 9]);

        let first = plan.structures().next().unwrap();
        assert_eq!(first.properties.df_index.as_deref(), Some("vertice_12"));
    }

    #[test]
    fn run_reports_phases_in_order() {
        let config = DissociationConfigBuilder::new()
            .ligand_count(1)
            .core_indices(vec![1])
            .max_core_dist(2.5)
            .build()
            .unwrap();
        let events = Mutex::new(Vec::new());
        let reporter =
            ProgressReporter::with_callback(Box::new(|e| events.lock().unwrap().push(e)));

        run(create_structure(), &config, &FixedDistance(1.0), &NoMatcher, &reporter).unwrap();
        drop(reporter);
        let events = events.into_inner().unwrap();

        let phases: Vec<&'static str> = events
            .iter()
            .filter_map(|e| match e {
                Progress::PhaseStart { name } => Some(*name),
                _ => None,
            })
            .collect();
        assert_eq!(phases, vec!["Preparation", "Topology", "Pairing", "Expansion"]);
        assert!(events.contains(&Progress::CoreSelected { count: 1 }));
        assert!(events.contains(&Progress::PairsFound { count: 1 }));
    }

    #[test]
    fn run_rejects_missing_core_element() {
        let config = DissociationConfigBuilder::new()
            .ligand_count(1)
            .core_element(Element::Pb)
            .build()
            .unwrap();

        let result = run(
            create_structure(),
            &config,
            &FixedDistance(2.5),
            &NoMatcher,
            &ProgressReporter::silent(),
        );
        assert!(matches!(
            result,
            Err(EngineError::InvalidArgument { name: "core", .. })
        ));
    }

    #[test]
    fn run_with_core_query_requires_a_matcher() {
        let config = DissociationConfigBuilder::new()
            .ligand_count(1)
            .core_indices(vec![1])
            .core_query("[Cd]")
            .max_core_dist(2.5)
            .build()
            .unwrap();

        let result = run(
            create_structure(),
            &config,
            &FixedDistance(1.0),
            &NoMatcher,
            &ProgressReporter::silent(),
        );
        assert!(matches!(result, Err(EngineError::Matcher(_))));
    }

    #[test]
    fn mark_substructure_labels_matches_in_order() {
        fn oh_groups(_: &Structure, _: &str) -> Result<Vec<Vec<usize>>, EngineError> {
            Ok(vec![vec![10, 11], vec![12, 13]])
        }

        let mut structure = create_structure();
        let count = mark_substructure(&mut structure, "[OH]", &oh_groups).unwrap();

        assert_eq!(count, 2);
        assert_eq!(structure.atom_at(10).unwrap().properties.substructure, Some(0));
        assert_eq!(structure.atom_at(13).unwrap().properties.substructure, Some(1));
        assert_eq!(structure.atom_at(14).unwrap().properties.substructure, None);
    }

    #[test]
    fn mark_substructure_leaves_structure_untouched_on_bad_match() {
        fn bad_matches(_: &Structure, _: &str) -> Result<Vec<Vec<usize>>, EngineError> {
            Ok(vec![vec![1], vec![99]])
        }

        let mut structure = create_structure();
        let result = mark_substructure(&mut structure, "[Cd]", &bad_matches);

        assert!(matches!(result, Err(EngineError::Matcher(_))));
        assert_eq!(structure.atom_at(1).unwrap().properties.substructure, None);
    }
}
