use crate::core::utils::geometry::{argsort_row, norm};
use crate::engine::context::CoreContext;
use crate::engine::error::EngineError;
use itertools::Itertools;
use tracing::{debug, info, instrument, warn};

/// One core atom associated with the ligand anchors to dissociate alongside it.
///
/// All indices are 1-based atom indices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairRecord {
    pub core: usize,
    pub ligands: Vec<usize>,
}

impl PairRecord {
    pub fn new(core: usize, ligands: Vec<usize>) -> Self {
        Self { core, ligands }
    }
}

/// Pairs every core atom with its closest ligand anchors.
///
/// * `n_pairs == 1`: one record per core atom holding its two nearest ligands.
/// * `n_pairs > 1`: the `n_pairs + ligand_count` nearest ligands form a candidate
///   pool; all `ligand_count`-sized subsets of the pool are ranked by the norm of
///   their distances and the `n_pairs` best are emitted, best first. Ties keep
///   enumeration order.
///
/// `lig_idx` holds sorted 0-based ligand anchor indices.
#[instrument(skip_all, name = "closest_pairs_task", fields(n_pairs = n_pairs))]
pub fn closest(
    context: &CoreContext,
    lig_idx: &[usize],
    n_pairs: usize,
) -> Result<Vec<PairRecord>, EngineError> {
    if n_pairs == 0 {
        return Err(EngineError::invalid_argument(
            "n_pairs",
            "the number of pairs per core atom must be larger than 0",
        ));
    }
    if lig_idx.is_empty() {
        warn!("No ligand anchors supplied; no core/ligand pairs can be formed.");
        return Ok(Vec::new());
    }

    let n = context.ligand_count;
    let dist = context.distances_to(lig_idx);
    let mut pairs = Vec::new();

    for (row, &core) in context.core_idx.iter().enumerate() {
        let order = argsort_row(&dist, row);

        if n_pairs == 1 {
            let ligands = order.iter().take(2).map(|&col| lig_idx[col] + 1).collect();
            pairs.push(PairRecord::new(core + 1, ligands));
            continue;
        }

        let pool = &order[..n_pairs.saturating_add(n).min(order.len())];
        let mut scored: Vec<(f64, Vec<usize>)> = pool
            .iter()
            .copied()
            .combinations(n)
            .map(|subset| {
                let distances: Vec<f64> = subset.iter().map(|&col| dist[(row, col)]).collect();
                (norm(&distances), subset)
            })
            .collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));

        debug!(
            core = core + 1,
            candidates = scored.len(),
            "Ranked ligand subsets by distance norm."
        );

        pairs.extend(scored.into_iter().take(n_pairs).map(|(_, subset)| {
            PairRecord::new(core + 1, subset.iter().map(|&col| lig_idx[col] + 1).collect())
        }));
    }

    info!(pairs = pairs.len(), "Identified closest core/ligand pairs.");
    Ok(pairs)
}

/// Pairs every core atom with all ligand combinations within `max_pair_dist`.
///
/// Ligands strictly closer than `max_pair_dist` qualify; a core atom never pairs
/// with itself. Core atoms with fewer than `ligand_count` qualifying ligands are
/// skipped, all others yield one record per `ligand_count`-sized combination of
/// their qualifying ligands, in ascending index order.
///
/// `lig_idx` holds sorted 0-based ligand anchor indices.
#[instrument(skip_all, name = "distance_pairs_task", fields(max_pair_dist = max_pair_dist))]
pub fn within_distance(
    context: &CoreContext,
    lig_idx: &[usize],
    max_pair_dist: f64,
) -> Result<Vec<PairRecord>, EngineError> {
    if !max_pair_dist.is_finite() || max_pair_dist <= 0.0 {
        return Err(EngineError::invalid_argument(
            "max_pair_dist",
            format!("expected a finite, positive distance, got {max_pair_dist}"),
        ));
    }

    let n = context.ligand_count;
    let dist = context.distances_to(lig_idx);
    let mut pairs = Vec::new();

    for (row, &core) in context.core_idx.iter().enumerate() {
        let qualifying: Vec<usize> = lig_idx
            .iter()
            .enumerate()
            .filter(|&(col, &lig)| lig != core && dist[(row, col)] < max_pair_dist)
            .map(|(_, &lig)| lig + 1)
            .collect();

        if qualifying.len() < n {
            debug!(
                core = core + 1,
                qualifying = qualifying.len(),
                "Too few ligands in range; skipping core atom."
            );
            continue;
        }

        pairs.extend(
            qualifying
                .into_iter()
                .combinations(n)
                .map(|ligands| PairRecord::new(core + 1, ligands)),
        );
    }

    info!(pairs = pairs.len(), "Identified core/ligand pairs within range.");
    Ok(pairs)
}
