use crate::core::utils::geometry::centroid;
use crate::engine::context::CoreContext;
use tracing::{debug, info, instrument};

/// Removes core atoms located in the bulk of the core.
///
/// For every core atom the vector towards the centroid of its neighbouring core
/// atoms is computed. Atoms surrounded in a (nearly) spherical pattern produce a
/// vector close to zero and are dropped; atoms whose vector is longer than
/// `max_vec_len` lie on the surface and are kept. Atoms without any neighbour
/// are kept unconditionally.
///
/// Returns the retained 0-based indices, still sorted ascending.
#[instrument(skip_all, name = "bulk_filter_task", fields(max_vec_len = max_vec_len))]
pub fn run(context: &CoreContext, max_vec_len: f64) -> Vec<usize> {
    let neighbours = context.core_neighbours();

    let retained: Vec<usize> = context
        .core_idx
        .iter()
        .zip(&neighbours)
        .filter(|&(&atom, neighbour_slots)| {
            let position = &context.positions[atom];
            let neighbour_positions = neighbour_slots
                .iter()
                .map(|&slot| &context.positions[context.core_idx[slot]]);

            match centroid(neighbour_positions) {
                None => {
                    debug!(atom, "Core atom has no neighbours; keeping it as a surface atom.");
                    true
                }
                Some(mean) => (position - mean).norm() > max_vec_len,
            }
        })
        .map(|(&atom, _)| atom)
        .collect();

    info!(
        before = context.core_idx.len(),
        after = retained.len(),
        "Removed bulk core atoms."
    );
    retained
}
