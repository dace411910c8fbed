use crate::core::topology::registry::TopologyMap;
use crate::engine::context::CoreContext;
use tracing::{info, instrument, trace};

/// Number of other core atoms within `max_dist` of each core atom.
pub fn neighbour_counts(context: &CoreContext) -> Vec<usize> {
    context
        .core_neighbours()
        .iter()
        .map(Vec::len)
        .collect()
}

/// Computes a topology descriptor for every core atom, in `core_idx` order.
///
/// Counts absent from `topology` are described as `"<count>_neighbours"`;
/// a core atom without neighbours receives the label for count `0`.
#[instrument(skip_all, name = "topology_task")]
pub fn run(context: &CoreContext, topology: &TopologyMap) -> Vec<String> {
    let labels: Vec<String> = neighbour_counts(context)
        .into_iter()
        .zip(context.core_idx)
        .map(|(count, &atom)| {
            let label = topology.label(count);
            trace!(atom, count, label = %label, "Assigned core topology.");
            label
        })
        .collect();

    info!(
        core_atoms = labels.len(),
        max_dist = context.max_dist,
        "Assigned topology descriptors."
    );
    labels
}
