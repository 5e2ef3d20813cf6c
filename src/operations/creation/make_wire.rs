use crate::error::{Result, TopologyError};
use crate::topology::{OrientedEdge, TopologyStore, WireData, WireId};

/// Creates a closed wire from a cyclic sequence of oriented edges.
pub struct MakeWire {
    edges: Vec<OrientedEdge>,
}

impl MakeWire {
    /// Creates a new `MakeWire` operation.
    #[must_use]
    pub fn new(edges: Vec<OrientedEdge>) -> Self {
        Self { edges }
    }

    /// Executes the operation, creating the wire in the topology store.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvalidTopology`] for an empty edge list and
    /// [`TopologyError::WireNotClosed`] if an edge does not start where the
    /// previous one ends (the last edge must end where the first starts).
    pub fn execute(&self, store: &mut TopologyStore) -> Result<WireId> {
        if self.edges.is_empty() {
            return Err(TopologyError::InvalidTopology("wire has no edges".into()).into());
        }

        let n = self.edges.len();
        for i in 0..n {
            let curr = &self.edges[i];
            let next = &self.edges[(i + 1) % n];
            let curr_end = store.edge(curr.edge)?.last_vertex(curr.forward);
            let next_start = store.edge(next.edge)?.first_vertex(next.forward);
            if curr_end != next_start {
                return Err(TopologyError::WireNotClosed.into());
            }
        }

        Ok(store.add_wire(WireData {
            edges: self.edges.clone(),
        }))
    }
}
