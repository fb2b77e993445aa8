//! Breadth-first shortest hop counts over a [`Graph`].

use crate::graph::{Error, Graph};
use crate::list::IntList;

/// Hop count of vertices that cannot be reached from the source.
pub const UNREACHED: u32 = u32::MAX;

/// Computes the number of edges on the shortest path from `source` to every
/// vertex of `graph`.
///
/// Unreachable vertices keep [`UNREACHED`]. The frontier is an [`IntList`]
/// used as a FIFO queue. Since all edges have unit weight, the first hop
/// count assigned to a vertex is final.
pub fn shortest_hop_counts(graph: &Graph, source: usize) -> Result<Vec<u32>, Error> {
    let num_vertices = graph.num_vertices();
    if source >= num_vertices {
        return Err(Error::InvalidSource {
            vertex: source,
            num_vertices,
        });
    }

    let mut hops = vec![UNREACHED; num_vertices];
    hops[source] = 0;

    let mut frontier = IntList::new();
    frontier.push_back(source as i64);

    let mut visited = 0;
    while let Some(n) = frontier.pop_front() {
        let n = usize::try_from(n).map_err(|_| Error::InvalidVertex(n))?;
        let next = hops[n] + 1;
        for &nid in graph.neighbors(n) {
            let nid = nid as usize;
            if hops[nid] > next {
                hops[nid] = next;
                frontier.push_back(nid as i64);
            }
        }
        visited += 1;
    }
    frontier.destroy();

    log::debug!(
        "bfs from vertex {source} reached {visited}/{num_vertices} vertices (max depth {:?})",
        hops.iter().filter(|&&hops| hops != UNREACHED).max(),
    );
    Ok(hops)
}

#[cfg(test)]
mod tests {
    use super::{shortest_hop_counts, UNREACHED};
    use crate::graph::{Error, Graph};
    use color_eyre::eyre;

    #[test]
    fn binary_tree_depths() -> eyre::Result<()> {
        crate::testing::init_logging();
        let graph = Graph::generate(7, 2)?;
        let hops = shortest_hop_counts(&graph, 0)?;
        utils::diff::assert_eq!(have: hops, want: vec![0, 1, 1, 2, 2, 2, 2]);
        Ok(())
    }

    #[test]
    fn from_leaf() -> eyre::Result<()> {
        let graph = Graph::generate(7, 2)?;
        let hops = shortest_hop_counts(&graph, 6)?;
        utils::diff::assert_eq!(have: hops, want: vec![2, 3, 1, 4, 4, 2, 0]);
        Ok(())
    }

    #[test]
    fn matches_tree_depth() -> eyre::Result<()> {
        crate::testing::init_logging();
        let degree = 3;
        let graph = Graph::generate(1000, degree)?;
        let hops = shortest_hop_counts(&graph, 0)?;
        for (v, &have) in hops.iter().enumerate() {
            let mut depth = 0;
            let mut u = v;
            while u > 0 {
                u = (u - 1) / degree;
                depth += 1;
            }
            assert_eq!(have, depth, "vertex {v}");
        }
        Ok(())
    }

    #[test]
    fn isolated_vertex_stays_unreached() -> eyre::Result<()> {
        let tree = Graph::generate(7, 2)?;
        let mut offsets = tree.offsets().to_vec();
        offsets.push(tree.adjacency_list_len() as u32);
        let graph = Graph::from_csr(offsets, tree.edges().to_vec())?;
        assert_eq!(graph.num_vertices(), 8);

        let hops = shortest_hop_counts(&graph, 3)?;
        utils::diff::assert_eq!(
            have: hops,
            want: vec![2, 1, 3, 0, 2, 4, 4, UNREACHED]
        );

        let hops = shortest_hop_counts(&graph, 7)?;
        let mut want = vec![UNREACHED; 8];
        want[7] = 0;
        utils::diff::assert_eq!(have: hops, want: want);
        Ok(())
    }

    #[test]
    fn edgeless_graph() -> eyre::Result<()> {
        let graph = Graph::generate(3, 0)?;
        let hops = shortest_hop_counts(&graph, 1)?;
        assert_eq!(hops, vec![UNREACHED, 0, UNREACHED]);
        Ok(())
    }

    #[test]
    fn repeated_runs_are_identical() -> eyre::Result<()> {
        let graph = Graph::generate(500, 5)?;
        assert_eq!(
            shortest_hop_counts(&graph, 42)?,
            shortest_hop_counts(&graph, 42)?
        );
        Ok(())
    }

    #[test]
    fn source_out_of_range() -> eyre::Result<()> {
        let graph = Graph::generate(7, 2)?;
        assert_eq!(
            shortest_hop_counts(&graph, 7),
            Err(Error::InvalidSource {
                vertex: 7,
                num_vertices: 7
            })
        );
        assert!(shortest_hop_counts(&Graph::new(), 0).is_err());
        Ok(())
    }
}
