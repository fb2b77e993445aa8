//! Compressed sparse row (CSR) adjacency graph.
//!
//! The neighbors of vertex `v` are `edges[offsets[v]..offsets[v + 1]]`, and
//! `offsets[num_vertices] == edges.len()`. Offsets and targets are 32 bit
//! words, matching the buffers handed to the GPU kernels.

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("source vertex {vertex} is out of range for {num_vertices} vertices")]
    InvalidSource { vertex: usize, num_vertices: usize },
    #[error("frontier holds invalid vertex {0}")]
    InvalidVertex(i64),
    #[error("graph with {num_vertices} vertices and degree {degree} does not fit 32 bit buffers")]
    TooLarge { num_vertices: usize, degree: usize },
    #[error("invalid CSR: {0}")]
    InvalidCsr(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Graph {
    num_vertices: usize,
    num_edges: usize,
    max_degree: usize,
    offsets: Vec<u32>,
    edges: Vec<u32>,
    costs: Option<Vec<u32>>,
}

impl Default for Graph {
    fn default() -> Self {
        Self {
            num_vertices: 0,
            num_edges: 0,
            max_degree: 0,
            offsets: vec![0],
            edges: Vec::new(),
            costs: None,
        }
    }
}

impl Graph {
    /// An empty graph without vertices.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates a tree-like graph where vertex `v` links to its children
    /// `v * degree + 1 ..= v * degree + degree` and back to its parent
    /// `(v - 1) / degree`.
    ///
    /// The result only depends on `num_vertices` and `degree`.
    pub fn generate(num_vertices: usize, degree: usize) -> Result<Self, Error> {
        let mut graph = Self::new();
        graph.populate(num_vertices, degree)?;
        Ok(graph)
    }

    /// Regenerates the graph in place, reusing the existing buffers.
    ///
    /// A degree of zero yields a graph without edges. Edge costs are dropped.
    pub fn populate(&mut self, num_vertices: usize, degree: usize) -> Result<(), Error> {
        let too_large = || Error::TooLarge {
            num_vertices,
            degree,
        };
        degree
            .checked_add(1)
            .and_then(|per_vertex| num_vertices.checked_mul(per_vertex))
            .filter(|&len| u32::try_from(len).is_ok())
            .ok_or_else(too_large)?;
        u32::try_from(num_vertices).map_err(|_| too_large())?;

        // children at k >= num_vertices are out of range for every vertex
        let children = degree.min(num_vertices);
        let capacity = num_vertices * (children + 1);

        self.offsets.clear();
        self.offsets.reserve_exact(num_vertices + 1);
        self.edges.clear();
        self.edges.reserve_exact(capacity);
        self.costs = None;

        for v in 0..num_vertices {
            self.offsets.push(self.edges.len() as u32);
            for k in 0..children {
                let child = v * degree + k + 1;
                if child < num_vertices {
                    self.edges.push(child as u32);
                }
            }
            if v > 0 && degree > 0 {
                self.edges.push(((v - 1) / degree) as u32);
            }
        }
        self.offsets.push(self.edges.len() as u32);

        self.num_vertices = num_vertices;
        self.num_edges = self.edges.len() / 2;
        self.max_degree = degree + 1;

        log::debug!(
            "generated graph with {} vertices, {} edges (degree={}, adjacency list length={})",
            self.num_vertices,
            self.num_edges,
            degree,
            self.edges.len(),
        );
        Ok(())
    }

    /// Builds a graph from raw CSR buffers.
    pub fn from_csr(offsets: Vec<u32>, edges: Vec<u32>) -> Result<Self, Error> {
        let num_vertices = offsets
            .len()
            .checked_sub(1)
            .ok_or_else(|| Error::InvalidCsr("offsets must not be empty".to_string()))?;
        let mut graph = Self {
            num_vertices,
            num_edges: edges.len() / 2,
            max_degree: 0,
            offsets,
            edges,
            costs: None,
        };
        graph.validate()?;
        graph.max_degree = (0..num_vertices)
            .map(|v| graph.degree(v))
            .max()
            .unwrap_or(0);
        Ok(graph)
    }

    /// Checks the CSR structure.
    pub fn validate(&self) -> Result<(), Error> {
        if self.offsets.len() != self.num_vertices + 1 {
            return Err(Error::InvalidCsr(format!(
                "offsets length {} != num_vertices + 1 = {}",
                self.offsets.len(),
                self.num_vertices + 1
            )));
        }
        if let Some(v) = self
            .offsets
            .windows(2)
            .position(|window| window[0] > window[1])
        {
            return Err(Error::InvalidCsr(format!(
                "offsets decrease at vertex {v}"
            )));
        }
        let last = self.offsets.last().copied().unwrap_or(0) as usize;
        if last != self.edges.len() {
            return Err(Error::InvalidCsr(format!(
                "offsets[{}] = {last} != adjacency list length {}",
                self.num_vertices,
                self.edges.len()
            )));
        }
        if let Some(&target) = self
            .edges
            .iter()
            .find(|&&target| target as usize >= self.num_vertices)
        {
            return Err(Error::InvalidCsr(format!(
                "edge target {target} >= num_vertices {}",
                self.num_vertices
            )));
        }
        if let Some(ref costs) = self.costs {
            if costs.len() != self.edges.len() {
                return Err(Error::InvalidCsr(format!(
                    "{} edge costs for adjacency list length {}",
                    costs.len(),
                    self.edges.len()
                )));
            }
        }
        Ok(())
    }

    /// Attaches a uniform cost of one to every edge.
    #[must_use]
    pub fn with_unit_costs(mut self) -> Self {
        self.costs = Some(vec![1; self.edges.len()]);
        self
    }

    /// Attaches one cost per adjacency list entry.
    pub fn with_costs(mut self, costs: Vec<u32>) -> Result<Self, Error> {
        self.costs = Some(costs);
        self.validate()?;
        Ok(self)
    }

    #[must_use]
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Number of undirected edges.
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    #[must_use]
    pub fn adjacency_list_len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    #[must_use]
    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    #[must_use]
    pub fn edges(&self) -> &[u32] {
        &self.edges
    }

    #[must_use]
    pub fn costs(&self) -> Option<&[u32]> {
        self.costs.as_deref()
    }

    /// Neighbors of `v`, empty if `v` is out of range.
    #[must_use]
    pub fn neighbors(&self, v: usize) -> &[u32] {
        if v >= self.num_vertices {
            return &[];
        }
        let start = self.offsets[v] as usize;
        let end = self.offsets[v + 1] as usize;
        &self.edges[start..end]
    }

    #[must_use]
    pub fn degree(&self, v: usize) -> usize {
        self.neighbors(v).len()
    }

    /// Whether every edge `u -> v` is matched by an edge `v -> u`.
    #[must_use]
    pub fn is_undirected(&self) -> bool {
        (0..self.num_vertices).all(|u| {
            self.neighbors(u)
                .iter()
                .all(|&v| self.neighbors(v as usize).contains(&(u as u32)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, Graph};
    use color_eyre::eyre;

    #[test]
    fn generate_binary_tree() -> eyre::Result<()> {
        let graph = Graph::generate(7, 2)?;
        utils::diff::assert_eq!(
            have: graph.offsets().to_vec(),
            want: vec![0, 2, 5, 8, 9, 10, 11, 12]
        );
        utils::diff::assert_eq!(
            have: graph.edges().to_vec(),
            want: vec![1, 2, 3, 4, 0, 5, 6, 0, 1, 1, 2, 2]
        );
        assert_eq!(graph.num_vertices(), 7);
        assert_eq!(graph.adjacency_list_len(), 12);
        assert_eq!(graph.num_edges(), 6);
        assert_eq!(graph.max_degree(), 3);
        assert_eq!(graph.costs(), None);
        graph.validate()?;
        Ok(())
    }

    #[test]
    fn generation_is_deterministic() -> eyre::Result<()> {
        for (num_vertices, degree) in [(1, 1), (10, 3), (1000, 4), (4097, 16)] {
            let first = Graph::generate(num_vertices, degree)?;
            let second = Graph::generate(num_vertices, degree)?;
            assert_eq!(first, second);
        }
        Ok(())
    }

    #[test]
    fn adjacency_is_symmetric() -> eyre::Result<()> {
        for (num_vertices, degree) in [(2, 1), (7, 2), (100, 3), (1000, 8), (513, 512)] {
            let graph = Graph::generate(num_vertices, degree)?;
            assert!(
                graph.is_undirected(),
                "graph({num_vertices}, {degree}) is not undirected"
            );
            assert_eq!(graph.num_edges(), num_vertices - 1);
        }
        Ok(())
    }

    #[test]
    fn repopulate_reuses_buffers() -> eyre::Result<()> {
        let mut graph = Graph::generate(100, 4)?.with_unit_costs();
        let edges_capacity = graph.edges.capacity();
        graph.populate(50, 4)?;
        assert_eq!(graph, Graph::generate(50, 4)?);
        assert_eq!(graph.edges.capacity(), edges_capacity);
        assert_eq!(graph.costs(), None);
        Ok(())
    }

    #[test]
    fn degree_zero_has_no_edges() -> eyre::Result<()> {
        let graph = Graph::generate(4, 0)?;
        assert_eq!(graph.offsets(), &[0, 0, 0, 0, 0]);
        assert!(graph.edges().is_empty());
        assert_eq!(graph.max_degree(), 1);
        Ok(())
    }

    #[test]
    fn empty_graph() -> eyre::Result<()> {
        let graph = Graph::generate(0, 3)?;
        assert_eq!(graph.offsets(), &[0]);
        assert_eq!(graph.num_vertices(), 0);
        assert!(graph.neighbors(0).is_empty());
        Ok(())
    }

    #[test]
    fn too_large_for_u32() {
        assert_eq!(
            Graph::generate(usize::MAX / 2, 4),
            Err(Error::TooLarge {
                num_vertices: usize::MAX / 2,
                degree: 4
            })
        );
    }

    #[test]
    fn degree_overflow_is_too_large() {
        assert_eq!(
            Graph::generate(1, usize::MAX),
            Err(Error::TooLarge {
                num_vertices: 1,
                degree: usize::MAX
            })
        );
        assert!(matches!(
            Graph::generate(2, u32::MAX as usize),
            Err(Error::TooLarge { .. })
        ));
    }

    #[test]
    fn huge_degree_allocates_by_vertices() -> eyre::Result<()> {
        let graph = Graph::generate(1, u32::MAX as usize - 1)?;
        assert_eq!(graph.offsets(), &[0, 0]);
        assert!(graph.edges().is_empty());

        let graph = Graph::generate(3, 1 << 20)?;
        utils::diff::assert_eq!(have: graph.offsets().to_vec(), want: vec![0, 2, 3, 4]);
        utils::diff::assert_eq!(have: graph.edges().to_vec(), want: vec![1, 2, 0, 0]);
        assert!(graph.is_undirected());
        graph.validate()?;
        Ok(())
    }

    #[test]
    fn new_graph_is_valid() -> eyre::Result<()> {
        let graph = Graph::new();
        graph.validate()?;
        assert_eq!(graph.offsets(), &[0]);
        assert_eq!(graph.num_vertices(), 0);
        assert!(graph.is_undirected());
        Ok(())
    }

    #[test]
    fn from_csr_validates() -> eyre::Result<()> {
        let graph = Graph::from_csr(vec![0, 1, 2, 2], vec![1, 0])?;
        assert_eq!(graph.neighbors(2), &[] as &[u32]);
        assert_eq!(graph.max_degree(), 1);
        assert!(graph.is_undirected());

        assert!(matches!(
            Graph::from_csr(vec![0, 2, 1], vec![1, 0]),
            Err(Error::InvalidCsr(_))
        ));
        assert!(matches!(
            Graph::from_csr(vec![0, 1, 3], vec![1, 0]),
            Err(Error::InvalidCsr(_))
        ));
        assert!(matches!(
            Graph::from_csr(vec![0, 1, 2], vec![1, 5]),
            Err(Error::InvalidCsr(_))
        ));
        assert!(matches!(
            Graph::from_csr(vec![], vec![]),
            Err(Error::InvalidCsr(_))
        ));
        Ok(())
    }

    #[test]
    fn unit_costs_match_edges() -> eyre::Result<()> {
        let graph = Graph::generate(7, 2)?.with_unit_costs();
        assert_eq!(graph.costs().map(<[u32]>::len), Some(12));
        graph.validate()?;

        let graph = Graph::generate(7, 2)?;
        assert!(matches!(
            graph.clone().with_costs(vec![1; 3]),
            Err(Error::InvalidCsr(_))
        ));
        assert_eq!(graph.with_costs(vec![2; 12])?.costs(), Some(&[2; 12][..]));
        Ok(())
    }
}
