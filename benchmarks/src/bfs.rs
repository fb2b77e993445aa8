use rodinia::fixture::{self, Format, Manifest};
use rodinia::{graph, shortest_hop_counts, Graph, UNREACHED};
use serde::{Deserialize, Serialize};
use std::path::Path;
use utils::diff::Mismatch;

pub const BENCHMARK: &str = "bfs";

pub const OFFSETS: &str = "offsets";
pub const EDGES: &str = "edges";
pub const COSTS: &str = "costs";
pub const LEVELS: &str = "levels";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Graph(#[from] graph::Error),
    #[error(transparent)]
    Fixture(#[from] fixture::Error),
    #[error("fixture was generated for benchmark {0:?}")]
    UnexpectedBenchmark(String),
    #[error("have {have} levels but the fixture has {want} vertices")]
    Length { have: usize, want: usize },
    #[error("manifest records {want} for {field} but the buffers hold {have}")]
    Inconsistent {
        field: &'static str,
        have: usize,
        want: usize,
    },
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    pub num_vertices: usize,
    pub degree: usize,
    pub source: usize,
    /// Whether a uniform edge cost buffer is part of the fixture.
    pub costs: bool,
}

/// Manifest entry of a bfs fixture.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(flatten)]
    pub parameters: Parameters,
    /// Number of undirected edges.
    pub num_edges: usize,
    pub max_degree: usize,
}

/// Input graph and expected levels of the bfs benchmark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub parameters: Parameters,
    pub graph: Graph,
    pub levels: Vec<u32>,
}

impl Fixture {
    pub fn generate(parameters: Parameters) -> Result<Self, Error> {
        let mut graph = Graph::generate(parameters.num_vertices, parameters.degree)?;
        if parameters.costs {
            graph = graph.with_unit_costs();
        }
        let levels = shortest_hop_counts(&graph, parameters.source)?;
        Ok(Self {
            parameters,
            graph,
            levels,
        })
    }

    #[must_use]
    pub fn metadata(&self) -> Metadata {
        Metadata {
            parameters: self.parameters,
            num_edges: self.graph.num_edges(),
            max_degree: self.graph.max_degree(),
        }
    }

    /// Writes all buffers and the manifest into `dir`.
    pub fn write(&self, dir: impl AsRef<Path>, format: Format) -> Result<Manifest<Metadata>, Error> {
        let dir = dir.as_ref();
        let mut manifest = Manifest::new(BENCHMARK, format, self.metadata());
        manifest.write_buffer(dir, OFFSETS, self.graph.offsets())?;
        manifest.write_buffer(dir, EDGES, self.graph.edges())?;
        if let Some(costs) = self.graph.costs() {
            manifest.write_buffer(dir, COSTS, costs)?;
        }
        manifest.write_buffer(dir, LEVELS, &self.levels)?;
        manifest.write(dir)?;
        Ok(manifest)
    }

    pub fn load(dir: impl AsRef<Path>) -> Result<Self, Error> {
        let dir = dir.as_ref();
        let manifest: Manifest<Metadata> = Manifest::read(dir)?;
        if manifest.benchmark != BENCHMARK {
            return Err(Error::UnexpectedBenchmark(manifest.benchmark));
        }
        let offsets = manifest.read_buffer(dir, OFFSETS)?;
        let edges = manifest.read_buffer(dir, EDGES)?;
        let mut graph = Graph::from_csr(offsets, edges)?;
        if graph.num_edges() != manifest.parameters.num_edges {
            return Err(Error::Inconsistent {
                field: "num_edges",
                have: graph.num_edges(),
                want: manifest.parameters.num_edges,
            });
        }
        if manifest.buffer(COSTS).is_some() {
            graph = graph.with_costs(manifest.read_buffer(dir, COSTS)?)?;
        }
        let levels = manifest.read_buffer(dir, LEVELS)?;
        if levels.len() != graph.num_vertices() {
            return Err(Error::Length {
                have: levels.len(),
                want: graph.num_vertices(),
            });
        }
        Ok(Self {
            parameters: manifest.parameters.parameters,
            graph,
            levels,
        })
    }

    /// Buffers the bfs kernels expect before their first launch.
    #[must_use]
    pub fn kernel_inputs(&self) -> KernelInputs {
        let num_vertices = self.graph.num_vertices();
        let source = self.parameters.source;
        let mut inputs = KernelInputs {
            mask: vec![0; num_vertices],
            updating_mask: vec![0; num_vertices],
            visited: vec![0; num_vertices],
            cost: vec![UNREACHED; num_vertices],
        };
        if source < num_vertices {
            inputs.mask[source] = 1;
            inputs.visited[source] = 1;
            inputs.cost[source] = 0;
        }
        inputs
    }
}

/// Device buffers primed for a level-synchronous bfs launch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KernelInputs {
    /// Vertices expanded in the current iteration.
    pub mask: Vec<u32>,
    /// Vertices discovered during the current iteration.
    pub updating_mask: Vec<u32>,
    pub visited: Vec<u32>,
    /// Output hop counts.
    pub cost: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub checked: usize,
    pub num_mismatches: usize,
    /// The first mismatches, in vertex order.
    pub mismatches: Vec<Mismatch<u32>>,
}

impl Report {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.num_mismatches == 0
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} levels match",
            self.checked - self.num_mismatches,
            self.checked
        )?;
        for mismatch in &self.mismatches {
            write!(f, "\n  {mismatch}")?;
        }
        if self.num_mismatches > self.mismatches.len() {
            write!(
                f,
                "\n  ... and {} more",
                self.num_mismatches - self.mismatches.len()
            )?;
        }
        Ok(())
    }
}

/// Compares levels computed by a kernel run against the expected levels.
pub fn validate(have: &[u32], want: &[u32], max_reported: usize) -> Result<Report, Error> {
    if have.len() != want.len() {
        return Err(Error::Length {
            have: have.len(),
            want: want.len(),
        });
    }
    let mut mismatches = Vec::new();
    let mut num_mismatches = 0;
    for mismatch in utils::diff::mismatches(have, want) {
        if mismatches.len() < max_reported {
            mismatches.push(mismatch);
        }
        num_mismatches += 1;
    }
    if num_mismatches > 0 {
        log::warn!("{num_mismatches} of {} levels differ", want.len());
    }
    Ok(Report {
        checked: want.len(),
        num_mismatches,
        mismatches,
    })
}
