mod graph;
mod phase;
mod sample;
mod topology;

pub use graph::{build_edges, build_graph, build_nodes, Edge, EdgeDirection, Graph, Neuron};
pub use phase::{Phase, Variant};
pub use sample::{FixedSource, RandomSource, SampleData, SampleSource};
pub use topology::{NeuronId, Topology};
