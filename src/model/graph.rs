use rand::Rng;

use super::{NeuronId, SampleData, Topology, Variant};

/// Which way a connection carries its signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeDirection {
    /// Backprop connection, lower → higher layer.
    Forward,
    /// Predictive coding residual error, lower → higher layer.
    Up,
    /// Predictive coding prediction, higher → lower layer.
    Down,
}

/// A neuron with its illustrative state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neuron {
    pub id: NeuronId,
    pub activation: f32,
    pub error: f32,
}

/// A directed connection between neurons of adjacent layers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub source: NeuronId,
    pub target: NeuronId,
    pub direction: EdgeDirection,
    /// Decorative only.
    pub weight: f32,
}

impl Edge {
    /// Index of the layer boundary this edge crosses (its lower layer).
    pub fn boundary(&self) -> usize {
        self.source.layer.min(self.target.layer)
    }
}

/// Nodes and edges for one topology/variant pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    variant: Variant,
    nodes: Vec<Neuron>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn nodes(&self) -> &[Neuron] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn contains(&self, id: NeuronId) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// Same connectivity, node state taken from `data`.
    pub fn with_data(&self, topology: &Topology, data: &SampleData) -> Graph {
        Graph {
            variant: self.variant,
            nodes: build_nodes(topology, data),
            edges: self.edges.clone(),
        }
    }
}

/// Builds nodes and edges for `topology` under `variant`.
pub fn build_graph<R>(
    topology: &Topology,
    variant: Variant,
    data: &SampleData,
    rng: &mut R,
) -> Graph
where
    R: Rng,
{
    Graph {
        variant,
        nodes: build_nodes(topology, data),
        edges: build_edges(topology, variant, rng),
    }
}

/// One node per `(layer, index)` in layer/index order.
pub fn build_nodes(topology: &Topology, data: &SampleData) -> Vec<Neuron> {
    topology
        .neurons()
        .map(|id| Neuron {
            id,
            activation: data.activation(id),
            error: data.error(id),
        })
        .collect()
}

/// Dense adjacent-layer connectivity; doubled (up + down) for predictive coding.
pub fn build_edges<R>(topology: &Topology, variant: Variant, rng: &mut R) -> Vec<Edge>
where
    R: Rng,
{
    let per_direction = topology.dense_connection_count();
    let capacity = match variant {
        Variant::Backprop => per_direction,
        Variant::Predictive => 2 * per_direction,
    };
    let mut edges = Vec::with_capacity(capacity);

    let sizes = topology.sizes();
    for layer in 0..topology.boundary_count() {
        for j in 0..sizes[layer] {
            for k in 0..sizes[layer + 1] {
                let lower = NeuronId::new(layer, j);
                let higher = NeuronId::new(layer + 1, k);

                match variant {
                    Variant::Backprop => edges.push(Edge {
                        source: lower,
                        target: higher,
                        direction: EdgeDirection::Forward,
                        weight: rng.random(),
                    }),
                    Variant::Predictive => {
                        edges.push(Edge {
                            source: lower,
                            target: higher,
                            direction: EdgeDirection::Up,
                            weight: rng.random(),
                        });
                        edges.push(Edge {
                            source: higher,
                            target: lower,
                            direction: EdgeDirection::Down,
                            weight: rng.random(),
                        });
                    }
                }
            }
        }
    }

    edges
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::model::RandomSource;
    use crate::model::SampleSource;

    fn topologies() -> Vec<Topology> {
        [vec![1], vec![3, 4, 4, 2], vec![1, 1], vec![5, 1, 7], vec![2, 3, 4, 5, 6]]
            .into_iter()
            .map(|s| Topology::new(s).unwrap())
            .collect()
    }

    #[test]
    fn node_and_edge_counts() {
        let mut rng = StdRng::seed_from_u64(1);
        for t in topologies() {
            let data = RandomSource::new(Some(3)).sample(&t);
            let bp = build_graph(&t, Variant::Backprop, &data, &mut rng);
            let pc = build_graph(&t, Variant::Predictive, &data, &mut rng);

            assert_eq!(bp.nodes().len(), t.neuron_count());
            assert_eq!(pc.nodes().len(), t.neuron_count());
            assert_eq!(bp.edges().len(), t.dense_connection_count());
            assert_eq!(pc.edges().len(), 2 * t.dense_connection_count());
        }
    }

    #[test]
    fn no_dangling_edges() {
        let mut rng = StdRng::seed_from_u64(2);
        for t in topologies() {
            for variant in [Variant::Backprop, Variant::Predictive] {
                let g = build_graph(&t, variant, &SampleData::default(), &mut rng);
                for e in g.edges() {
                    assert!(g.contains(e.source), "{t} {variant}: {}", e.source);
                    assert!(g.contains(e.target), "{t} {variant}: {}", e.target);
                    assert_eq!(e.source.layer.abs_diff(e.target.layer), 1);
                }
            }
        }
    }

    #[test]
    fn one_edge_per_pair_per_direction() {
        let t = Topology::default();
        let mut rng = StdRng::seed_from_u64(3);
        let g = build_graph(&t, Variant::Predictive, &SampleData::default(), &mut rng);

        let mut seen = HashSet::new();
        for e in g.edges() {
            assert!(seen.insert((e.source, e.target, e.direction)));
        }

        let up = g.edges().iter().filter(|e| e.direction == EdgeDirection::Up);
        let down = g.edges().iter().filter(|e| e.direction == EdgeDirection::Down);
        assert!(up.clone().all(|e| e.target.layer == e.source.layer + 1));
        assert!(down.clone().all(|e| e.source.layer == e.target.layer + 1));
        assert_eq!(up.count(), 36);
        assert_eq!(down.count(), 36);
    }

    #[test]
    fn backprop_edges_point_forward() {
        let t = Topology::default();
        let mut rng = StdRng::seed_from_u64(4);
        let g = build_graph(&t, Variant::Backprop, &SampleData::default(), &mut rng);
        assert!(g.edges().iter().all(|e| {
            e.direction == EdgeDirection::Forward && e.target.layer == e.source.layer + 1
        }));
        assert!(g.edges().iter().all(|e| (0.0..1.0).contains(&e.weight)));
    }

    #[test]
    fn nodes_carry_data_in_order() {
        let t = Topology::new(vec![2, 1]).unwrap();
        let data = SampleData {
            activations: vec![vec![0.1, 0.2], vec![0.3]],
            errors: vec![vec![0.05]],
        };
        let nodes = build_nodes(&t, &data);
        let ids: Vec<_> = nodes.iter().map(|n| (n.id.layer, n.id.index)).collect();
        assert_eq!(ids, [(0, 0), (0, 1), (1, 0)]);
        assert_eq!(nodes[2].activation, 0.3);
        assert_eq!(nodes[0].error, 0.05);
        assert_eq!(nodes[1].error, 0.0);
    }

    #[test]
    fn with_data_keeps_edges() {
        let t = Topology::default();
        let mut rng = StdRng::seed_from_u64(5);
        let g = build_graph(&t, Variant::Backprop, &SampleData::default(), &mut rng);
        let data = RandomSource::new(Some(1)).sample(&t);
        let h = g.with_data(&t, &data);
        assert_eq!(g.edges(), h.edges());
        assert_ne!(g.nodes(), h.nodes());
    }
}
