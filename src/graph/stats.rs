use super::build::VariationGraph;
use super::node::VariationType;
use std::collections::{HashMap, VecDeque};

/// Frequency mass of one group inside the reference component, split by
/// outcome class.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupFreqTotals {
    pub group: String,
    pub reference: f64,
    pub non_reference: f64,
    pub insertion: f64,
    pub deletion: f64,
}

/// Summary of the connected component containing the reference node. All
/// aggregate fields are `None` when the reference node is absent or the
/// component is trivial; counts degrade to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphStats {
    pub num_nodes: Option<usize>,
    pub num_edges: Option<usize>,
    pub avg_degree: Option<f64>,
    pub avg_dist_ref: Option<f64>,
    pub max_dist_ref: Option<usize>,
    pub avg_pair_dist: Option<f64>,
    pub max_pair_dist: Option<usize>,
    pub num_insertion: usize,
    pub num_deletion: usize,
    pub num_substitution: usize,
    pub num_mixed: usize,
    pub freq_totals: Vec<GroupFreqTotals>,
}

impl GraphStats {
    fn empty(graph: &VariationGraph) -> GraphStats {
        GraphStats {
            num_nodes: None,
            num_edges: None,
            avg_degree: None,
            avg_dist_ref: None,
            max_dist_ref: None,
            avg_pair_dist: None,
            max_pair_dist: None,
            num_insertion: 0,
            num_deletion: 0,
            num_substitution: 0,
            num_mixed: 0,
            freq_totals: graph
                .layout
                .groups()
                .iter()
                .map(|group| GroupFreqTotals {
                    group: group.to_string(),
                    reference: 0.0,
                    non_reference: 0.0,
                    insertion: 0.0,
                    deletion: 0.0,
                })
                .collect(),
        }
    }
}

/// Computes statistics over the connected component containing the reference
/// node. Never raises: a missing reference node or a trivial component gives
/// a degraded summary.
pub fn compute_stats(graph: &VariationGraph) -> GraphStats {
    let mut stats = GraphStats::empty(graph);

    let ref_id = match graph.nodes.iter().find(|n| n.is_ref) {
        Some(node) => node.id,
        None => return stats,
    };

    let mut adjacency: HashMap<usize, Vec<usize>> = HashMap::new();
    for edge in &graph.edges {
        adjacency.entry(edge.id_a).or_default().push(edge.id_b);
        adjacency.entry(edge.id_b).or_default().push(edge.id_a);
    }

    let component = bfs_distances(&adjacency, ref_id);
    let component_nodes: Vec<_> = graph
        .nodes
        .iter()
        .filter(|n| component.contains_key(&n.id))
        .collect();
    let num_nodes = component_nodes.len();
    let num_edges = graph
        .edges
        .iter()
        .filter(|e| component.contains_key(&e.id_a))
        .count();

    stats.num_nodes = Some(num_nodes);
    stats.num_edges = Some(num_edges);
    for node in &component_nodes {
        match node.variation_type {
            VariationType::Insertion => stats.num_insertion += 1,
            VariationType::Deletion => stats.num_deletion += 1,
            VariationType::Substitution => stats.num_substitution += 1,
            VariationType::Mixed => stats.num_mixed += 1,
            VariationType::None => {}
        }
    }

    for (index, totals) in stats.freq_totals.iter_mut().enumerate() {
        for node in &component_nodes {
            let freq = node.freqs.get(index).copied().unwrap_or(0.0);
            if node.is_ref {
                totals.reference += freq;
            } else {
                totals.non_reference += freq;
            }
            match node.variation_type {
                VariationType::Insertion => totals.insertion += freq,
                VariationType::Deletion => totals.deletion += freq,
                _ => {}
            }
        }
    }

    if num_nodes <= 1 {
        return stats;
    }

    stats.avg_degree = Some(2.0 * num_edges as f64 / num_nodes as f64);
    stats.avg_dist_ref = Some(
        component_nodes.iter().map(|n| n.dist_ref as f64).sum::<f64>() / num_nodes as f64,
    );
    stats.max_dist_ref = component_nodes.iter().map(|n| n.dist_ref).max();

    // All-pairs shortest paths within the component, one BFS per node.
    let mut pair_dist_sum = 0usize;
    let mut pair_count = 0usize;
    let mut max_pair_dist = 0usize;
    let ids: Vec<usize> = component_nodes.iter().map(|n| n.id).collect();
    for &source in &ids {
        let distances = bfs_distances(&adjacency, source);
        for &target in &ids {
            if target <= source {
                continue;
            }
            let dist = distances[&target];
            pair_dist_sum += dist;
            pair_count += 1;
            max_pair_dist = max_pair_dist.max(dist);
        }
    }
    stats.avg_pair_dist = Some(pair_dist_sum as f64 / pair_count as f64);
    stats.max_pair_dist = Some(max_pair_dist);

    stats
}

fn bfs_distances(adjacency: &HashMap<usize, Vec<usize>>, source: usize) -> HashMap<usize, usize> {
    let mut distances = HashMap::from([(source, 0)]);
    let mut queue = VecDeque::from([source]);
    while let Some(id) = queue.pop_front() {
        let dist = distances[&id];
        for &next in adjacency.get(&id).into_iter().flatten() {
            if !distances.contains_key(&next) {
                distances.insert(next, dist + 1);
                queue.push_back(next);
            }
        }
    }
    distances
}
