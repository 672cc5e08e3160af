use super::distance::unit_distance;
use super::node::{EdgeType, GraphEdge, GraphNode, GroupLayout, VariationType};
use crate::align::{count_variations, degap, AlignmentPair};
use crate::dedup::WindowedTable;
use crate::utils::Result;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::collections::HashMap;

/// A windowed variant with one frequency per experimental group (repeat
/// libraries already averaged out).
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedVariant {
    pub ref_align: String,
    pub read_align: String,
    pub freqs: Vec<f64>,
}

/// Frequency-filtered input to the graph builder.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphInput {
    pub layout: GroupLayout,
    pub variants: Vec<GroupedVariant>,
}

impl GraphInput {
    /// One experimental group: each variant's frequency is the mean over the
    /// group's repeat libraries.
    pub fn individual(table: &WindowedTable, group: String) -> GraphInput {
        let variants = table
            .variants
            .iter()
            .map(|v| GroupedVariant {
                ref_align: v.ref_align.clone(),
                read_align: v.read_align.clone(),
                freqs: vec![mean(&v.freqs)],
            })
            .collect();
        GraphInput {
            layout: GroupLayout::Individual { group },
            variants,
        }
    }

    /// Two experimental groups joined on de-gapped read sequence; a variant
    /// absent from one group carries frequency zero there.
    pub fn comparison(
        table_a: &WindowedTable,
        table_b: &WindowedTable,
        group_a: String,
        group_b: String,
    ) -> Result<GraphInput> {
        let window_a = table_a.variants.first().map(|v| degap(&v.ref_align));
        let window_b = table_b.variants.first().map(|v| degap(&v.ref_align));
        if let (Some(a), Some(b)) = (&window_a, &window_b) {
            if a != b {
                return Err(format!(
                    "Cannot compare tables with different reference windows: {} vs {}",
                    a, b
                ));
            }
        }

        let mut merged: Vec<GroupedVariant> = Vec::new();
        let mut index_of: HashMap<String, usize> = HashMap::new();
        for variant in &table_a.variants {
            index_of.insert(degap(&variant.read_align), merged.len());
            merged.push(GroupedVariant {
                ref_align: variant.ref_align.clone(),
                read_align: variant.read_align.clone(),
                freqs: vec![mean(&variant.freqs), 0.0],
            });
        }
        for variant in &table_b.variants {
            match index_of.get(&degap(&variant.read_align)) {
                Some(&index) => merged[index].freqs[1] = mean(&variant.freqs),
                None => merged.push(GroupedVariant {
                    ref_align: variant.ref_align.clone(),
                    read_align: variant.read_align.clone(),
                    freqs: vec![0.0, mean(&variant.freqs)],
                }),
            }
        }
        Ok(GraphInput {
            layout: GroupLayout::Comparison { group_a, group_b },
            variants: merged,
        })
    }

    /// Keeps variants whose best group frequency passes the threshold. The
    /// quadratic edge scan downstream is only affordable because of this.
    pub fn filter_by_freq(mut self, min_freq: f64) -> GraphInput {
        self.variants
            .retain(|v| v.freqs.iter().copied().fold(0.0, f64::max) >= min_freq);
        self
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[derive(Debug, Clone)]
pub struct VariationGraph {
    pub layout: GroupLayout,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Builds the variation-distance graph: one node per distinct windowed
/// variant, one edge per pair of nodes whose de-gapped sequences are exactly
/// one edit apart.
pub fn build_graph(input: &GraphInput) -> VariationGraph {
    let mut nodes: Vec<GraphNode> = input
        .variants
        .iter()
        .map(|variant| {
            let pair = AlignmentPair::new(variant.ref_align.clone(), variant.read_align.clone());
            let (num_ins, num_del, num_subst) = count_variations(&pair);
            let dist_ref = num_ins + num_del + num_subst;
            GraphNode {
                id: 0,
                ref_align: variant.ref_align.clone(),
                read_align: variant.read_align.clone(),
                freqs: variant.freqs.clone(),
                dist_ref,
                variation_type: VariationType::classify(num_ins, num_del, num_subst),
                num_ins,
                num_del,
                num_subst,
                is_ref: dist_ref == 0,
            }
        })
        .collect();

    // Every variant must be windowed against the same reference.
    if let Some(first) = nodes.first() {
        let window = degap(&first.ref_align);
        assert!(
            nodes.iter().all(|n| degap(&n.ref_align) == window),
            "Graph input mixes different reference windows"
        );
    }

    // Deterministic, reproducible ids: by descending best group frequency,
    // then by alignment strings.
    nodes.sort_by(|a, b| {
        let max_a = a.freqs.iter().copied().fold(0.0, f64::max);
        let max_b = b.freqs.iter().copied().fold(0.0, f64::max);
        max_b
            .partial_cmp(&max_a)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.ref_align.cmp(&b.ref_align))
            .then_with(|| a.read_align.cmp(&b.read_align))
    });
    for (index, node) in nodes.iter_mut().enumerate() {
        node.id = index + 1;
    }

    let degapped: Vec<String> = nodes.iter().map(|n| degap(&n.read_align)).collect();
    let index_pairs: Vec<(usize, usize)> = (0..nodes.len())
        .flat_map(|i| (i + 1..nodes.len()).map(move |j| (i, j)))
        .collect();
    let mut edges: Vec<GraphEdge> = index_pairs
        .par_iter()
        .filter_map(|&(i, j)| {
            if !unit_distance(&degapped[i], &degapped[j]) {
                return None;
            }
            let indel_counts = |n: &GraphNode| (n.num_ins, n.num_del);
            let edge_type = if indel_counts(&nodes[i]) != indel_counts(&nodes[j]) {
                EdgeType::Indel
            } else {
                EdgeType::Substitution
            };
            Some(GraphEdge {
                id_a: nodes[i].id,
                id_b: nodes[j].id,
                edge_type,
            })
        })
        .collect();
    edges.sort_by_key(|e| (e.id_a, e.id_b));

    VariationGraph {
        layout: input.layout.clone(),
        nodes,
        edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::WindowedVariant;

    const WINDOW: &str = "AAAACCCCGGGGTTTT";

    fn variant(ref_align: &str, read_align: &str, freq: f64) -> GroupedVariant {
        GroupedVariant {
            ref_align: ref_align.to_string(),
            read_align: read_align.to_string(),
            freqs: vec![freq],
        }
    }

    fn individual(variants: Vec<GroupedVariant>) -> GraphInput {
        GraphInput {
            layout: GroupLayout::Individual {
                group: "test".to_string(),
            },
            variants,
        }
    }

    #[test]
    fn test_reference_and_insertion_connected_by_indel_edge() {
        let input = individual(vec![
            variant(WINDOW, WINDOW, 0.9),
            variant("AAAACCCC-GGGGTTTT", "AAAACCCCAGGGGTTTT", 0.1),
        ]);
        let graph = build_graph(&input);

        assert_eq!(graph.nodes[0].read_align, WINDOW);
        assert!(graph.nodes[0].is_ref);
        assert_eq!(graph.nodes[0].id, 1);
        assert_eq!(graph.nodes[1].variation_type, VariationType::Insertion);
        assert_eq!(graph.nodes[1].dist_ref, 1);

        assert_eq!(graph.edges.len(), 1);
        let edge = graph.edges[0];
        assert_eq!((edge.id_a, edge.id_b), (1, 2));
        assert_eq!(edge.edge_type, EdgeType::Indel);
    }

    #[test]
    fn test_two_nt_deletion_produces_no_edge() {
        let input = individual(vec![
            variant(WINDOW, WINDOW, 0.9),
            variant(WINDOW, "AAAACC--GGGGTTTT", 0.1),
        ]);
        let graph = build_graph(&input);
        assert_eq!(graph.nodes[1].variation_type, VariationType::Deletion);
        assert_eq!(graph.nodes[1].dist_ref, 2);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_substitution_edge_type() {
        let input = individual(vec![
            variant(WINDOW, WINDOW, 0.9),
            variant(WINDOW, "AAAACCCCGGGGTTTA", 0.1),
        ]);
        let graph = build_graph(&input);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].edge_type, EdgeType::Substitution);
    }

    #[test]
    fn test_edges_have_no_self_loops_and_unique_pairs() {
        let input = individual(vec![
            variant(WINDOW, WINDOW, 0.5),
            variant(WINDOW, "AAAACCCCGGGGTTTA", 0.2),
            variant(WINDOW, "AAAACCCCGGGGTTAA", 0.1),
            variant("AAAACCCC-GGGGTTTT", "AAAACCCCAGGGGTTTT", 0.1),
        ]);
        let graph = build_graph(&input);
        for edge in &graph.edges {
            assert_ne!(edge.id_a, edge.id_b);
            assert!(edge.id_a < edge.id_b);
        }
        let mut pairs: Vec<(usize, usize)> =
            graph.edges.iter().map(|e| (e.id_a, e.id_b)).collect();
        pairs.dedup();
        assert_eq!(pairs.len(), graph.edges.len());
    }

    #[test]
    fn test_frequency_filter() {
        let input = individual(vec![
            variant(WINDOW, WINDOW, 0.9),
            variant(WINDOW, "AAAACCCCGGGGTTTA", 1e-7),
        ]);
        let filtered = input.filter_by_freq(1e-5);
        assert_eq!(filtered.variants.len(), 1);
    }

    #[test]
    fn test_comparison_joins_on_degapped_read() {
        let table_a = WindowedTable {
            library_names: vec!["a1".to_string()],
            variants: vec![
                WindowedVariant {
                    ref_align: WINDOW.to_string(),
                    read_align: WINDOW.to_string(),
                    counts: vec![9],
                    freqs: vec![0.9],
                },
                WindowedVariant {
                    ref_align: WINDOW.to_string(),
                    read_align: "AAAACCC-GGGGTTTT".to_string(),
                    counts: vec![1],
                    freqs: vec![0.1],
                },
            ],
        };
        let table_b = WindowedTable {
            library_names: vec!["b1".to_string()],
            variants: vec![WindowedVariant {
                ref_align: WINDOW.to_string(),
                read_align: WINDOW.to_string(),
                counts: vec![4],
                freqs: vec![1.0],
            }],
        };
        let input = GraphInput::comparison(
            &table_a,
            &table_b,
            "sense".to_string(),
            "branch".to_string(),
        )
        .unwrap();
        assert_eq!(input.variants.len(), 2);
        let reference = input
            .variants
            .iter()
            .find(|v| v.read_align == WINDOW)
            .unwrap();
        assert_eq!(reference.freqs, vec![0.9, 1.0]);
        let deletion = input
            .variants
            .iter()
            .find(|v| v.read_align != WINDOW)
            .unwrap();
        assert_eq!(deletion.freqs, vec![0.1, 0.0]);
    }
}
