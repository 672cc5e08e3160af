mod build;
mod distance;
mod node;
mod stats;

pub use build::{build_graph, GraphInput, GroupedVariant, VariationGraph};
pub use distance::{levenshtein, unit_distance};
pub use node::{EdgeType, GraphEdge, GraphNode, GroupLayout, VariationType};
pub use stats::{compute_stats, GraphStats, GroupFreqTotals};
