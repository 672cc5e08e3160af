#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariationType {
    None,
    Insertion,
    Deletion,
    Substitution,
    Mixed,
}

impl VariationType {
    pub fn label(&self) -> &'static str {
        match self {
            VariationType::None => "none",
            VariationType::Insertion => "insertion",
            VariationType::Deletion => "deletion",
            VariationType::Substitution => "substitution",
            VariationType::Mixed => "mixed",
        }
    }

    pub fn classify(num_ins: usize, num_del: usize, num_subst: usize) -> VariationType {
        match (num_ins > 0, num_del > 0, num_subst > 0) {
            (false, false, false) => VariationType::None,
            (true, false, false) => VariationType::Insertion,
            (false, true, false) => VariationType::Deletion,
            (false, false, true) => VariationType::Substitution,
            _ => VariationType::Mixed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeType {
    Indel,
    Substitution,
}

impl EdgeType {
    pub fn label(&self) -> &'static str {
        match self {
            EdgeType::Indel => "indel",
            EdgeType::Substitution => "substitution",
        }
    }
}

/// One distinct windowed repair outcome in the variation-distance graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: usize,
    pub ref_align: String,
    pub read_align: String,
    /// One frequency per group, in the layout's group order.
    pub freqs: Vec<f64>,
    /// De-gapped edit distance from the reference window.
    pub dist_ref: usize,
    pub variation_type: VariationType,
    pub num_ins: usize,
    pub num_del: usize,
    pub num_subst: usize,
    pub is_ref: bool,
}

/// Unordered pair of nodes whose de-gapped sequences are one edit apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphEdge {
    pub id_a: usize,
    pub id_b: usize,
    pub edge_type: EdgeType,
}

/// Which experimental layout the frequency columns describe. Downstream code
/// pattern-matches on this instead of comparing format strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupLayout {
    Individual { group: String },
    Comparison { group_a: String, group_b: String },
}

impl GroupLayout {
    pub fn groups(&self) -> Vec<&str> {
        match self {
            GroupLayout::Individual { group } => vec![group],
            GroupLayout::Comparison { group_a, group_b } => vec![group_a, group_b],
        }
    }

    pub fn num_groups(&self) -> usize {
        match self {
            GroupLayout::Individual { .. } => 1,
            GroupLayout::Comparison { .. } => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variation_type_classification() {
        assert_eq!(VariationType::classify(0, 0, 0), VariationType::None);
        assert_eq!(VariationType::classify(2, 0, 0), VariationType::Insertion);
        assert_eq!(VariationType::classify(0, 3, 0), VariationType::Deletion);
        assert_eq!(VariationType::classify(0, 0, 1), VariationType::Substitution);
        assert_eq!(VariationType::classify(1, 1, 0), VariationType::Mixed);
        assert_eq!(VariationType::classify(0, 2, 1), VariationType::Mixed);
    }

    #[test]
    fn test_layout_groups() {
        let individual = GroupLayout::Individual {
            group: "sense".to_string(),
        };
        assert_eq!(individual.groups(), vec!["sense"]);
        let comparison = GroupLayout::Comparison {
            group_a: "sense".to_string(),
            group_b: "branch".to_string(),
        };
        assert_eq!(comparison.groups(), vec!["sense", "branch"]);
        assert_eq!(comparison.num_groups(), 2);
    }
}
