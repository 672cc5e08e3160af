use super::pair::{AlignmentPair, GAP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariationKind {
    Insertion,
    Deletion,
    Substitution,
}

/// A single deviation of the read from the reference. Positions are 1-based
/// reference coordinates; an insertion is attributed to the reference position
/// immediately upstream of the inserted bases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variation {
    pub ref_pos: usize,
    pub kind: VariationKind,
    pub nucleotide: char,
}

/// Returns `(num_insertions, num_deletions, num_substitutions)`, counting one
/// per alignment column.
pub fn count_variations(pair: &AlignmentPair) -> (usize, usize, usize) {
    let mut num_ins = 0;
    let mut num_del = 0;
    let mut num_subst = 0;
    for (r, q) in pair.columns() {
        if r == GAP {
            num_ins += 1;
        } else if q == GAP {
            num_del += 1;
        } else if r != q {
            num_subst += 1;
        }
    }
    (num_ins, num_del, num_subst)
}

/// Reference positions of insertions, deletions and substitutions, in
/// alignment order. The alignment is assumed to start at reference position 1.
pub fn variation_positions(pair: &AlignmentPair) -> (Vec<usize>, Vec<usize>, Vec<usize>) {
    let mut ins_pos = Vec::new();
    let mut del_pos = Vec::new();
    let mut subst_pos = Vec::new();
    for variation in variation_info(pair) {
        match variation.kind {
            VariationKind::Insertion => ins_pos.push(variation.ref_pos),
            VariationKind::Deletion => del_pos.push(variation.ref_pos),
            VariationKind::Substitution => subst_pos.push(variation.ref_pos),
        }
    }
    (ins_pos, del_pos, subst_pos)
}

/// Ordered list of all variations in the alignment. For insertions the
/// nucleotide is the inserted read base, for deletions the deleted reference
/// base, for substitutions the read base.
pub fn variation_info(pair: &AlignmentPair) -> Vec<Variation> {
    let mut variations = Vec::new();
    let mut ref_pos = 0;
    for (r, q) in pair.columns() {
        if r == GAP {
            variations.push(Variation {
                ref_pos,
                kind: VariationKind::Insertion,
                nucleotide: q,
            });
            continue;
        }
        ref_pos += 1;
        if q == GAP {
            variations.push(Variation {
                ref_pos,
                kind: VariationKind::Deletion,
                nucleotide: r,
            });
        } else if r != q {
            variations.push(Variation {
                ref_pos,
                kind: VariationKind::Substitution,
                nucleotide: q,
            });
        }
    }
    variations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let pair = AlignmentPair::new("AC-GTA".to_string(), "AATG-A".to_string());
        assert_eq!(count_variations(&pair), (1, 1, 1));
    }

    #[test]
    fn test_positions_attribute_insertions_upstream() {
        // Insertion between reference positions 2 and 3.
        let pair = AlignmentPair::new("AC-GT".to_string(), "ACTGT".to_string());
        let (ins_pos, del_pos, subst_pos) = variation_positions(&pair);
        assert_eq!(ins_pos, vec![2]);
        assert!(del_pos.is_empty());
        assert!(subst_pos.is_empty());
    }

    #[test]
    fn test_leading_insertion_has_position_zero() {
        let pair = AlignmentPair::new("-ACGT".to_string(), "TACGT".to_string());
        let (ins_pos, _, _) = variation_positions(&pair);
        assert_eq!(ins_pos, vec![0]);
    }

    #[test]
    fn test_info_nucleotides() {
        let pair = AlignmentPair::new("AC-GT".to_string(), "AATG-".to_string());
        let info = variation_info(&pair);
        assert_eq!(
            info,
            vec![
                Variation {
                    ref_pos: 2,
                    kind: VariationKind::Substitution,
                    nucleotide: 'A'
                },
                Variation {
                    ref_pos: 2,
                    kind: VariationKind::Insertion,
                    nucleotide: 'T'
                },
                Variation {
                    ref_pos: 4,
                    kind: VariationKind::Deletion,
                    nucleotide: 'T'
                },
            ]
        );
    }
}
