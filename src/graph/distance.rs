/// Levenshtein distance between two de-gapped nucleotide sequences, unit
/// costs, rolling single-row DP.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, &ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let subst = diagonal + usize::from(ca != cb);
            diagonal = row[j + 1];
            row[j + 1] = subst.min(diagonal + 1).min(row[j] + 1);
        }
    }
    row[b.len()]
}

/// Whether two sequences are exactly one edit apart. The length pre-check
/// skips the DP for most pairs.
pub fn unit_distance(a: &str, b: &str) -> bool {
    if a.len().abs_diff(b.len()) > 1 {
        return false;
    }
    levenshtein(a, b) == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("ACGT", ""), 4);
        assert_eq!(levenshtein("ACGT", "ACGT"), 0);
        assert_eq!(levenshtein("ACGT", "AGGT"), 1);
        assert_eq!(levenshtein("ACGT", "ACGGT"), 1);
        assert_eq!(levenshtein("ACGT", "AGT"), 1);
        assert_eq!(levenshtein("AAAACCCCGGGGTTTT", "AAAACCCCAGGGGTTTT"), 1);
        // A 2 nt deletion is two edits, not one.
        assert_eq!(levenshtein("AAAACCCCGGGGTTTT", "AAAACCGGGGTTTT"), 2);
    }

    #[test]
    fn test_unit_distance_length_pre_check() {
        assert!(unit_distance("ACGT", "ACGGT"));
        assert!(!unit_distance("ACGT", "ACGTAA"));
        assert!(!unit_distance("ACGT", "ACGT"));
    }
}
