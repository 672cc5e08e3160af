pub const GAP: char = '-';

/// A gapped alignment of a read against the reference amplicon: two
/// equal-length strings over `{A, C, G, T, -}`. No column may carry a gap on
/// both sides.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlignmentPair {
    ref_align: String,
    read_align: String,
}

impl AlignmentPair {
    /// Panics if the strings differ in length or a column is gap-on-gap;
    /// both indicate a bug in the caller, not bad input.
    pub fn new(ref_align: String, read_align: String) -> AlignmentPair {
        assert_eq!(
            ref_align.len(),
            read_align.len(),
            "Alignment strings differ in length: {} vs {}",
            ref_align.len(),
            read_align.len()
        );
        assert!(
            !ref_align
                .chars()
                .zip(read_align.chars())
                .any(|(r, q)| r == GAP && q == GAP),
            "Alignment column with a gap on both sides"
        );
        AlignmentPair {
            ref_align,
            read_align,
        }
    }

    pub fn ref_align(&self) -> &str {
        &self.ref_align
    }

    pub fn read_align(&self) -> &str {
        &self.read_align
    }

    pub fn len(&self) -> usize {
        self.ref_align.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ref_align.is_empty()
    }

    /// Iterates over alignment columns as `(ref_char, read_char)`.
    pub fn columns(&self) -> impl Iterator<Item = (char, char)> + '_ {
        self.ref_align.chars().zip(self.read_align.chars())
    }

    pub fn degapped_ref(&self) -> String {
        self.ref_align.chars().filter(|&c| c != GAP).collect()
    }

    pub fn degapped_read(&self) -> String {
        self.read_align.chars().filter(|&c| c != GAP).collect()
    }
}

/// Strips gap characters from an alignment string.
pub fn degap(align: &str) -> String {
    align.chars().filter(|&c| c != GAP).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degapping() {
        let pair = AlignmentPair::new("AC-GT".to_string(), "ACTG-".to_string());
        assert_eq!(pair.degapped_ref(), "ACGT");
        assert_eq!(pair.degapped_read(), "ACTG");
        assert_eq!(pair.len(), 5);
    }

    #[test]
    #[should_panic(expected = "differ in length")]
    fn test_length_mismatch_panics() {
        AlignmentPair::new("ACGT".to_string(), "ACG".to_string());
    }

    #[test]
    #[should_panic(expected = "gap on both sides")]
    fn test_double_gap_panics() {
        AlignmentPair::new("AC-T".to_string(), "AC-T".to_string());
    }
}
