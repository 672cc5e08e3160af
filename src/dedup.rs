//! Merges windowed alignments into a frequency-ranked variant table.

use crate::align::AlignmentPair;
use std::collections::HashMap;

/// One distinct repair outcome within the DSB window, with one count and one
/// frequency per repeat library.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedVariant {
    pub ref_align: String,
    pub read_align: String,
    pub counts: Vec<u64>,
    pub freqs: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowedTable {
    pub library_names: Vec<String>,
    pub variants: Vec<WindowedVariant>,
}

/// Accumulates windowed alignments across repeat libraries, merging entries
/// with identical de-gapped read sequences. Alignments are deterministic per
/// read sequence within a run, so the first-seen alignment stands for all.
pub struct DeduplicationAggregator {
    library_names: Vec<String>,
    variants: HashMap<String, WindowedVariant>,
    totals: Vec<u64>,
}

impl DeduplicationAggregator {
    pub fn new(library_names: Vec<String>) -> DeduplicationAggregator {
        let num_libraries = library_names.len();
        DeduplicationAggregator {
            library_names,
            variants: HashMap::new(),
            totals: vec![0; num_libraries],
        }
    }

    pub fn add(&mut self, library: usize, window: &AlignmentPair) {
        assert!(library < self.totals.len(), "Library index out of range");
        self.totals[library] += 1;
        let num_libraries = self.totals.len();
        let entry = self
            .variants
            .entry(window.degapped_read())
            .or_insert_with(|| WindowedVariant {
                ref_align: window.ref_align().to_string(),
                read_align: window.read_align().to_string(),
                counts: vec![0; num_libraries],
                freqs: vec![0.0; num_libraries],
            });
        entry.counts[library] += 1;
    }

    /// Finalizes the table: frequencies per library, rows sorted by
    /// descending minimum-across-libraries count, ties broken by `read_align`
    /// ascending. Rows are immutable from here on.
    pub fn finish(self) -> WindowedTable {
        let mut variants: Vec<WindowedVariant> = self.variants.into_values().collect();
        for variant in &mut variants {
            for (freq, (&count, &total)) in variant
                .freqs
                .iter_mut()
                .zip(variant.counts.iter().zip(self.totals.iter()))
            {
                *freq = if total > 0 {
                    count as f64 / total as f64
                } else {
                    0.0
                };
            }
        }
        variants.sort_by(|a, b| {
            let min_a = a.counts.iter().min().copied().unwrap_or(0);
            let min_b = b.counts.iter().min().copied().unwrap_or(0);
            min_b
                .cmp(&min_a)
                .then_with(|| a.read_align.cmp(&b.read_align))
        });
        WindowedTable {
            library_names: self.library_names,
            variants,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(ref_align: &str, read_align: &str) -> AlignmentPair {
        AlignmentPair::new(ref_align.to_string(), read_align.to_string())
    }

    #[test]
    fn test_merges_by_degapped_read() {
        let mut agg = DeduplicationAggregator::new(vec!["r1".to_string(), "r2".to_string()]);
        agg.add(0, &pair("ACGT", "ACGT"));
        agg.add(0, &pair("ACGT", "AC-T"));
        agg.add(1, &pair("ACGT", "AC-T"));
        agg.add(1, &pair("ACGT", "AC-T"));

        let table = agg.finish();
        assert_eq!(table.variants.len(), 2);
        let deletion = table
            .variants
            .iter()
            .find(|v| v.read_align == "AC-T")
            .unwrap();
        assert_eq!(deletion.counts, vec![1, 2]);
        assert_eq!(deletion.freqs, vec![0.5, 1.0]);
    }

    #[test]
    fn test_ordering_by_min_count_then_read_align() {
        let mut agg = DeduplicationAggregator::new(vec!["r1".to_string()]);
        for _ in 0..3 {
            agg.add(0, &pair("ACGT", "ACGT"));
        }
        agg.add(0, &pair("ACGT", "AC-T"));
        agg.add(0, &pair("ACGT", "A-GT"));

        let table = agg.finish();
        let reads: Vec<&str> = table.variants.iter().map(|v| v.read_align.as_str()).collect();
        // Highest count first, then ties in ascending read_align order.
        assert_eq!(reads, vec!["ACGT", "A-GT", "AC-T"]);
    }
}
