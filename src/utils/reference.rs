use crate::utils::Result;

/// Reference amplicon with the coordinate of the CRISPR-induced double-strand
/// break. The break falls between positions `dsb_pos` and `dsb_pos + 1`
/// (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSequence {
    seq: String,
    dsb_pos: usize,
}

impl ReferenceSequence {
    pub fn new(seq: &str, dsb_pos: usize) -> Result<ReferenceSequence> {
        let seq = seq.to_uppercase();
        if seq.is_empty() {
            return Err("Reference sequence is empty".to_string());
        }
        if let Some(bad) = seq.chars().find(|c| !matches!(c, 'A' | 'C' | 'G' | 'T')) {
            return Err(format!(
                "Reference sequence contains unexpected character '{}'",
                bad
            ));
        }
        if dsb_pos == 0 || dsb_pos >= seq.len() {
            return Err(format!(
                "DSB position {} is outside the reference (length {}); \
                 the break must fall between two reference positions",
                dsb_pos,
                seq.len()
            ));
        }
        Ok(ReferenceSequence { seq, dsb_pos })
    }

    pub fn seq(&self) -> &str {
        &self.seq
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn dsb_pos(&self) -> usize {
        self.dsb_pos
    }
}
