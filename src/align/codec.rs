use super::pair::{AlignmentPair, GAP};
use itertools::Itertools;

pub type CigarOp = rust_htslib::bam::record::Cigar;

/// Expands a CIGAR into gapped alignment strings.
///
/// `ref_start` is the 1-based reference position of the first aligned base.
/// Only `M`/`=`/`X`, `I` and `D` operations are meaningful here; anything else
/// means the caller failed to screen the record and is a bug.
pub fn decode(ref_seq: &str, read_seq: &str, ref_start: usize, ops: &[CigarOp]) -> AlignmentPair {
    assert!(ref_start >= 1, "Reference positions are 1-based");
    let mut ref_align = String::new();
    let mut read_align = String::new();
    let mut ref_pos = ref_start - 1;
    let mut read_pos = 0;

    for op in ops {
        match *op {
            CigarOp::Match(len) | CigarOp::Equal(len) | CigarOp::Diff(len) => {
                let len = len as usize;
                ref_align.push_str(slice(ref_seq, ref_pos, len, "reference"));
                read_align.push_str(slice(read_seq, read_pos, len, "read"));
                ref_pos += len;
                read_pos += len;
            }
            CigarOp::Ins(len) => {
                let len = len as usize;
                ref_align.extend(std::iter::repeat(GAP).take(len));
                read_align.push_str(slice(read_seq, read_pos, len, "read"));
                read_pos += len;
            }
            CigarOp::Del(len) => {
                let len = len as usize;
                ref_align.push_str(slice(ref_seq, ref_pos, len, "reference"));
                read_align.extend(std::iter::repeat(GAP).take(len));
                ref_pos += len;
            }
            _ => panic!("No logic to decode CIGAR operation {:?}", op),
        }
    }

    assert_eq!(
        read_pos,
        read_seq.len(),
        "CIGAR consumed {} read bases but the read has {}",
        read_pos,
        read_seq.len()
    );
    AlignmentPair::new(ref_align, read_align)
}

fn slice<'a>(seq: &'a str, start: usize, len: usize, what: &str) -> &'a str {
    assert!(
        start + len <= seq.len(),
        "CIGAR runs past the end of the {} sequence ({}+{} > {})",
        what,
        start,
        len,
        seq.len()
    );
    &seq[start..start + len]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnClass {
    Mat,
    Ins,
    Del,
}

/// Run-length-encodes alignment columns back into a CIGAR. Substitutions
/// collapse into `M` together with matches.
pub fn encode(pair: &AlignmentPair) -> Vec<CigarOp> {
    let classes = pair.columns().map(|(r, q)| {
        if r == GAP {
            ColumnClass::Ins
        } else if q == GAP {
            ColumnClass::Del
        } else {
            ColumnClass::Mat
        }
    });

    let mut ops = Vec::new();
    let grouped = classes.chunk_by(|class| *class);
    for (class, run) in &grouped {
        let len = run.count() as u32;
        ops.push(match class {
            ColumnClass::Mat => CigarOp::Match(len),
            ColumnClass::Ins => CigarOp::Ins(len),
            ColumnClass::Del => CigarOp::Del(len),
        });
    }
    ops
}

pub fn cigar_string(ops: &[CigarOp]) -> String {
    ops.iter().map(|op| format!("{}{}", op.len(), op.char())).collect()
}
