use crate::align::CigarOp;
use rust_htslib::bam::{self, record::Aux};
use std::str;

/// Per-record view of an aligned amplicon read: everything the classifier
/// needs, detached from the BAM record itself. Transient.
#[derive(Debug, Clone)]
pub struct AmpliconRead {
    pub seq: String,
    pub is_unmapped: bool,
    pub is_reverse: bool,
    pub has_unexpected_flags: bool,
    /// 1-based alignment start on the reference amplicon.
    pub start_pos: i64,
    pub cigar: Vec<CigarOp>,
    /// Aligner-reported substitution count (`XM` tag).
    pub reported_substs: Option<usize>,
    /// Aligner-reported indel column count: gap opens plus gap extensions
    /// (`XO` + `XG` tags), i.e. the total gap length under affine scoring.
    pub reported_indels: Option<usize>,
}

impl AmpliconRead {
    pub fn from_hts_rec(rec: &bam::Record) -> AmpliconRead {
        let seq = str::from_utf8(&rec.seq().as_bytes())
            .unwrap()
            .to_uppercase();
        // Amplicon runs are single-end; anything paired, secondary,
        // supplementary, duplicate or QC-failed is not a usable outcome.
        let has_unexpected_flags = rec.is_paired()
            || rec.is_secondary()
            || rec.is_supplementary()
            || rec.is_duplicate()
            || rec.is_quality_check_failed();

        let cigar = if rec.is_unmapped() {
            Vec::new()
        } else {
            rec.cigar().take().to_vec()
        };

        let reported_substs = get_int_tag(rec, b"XM").map(|v| v as usize);
        let reported_indels = match (get_int_tag(rec, b"XO"), get_int_tag(rec, b"XG")) {
            (Some(opens), Some(extensions)) => Some((opens + extensions) as usize),
            _ => None,
        };

        AmpliconRead {
            seq,
            is_unmapped: rec.is_unmapped(),
            is_reverse: rec.is_reverse(),
            has_unexpected_flags,
            start_pos: rec.pos() + 1,
            cigar,
            reported_substs,
            reported_indels,
        }
    }
}

fn get_int_tag(rec: &bam::Record, tag: &[u8]) -> Option<i64> {
    match rec.aux(tag) {
        Ok(Aux::I8(v)) => Some(v as i64),
        Ok(Aux::U8(v)) => Some(v as i64),
        Ok(Aux::I16(v)) => Some(v as i64),
        Ok(Aux::U16(v)) => Some(v as i64),
        Ok(Aux::I32(v)) => Some(v as i64),
        Ok(Aux::U32(v)) => Some(v as i64),
        _ => None,
    }
}
