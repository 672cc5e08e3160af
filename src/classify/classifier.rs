use super::read::AmpliconRead;
use super::realign::{realign_deletions, realign_insertions};
use super::stats::{ClassificationStats, RealignPath, RejectReason};
use crate::align::{cigar_string, count_variations, decode, encode, variation_positions, AlignmentPair};
use crate::utils::ReferenceSequence;
use itertools::Itertools;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct ClassifyParams {
    /// Whether reads are expected to carry the reverse-complement flag.
    pub expected_reverse: bool,
    /// Minimum read length; forced up to `dsb_pos + 1` so every read reaches
    /// past the break.
    pub min_length: usize,
    pub realign: bool,
    pub max_substitutions: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Accepted(AcceptedRead),
    Rejected(RejectReason),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedRead {
    pub pair: AlignmentPair,
    pub cigar: String,
    pub num_subst: usize,
    pub realign_path: RealignPath,
}

/// Per-run read classifier. Owns the memoization cache of already-seen read
/// sequences (a shortcut, not a correctness requirement) and the audit
/// counters for the pass.
pub struct ReadClassifier<'a> {
    reference: &'a ReferenceSequence,
    params: ClassifyParams,
    cache: HashMap<String, Verdict>,
    stats: ClassificationStats,
}

impl<'a> ReadClassifier<'a> {
    pub fn new(reference: &'a ReferenceSequence, mut params: ClassifyParams) -> ReadClassifier<'a> {
        params.min_length = params.min_length.max(reference.dsb_pos() + 1);
        ReadClassifier {
            reference,
            params,
            cache: HashMap::new(),
            stats: ClassificationStats::default(),
        }
    }

    pub fn stats(&self) -> &ClassificationStats {
        &self.stats
    }

    pub fn into_stats(self) -> ClassificationStats {
        self.stats
    }

    /// Accepted reads whose DSB window later fails extraction are tallied
    /// here so the audit stays complete.
    pub fn record_window_reject(&mut self) {
        self.stats.window_rejected += 1;
    }

    pub fn classify(&mut self, read: &AmpliconRead) -> Verdict {
        self.stats.total += 1;
        if let Some(verdict) = self.cache.get(&read.seq) {
            let verdict = verdict.clone();
            self.tally(&verdict, true);
            return verdict;
        }
        let verdict = self.classify_uncached(read);
        self.tally(&verdict, false);
        self.cache.insert(read.seq.clone(), verdict.clone());
        verdict
    }

    fn tally(&mut self, verdict: &Verdict, repeat: bool) {
        match verdict {
            Verdict::Accepted(accepted) => {
                if repeat {
                    self.stats.accepted_repeat += 1;
                } else {
                    self.stats.accepted_new += 1;
                }
                match accepted.realign_path {
                    RealignPath::Insertion => self.stats.realigned_insertion += 1,
                    RealignPath::Deletion => self.stats.realigned_deletion += 1,
                    RealignPath::None => {}
                }
            }
            Verdict::Rejected(reason) => {
                if repeat {
                    self.stats.rejected_repeat += 1;
                } else {
                    self.stats.rejected_new += 1;
                }
                self.stats.tally_reason(*reason);
            }
        }
    }

    fn classify_uncached(&self, read: &AmpliconRead) -> Verdict {
        if read.is_unmapped {
            return Verdict::Rejected(RejectReason::Unaligned);
        }
        if read.has_unexpected_flags {
            return Verdict::Rejected(RejectReason::UnexpectedFlags);
        }
        if read.is_reverse != self.params.expected_reverse {
            return Verdict::Rejected(RejectReason::WrongStrand);
        }
        // Every read must align against the same reference origin.
        if read.start_pos != 1 {
            return Verdict::Rejected(RejectReason::NotAtOrigin);
        }
        if read.seq.len() < self.params.min_length {
            return Verdict::Rejected(RejectReason::TooShort);
        }

        let mut pair = decode(self.reference.seq(), &read.seq, 1, &read.cigar);
        let (num_ins, num_del, num_subst) = count_variations(&pair);
        self.cross_check(read, num_ins + num_del, num_subst);

        let dsb_pos = self.reference.dsb_pos();
        let mut realign_path = RealignPath::None;
        if num_ins + num_del > 0 {
            let (ins_pos, del_pos, _) = variation_positions(&pair);
            let mut ok = consecutive(&ins_pos, &del_pos) && touches_dsb(dsb_pos, &ins_pos, &del_pos);

            // Mixed indel reads are never realigned.
            if !ok && self.params.realign && (num_ins == 0 || num_del == 0) {
                let realigned = if num_del == 0 {
                    realign_insertions(&pair, dsb_pos).map(|p| (p, RealignPath::Insertion))
                } else {
                    realign_deletions(&pair, dsb_pos).map(|p| (p, RealignPath::Deletion))
                };
                if let Some((new_pair, path)) = realigned {
                    let (new_ins, new_del, _) = variation_positions(&new_pair);
                    if consecutive(&new_ins, &new_del) && touches_dsb(dsb_pos, &new_ins, &new_del) {
                        pair = new_pair;
                        realign_path = path;
                        ok = true;
                    }
                }
            }

            if !ok {
                let reason = match (
                    consecutive(&ins_pos, &del_pos),
                    touches_dsb(dsb_pos, &ins_pos, &del_pos),
                ) {
                    (false, false) => RejectReason::NotConsecutiveNoDsbContact,
                    (false, true) => RejectReason::NotConsecutive,
                    _ => RejectReason::NoDsbContact,
                };
                return Verdict::Rejected(reason);
            }
        }

        let (_, _, final_subst) = count_variations(&pair);
        if let Some(limit) = self.params.max_substitutions {
            if final_subst > limit {
                return Verdict::Rejected(RejectReason::TooManySubstitutions);
            }
        }

        Verdict::Accepted(AcceptedRead {
            cigar: cigar_string(&encode(&pair)),
            num_subst: final_subst,
            pair,
            realign_path,
        })
    }

    /// The aligner's own counts must agree with what the decoded alignment
    /// contains; a mismatch means the decode is wrong and the whole run
    /// untrustworthy.
    fn cross_check(&self, read: &AmpliconRead, num_indel: usize, num_subst: usize) {
        if let Some(reported) = read.reported_indels {
            assert_eq!(
                reported, num_indel,
                "Aligner reported {} indel columns but the alignment contains {}",
                reported, num_indel
            );
        }
        if let Some(reported) = read.reported_substs {
            assert_eq!(
                reported, num_subst,
                "Aligner reported {} substitutions but the alignment contains {}",
                reported, num_subst
            );
        }
    }
}

/// True iff the variations form one contiguous event: at most one distinct
/// insertion position, deletion positions forming a single integer range, and
/// any insertion sitting flush against one end of that range.
pub fn consecutive(ins_pos: &[usize], del_pos: &[usize]) -> bool {
    let distinct_ins: Vec<usize> = ins_pos.iter().copied().unique().collect();
    if distinct_ins.len() > 1 {
        return false;
    }
    if del_pos.is_empty() {
        return true;
    }
    let lo = del_pos[0];
    let hi = del_pos[del_pos.len() - 1];
    if hi - lo + 1 != del_pos.len() {
        return false;
    }
    match distinct_ins.first() {
        Some(&ins) => ins + 1 == lo || ins == hi,
        None => true,
    }
}

/// True iff the variations overlap the break itself: an insertion exactly at
/// `dsb_pos`, or a deletion covering `dsb_pos` or `dsb_pos + 1`.
pub fn touches_dsb(dsb_pos: usize, ins_pos: &[usize], del_pos: &[usize]) -> bool {
    ins_pos.contains(&dsb_pos) || del_pos.contains(&dsb_pos) || del_pos.contains(&(dsb_pos + 1))
}
