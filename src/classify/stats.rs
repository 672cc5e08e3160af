use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RejectReason {
    Unaligned,
    UnexpectedFlags,
    WrongStrand,
    NotAtOrigin,
    TooShort,
    NotConsecutive,
    NoDsbContact,
    NotConsecutiveNoDsbContact,
    TooManySubstitutions,
}

impl RejectReason {
    pub fn label(&self) -> &'static str {
        match self {
            RejectReason::Unaligned => "unaligned",
            RejectReason::UnexpectedFlags => "unexpected_flags",
            RejectReason::WrongStrand => "wrong_strand",
            RejectReason::NotAtOrigin => "not_at_origin",
            RejectReason::TooShort => "too_short",
            RejectReason::NotConsecutive => "not_consecutive",
            RejectReason::NoDsbContact => "no_dsb_contact",
            RejectReason::NotConsecutiveNoDsbContact => "not_consecutive_no_dsb_contact",
            RejectReason::TooManySubstitutions => "too_many_substitutions",
        }
    }
}

/// Which realignment path, if any, produced the final alignment of an
/// accepted read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RealignPath {
    None,
    Insertion,
    Deletion,
}

/// Audit record for one classification pass. Owned by the classifier and
/// returned with the results, so shards can be aggregated with `merge`.
#[derive(Debug, Clone, Default)]
pub struct ClassificationStats {
    pub total: u64,
    pub accepted_new: u64,
    pub accepted_repeat: u64,
    pub rejected_new: u64,
    pub rejected_repeat: u64,
    pub realigned_insertion: u64,
    pub realigned_deletion: u64,
    /// Accepted reads whose DSB window could not be extracted.
    pub window_rejected: u64,
    pub reasons: BTreeMap<RejectReason, u64>,
}

impl ClassificationStats {
    pub fn accepted(&self) -> u64 {
        self.accepted_new + self.accepted_repeat
    }

    pub fn rejected(&self) -> u64 {
        self.rejected_new + self.rejected_repeat
    }

    pub fn tally_reason(&mut self, reason: RejectReason) {
        *self.reasons.entry(reason).or_insert(0) += 1;
    }

    /// Every record must be either accepted or rejected; anything else means
    /// the classifier dropped reads on the floor.
    pub fn check_totals(&self) {
        assert_eq!(
            self.accepted() + self.rejected(),
            self.total,
            "Read accounting mismatch: {} accepted + {} rejected != {} total",
            self.accepted(),
            self.rejected(),
            self.total
        );
    }

    pub fn merge(&mut self, other: &ClassificationStats) {
        self.total += other.total;
        self.accepted_new += other.accepted_new;
        self.accepted_repeat += other.accepted_repeat;
        self.rejected_new += other.rejected_new;
        self.rejected_repeat += other.rejected_repeat;
        self.realigned_insertion += other.realigned_insertion;
        self.realigned_deletion += other.realigned_deletion;
        self.window_rejected += other.window_rejected;
        for (reason, count) in &other.reasons {
            *self.reasons.entry(*reason).or_insert(0) += count;
        }
    }

    pub fn log_summary(&self, label: &str) {
        log::info!(
            "{}: {} reads, {} accepted ({} new, {} repeat), {} rejected",
            label,
            self.total,
            self.accepted(),
            self.accepted_new,
            self.accepted_repeat,
            self.rejected()
        );
        if self.realigned_insertion + self.realigned_deletion > 0 {
            log::info!(
                "{}: realigned {} insertion reads, {} deletion reads",
                label,
                self.realigned_insertion,
                self.realigned_deletion
            );
        }
        if self.window_rejected > 0 {
            log::info!(
                "{}: {} accepted reads failed window extraction",
                label,
                self.window_rejected
            );
        }
        for (reason, count) in &self.reasons {
            log::info!("{}: rejected {} reads: {}", label, count, reason.label());
        }
    }
}
