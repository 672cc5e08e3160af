use crate::align::{count_variations, AlignmentPair, GAP};

/// Re-places all inserted bases of an insertion-only alignment as one
/// contiguous block directly at the DSB. The read sequence itself never
/// changes, only which bases count as inserted. Works within the alignment's
/// own reference extent, so reads that stop short of the amplicon end are
/// handled as long as they reach past the break. Returns `None` when the
/// alignment is not insertion-only, the extent ends before the DSB, or the
/// move would increase the substitution count.
pub fn realign_insertions(pair: &AlignmentPair, dsb_pos: usize) -> Option<AlignmentPair> {
    let ref_seq = pair.degapped_ref();
    let read = pair.degapped_read();
    if read.len() <= ref_seq.len() || pair.read_align().contains(GAP) || dsb_pos > ref_seq.len() {
        return None;
    }
    let num_ins = read.len() - ref_seq.len();

    let new_ref = format!(
        "{}{}{}",
        &ref_seq[..dsb_pos],
        GAP.to_string().repeat(num_ins),
        &ref_seq[dsb_pos..]
    );
    let new_pair = AlignmentPair::new(new_ref, read);

    let (_, _, old_subst) = count_variations(pair);
    let (_, _, new_subst) = count_variations(&new_pair);
    if new_subst <= old_subst {
        Some(new_pair)
    } else {
        None
    }
}

/// Re-places the deleted run of a deletion-only alignment so that it touches
/// the DSB. Candidate placements put the gap after read offset `cut` for
/// `cut` in `[dsb_pos - num_del, dsb_pos]`, scanned left to right; the first
/// placement whose substitution count does not exceed the original wins.
/// The deleted-run length is taken from the alignment's own reference extent,
/// never from the full amplicon. Returns `None` when the alignment is not
/// deletion-only, the extent ends before the DSB, or no placement qualifies.
pub fn realign_deletions(pair: &AlignmentPair, dsb_pos: usize) -> Option<AlignmentPair> {
    let ref_seq = pair.degapped_ref();
    let read = pair.degapped_read();
    if read.len() >= ref_seq.len() || pair.ref_align().contains(GAP) || dsb_pos > ref_seq.len() {
        return None;
    }
    let num_del = ref_seq.len() - read.len();
    let (_, _, old_subst) = count_variations(pair);

    let first_cut = dsb_pos.saturating_sub(num_del);
    let last_cut = dsb_pos.min(read.len());
    for cut in first_cut..=last_cut {
        let new_read = format!(
            "{}{}{}",
            &read[..cut],
            GAP.to_string().repeat(num_del),
            &read[cut..]
        );
        let new_pair = AlignmentPair::new(ref_seq.clone(), new_read);
        let (_, _, new_subst) = count_variations(&new_pair);
        if new_subst <= old_subst {
            return Some(new_pair);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::{decode, variation_positions, CigarOp};

    const REF: &str = "AAAACCCCGGGGTTTT";
    const DSB: usize = 8;

    #[test]
    fn test_insertion_block_moves_to_dsb() {
        // Two insertions inside the homopolymer runs flanking the DSB.
        let read = "AAAACCCCCGGGGGTTTT";
        let ops = vec![
            CigarOp::Match(5),
            CigarOp::Ins(1),
            CigarOp::Match(7),
            CigarOp::Ins(1),
            CigarOp::Match(4),
        ];
        let pair = decode(REF, read, 1, &ops);
        let realigned = realign_insertions(&pair, DSB).unwrap();
        assert_eq!(realigned.degapped_read(), read);
        let (ins_pos, del_pos, _) = variation_positions(&realigned);
        assert_eq!(ins_pos, vec![DSB, DSB]);
        assert!(del_pos.is_empty());
    }

    #[test]
    fn test_insertion_realignment_rejected_when_substs_grow() {
        // The inserted base matches the reference where it sits; moving it to
        // the DSB misaligns the rest of the read.
        let read = "AAAAACCCCGGGGTTTT";
        let ops = vec![CigarOp::Match(4), CigarOp::Ins(1), CigarOp::Match(12)];
        let pair = decode(REF, read, 1, &ops);
        assert!(realign_insertions(&pair, DSB).is_none());
    }

    #[test]
    fn test_insertion_realignment_within_partial_reference_extent() {
        // 12 nt read covering reference positions 1-11 only, insertion
        // reported at position 5.
        let read = "AAAACCCCCGGG";
        let ops = vec![CigarOp::Match(5), CigarOp::Ins(1), CigarOp::Match(6)];
        let pair = decode(REF, read, 1, &ops);
        let realigned = realign_insertions(&pair, DSB).unwrap();
        assert_eq!(realigned.degapped_read(), read);
        assert_eq!(realigned.degapped_ref(), &REF[..11]);
        let (ins_pos, _, _) = variation_positions(&realigned);
        assert_eq!(ins_pos, vec![DSB]);
    }

    #[test]
    fn test_deletion_takes_leftmost_viable_placement() {
        // One C deleted out of CCCC: every placement across the C run has
        // zero substitutions, so the leftmost candidate wins.
        let read = "AAAACCCGGGGTTTT";
        let ops = vec![CigarOp::Match(4), CigarOp::Del(1), CigarOp::Match(11)];
        let pair = decode(REF, read, 1, &ops);
        let realigned = realign_deletions(&pair, DSB).unwrap();
        assert_eq!(realigned.degapped_read(), read);
        let (_, del_pos, _) = variation_positions(&realigned);
        assert_eq!(del_pos, vec![DSB]);
    }

    #[test]
    fn test_deletion_skips_substitution_increasing_placements() {
        // Read is the reference with positions 7-8 (CC) deleted; a distant
        // original placement must land back on a zero-substitution cut.
        let read = format!("{}{}", &REF[..6], &REF[8..]);
        let ops = vec![CigarOp::Match(2), CigarOp::Del(2), CigarOp::Match(12)];
        let pair = decode(REF, &read, 1, &ops);
        let (_, _, original_subst) = count_variations(&pair);
        assert!(original_subst > 0);
        let realigned = realign_deletions(&pair, DSB).unwrap();
        assert_eq!(realigned.degapped_read(), read);
        let (ins_pos, del_pos, _) = variation_positions(&realigned);
        assert!(ins_pos.is_empty());
        assert!(count_variations(&realigned).2 <= original_subst);
        assert!(del_pos.contains(&DSB) || del_pos.contains(&(DSB + 1)));
    }

    #[test]
    fn test_deletion_realignment_within_partial_reference_extent() {
        // 10 nt read covering reference positions 1-11; exactly one base is
        // deleted, not the whole uncovered reference tail.
        let read = "AAAACCCGGG";
        let ops = vec![CigarOp::Match(4), CigarOp::Del(1), CigarOp::Match(6)];
        let pair = decode(REF, read, 1, &ops);
        let realigned = realign_deletions(&pair, DSB).unwrap();
        assert_eq!(realigned.degapped_read(), read);
        assert_eq!(realigned.degapped_ref(), &REF[..11]);
        let (_, del_pos, _) = variation_positions(&realigned);
        assert_eq!(del_pos, vec![DSB]);
    }

    #[test]
    fn test_deletion_realignment_can_fail() {
        // Deleting the first A leaves no placement near the DSB that avoids
        // extra substitutions beyond the original single-gap alignment.
        let read = &REF[1..];
        let ops = vec![CigarOp::Del(1), CigarOp::Match(15)];
        let pair = decode(REF, read, 1, &ops);
        assert!(realign_deletions(&pair, DSB).is_none());
    }

    #[test]
    fn test_mixed_alignment_is_never_realigned() {
        let read = "AAAATCCCAGGGTTTT";
        let ops = vec![
            CigarOp::Match(8),
            CigarOp::Ins(1),
            CigarOp::Del(1),
            CigarOp::Match(7),
        ];
        let pair = decode(REF, read, 1, &ops);
        assert!(realign_insertions(&pair, DSB).is_none());
        assert!(realign_deletions(&pair, DSB).is_none());
    }
}
