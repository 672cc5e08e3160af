use super::pair::{AlignmentPair, GAP};
use crate::utils::ReferenceSequence;

#[derive(Debug, Default)]
struct AnchorTally {
    subst: i64,
    indel: i64,
}

impl AnchorTally {
    fn add(&mut self, r: char, q: char) {
        if r == GAP || q == GAP {
            self.indel += 1;
        } else if r != q {
            self.subst += 1;
        }
    }

    fn within(&self, subst_limit: i64, indel_limit: i64) -> bool {
        // A negative limit disables the corresponding check.
        (subst_limit < 0 || self.subst <= subst_limit)
            && (indel_limit < 0 || self.indel <= indel_limit)
    }
}

/// Restricts an alignment to the window of `window_size` reference positions
/// on each side of the DSB, i.e. `[dsb_pos - window_size + 1, dsb_pos +
/// window_size]`.
///
/// The `anchor_size` positions flanking the window on either side validate
/// alignment quality near the window but are never part of the result.
/// Returns `None` when the alignment's reference extent ends before the right
/// anchor does, or when an anchor accumulates more substitutions or indel
/// columns than allowed (negative limits disable a check).
pub fn extract_window(
    pair: &AlignmentPair,
    dsb_pos: usize,
    window_size: usize,
    anchor_size: usize,
    anchor_subst_limit: i64,
    anchor_indel_limit: i64,
) -> Option<AlignmentPair> {
    assert!(
        dsb_pos >= window_size + anchor_size,
        "Window and anchor do not fit upstream of the DSB"
    );
    let win_lo = dsb_pos + 1 - window_size;
    let win_hi = dsb_pos + window_size;
    let left_start = win_lo - anchor_size;
    let right_end = win_hi + anchor_size;

    let mut ref_window = String::new();
    let mut read_window = String::new();
    let mut left = AnchorTally::default();
    let mut right = AnchorTally::default();
    let mut cursor = 0;

    for (r, q) in pair.columns() {
        // Insertion columns take the reference position immediately upstream.
        let pos = if r == GAP {
            cursor
        } else {
            cursor += 1;
            cursor
        };
        if pos > right_end {
            break;
        }
        if pos >= left_start && pos < win_lo {
            left.add(r, q);
        } else if pos >= win_lo && pos <= win_hi {
            ref_window.push(r);
            read_window.push(q);
        } else if pos > win_hi {
            right.add(r, q);
        }
    }

    // Read too short: its reference extent never covered the right anchor.
    if cursor < right_end {
        return None;
    }
    if !left.within(anchor_subst_limit, anchor_indel_limit)
        || !right.within(anchor_subst_limit, anchor_indel_limit)
    {
        return None;
    }
    Some(AlignmentPair::new(ref_window, read_window))
}

/// The canonical reference window every graph node shares: the reference
/// aligned against itself, restricted to the DSB window with no anchors.
pub fn reference_window(reference: &ReferenceSequence, window_size: usize) -> AlignmentPair {
    let identity = AlignmentPair::new(reference.seq().to_string(), reference.seq().to_string());
    extract_window(&identity, reference.dsb_pos(), window_size, 0, 0, 0)
        .expect("Reference does not span its own DSB window")
}
