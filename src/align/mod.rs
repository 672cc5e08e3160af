mod codec;
mod pair;
mod variation;
mod window;

pub use codec::{cigar_string, decode, encode, CigarOp};
pub use pair::{degap, AlignmentPair, GAP};
pub use variation::{count_variations, variation_info, variation_positions, Variation, VariationKind};
pub use window::{extract_window, reference_window};
