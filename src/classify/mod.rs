mod classifier;
mod read;
mod realign;
mod stats;

pub use classifier::{
    consecutive, touches_dsb, AcceptedRead, ClassifyParams, ReadClassifier, Verdict,
};
pub use read::AmpliconRead;
pub use realign::{realign_deletions, realign_insertions};
pub use stats::{ClassificationStats, RealignPath, RejectReason};
