//! Apportionment - splitting withheld amounts across budget commitments.

mod engine;

pub use engine::{split_withholdings, Apportionment, CommitmentShare, SplitItem};
