pub mod similarity;

pub use similarity::{close_matches, MatchingBlocks, NormalizedLevenshtein, Similarity};
