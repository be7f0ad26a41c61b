/// Ranking Module
///
/// Orders a batch of submitted clips for display.
///
/// # Modes
/// - **Chronological**: newest submission first, votes ignored
/// - **Trending**: net votes minus an age penalty (see [`Decay`])
///
/// # Tie-breaks
/// Every comparison ends on the clip id, so the result is a total order and
/// repeated passes over the same batch are identical.
pub mod decay;
pub mod engine;

pub use decay::Decay;
pub use engine::{ItemScore, RankingEngine};
