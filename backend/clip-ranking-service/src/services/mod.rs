pub mod feed;
pub mod mode;
pub mod ranking;
pub mod snapshot;

pub use feed::{ClipFeed, ClipSource, FeedError, JsonFileSource};
pub use mode::ModeHolder;
pub use ranking::{Decay, ItemScore, RankingEngine};
pub use snapshot::{decode_snapshot, parse_snapshot, SnapshotError};
