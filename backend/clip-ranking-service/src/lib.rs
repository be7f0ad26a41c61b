pub mod config;
pub mod models;
pub mod services;

pub use config::Config;
pub use models::{ContentItem, RankMode, RankedResult, VoteDirection, VoteSet};
pub use services::{ClipFeed, ClipSource, Decay, ModeHolder, RankingEngine};
