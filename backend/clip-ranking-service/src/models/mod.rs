use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Votes on a single clip, keyed by voter instance id.
///
/// `true` is an upvote, `false` a downvote. A voter holds at most one entry;
/// casting again overwrites the previous direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteSet {
    votes: HashMap<String, bool>,
}

/// Direction of a single voter's vote, as shown on the vote buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDirection {
    Up,
    Down,
    None,
}

impl VoteDirection {
    pub fn as_i8(&self) -> i8 {
        match self {
            VoteDirection::Up => 1,
            VoteDirection::Down => -1,
            VoteDirection::None => 0,
        }
    }
}

impl VoteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a vote; last write wins for the same voter.
    pub fn cast(&mut self, voter: impl Into<String>, up: bool) {
        self.votes.insert(voter.into(), up);
    }

    /// Remove a voter's vote, returning the direction it had.
    pub fn retract(&mut self, voter: &str) -> Option<bool> {
        self.votes.remove(voter)
    }

    pub fn direction_of(&self, voter: &str) -> VoteDirection {
        match self.votes.get(voter) {
            Some(true) => VoteDirection::Up,
            Some(false) => VoteDirection::Down,
            None => VoteDirection::None,
        }
    }

    pub fn upvotes(&self) -> i64 {
        self.votes.values().filter(|up| **up).count() as i64
    }

    pub fn downvotes(&self) -> i64 {
        self.votes.values().filter(|up| !**up).count() as i64
    }

    /// Upvotes minus downvotes.
    pub fn net_score(&self) -> i64 {
        self.votes
            .values()
            .map(|up| if *up { 1 } else { -1 })
            .sum()
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.votes.iter().map(|(voter, up)| (voter.as_str(), *up))
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for VoteSet {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        let mut set = VoteSet::new();
        for (voter, up) in iter {
            set.cast(voter, up);
        }
        set
    }
}

/// One submitted clip as seen by the ranking engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    /// Submission time in milliseconds; never mutated after creation.
    pub submitted_at: i64,
    #[serde(default, deserialize_with = "null_as_empty_votes")]
    pub votes: VoteSet,
}

impl ContentItem {
    pub fn new(id: impl Into<String>, submitted_at: i64, votes: VoteSet) -> Self {
        Self {
            id: id.into(),
            submitted_at,
            votes,
        }
    }

    pub fn net_score(&self) -> i64 {
        self.votes.net_score()
    }
}

fn null_as_empty_votes<'de, D>(deserializer: D) -> Result<VoteSet, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<VoteSet>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Ordering policy for a ranking pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankMode {
    /// Newest first; votes ignored.
    #[default]
    Chronological,
    /// Net votes minus an age penalty.
    Trending,
}

impl RankMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankMode::Chronological => "chronological",
            RankMode::Trending => "trending",
        }
    }

    pub(crate) fn to_u8(self) -> u8 {
        match self {
            RankMode::Chronological => 0,
            RankMode::Trending => 1,
        }
    }

    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            1 => RankMode::Trending,
            _ => RankMode::Chronological,
        }
    }
}

impl fmt::Display for RankMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rank mode: {0} (expected chronological or trending)")]
pub struct ParseRankModeError(pub String);

impl FromStr for RankMode {
    type Err = ParseRankModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chronological" => Ok(RankMode::Chronological),
            "trending" => Ok(RankMode::Trending),
            other => Err(ParseRankModeError(other.to_string())),
        }
    }
}

/// Output of one ranking pass: every input id exactly once, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub mode: RankMode,
    /// Clock value the pass was computed against.
    pub now_ms: i64,
    pub ids: Vec<String>,
}

impl RankedResult {
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn into_ids(self) -> Vec<String> {
        self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
