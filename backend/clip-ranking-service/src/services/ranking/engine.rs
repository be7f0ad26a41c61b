use super::decay::Decay;
use crate::models::{ContentItem, RankMode, RankedResult};
use std::cmp::Ordering;
use tracing::debug;

/// Ranking key of a single clip at a fixed clock value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemScore {
    pub net_score: i64,
    /// `net_score - decay(now - submitted_at)`
    pub trend_score: f64,
}

/// Orders a batch of clips for display.
///
/// Stateless between calls: the mode is passed in per call and the clock is
/// read at most once per pass, so concurrent callers never share mutable state.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankingEngine {
    decay: Decay,
}

struct RankKey<'a> {
    id: &'a str,
    submitted_at: i64,
    score: ItemScore,
}

impl RankingEngine {
    pub fn new(decay: Decay) -> Self {
        Self { decay }
    }

    pub fn decay(&self) -> Decay {
        self.decay
    }

    /// Rank a batch against the current wall clock.
    pub fn rank(&self, items: &[ContentItem], mode: RankMode) -> RankedResult {
        let now_ms = chrono::Utc::now().timestamp_millis();
        self.rank_at(items, mode, now_ms)
    }

    /// Rank a batch against an explicit clock value.
    ///
    /// Output is a permutation of the input ids. Identical inputs always give
    /// identical output.
    pub fn rank_at(&self, items: &[ContentItem], mode: RankMode, now_ms: i64) -> RankedResult {
        let mut keys: Vec<RankKey<'_>> = items
            .iter()
            .map(|item| RankKey {
                id: item.id.as_str(),
                submitted_at: item.submitted_at,
                score: self.score(item, now_ms),
            })
            .collect();

        let compare: fn(&RankKey<'_>, &RankKey<'_>) -> Ordering = match mode {
            RankMode::Chronological => chronological_order,
            RankMode::Trending => trending_order,
        };
        keys.sort_by(compare);

        debug!(
            mode = mode.as_str(),
            decay = self.decay.kind(),
            now_ms,
            batch_size = keys.len(),
            "Ranked clip batch"
        );

        RankedResult {
            mode,
            now_ms,
            ids: keys.into_iter().map(|key| key.id.to_string()).collect(),
        }
    }

    pub fn score(&self, item: &ContentItem, now_ms: i64) -> ItemScore {
        let net_score = item.net_score();
        let age_ms = now_ms.saturating_sub(item.submitted_at);

        ItemScore {
            net_score,
            trend_score: net_score as f64 - self.decay.penalty(age_ms),
        }
    }
}

/// Newest first, then id ascending.
fn chronological_order(a: &RankKey<'_>, b: &RankKey<'_>) -> Ordering {
    b.submitted_at
        .cmp(&a.submitted_at)
        .then_with(|| a.id.cmp(b.id))
}

/// Trend score, net score, recency (all descending), then id ascending.
fn trending_order(a: &RankKey<'_>, b: &RankKey<'_>) -> Ordering {
    b.score
        .trend_score
        .total_cmp(&a.score.trend_score)
        .then_with(|| b.score.net_score.cmp(&a.score.net_score))
        .then_with(|| chronological_order(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VoteSet;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;

    const MINUTE: i64 = 60_000;

    fn votes(up: usize, down: usize) -> VoteSet {
        let mut set = VoteSet::new();
        for i in 0..up {
            set.cast(format!("up-{}", i), true);
        }
        for i in 0..down {
            set.cast(format!("down-{}", i), false);
        }
        set
    }

    fn item(id: &str, submitted_at: i64, net: i64) -> ContentItem {
        let set = if net >= 0 {
            votes(net as usize, 0)
        } else {
            votes(0, net.unsigned_abs() as usize)
        };
        ContentItem::new(id, submitted_at, set)
    }

    fn random_batch(rng: &mut StdRng, len: usize) -> Vec<ContentItem> {
        (0..len)
            .map(|i| {
                ContentItem::new(
                    format!("clip-{:03}", i),
                    rng.gen_range(-5..20) * MINUTE,
                    votes(rng.gen_range(0..6), rng.gen_range(0..6)),
                )
            })
            .collect()
    }

    #[test]
    fn test_empty_batch() {
        let engine = RankingEngine::default();
        for mode in [RankMode::Chronological, RankMode::Trending] {
            let ranked = engine.rank(&[], mode);
            assert!(ranked.is_empty());
            assert_eq!(ranked.mode, mode);
        }
    }

    #[test]
    fn test_chronological_newest_first_ignores_votes() {
        let engine = RankingEngine::default();
        let items = vec![
            item("old-popular", 0, 50),
            item("new-hated", 2 * MINUTE, -10),
            item("middle", MINUTE, 0),
        ];

        let ranked = engine.rank_at(&items, RankMode::Chronological, 10 * MINUTE);
        assert_eq!(ranked.ids(), ["new-hated", "middle", "old-popular"]);
    }

    #[test]
    fn test_chronological_ties_broken_by_id() {
        let engine = RankingEngine::default();
        let items = vec![item("b", 5, 0), item("c", 5, 9), item("a", 5, -2)];

        let ranked = engine.rank_at(&items, RankMode::Chronological, 0);
        assert_eq!(ranked.ids(), ["a", "b", "c"]);
    }

    #[test]
    fn test_trending_same_age_orders_by_net_score() {
        let engine = RankingEngine::default();
        let items = vec![item("low", 0, 1), item("high", 0, 7), item("neg", 0, -3)];

        let ranked = engine.rank_at(&items, RankMode::Trending, 0);
        assert_eq!(ranked.ids(), ["high", "low", "neg"]);
    }

    #[test]
    fn test_trending_tie_breaks() {
        // Same trend score (1.0): higher net score wins, then recency, then id.
        let engine = RankingEngine::default();
        let items = vec![
            item("older-more-votes", 0, 3),
            item("newer-fewer-votes", 2 * MINUTE, 1),
            item("b-same", 2 * MINUTE, 1),
        ];

        let ranked = engine.rank_at(&items, RankMode::Trending, 2 * MINUTE);
        assert_eq!(
            ranked.ids(),
            ["older-more-votes", "b-same", "newer-fewer-votes"]
        );
    }

    #[test]
    fn test_trending_older_item_is_penalized() {
        let engine = RankingEngine::default();
        let items = vec![item("old", 0, 4), item("new", 10 * MINUTE, 4)];

        let ranked = engine.rank_at(&items, RankMode::Trending, 10 * MINUTE);
        assert_eq!(ranked.ids(), ["new", "old"]);

        let old = engine.score(&items[0], 10 * MINUTE);
        assert_eq!(old.net_score, 4);
        assert_eq!(old.trend_score, -6.0);
    }

    #[test]
    fn test_malformed_timestamps_still_ranked() {
        let engine = RankingEngine::new(Decay::logarithmic(MINUTE, 2.0));
        let items = vec![
            item("negative", -1_000, 2),
            item("min", i64::MIN, 0),
            item("max", i64::MAX, 0),
            item("normal", 1_000, 1),
        ];

        for mode in [RankMode::Chronological, RankMode::Trending] {
            let ranked = engine.rank_at(&items, mode, 5_000);
            assert_eq!(ranked.len(), items.len());
        }

        let chronological = engine.rank_at(&items, RankMode::Chronological, 5_000);
        assert_eq!(chronological.ids(), ["max", "normal", "negative", "min"]);
    }

    #[test]
    fn test_rank_is_a_permutation() {
        let engine = RankingEngine::default();
        let mut rng = StdRng::seed_from_u64(7);

        for len in [1, 2, 17, 120] {
            let items = random_batch(&mut rng, len);
            let expected: HashSet<&str> = items.iter().map(|i| i.id.as_str()).collect();

            for mode in [RankMode::Chronological, RankMode::Trending] {
                let ranked = engine.rank_at(&items, mode, 20 * MINUTE);
                let seen: HashSet<&str> = ranked.ids().iter().map(String::as_str).collect();
                assert_eq!(ranked.len(), items.len());
                assert_eq!(seen, expected);
            }
        }
    }

    #[test]
    fn test_rank_is_deterministic_regardless_of_input_order() {
        let engine = RankingEngine::default();
        let mut rng = StdRng::seed_from_u64(42);
        let items = random_batch(&mut rng, 60);
        let mut reversed = items.clone();
        reversed.reverse();

        for mode in [RankMode::Chronological, RankMode::Trending] {
            let first = engine.rank_at(&items, mode, 20 * MINUTE);
            let second = engine.rank_at(&items, mode, 20 * MINUTE);
            let shuffled = engine.rank_at(&reversed, mode, 20 * MINUTE);
            assert_eq!(first, second);
            assert_eq!(first.ids(), shuffled.ids());
        }
    }

    #[test]
    fn test_orderings_respect_monotonicity() {
        let engine = RankingEngine::default();
        let mut rng = StdRng::seed_from_u64(2024);
        let now = 20 * MINUTE;
        let items = random_batch(&mut rng, 80);

        let position = |ids: &[String], id: &str| ids.iter().position(|x| x == id);

        let chronological = engine.rank_at(&items, RankMode::Chronological, now);
        let trending = engine.rank_at(&items, RankMode::Trending, now);

        for a in &items {
            for b in &items {
                if a.submitted_at > b.submitted_at {
                    assert!(
                        position(chronological.ids(), &a.id) < position(chronological.ids(), &b.id)
                    );
                }
                // Equal votes: the more recent clip never ranks below the older.
                if a.net_score() == b.net_score() && a.submitted_at > b.submitted_at {
                    assert!(position(trending.ids(), &a.id) < position(trending.ids(), &b.id));
                }
            }
        }
    }
}
