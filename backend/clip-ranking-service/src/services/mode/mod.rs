use crate::models::RankMode;
use std::sync::atomic::{AtomicU8, Ordering};
use tracing::info;

/// Process-wide holder for the current ranking mode.
///
/// Readers take one snapshot per ranking pass via [`ModeHolder::load`]; a
/// toggle only affects passes that start afterwards.
#[derive(Debug)]
pub struct ModeHolder {
    mode: AtomicU8,
}

impl Default for ModeHolder {
    fn default() -> Self {
        Self::new(RankMode::default())
    }
}

impl ModeHolder {
    pub fn new(mode: RankMode) -> Self {
        Self {
            mode: AtomicU8::new(mode.to_u8()),
        }
    }

    pub fn load(&self) -> RankMode {
        RankMode::from_u8(self.mode.load(Ordering::Acquire))
    }

    pub fn store(&self, mode: RankMode) {
        let previous = RankMode::from_u8(self.mode.swap(mode.to_u8(), Ordering::AcqRel));
        if previous != mode {
            info!(from = previous.as_str(), to = mode.as_str(), "Rank mode changed");
        }
    }

    /// Flip between chronological and trending, returning the new mode.
    pub fn toggle(&self) -> RankMode {
        let previous = self.mode.fetch_xor(1, Ordering::AcqRel);
        let current = RankMode::from_u8(previous ^ 1);
        info!(
            from = RankMode::from_u8(previous).as_str(),
            to = current.as_str(),
            "Rank mode toggled"
        );
        current
    }
}
