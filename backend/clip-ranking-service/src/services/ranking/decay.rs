/// Age penalty applied to trending scores.
///
/// Both shapes are pure functions of elapsed age and never decrease as age
/// grows. Negative ages (timestamps ahead of the ranking clock) are treated
/// as zero age.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decay {
    /// `penalty * age / interval_ms`
    Linear { interval_ms: i64, penalty: f64 },
    /// `gravity * ln(1 + age / interval_ms)`
    Logarithmic { interval_ms: i64, gravity: f64 },
}

/// One vote point per minute of age.
pub const DEFAULT_INTERVAL_MS: i64 = 60_000;
pub const DEFAULT_WEIGHT: f64 = 1.0;

impl Default for Decay {
    fn default() -> Self {
        Decay::linear(DEFAULT_INTERVAL_MS, DEFAULT_WEIGHT)
    }
}

impl Decay {
    pub fn linear(interval_ms: i64, penalty: f64) -> Self {
        Decay::Linear {
            interval_ms: interval_ms.max(1),
            penalty: sanitize_weight(penalty),
        }
    }

    pub fn logarithmic(interval_ms: i64, gravity: f64) -> Self {
        Decay::Logarithmic {
            interval_ms: interval_ms.max(1),
            gravity: sanitize_weight(gravity),
        }
    }

    /// Penalty for an item of the given age in milliseconds.
    pub fn penalty(&self, age_ms: i64) -> f64 {
        let age = age_ms.max(0) as f64;
        match *self {
            Decay::Linear {
                interval_ms,
                penalty,
            } => sanitize_weight(penalty) * age / interval_ms.max(1) as f64,
            Decay::Logarithmic {
                interval_ms,
                gravity,
            } => sanitize_weight(gravity) * (age / interval_ms.max(1) as f64).ln_1p(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Decay::Linear { .. } => "linear",
            Decay::Logarithmic { .. } => "logarithmic",
        }
    }
}

// A negative or non-finite weight would break monotonicity or yield NaN.
fn sanitize_weight(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}
