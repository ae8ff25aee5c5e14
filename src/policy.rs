//! Quality tier classification and posting policies
//!
//! Every site record carries a free-form quality tier string set by admin
//! tooling. The tier decides how often the scheduler posts to that site,
//! which star ratings are allowed, how a rating is drawn from the allowed
//! range, and how many seed reviews the site may accumulate in total.
//!
//! The mapping is closed and exhaustive: adding a tier means adding an enum
//! variant and a row in `policy()`. Unknown or empty tier strings resolve to
//! `Normal` rather than failing, so a mistyped tier in the record store can
//! never halt a run.

/// Closed set of supported quality tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QualityTier {
    Premium,
    Excellent,
    Normal,
    Poor,
    Malicious,
}

impl QualityTier {
    /// Resolve a raw tier string from the record store.
    ///
    /// Case-insensitive, whitespace-tolerant. Anything unrecognized maps to
    /// the default `Normal` tier.
    pub fn classify(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "premium" => Self::Premium,
            "excellent" => Self::Excellent,
            "poor" => Self::Poor,
            "malicious" => Self::Malicious,
            _ => Self::Normal,
        }
    }

    /// The static posting policy for this tier.
    pub fn policy(self) -> TierPolicy {
        match self {
            Self::Premium => TierPolicy {
                posting_probability: 0.85,
                rating_range: (4, 5),
                weighting: Weighting::Fixed(&[(4, 0.40), (5, 0.60)]),
                max_total_reviews: 120,
            },
            Self::Excellent => TierPolicy {
                posting_probability: 0.70,
                rating_range: (3, 5),
                weighting: Weighting::Fixed(&[(3, 0.25), (4, 0.55), (5, 0.20)]),
                max_total_reviews: 80,
            },
            Self::Normal => TierPolicy {
                posting_probability: 0.50,
                rating_range: (2, 4),
                weighting: Weighting::BandConvergence(ConvergenceBand { min: 2.8, max: 3.2 }),
                max_total_reviews: 50,
            },
            Self::Poor => TierPolicy {
                posting_probability: 0.30,
                rating_range: (1, 3),
                weighting: Weighting::Uniform,
                max_total_reviews: 30,
            },
            Self::Malicious => TierPolicy {
                posting_probability: 0.55,
                rating_range: (1, 2),
                weighting: Weighting::Uniform,
                max_total_reviews: 35,
            },
        }
    }
}

/// Posting policy attached to a quality tier
#[derive(Debug, Clone)]
pub struct TierPolicy {
    /// Chance that an eligible site receives a review in a given run
    pub posting_probability: f64,

    /// Inclusive (min, max) star range
    pub rating_range: (u8, u8),

    /// How a rating is drawn from the allowed range
    pub weighting: Weighting,

    /// Hard cap on total seed reviews per site
    pub max_total_reviews: u32,
}

/// Rating draw strategy
#[derive(Debug, Clone)]
pub enum Weighting {
    /// Explicit probability table over allowed ratings
    Fixed(&'static [(u8, f64)]),

    /// History-aware draws that steer the rolling average into a band
    BandConvergence(ConvergenceBand),

    /// Uniform draw over the allowed range
    Uniform,
}

/// Target band for the rolling rating average
#[derive(Debug, Clone, Copy)]
pub struct ConvergenceBand {
    pub min: f64,
    pub max: f64,
}
