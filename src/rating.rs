//! Star rating selection
//!
//! Draws one rating from a tier's allowed range under its weighting mode.
//! Band-convergence tiers steer a site's rolling average back into the
//! target band: bias toward the low end when the average drifts above it,
//! toward the high end when it drifts below, moderate center weighting when
//! in band. An anti-streak rule breaks up runs of identical scores that
//! would look mechanical on the page.
//!
//! The random source is always passed in so tests can pin a seed.

use rand::Rng;

use crate::ledger::RatingHistory;
use crate::policy::{ConvergenceBand, TierPolicy, Weighting};

/// Ratings needed before convergence steering kicks in
const MIN_HISTORY_FOR_CONVERGENCE: usize = 3;

/// Identical trailing ratings that trigger a forced re-pick
const STREAK_LENGTH: usize = 3;

/// Weight on the band-center value before any history exists
const DEFAULT_CENTER_WEIGHT: f64 = 0.50;

/// Weight on the band-center value while the average sits in band
const IN_BAND_CENTER_WEIGHT: f64 = 0.60;

/// Split between the two edge values when pulling the average back
const PULL_PRIMARY_WEIGHT: f64 = 0.70;
const PULL_SECONDARY_WEIGHT: f64 = 0.30;

/// Draw one rating for a site under its tier policy.
pub fn select<R: Rng + ?Sized>(policy: &TierPolicy, history: &RatingHistory, rng: &mut R) -> u8 {
    let (min, max) = policy.rating_range;
    if min == max {
        return min;
    }

    match &policy.weighting {
        Weighting::Fixed(table) => weighted_pick(table, rng),
        Weighting::Uniform => rng.random_range(min..=max),
        Weighting::BandConvergence(band) => select_convergent(policy, band, history, rng),
    }
}

fn select_convergent<R: Rng + ?Sized>(
    policy: &TierPolicy,
    band: &ConvergenceBand,
    history: &RatingHistory,
    rng: &mut R,
) -> u8 {
    let (min, max) = policy.rating_range;
    let allowed: Vec<u8> = (min..=max).collect();

    let weights = if history.count < MIN_HISTORY_FOR_CONVERGENCE {
        center_weighted(&allowed, DEFAULT_CENTER_WEIGHT)
    } else if history.average > band.max {
        // Average too high: lean on the two lowest allowed values
        edge_weighted(&allowed[..2], false)
    } else if history.average < band.min {
        // Average too low: lean on the two highest allowed values
        edge_weighted(&allowed[allowed.len() - 2..], true)
    } else {
        center_weighted(&allowed, IN_BAND_CENTER_WEIGHT)
    };

    let pick = weighted_pick(&weights, rng);

    // Three identical scores in a row followed by a fourth reads as a bot.
    // Re-pick uniformly from the rest of the range.
    if history.recent.len() >= STREAK_LENGTH && history.has_streak(pick) {
        let others: Vec<u8> = allowed.into_iter().filter(|v| *v != pick).collect();
        return others[rng.random_range(0..others.len())];
    }

    pick
}

/// Center value gets `center_weight`, the remainder splits evenly.
fn center_weighted(allowed: &[u8], center_weight: f64) -> Vec<(u8, f64)> {
    let center = allowed[allowed.len() / 2];
    let rest = allowed.len() - 1;
    let other_weight = (1.0 - center_weight) / rest as f64;

    allowed
        .iter()
        .map(|v| {
            if *v == center {
                (*v, center_weight)
            } else {
                (*v, other_weight)
            }
        })
        .collect()
}

/// 70/30 split over a two-value edge slice. `favor_high` puts the primary
/// weight on the larger value.
fn edge_weighted(pair: &[u8], favor_high: bool) -> Vec<(u8, f64)> {
    match pair {
        [single] => vec![(*single, 1.0)],
        [low, high] => {
            if favor_high {
                vec![(*high, PULL_PRIMARY_WEIGHT), (*low, PULL_SECONDARY_WEIGHT)]
            } else {
                vec![(*low, PULL_PRIMARY_WEIGHT), (*high, PULL_SECONDARY_WEIGHT)]
            }
        }
        _ => pair.iter().map(|v| (*v, 1.0 / pair.len() as f64)).collect(),
    }
}

fn weighted_pick<R: Rng + ?Sized>(weights: &[(u8, f64)], rng: &mut R) -> u8 {
    let total: f64 = weights.iter().map(|(_, w)| w).sum();
    let mut roll = rng.random_range(0.0..total);
    for (value, weight) in weights {
        if roll < *weight {
            return *value;
        }
        roll -= weight;
    }
    // Floating-point edge: fall back to the last table entry
    weights[weights.len() - 1].0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::QualityTier;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    #[test]
    fn test_single_value_range_always_returned() {
        let policy = TierPolicy {
            posting_probability: 1.0,
            rating_range: (5, 5),
            weighting: Weighting::Uniform,
            max_total_reviews: 10,
        };
        let history = RatingHistory::default();
        let mut rng = rng(1);
        for _ in 0..100 {
            assert_eq!(select(&policy, &history, &mut rng), 5);
        }
    }

    #[test]
    fn test_fixed_weights_stay_in_table() {
        let policy = QualityTier::Excellent.policy();
        let history = RatingHistory::default();
        let mut rng = rng(2);
        for _ in 0..500 {
            let rating = select(&policy, &history, &mut rng);
            assert!((3..=5).contains(&rating));
        }
    }

    #[test]
    fn test_uniform_covers_range() {
        let policy = QualityTier::Poor.policy();
        let history = RatingHistory::default();
        let mut rng = rng(3);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(select(&policy, &history, &mut rng));
        }
        let expected: std::collections::HashSet<u8> = [1, 2, 3].into_iter().collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_high_average_biases_low() {
        let policy = QualityTier::Normal.policy();
        let history = RatingHistory::from_ratings(&[4, 4, 4, 4, 4, 2]);
        assert!(history.average > 3.2);

        let mut rng = rng(4);
        let mut low = 0;
        for _ in 0..1000 {
            let rating = select(&policy, &history, &mut rng);
            assert!(rating <= 3, "pull-down draw must use the two lowest values");
            if rating == 2 {
                low += 1;
            }
        }
        // 70% primary weight on the lowest value
        assert!(low > 600, "expected ~700 twos, got {}", low);
    }

    #[test]
    fn test_low_average_biases_high() {
        let policy = QualityTier::Normal.policy();
        let history = RatingHistory::from_ratings(&[2, 2, 2, 2, 3]);
        assert!(history.average < 2.8);

        let mut rng = rng(5);
        for _ in 0..1000 {
            let rating = select(&policy, &history, &mut rng);
            assert!(rating >= 3, "pull-up draw must use the two highest values");
        }
    }

    #[test]
    fn test_anti_streak_forces_repick() {
        let policy = QualityTier::Normal.policy();
        // In-band average with three threes in a row
        let history = RatingHistory::from_ratings(&[3, 3, 3]);

        for seed in 0..100 {
            let mut rng = rng(seed);
            let rating = select(&policy, &history, &mut rng);
            assert_ne!(rating, 3, "streak of threes must not extend (seed {})", seed);
        }
    }

    #[test]
    fn test_band_convergence_from_high_start() {
        let policy = QualityTier::Normal.policy();
        let mut rng = rng(6);

        // Start at average 3.6 over 5 ratings, then run 50 selections
        let mut ratings: Vec<u8> = vec![4, 4, 4, 3, 3];
        for _ in 0..50 {
            let history = RatingHistory::from_ratings(&ratings);
            ratings.push(select(&policy, &history, &mut rng));
        }

        let final_avg =
            ratings.iter().map(|r| f64::from(*r)).sum::<f64>() / ratings.len() as f64;
        assert!(
            (2.6..=3.4).contains(&final_avg),
            "average did not converge toward the band: {}",
            final_avg
        );
    }

    #[test]
    fn test_deterministic_with_same_seed() {
        let policy = QualityTier::Premium.policy();
        let history = RatingHistory::default();

        let a: Vec<u8> = {
            let mut rng = rng(42);
            (0..20).map(|_| select(&policy, &history, &mut rng)).collect()
        };
        let b: Vec<u8> = {
            let mut rng = rng(42);
            (0..20).map(|_| select(&policy, &history, &mut rng)).collect()
        };
        assert_eq!(a, b);
    }
}
