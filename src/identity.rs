//! Display identity generation
//!
//! Builds reviewer usernames from a category-scoped prefix pool, a shared
//! suffix pool, and a numeric tail. A bounded FIFO of recently issued names
//! prevents visible repeats within a run; after too many collisions the
//! generator falls back to a coarse time-based disambiguator so it always
//! returns a value.
//!
//! The recency set is explicit state owned by the generator, not a global,
//! so the component stays testable in isolation.

use std::collections::VecDeque;

use chrono::Utc;
use rand::Rng;

use crate::store::records::Category;

/// How many recently issued names are remembered
const DEFAULT_RECENCY_CAPACITY: usize = 100;

/// Collision retries before the timestamp fallback
const DEFAULT_MAX_RETRIES: usize = 50;

const HOSTING_PREFIXES: &[&str] = &[
    "Webmaster", "DevOps", "SiteBuilder", "Admin", "Backend", "Fullstack", "Freelance",
];

const VPN_PREFIXES: &[&str] = &[
    "Private", "Nomad", "Remote", "Traveler", "Streamer", "Secure", "Roaming",
];

const ANTIVIRUS_PREFIXES: &[&str] = &[
    "Careful", "Cautious", "Safety", "Guarded", "Vigilant", "Prudent", "Watchful",
];

const SUFFIXES: &[&str] = &[
    "Mike", "Sarah", "Alex", "Jordan", "Sam", "Chris", "Dana", "Taylor", "Robin", "Casey",
    "Morgan", "Jamie",
];

/// Username generator with a bounded recency window
pub struct IdentityGenerator {
    recent: VecDeque<String>,
    capacity: usize,
    max_retries: usize,
}

impl IdentityGenerator {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_RECENCY_CAPACITY, DEFAULT_MAX_RETRIES)
    }

    /// Custom recency capacity and retry bound (tests shrink these).
    pub fn with_limits(capacity: usize, max_retries: usize) -> Self {
        Self {
            recent: VecDeque::with_capacity(capacity),
            capacity,
            max_retries,
        }
    }

    /// Produce a username not present in the recency window.
    ///
    /// Never fails: once the retry bound is hit, a timestamp tail is
    /// appended, which cannot collide within the window in practice.
    pub fn generate<R: Rng + ?Sized>(&mut self, category: Category, rng: &mut R) -> String {
        for _ in 0..self.max_retries {
            let name = compose(category, rng);
            if !self.recent.contains(&name) {
                self.remember(name.clone());
                return name;
            }
        }

        let name = format!(
            "{}{}",
            compose(category, rng),
            Utc::now().timestamp() % 100_000
        );
        self.remember(name.clone());
        name
    }

    fn remember(&mut self, name: String) {
        if self.recent.len() == self.capacity {
            self.recent.pop_front();
        }
        self.recent.push_back(name);
    }
}

impl Default for IdentityGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn compose<R: Rng + ?Sized>(category: Category, rng: &mut R) -> String {
    let prefixes = match category {
        Category::Hosting => HOSTING_PREFIXES,
        Category::Vpn => VPN_PREFIXES,
        Category::Antivirus => ANTIVIRUS_PREFIXES,
    };
    let prefix = prefixes[rng.random_range(0..prefixes.len())];
    let suffix = SUFFIXES[rng.random_range(0..SUFFIXES.len())];
    let number = rng.random_range(1..1000u32);

    format!("{}{}{}", prefix, suffix, number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_no_collisions_within_window() {
        let mut generator = IdentityGenerator::new();
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let names: Vec<String> = (0..200)
            .map(|_| generator.generate(Category::Vpn, &mut rng))
            .collect();

        // Any window of 100 consecutive names must be collision-free
        for window in names.windows(100) {
            let unique: std::collections::HashSet<_> = window.iter().collect();
            assert_eq!(unique.len(), window.len());
        }
    }

    #[test]
    fn test_category_scoped_prefixes() {
        let mut generator = IdentityGenerator::new();
        let mut rng = ChaCha8Rng::seed_from_u64(12);

        for _ in 0..50 {
            let name = generator.generate(Category::Hosting, &mut rng);
            assert!(
                HOSTING_PREFIXES.iter().any(|p| name.starts_with(p)),
                "unexpected prefix in {}",
                name
            );
        }
    }

    #[test]
    fn test_fallback_always_returns() {
        // Zero retries forces the timestamp fallback immediately
        let mut generator = IdentityGenerator::with_limits(10, 0);
        let mut rng = ChaCha8Rng::seed_from_u64(13);

        let name = generator.generate(Category::Antivirus, &mut rng);
        assert!(!name.is_empty());
        assert!(ANTIVIRUS_PREFIXES.iter().any(|p| name.starts_with(p)));
    }

    #[test]
    fn test_recency_window_evicts_fifo() {
        let mut generator = IdentityGenerator::with_limits(2, 50);
        let mut rng = ChaCha8Rng::seed_from_u64(14);

        for _ in 0..10 {
            generator.generate(Category::Vpn, &mut rng);
            assert!(generator.recent.len() <= 2);
        }
    }
}
