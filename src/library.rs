//! Content library
//!
//! The static pool of pre-authored review templates, partitioned by star
//! rating. Each partition loads from `star{N}.json` in the library
//! directory — a JSON array of `{title, body}` objects. Template ids are
//! derived from rating and position (`star{N}-{index}`) and stay stable as
//! long as authors only append.
//!
//! A missing or unparseable partition file is not fatal: it loads as an
//! empty partition and the scheduler degrades to skipping entities that
//! draw that rating.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

/// One reusable review text in a star partition
#[derive(Debug, Clone)]
pub struct ReviewTemplate {
    /// Stable id, `star{rating}-{index}`
    pub id: String,
    pub rating: u8,
    pub title: String,
    pub body: String,
}

/// On-disk shape of a library entry
#[derive(Debug, Deserialize)]
struct TemplateSeed {
    title: String,
    body: String,
}

/// Rating-partitioned template pool, loaded once per run
pub struct ReviewLibrary {
    partitions: [Vec<ReviewTemplate>; 5],
}

impl ReviewLibrary {
    /// Load all five partitions from `dir`.
    pub fn load(dir: &Path) -> Self {
        let partitions = std::array::from_fn(|i| {
            let rating = (i + 1) as u8;
            load_partition(dir, rating)
        });
        Self { partitions }
    }

    /// Build directly from `(rating, title, body)` triples (tests).
    pub fn from_parts(parts: &[(u8, &str, &str)]) -> Self {
        let mut partitions: [Vec<ReviewTemplate>; 5] = Default::default();
        for (rating, title, body) in parts {
            let slot = &mut partitions[(*rating as usize) - 1];
            slot.push(ReviewTemplate {
                id: format!("star{}-{}", rating, slot.len()),
                rating: *rating,
                title: (*title).to_string(),
                body: (*body).to_string(),
            });
        }
        Self { partitions }
    }

    /// Templates for one star rating (1-5). Out-of-range ratings yield an
    /// empty slice.
    pub fn partition(&self, rating: u8) -> &[ReviewTemplate] {
        if (1..=5).contains(&rating) {
            &self.partitions[(rating as usize) - 1]
        } else {
            &[]
        }
    }

    /// Total templates across all partitions.
    pub fn total(&self) -> usize {
        self.partitions.iter().map(Vec::len).sum()
    }

    /// Per-partition sizes, for the startup banner.
    pub fn partition_sizes(&self) -> [usize; 5] {
        std::array::from_fn(|i| self.partitions[i].len())
    }
}

fn load_partition(dir: &Path, rating: u8) -> Vec<ReviewTemplate> {
    let path = dir.join(format!("star{}.json", rating));

    let file = match File::open(&path) {
        Ok(f) => f,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Library partition missing, loading empty");
            return Vec::new();
        }
    };

    let seeds: Vec<TemplateSeed> = match serde_json::from_reader(BufReader::new(file)) {
        Ok(s) => s,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Library partition unparseable, loading empty");
            return Vec::new();
        }
    };

    debug!(rating, count = seeds.len(), "Library partition loaded");

    seeds
        .into_iter()
        .enumerate()
        .map(|(index, seed)| ReviewTemplate {
            id: format!("star{}-{}", rating, index),
            rating,
            title: seed.title,
            body: seed.body,
        })
        .collect()
}
