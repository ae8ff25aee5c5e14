//! Run orchestration
//!
//! One scheduler run makes a single pass over the eligible site records:
//! gate by volume cap and posting probability, truncate to the run-wide
//! post cap, then for each survivor pick a rating, draw a non-repeated and
//! vocabulary-clean template, attach a generated identity, and emit the
//! review to the record store followed by a ledger rewrite.
//!
//! Failures are isolated per entity: a store write error or an empty
//! candidate pool skips that site and the run moves on. Only the initial
//! entity listing is fatal, because without it there is no candidate set.
//! There is no retry inside a run — a failed site is simply eligible again
//! on the next scheduled invocation.

use std::collections::HashSet;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use rand::Rng;
use tracing::{info, warn};
use uuid::Uuid;

use crate::identity::IdentityGenerator;
use crate::ledger::{self, RatingHistory};
use crate::library::{ReviewLibrary, ReviewTemplate};
use crate::policy::QualityTier;
use crate::rating;
use crate::store::records::{Category, EntityRecord, NewReview};
use crate::store::RecordStore;
use crate::types::Result;
use crate::vocab;

/// Scheduler knobs
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Run-wide cap on posted reviews, bounding store write volume
    pub max_posts_per_run: usize,

    /// Courtesy delay between external writes (zero in tests)
    pub write_delay: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_posts_per_run: 5,
            write_delay: Duration::from_millis(1500),
        }
    }
}

/// Per-entity result of one run
#[derive(Debug, Clone, PartialEq)]
pub enum PostOutcome {
    /// A review was created and the ledger rewritten
    Posted { rating: u8, title: String },
    /// Site already holds its tier's maximum seed reviews
    SkippedVolumeCap,
    /// Lost the per-run probability draw (expected steady state)
    SkippedProbability,
    /// Category tag not in the supported set
    SkippedUnknownCategory,
    /// No usable template for the drawn rating
    SkippedEmptyPool,
    /// Store write failed; ledger untouched, template stays eligible
    Failed(String),
}

/// Outcome attached to the entity it concerns
#[derive(Debug, Clone)]
pub struct EntityOutcome {
    pub entity_id: String,
    pub outcome: PostOutcome,
}

/// Summary of one scheduler run
#[derive(Debug)]
pub struct RunReport {
    pub run_id: Uuid,
    pub date: NaiveDate,
    pub outcomes: Vec<EntityOutcome>,
}

impl RunReport {
    pub fn posted(&self) -> usize {
        self.count(|o| matches!(o, PostOutcome::Posted { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                PostOutcome::SkippedVolumeCap
                    | PostOutcome::SkippedProbability
                    | PostOutcome::SkippedUnknownCategory
                    | PostOutcome::SkippedEmptyPool
            )
        })
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, PostOutcome::Failed(_)))
    }

    /// Human-readable one-line summary for the run log.
    pub fn summary(&self) -> String {
        format!(
            "run {}: {} posted, {} skipped, {} failed ({} entities examined)",
            self.run_id,
            self.posted(),
            self.skipped(),
            self.failed(),
            self.outcomes.len()
        )
    }

    fn count(&self, predicate: impl Fn(&PostOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|e| predicate(&e.outcome)).count()
    }
}

/// Survivor of the gating pass, ready for selection
struct Candidate {
    entity: EntityRecord,
    category: Category,
    tier: QualityTier,
}

/// The review-distribution scheduler
pub struct Scheduler<'a> {
    store: &'a dyn RecordStore,
    library: &'a ReviewLibrary,
    identities: IdentityGenerator,
    config: SchedulerConfig,
}

impl<'a> Scheduler<'a> {
    pub fn new(store: &'a dyn RecordStore, library: &'a ReviewLibrary, config: SchedulerConfig) -> Self {
        Self {
            store,
            library,
            identities: IdentityGenerator::new(),
            config,
        }
    }

    /// Execute one run for `now`.
    ///
    /// Fails only when the entity listing itself fails; everything after
    /// that is per-entity and isolated.
    pub async fn run<R: Rng + ?Sized>(&mut self, now: NaiveDate, rng: &mut R) -> Result<RunReport> {
        let run_id = Uuid::new_v4();
        let entities = self.store.list_eligible_entities().await?;
        info!(run = %run_id, entities = entities.len(), "Run started");

        let mut outcomes = Vec::new();
        let mut survivors = Vec::new();

        for entity in entities {
            let Some(category) = Category::from_tag(&entity.category) else {
                warn!(entity = %entity.id, tag = %entity.category, "Unknown category tag, skipping");
                outcomes.push(EntityOutcome {
                    entity_id: entity.id.clone(),
                    outcome: PostOutcome::SkippedUnknownCategory,
                });
                continue;
            };

            let tier = QualityTier::classify(&entity.quality_tier);
            let policy = tier.policy();

            if entity.review_count >= policy.max_total_reviews {
                outcomes.push(EntityOutcome {
                    entity_id: entity.id.clone(),
                    outcome: PostOutcome::SkippedVolumeCap,
                });
                continue;
            }

            if !rng.random_bool(policy.posting_probability) {
                outcomes.push(EntityOutcome {
                    entity_id: entity.id.clone(),
                    outcome: PostOutcome::SkippedProbability,
                });
                continue;
            }

            survivors.push(Candidate { entity, category, tier });
        }

        // Run-wide write cap; survivor order is enumeration order
        survivors.truncate(self.config.max_posts_per_run);

        for candidate in survivors {
            let entity_id = candidate.entity.id.clone();
            let outcome = self.process_entity(candidate, now, rng).await;
            outcomes.push(EntityOutcome { entity_id, outcome });

            self.pause().await;
        }

        let report = RunReport {
            run_id,
            date: now,
            outcomes,
        };
        info!("{}", report.summary());
        Ok(report)
    }

    async fn process_entity<R: Rng + ?Sized>(
        &mut self,
        candidate: Candidate,
        now: NaiveDate,
        rng: &mut R,
    ) -> PostOutcome {
        let entity = &candidate.entity;

        let ratings = match self.store.list_ratings_for_entity(&entity.id).await {
            Ok(r) => r,
            Err(e) => {
                warn!(entity = %entity.id, error = %e, "Rating history fetch failed");
                return PostOutcome::Failed(e.to_string());
            }
        };

        let history = RatingHistory::from_ratings(&ratings);
        let policy = candidate.tier.policy();
        let star = rating::select(&policy, &history, rng);

        let active = ledger::active_ids(&entity.ledger, now);
        let pool = self.candidate_pool(star, &active, candidate.category);

        if pool.is_empty() {
            info!(entity = %entity.id, rating = star, "No usable template, skipping");
            return PostOutcome::SkippedEmptyPool;
        }

        let template = pool[rng.random_range(0..pool.len())];
        let username = self.identities.generate(candidate.category, rng);

        let review = NewReview {
            entity_id: entity.id.clone(),
            rating: star,
            title: template.title.clone(),
            body: template.body.clone(),
            username: username.clone(),
            approved: true,
            created_at: Utc::now(),
        };

        if let Err(e) = self.store.create_review(&review).await {
            warn!(entity = %entity.id, error = %e, "Review creation failed");
            return PostOutcome::Failed(e.to_string());
        }

        self.pause().await;

        // Ledger is only advanced after a successful create, so a failed
        // post leaves the template eligible for a later run.
        let rewritten = ledger::record(&entity.ledger, &template.id, now);
        if let Err(e) = self.store.update_ledger_field(&entity.id, &rewritten).await {
            warn!(entity = %entity.id, error = %e, "Ledger update failed");
            return PostOutcome::Failed(e.to_string());
        }

        info!(
            entity = %entity.id,
            rating = star,
            template = %template.id,
            title = %template.title,
            username = %username,
            "Seed review posted"
        );

        PostOutcome::Posted {
            rating: star,
            title: template.title.clone(),
        }
    }

    /// Templates in the rating partition, minus active ledger ids, minus
    /// anything the vocabulary filter rejects for this category.
    fn candidate_pool(
        &self,
        star: u8,
        active: &HashSet<String>,
        category: Category,
    ) -> Vec<&'a ReviewTemplate> {
        let library: &'a ReviewLibrary = self.library;
        library
            .partition(star)
            .iter()
            .filter(|t| !active.contains(&t.id))
            .filter(|t| !vocab::is_forbidden(&t.title, category) && !vocab::is_forbidden(&t.body, category))
            .collect()
    }

    async fn pause(&self) {
        if !self.config.write_delay.is_zero() {
            tokio::time::sleep(self.config.write_delay).await;
        }
    }
}
