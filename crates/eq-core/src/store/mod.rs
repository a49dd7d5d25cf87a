//! Prompt storage.
//!
//! [`PromptStore`] covers the handful of primitives an embedded record store
//! offers (count, list, lookup, insert, delete). Random selection, custom
//! prompt creation and first-run seeding are built on top of those.

pub mod file;
pub mod memory;
mod table;

use std::collections::BTreeSet;

use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::error::StoreResult;
use crate::prompt::{NewPrompt, Prompt, PromptId, parse_seed};

pub use file::JsonPromptStore;
pub use memory::MemoryPromptStore;

/// Seed dataset shipped with the crate.
pub const BUNDLED_SEED: &str = include_str!("../../data/prompts.json");

/// A collection of prompts.
pub trait PromptStore {
    /// Number of stored prompts.
    fn count(&self) -> StoreResult<usize>;

    /// Every stored prompt, ordered by id.
    fn all(&self) -> StoreResult<Vec<Prompt>>;

    /// Look up a prompt by id.
    fn get(&self, id: PromptId) -> StoreResult<Option<Prompt>>;

    /// Insert a prompt and return its id. An explicit id replaces any
    /// existing record with that id.
    fn insert(&mut self, prompt: NewPrompt) -> StoreResult<PromptId>;

    /// Delete a prompt. Returns true if it existed.
    fn delete(&mut self, id: PromptId) -> StoreResult<bool>;

    /// Pick a prompt uniformly at random among those not in `excluding`.
    fn random_prompt(
        &self,
        excluding: &BTreeSet<PromptId>,
        rng: &mut StdRng,
    ) -> StoreResult<Option<Prompt>> {
        let mut candidates: Vec<Prompt> = self
            .all()?
            .into_iter()
            .filter(|p| !excluding.contains(&p.id))
            .collect();
        if candidates.is_empty() {
            return Ok(None);
        }
        let idx = rng.random_range(0..candidates.len());
        Ok(Some(candidates.swap_remove(idx)))
    }

    /// Store a player-authored prompt and return its new id.
    fn add_custom(
        &mut self,
        text: &str,
        low_meaning: &str,
        high_meaning: &str,
    ) -> StoreResult<PromptId> {
        self.insert(NewPrompt::custom(text, low_meaning, high_meaning))
    }

    /// Only the player-authored prompts.
    fn custom_prompts(&self) -> StoreResult<Vec<Prompt>> {
        Ok(self.all()?.into_iter().filter(|p| p.is_custom).collect())
    }
}

/// Fill an empty store from a seed dataset and return how many prompts were
/// inserted.
///
/// Does nothing when the store already holds prompts, so it is safe to call
/// on every start. Failures are logged and swallowed: whatever was inserted
/// before the failure stays.
pub fn seed_if_empty<S: PromptStore + ?Sized>(store: &mut S, seed_json: &str) -> usize {
    match store.count() {
        Ok(0) => {}
        Ok(existing) => {
            debug!(existing, "prompt store already populated, not seeding");
            return 0;
        }
        Err(e) => {
            warn!(error = %e, "cannot count prompts, not seeding");
            return 0;
        }
    }

    let seeds = match parse_seed(seed_json) {
        Ok(seeds) => seeds,
        Err(e) => {
            warn!(error = %e, "seed data is unusable");
            return 0;
        }
    };

    let mut inserted = 0;
    for seed in seeds {
        let id = seed.id;
        if let Err(e) = store.insert(seed.into()) {
            warn!(error = %e, seed_id = id, inserted, "seeding stopped early");
            break;
        }
        inserted += 1;
    }
    info!(inserted, "seeded prompt store");
    inserted
}

/// [`seed_if_empty`] with the bundled dataset.
pub fn seed_bundled_if_empty<S: PromptStore + ?Sized>(store: &mut S) -> usize {
    seed_if_empty(store, BUNDLED_SEED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn numbered_store(ids: impl IntoIterator<Item = u32>) -> MemoryPromptStore {
        let mut store = MemoryPromptStore::new();
        for id in ids {
            let mut p = NewPrompt::custom(format!("Prompt {id}"), "low", "high");
            p.id = Some(PromptId(id));
            store.insert(p).unwrap();
        }
        store
    }

    #[test]
    fn bundled_seed_parses() {
        let seeds = parse_seed(BUNDLED_SEED).unwrap();
        assert!(!seeds.is_empty());
        let ids: BTreeSet<u32> = seeds.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), seeds.len(), "seed ids must be unique");
    }

    #[test]
    fn seeding_is_idempotent() {
        let expected = parse_seed(BUNDLED_SEED).unwrap().len();
        let mut store = MemoryPromptStore::new();

        assert_eq!(seed_bundled_if_empty(&mut store), expected);
        assert_eq!(store.count().unwrap(), expected);

        assert_eq!(seed_bundled_if_empty(&mut store), 0);
        assert_eq!(store.count().unwrap(), expected);
    }

    #[test]
    fn seeded_prompts_are_not_custom() {
        let mut store = MemoryPromptStore::new();
        seed_bundled_if_empty(&mut store);
        assert!(store.custom_prompts().unwrap().is_empty());
    }

    #[test]
    fn malformed_seed_inserts_nothing() {
        let mut store = MemoryPromptStore::new();
        assert_eq!(seed_if_empty(&mut store, "[{ broken"), 0);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn seeding_keeps_entries_before_a_bad_one() {
        let seed = r#"[
            {"id": 1, "question": "One?", "1": "a", "10": "b"},
            {"id": 2, "question": "Two?", "1": "a", "10": "b"},
            {"id": 3, "question": "", "1": "a", "10": "b"},
            {"id": 4, "question": "Four?", "1": "a", "10": "b"}
        ]"#;
        let mut store = MemoryPromptStore::new();
        assert_eq!(seed_if_empty(&mut store, seed), 2);
        assert!(store.get(PromptId(2)).unwrap().is_some());
        assert!(store.get(PromptId(4)).unwrap().is_none());
    }

    #[test]
    fn non_empty_store_is_not_seeded() {
        let mut store = MemoryPromptStore::new();
        store.add_custom("Mine", "a", "b").unwrap();
        assert_eq!(seed_bundled_if_empty(&mut store), 0);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn random_prompt_respects_exclusions() {
        let store = numbered_store(1..=25);
        let excluding: BTreeSet<PromptId> = [1, 5, 10].into_iter().map(PromptId).collect();
        let mut rng = StdRng::seed_from_u64(42);

        let mut seen = BTreeSet::new();
        for _ in 0..2000 {
            let p = store.random_prompt(&excluding, &mut rng).unwrap().unwrap();
            assert!(!excluding.contains(&p.id));
            seen.insert(p.id);
        }
        assert_eq!(seen.len(), 22);
    }

    #[test]
    fn random_prompt_none_when_all_excluded() {
        let store = numbered_store(1..=3);
        let excluding: BTreeSet<PromptId> = (1..=3).map(PromptId).collect();
        let mut rng = StdRng::seed_from_u64(7);
        assert!(store.random_prompt(&excluding, &mut rng).unwrap().is_none());
    }

    #[test]
    fn random_prompt_none_when_empty() {
        let store = MemoryPromptStore::new();
        let mut rng = StdRng::seed_from_u64(7);
        assert!(
            store
                .random_prompt(&BTreeSet::new(), &mut rng)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn add_custom_assigns_fresh_id() {
        let mut store = numbered_store(1..=3);
        let id = store.add_custom("New one", "meh", "wow").unwrap();
        assert_eq!(id, PromptId(4));
        let p = store.get(id).unwrap().unwrap();
        assert!(p.is_custom);
        assert_eq!(store.custom_prompts().unwrap().len(), 4);
    }
}
