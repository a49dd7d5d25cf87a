use std::path::Path;

use eq_core::{PromptStore, seed_bundled_if_empty};

pub fn run(store_path: &Path) -> Result<(), String> {
    let mut store = super::open_store(store_path)?;
    let inserted = seed_bundled_if_empty(&mut store);

    if inserted > 0 {
        println!("  Seeded {inserted} prompts into {}", store.path().display());
    } else {
        let count = store.count().map_err(|e| e.to_string())?;
        println!("  Nothing to seed: store already holds {count} prompts");
    }

    Ok(())
}
