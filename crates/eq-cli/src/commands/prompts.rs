use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use eq_core::{PromptId, PromptStore};

pub fn list(store_path: &Path, custom_only: bool) -> Result<(), String> {
    let store = super::open_store(store_path)?;
    let result = if custom_only {
        store.custom_prompts()
    } else {
        store.all()
    };
    let prompts = result.map_err(|e| e.to_string())?;

    if prompts.is_empty() {
        println!("  No prompts found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Prompt", "1", "10", "Custom"]);

    for p in &prompts {
        let custom = if p.is_custom { "yes" } else { "" };
        table.add_row(vec![
            p.id.to_string(),
            p.text.clone(),
            p.low_meaning.clone(),
            p.high_meaning.clone(),
            custom.to_string(),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} prompts", prompts.len());

    Ok(())
}

pub fn add(store_path: &Path, text: &str, low: &str, high: &str) -> Result<(), String> {
    let mut store = super::open_store(store_path)?;
    let id = store
        .add_custom(text, low, high)
        .map_err(|e| e.to_string())?;
    println!("  Added prompt #{id}");
    Ok(())
}

pub fn delete(store_path: &Path, id: u32) -> Result<(), String> {
    let mut store = super::open_store(store_path)?;
    if store.delete(PromptId(id)).map_err(|e| e.to_string())? {
        println!("  Deleted prompt #{id}");
        Ok(())
    } else {
        Err(format!("prompt not found: {id}"))
    }
}
