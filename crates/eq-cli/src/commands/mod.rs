pub mod play;
pub mod prompts;
pub mod seed;

use std::path::Path;

use eq_core::JsonPromptStore;

/// Open the prompt store at `path`, creating nothing until the first write.
fn open_store(path: &Path) -> Result<JsonPromptStore, String> {
    JsonPromptStore::open(path).map_err(|e| format!("cannot open prompt store: {e}"))
}
