use std::path::Path;

use tmcodec::{TmStore, TranslationUnit};

/// Run the add command: append `unit` to the memory at `input`, creating
/// the memory if it does not exist.
pub fn run_add_command(input: &Path, unit: TranslationUnit) -> Result<(), String> {
    if unit.source.is_empty() {
        return Err("source text must not be empty".to_string());
    }

    let mut store = TmStore::open(input).map_err(|e| format!("reading {}: {}", input.display(), e))?;
    let summary = format!("Added unit {}: {}", store.len(), unit);
    store.add_unit(unit);
    store.save(None).map_err(|e| e.to_string())?;
    println!("{}", summary);
    Ok(())
}

/// Run the remove command: delete the unit at `index` and save.
pub fn run_remove_command(input: &Path, index: usize) -> Result<(), String> {
    let mut store = TmStore::new();
    store
        .load(input)
        .map_err(|e| format!("reading {}: {}", input.display(), e))?;

    let len = store.len();
    let removed = store
        .remove_unit(index)
        .ok_or_else(|| format!("no unit at index {} (memory holds {})", index, len))?;
    store.save(None).map_err(|e| e.to_string())?;
    println!("Removed unit {}: {}", index, removed);
    Ok(())
}
