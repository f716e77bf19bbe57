use std::path::{Path, PathBuf};

use tmcodec::TmStore;

/// Run the merge command: fold the units of `others` into the memory at
/// `input`, skipping exact duplicates.
///
/// The result goes to `output` when given, otherwise back to `input`.
/// `input` may not exist yet; every file in `others` must.
pub fn run_merge_command(
    input: &Path,
    others: &[PathBuf],
    output: Option<&Path>,
) -> Result<(), String> {
    if others.is_empty() {
        return Err("at least one memory to merge is required".to_string());
    }

    let mut store = TmStore::open(input).map_err(|e| format!("reading {}: {}", input.display(), e))?;
    let before = store.len();

    for path in others {
        let mut other = TmStore::new();
        other
            .load(path)
            .map_err(|e| format!("reading {}: {}", path.display(), e))?;
        let added = store.merge(&other);
        println!(
            "{}: {} new, {} duplicate",
            path.display(),
            added,
            other.len() - added
        );
    }

    if output.is_none() && !store.is_modified() {
        println!("Nothing new to merge");
        return Ok(());
    }

    store.save(output).map_err(|e| e.to_string())?;
    println!(
        "Merged {} new unit(s); {} total in {}",
        store.len() - before,
        store.len(),
        store.path().unwrap_or(input).display()
    );
    Ok(())
}
