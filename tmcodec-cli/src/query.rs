use std::path::Path;

use tmcodec::{FilterCriteria, TmStore};

use crate::view::{hits_to_json, print_hits, print_units, units_to_json};

fn load(input: &Path) -> Result<TmStore, String> {
    let mut store = TmStore::new();
    store
        .load(input)
        .map_err(|e| format!("reading {}: {}", input.display(), e))?;
    Ok(store)
}

fn print_json(value: &serde_json::Value) -> Result<(), String> {
    let rendered = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", rendered);
    Ok(())
}

/// Run the search command: fuzzy-match `query` against every unit.
pub fn run_search_command(
    input: &Path,
    query: &str,
    threshold: f64,
    limit: Option<usize>,
    json_output: bool,
    full: bool,
) -> Result<(), String> {
    let store = load(input)?;
    let mut hits = store.search(query, threshold).map_err(|e| e.to_string())?;
    tracing::debug!(query, threshold, hits = hits.len(), "search finished");
    if let Some(limit) = limit {
        hits.truncate(limit);
    }

    if json_output {
        print_json(&hits_to_json(&hits))
    } else {
        print_hits(&hits, full);
        Ok(())
    }
}

/// Run the filter command: list the units matching every criterion.
pub fn run_filter_command(
    input: &Path,
    criteria: &FilterCriteria,
    json_output: bool,
    full: bool,
) -> Result<(), String> {
    let store = load(input)?;
    let indexed = store
        .iter()
        .enumerate()
        .filter(|(_, unit)| criteria.matches(unit));

    if json_output {
        print_json(&units_to_json(indexed))
    } else {
        print_units(indexed, full);
        Ok(())
    }
}

/// Run the view command: list all units, optionally only those touching
/// `lang` on either side.
pub fn run_view_command(input: &Path, lang: Option<&str>, full: bool) -> Result<(), String> {
    let store = load(input)?;
    let units = store
        .iter()
        .enumerate()
        .filter(|(_, unit)| lang.is_none_or(|l| unit.source_lang == l || unit.target_lang == l));

    println!("Memory: {}", input.display());
    println!("Source language: {}", store.source_lang());
    print_units(units, full);
    Ok(())
}
