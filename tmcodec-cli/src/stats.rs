use serde_json::json;
use tmcodec::{Stats, TmStore};

fn completion_percent(stats: &Stats) -> f64 {
    if stats.total_units == 0 {
        100.0
    } else {
        (stats.translated_units as f64) * 100.0 / (stats.total_units as f64)
    }
}

pub fn stats_to_json(store: &TmStore) -> serde_json::Value {
    let stats = store.stats();
    let percent = completion_percent(&stats);
    let pairs: Vec<_> = stats
        .language_pairs
        .iter()
        .map(|(source, target)| json!({ "source": source, "target": target }))
        .collect();
    json!({
        "summary": {
            "source_lang": store.source_lang(),
            "total_units": stats.total_units,
            "translated_units": stats.translated_units,
            "completion_percent": (percent * 100.0).round() / 100.0,
        },
        "languages": stats.languages,
        "language_pairs": pairs,
        "projects": stats.projects,
    })
}

pub fn print_stats(store: &TmStore, json_output: bool) -> Result<(), String> {
    if json_output {
        let body = stats_to_json(store);
        let rendered = serde_json::to_string_pretty(&body).map_err(|e| e.to_string())?;
        println!("{}", rendered);
        return Ok(());
    }

    let stats = store.stats();
    println!("=== Stats ===");
    println!("Source language: {}", store.source_lang());
    println!("Units: {}", stats.total_units);
    println!("Translated: {}", stats.translated_units);
    println!("Completion: {:.2}%", completion_percent(&stats));

    println!("\nLanguages: {}", stats.languages.len());
    for lang in &stats.languages {
        println!("  {}", lang);
    }
    println!("\nLanguage pairs: {}", stats.language_pairs.len());
    for (source, target) in &stats.language_pairs {
        println!("  {} -> {}", source, target);
    }
    if !stats.projects.is_empty() {
        println!("\nProjects: {}", stats.projects.join(", "));
    }
    Ok(())
}
