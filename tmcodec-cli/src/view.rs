use serde_json::json;
use tmcodec::{SearchHit, TranslationUnit};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display columns a text may take before it is cut short.
pub const MAX_VALUE_WIDTH: usize = 50;

/// Cuts `value` to at most `max_width` display columns, ending in `...`
/// when anything was dropped. Wide characters are never split.
pub fn truncate(value: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(value) <= max_width {
        return value.to_string();
    }

    let mut out = String::new();
    let mut width = 0;
    for c in value.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w > max_width {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

fn shown(value: &str, full: bool) -> String {
    if full {
        value.to_string()
    } else {
        truncate(value, MAX_VALUE_WIDTH)
    }
}

fn print_unit(index: usize, unit: &TranslationUnit, full: bool) {
    println!("\n  Unit {}: [{} -> {}]", index, unit.source_lang, unit.target_lang);
    println!("    Source: {}", shown(&unit.source, full));
    if unit.is_translated() {
        println!("    Target: {}", shown(&unit.target, full));
    } else {
        println!("    Target: (untranslated)");
    }
    if !unit.project.is_empty() {
        println!("    Project: {}", unit.project);
    }
    if !unit.note.is_empty() {
        println!("    Note: {}", shown(&unit.note, full));
    }
    if !unit.created.is_empty() {
        println!("    Created: {}", unit.created);
    }
}

/// Print units with their store indices.
pub fn print_units<'a, I>(units: I, full: bool)
where
    I: IntoIterator<Item = (usize, &'a TranslationUnit)>,
{
    let mut count = 0;
    for (index, unit) in units {
        print_unit(index, unit, full);
        count += 1;
    }
    if count == 0 {
        println!("No units found");
    } else {
        println!("\n{} unit(s)", count);
    }
}

/// Print search hits best first.
pub fn print_hits(hits: &[SearchHit<'_>], full: bool) {
    if hits.is_empty() {
        println!("No matches");
        return;
    }
    for hit in hits {
        println!("\n{:>5.1}%", hit.score * 100.0);
        print_unit(hit.index, hit.unit, full);
    }
}

pub fn units_to_json<'a, I>(units: I) -> serde_json::Value
where
    I: IntoIterator<Item = (usize, &'a TranslationUnit)>,
{
    let items: Vec<_> = units
        .into_iter()
        .map(|(index, unit)| json!({ "index": index, "unit": unit }))
        .collect();
    serde_json::Value::Array(items)
}

pub fn hits_to_json(hits: &[SearchHit<'_>]) -> serde_json::Value {
    let items: Vec<_> = hits
        .iter()
        .map(|hit| {
            json!({
                "index": hit.index,
                "score": (hit.score * 10_000.0).round() / 10_000.0,
                "unit": hit.unit,
            })
        })
        .collect();
    serde_json::Value::Array(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("", 0), "");
    }

    #[test]
    fn test_truncate_counts_display_columns() {
        assert_eq!(truncate("abcdefgh", 4), "abcd...");
        // Each CJK character is two columns wide.
        assert_eq!(truncate("翻訳メモリ", 5), "翻訳...");
    }

    #[test]
    fn test_units_json_carries_index() {
        let unit = TranslationUnit::new("Cat", "Katt", "en", "sv");
        let value = units_to_json([(3, &unit)]);
        assert_eq!(value[0]["index"], 3);
        assert_eq!(value[0]["unit"]["target"], "Katt");
    }
}
