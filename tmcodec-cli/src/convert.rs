use std::path::{Path, PathBuf};

use tmcodec::{FormatType, ImportOptions, TmStore, infer_format_from_extension};

/// Run the import command: append the units of each catalog in `files` to
/// the memory at `input`, creating it if needed, and save.
pub fn run_import_command(
    input: &Path,
    files: &[PathBuf],
    options: &ImportOptions,
) -> Result<(), String> {
    if files.is_empty() {
        return Err("at least one file to import is required".to_string());
    }

    // Check every file up front so a typo does not leave a half-done import.
    for file in files {
        match infer_format_from_extension(file) {
            Some(format) if format.is_importable() => {}
            Some(FormatType::Tmx) => {
                return Err(format!(
                    "{} is a translation memory; use `merge` instead",
                    file.display()
                ));
            }
            _ => {
                return Err(format!(
                    "cannot import {}: expected a .po, .xliff, .xlf or .ts file",
                    file.display()
                ));
            }
        }
    }

    let mut store = TmStore::open(input).map_err(|e| format!("reading {}: {}", input.display(), e))?;
    for file in files {
        let added = store
            .import_file(file, options)
            .map_err(|e| format!("importing {}: {}", file.display(), e))?;
        println!("{}: {} unit(s)", file.display(), added);
    }

    store.save(None).map_err(|e| e.to_string())?;
    println!("{} unit(s) in {}", store.len(), input.display());
    Ok(())
}

/// Run the export command: write every unit of the memory as a `.po`
/// catalog.
pub fn run_export_command(input: &Path, output: &Path, target_lang: &str) -> Result<(), String> {
    match infer_format_from_extension(output) {
        Some(FormatType::Po) => {}
        _ => {
            return Err(format!(
                "cannot export to {}: only .po output is supported",
                output.display()
            ));
        }
    }

    let mut store = TmStore::new();
    store
        .load(input)
        .map_err(|e| format!("reading {}: {}", input.display(), e))?;
    store
        .export_po(output, target_lang)
        .map_err(|e| format!("writing {}: {}", output.display(), e))?;
    println!("Exported {} unit(s) to {}", store.len(), output.display());
    Ok(())
}
