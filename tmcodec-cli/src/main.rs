use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tmcodec::{FilterCriteria, ImportOptions, TmStore, TranslationUnit};
use tmcodec_cli::{
    config::{Config, load_config},
    convert::{run_export_command, run_import_command},
    edit::{run_add_command, run_remove_command},
    merge::run_merge_command,
    query::{run_filter_command, run_search_command, run_view_command},
    stats::print_stats,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log engine activity to stderr (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file with default languages and search threshold
    /// [default: ./tmcodec.toml when present]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Show unit counts, languages and projects of a memory.
    Stats {
        /// The TMX memory to inspect
        #[arg(short, long)]
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fuzzy-search source and target texts.
    Search {
        /// The TMX memory to search
        #[arg(short, long)]
        input: PathBuf,

        /// Text to look for
        query: String,

        /// Minimum similarity in (0, 1]
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Show at most this many matches
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Display full text without truncation
        #[arg(long)]
        full: bool,
    },

    /// List units matching language, project and date criteria.
    Filter {
        /// The TMX memory to filter
        #[arg(short, long)]
        input: PathBuf,

        /// Exact source language
        #[arg(long)]
        source_lang: Option<String>,

        /// Exact target language
        #[arg(long)]
        target_lang: Option<String>,

        /// Language on either side
        #[arg(short, long)]
        lang: Option<String>,

        /// Case-insensitive substring of the project
        #[arg(short, long)]
        project: Option<String>,

        /// Earliest creation date, e.g. 2024-01-01
        #[arg(long)]
        from: Option<String>,

        /// Latest creation date, inclusive
        #[arg(long)]
        to: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Display full text without truncation
        #[arg(long)]
        full: bool,
    },

    /// Merge other memories into one, skipping exact duplicates.
    Merge {
        /// The memory to merge into (created if missing)
        #[arg(short, long)]
        input: PathBuf,

        /// Memories to merge from
        #[arg(required = true)]
        others: Vec<PathBuf>,

        /// Write the result here instead of back to the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import .po, .xliff/.xlf or .ts catalogs into a memory.
    Import {
        /// The memory to import into (created if missing)
        #[arg(short, long)]
        input: PathBuf,

        /// Catalogs to import
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Source language for .po catalogs
        #[arg(long)]
        source_lang: Option<String>,

        /// Target language for .po catalogs
        #[arg(long)]
        target_lang: Option<String>,
    },

    /// Export every unit of a memory as a .po catalog.
    Export {
        /// The TMX memory to export
        #[arg(short, long)]
        input: PathBuf,

        /// The .po file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Language written to the catalog header
        #[arg(long)]
        target_lang: Option<String>,
    },

    /// List the units of a memory.
    View {
        /// The TMX memory to view
        #[arg(short, long)]
        input: PathBuf,

        /// Only units with this language on either side
        #[arg(short, long)]
        lang: Option<String>,

        /// Display full text without truncation
        #[arg(long)]
        full: bool,
    },

    /// Add a unit to a memory.
    Add {
        /// The memory to add to (created if missing)
        #[arg(short, long)]
        input: PathBuf,

        /// Source text
        #[arg(long)]
        source: String,

        /// Target text; omit for an untranslated unit
        #[arg(long, default_value = "")]
        target: String,

        #[arg(long)]
        source_lang: Option<String>,

        #[arg(long)]
        target_lang: Option<String>,

        #[arg(short, long, default_value = "")]
        project: String,

        #[arg(long, default_value = "")]
        note: String,
    },

    /// Remove the unit at an index (as shown by `view`).
    Remove {
        /// The TMX memory to edit
        #[arg(short, long)]
        input: PathBuf,

        index: usize,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = if verbose {
        EnvFilter::new(default_level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter);

    tracing_subscriber::registry().with(console_layer).init();
}

fn run(commands: Commands, config: &Config) -> Result<(), String> {
    match commands {
        Commands::Stats { input, json } => {
            let mut store = TmStore::new();
            store
                .load(&input)
                .map_err(|e| format!("reading {}: {}", input.display(), e))?;
            print_stats(&store, json)
        }
        Commands::Search {
            input,
            query,
            threshold,
            limit,
            json,
            full,
        } => run_search_command(
            &input,
            &query,
            config.threshold(threshold),
            limit,
            json,
            full,
        ),
        Commands::Filter {
            input,
            source_lang,
            target_lang,
            lang,
            project,
            from,
            to,
            json,
            full,
        } => {
            let criteria = FilterCriteria {
                source_lang,
                target_lang,
                language: lang,
                project,
                date_from: from,
                date_to: to,
            };
            run_filter_command(&input, &criteria, json, full)
        }
        Commands::Merge {
            input,
            others,
            output,
        } => run_merge_command(&input, &others, output.as_deref()),
        Commands::Import {
            input,
            files,
            source_lang,
            target_lang,
        } => {
            let options = ImportOptions::new()
                .with_source_lang(config.source_lang(source_lang))
                .with_target_lang(config.target_lang(target_lang));
            run_import_command(&input, &files, &options)
        }
        Commands::Export {
            input,
            output,
            target_lang,
        } => run_export_command(&input, &output, &config.target_lang(target_lang)),
        Commands::View { input, lang, full } => run_view_command(&input, lang.as_deref(), full),
        Commands::Add {
            input,
            source,
            target,
            source_lang,
            target_lang,
            project,
            note,
        } => {
            let unit = TranslationUnit::new(
                source,
                target,
                config.source_lang(source_lang),
                config.target_lang(target_lang),
            )
            .with_project(project)
            .with_note(note);
            run_add_command(&input, unit)
        }
        Commands::Remove { input, index } => run_remove_command(&input, index),
    }
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = std::env::current_dir()
        .map_err(|e| format!("cannot determine working directory: {}", e))
        .and_then(|cwd| load_config(args.config.as_deref(), &cwd))
        .and_then(|config| run(args.commands, &config));

    if let Err(e) = result {
        tracing::debug!(error = %e, "command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
