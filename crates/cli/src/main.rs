// Lorecraft CLI - headless preference operations

mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use lorecraft_config::node_style::NodeStyle;
use lorecraft_config::palette::{self, Palette};
use lorecraft_config::sink::PaletteSink;
use lorecraft_config::{
    Color, PreferenceBackend, PreferenceCategory, PreferenceStore, PreferenceValue, PrefsError,
    ResolutionContext, ScopeLevel,
};
use lorecraft_io::{JsonFileBackend, SqliteBackend};

use exit_codes::{
    EXIT_CONFIGURATION, EXIT_ERROR, EXIT_PERSISTENCE, EXIT_SUCCESS, EXIT_UNKNOWN_PALETTE,
    EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "lore")]
#[command(about = "Lorecraft preferences (CLI mode, headless)")]
#[command(version)]
struct Cli {
    /// Preference store path. A .db/.sqlite/.sqlite3 extension selects the
    /// SQLite backend; anything else the JSON backend.
    /// Defaults to the user config directory.
    #[arg(long, global = true, env = "LORE_STORE")]
    store: Option<PathBuf>,

    /// Suppress stderr notes
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective preference for a context
    #[command(after_help = "\
Examples:
  lore resolve --category palette
  lore resolve --category palette --project story-7
  lore resolve --category node-style --folder maps --project story-7 --json")]
    Resolve {
        /// Preference category (palette or node-style)
        #[arg(long, short = 'c')]
        category: PreferenceCategory,

        /// Current folder id
        #[arg(long)]
        folder: Option<String>,

        /// Current story id
        #[arg(long)]
        project: Option<String>,

        /// Emit a single JSON object on stdout
        #[arg(long)]
        json: bool,
    },

    /// Set a preference at one scope
    #[command(after_help = "\
Examples:
  lore set --level global --category palette dark-forest
  lore set --level project --key story-7 --category palette sepia
  lore set --level folder --key maps --category node-style '{\"shape\": \"diamond\"}'")]
    Set {
        /// Scope level (folder, project, or global)
        #[arg(long, short = 'l')]
        level: ScopeLevel,

        /// Folder or story id (not used with --level global)
        #[arg(long, short = 'k', default_value = "", hide_default_value = true)]
        key: String,

        /// Preference category (palette or node-style)
        #[arg(long, short = 'c')]
        category: PreferenceCategory,

        /// Palette token, or a JSON node-style record
        value: String,
    },

    /// Remove a preference at one scope (the global fallback cannot be removed)
    #[command(after_help = "\
Examples:
  lore unset --level project --key story-7 --category palette
  lore unset --level folder --key maps --category node-style")]
    Unset {
        /// Scope level (folder or project)
        #[arg(long, short = 'l')]
        level: ScopeLevel,

        /// Folder or story id
        #[arg(long, short = 'k', default_value = "", hide_default_value = true)]
        key: String,

        /// Preference category (palette or node-style)
        #[arg(long, short = 'c')]
        category: PreferenceCategory,
    },

    /// List every stored entry, globals included
    List {
        /// Emit a single JSON object on stdout
        #[arg(long)]
        json: bool,
    },

    /// List available palettes (built-in + custom)
    #[command(after_help = "\
Examples:
  lore palettes
  lore palettes --json
  lore palettes --init-example")]
    Palettes {
        /// Emit a single JSON object on stdout
        #[arg(long)]
        json: bool,

        /// Write an example custom palette file and exit
        #[arg(long)]
        init_example: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Resolve { category, folder, project, json } => {
            run_resolve(&cli.store, category, folder, project, json)
        }
        Commands::Set { level, key, category, value } => {
            run_set(&cli.store, level, &key, category, &value, cli.quiet)
        }
        Commands::Unset { level, key, category } => run_unset(&cli.store, level, &key, category),
        Commands::List { json } => run_list(&cli.store, json),
        Commands::Palettes { json, init_example } => run_palettes(json, init_example),
    };

    ExitCode::from(code)
}

/// Pick a backend from the store path: SQLite for database extensions,
/// the JSON document otherwise.
fn open_backend(store: &Option<PathBuf>) -> Result<Box<dyn PreferenceBackend>, String> {
    let path = match store {
        Some(p) => p.clone(),
        None => JsonFileBackend::default_path()
            .ok_or_else(|| "could not determine config directory".to_string())?,
    };

    match path.extension().and_then(|e| e.to_str()) {
        Some("db") | Some("sqlite") | Some("sqlite3") => {
            Ok(Box::new(SqliteBackend::open(&path)?))
        }
        _ => Ok(Box::new(JsonFileBackend::at(path))),
    }
}

fn open_store(store: &Option<PathBuf>, quiet: bool) -> Result<PreferenceStore, u8> {
    let backend = open_backend(store).map_err(|e| {
        eprintln!("Error: {e}");
        EXIT_ERROR
    })?;
    let store = PreferenceStore::open(backend).map_err(|e| {
        eprintln!("Error: {e}");
        match e {
            PrefsError::Persistence(_) => EXIT_PERSISTENCE,
            PrefsError::Configuration(_) => EXIT_CONFIGURATION,
        }
    })?;
    Ok(store.with_sink(Box::new(StatusPaletteSink { quiet })))
}

/// Presentation layer of the headless CLI: a stderr note describing the
/// palette that just became active.
struct StatusPaletteSink {
    quiet: bool,
}

impl PaletteSink for StatusPaletteSink {
    fn apply_palette(&mut self, palette: &Palette) {
        if self.quiet {
            return;
        }
        eprintln!(
            "Applied palette (background {}, ink {}, accent {})",
            hex(palette.background),
            hex(palette.ink),
            hex(palette.accent),
        );
    }
}

fn hex(color: Color) -> String {
    format!(
        "#{:02x}{:02x}{:02x}",
        (color.r * 255.0).round() as u8,
        (color.g * 255.0).round() as u8,
        (color.b * 255.0).round() as u8
    )
}

fn build_context(folder: Option<String>, project: Option<String>) -> ResolutionContext {
    let mut ctx = ResolutionContext::empty();
    if let Some(folder) = folder {
        ctx = ctx.with_folder(folder);
    }
    if let Some(project) = project {
        ctx = ctx.with_project(project);
    }
    ctx
}

fn run_resolve(
    store_path: &Option<PathBuf>,
    category: PreferenceCategory,
    folder: Option<String>,
    project: Option<String>,
    json: bool,
) -> u8 {
    let store = match open_store(store_path, true) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let ctx = build_context(folder, project);
    let value = store.resolve(&ctx, category);

    if json {
        let doc = serde_json::json!({
            "category": category.to_string(),
            "context": ctx,
            "value": value,
        });
        println!("{doc}");
    } else {
        println!("{value}");
    }
    EXIT_SUCCESS
}

fn parse_value(category: PreferenceCategory, raw: &str) -> Result<PreferenceValue, u8> {
    match category {
        PreferenceCategory::Palette => {
            if palette::load_palette(raw).is_none() {
                eprintln!("Error: unknown palette '{raw}' (see `lore palettes`)");
                return Err(EXIT_UNKNOWN_PALETTE);
            }
            Ok(PreferenceValue::Palette(raw.to_string()))
        }
        PreferenceCategory::NodeStyle => match NodeStyle::from_json(raw) {
            Ok(style) => Ok(PreferenceValue::NodeStyle(style)),
            Err(e) => {
                eprintln!("Error: {e}");
                Err(EXIT_USAGE)
            }
        },
    }
}

fn run_set(
    store_path: &Option<PathBuf>,
    level: ScopeLevel,
    key: &str,
    category: PreferenceCategory,
    raw_value: &str,
    quiet: bool,
) -> u8 {
    if level != ScopeLevel::Global && key.is_empty() {
        eprintln!("Error: --key is required for --level {level}");
        return EXIT_USAGE;
    }

    let value = match parse_value(category, raw_value) {
        Ok(v) => v,
        Err(code) => return code,
    };

    let mut store = match open_store(store_path, quiet) {
        Ok(s) => s,
        Err(code) => return code,
    };

    match store.set_at(level, key, category, value) {
        Ok(()) => {
            match level {
                ScopeLevel::Global => println!("Set {category} globally: {raw_value}"),
                _ => println!("Set {category} at {level} '{key}': {raw_value}"),
            }
            EXIT_SUCCESS
        }
        Err(PrefsError::Configuration(msg)) => {
            eprintln!("Error: {msg}");
            EXIT_CONFIGURATION
        }
        Err(PrefsError::Persistence(msg)) => {
            eprintln!("Error: {msg} (value was not saved)");
            EXIT_PERSISTENCE
        }
    }
}

fn run_unset(
    store_path: &Option<PathBuf>,
    level: ScopeLevel,
    key: &str,
    category: PreferenceCategory,
) -> u8 {
    if level != ScopeLevel::Global && key.is_empty() {
        eprintln!("Error: --key is required for --level {level}");
        return EXIT_USAGE;
    }

    let mut store = match open_store(store_path, true) {
        Ok(s) => s,
        Err(code) => return code,
    };

    match store.unset_at(level, key, category) {
        Ok(()) => {
            println!("Unset {category} at {level} '{key}'");
            EXIT_SUCCESS
        }
        Err(PrefsError::Configuration(msg)) => {
            eprintln!("Error: {msg}");
            EXIT_CONFIGURATION
        }
        Err(PrefsError::Persistence(msg)) => {
            eprintln!("Error: {msg}");
            EXIT_PERSISTENCE
        }
    }
}

fn run_list(store_path: &Option<PathBuf>, json: bool) -> u8 {
    let store = match open_store(store_path, true) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let entries = store.snapshot();

    if json {
        let doc = serde_json::json!({ "entries": entries });
        println!("{doc}");
    } else {
        for entry in entries {
            println!(
                "{:<12} {:<8} {:<16} {}",
                entry.category.to_string(),
                entry.level.to_string(),
                entry.key,
                entry.value
            );
        }
    }
    EXIT_SUCCESS
}

fn run_palettes(json: bool, init_example: bool) -> u8 {
    if init_example {
        return match palette::create_example_palette() {
            Ok(path) => {
                println!("Wrote example palette: {}", path.display());
                EXIT_SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {e}");
                EXIT_ERROR
            }
        };
    }

    let palettes = palette::list_palettes();

    if json {
        let doc = serde_json::json!({ "palettes": palettes });
        println!("{doc}");
    } else {
        for info in palettes {
            let marker = if info.builtin { "builtin" } else { "custom" };
            println!("{:<20} {:<8} {}", info.id, marker, info.name);
        }
    }
    EXIT_SUCCESS
}
