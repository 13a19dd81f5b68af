// prefs - read and write preference domains from the shell

mod exit_codes;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use base64::Engine;
use clap::{Args, Parser, Subcommand};
use log::debug;

use prefkit_store::{
    dict_from_json, dict_to_json, Dict, FileStore, GetterProvider, Kind, PreferenceGetter,
    PreferenceSetter, PreferenceStore, StoreConfig, StoreError, Value,
};

use exit_codes::{EXIT_ABSENT, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "prefs")]
#[command(about = "Read and write typed preferences stored by prefkit")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct StoreArgs {
    /// Preference domain (file stem of the store; default $PREFKIT_DOMAIN)
    #[arg(long, short = 'd', global = true)]
    domain: Option<String>,

    /// Directory holding domain files (default $PREFKIT_DIR, then the config dir)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Explicit store file (overrides --domain and --dir)
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// TOML store configuration; flags above override its fields
    #[arg(long, global = true, value_name = "PATH", env = "PREFKIT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the value stored under a key
    #[command(after_help = "\
Examples:
  prefs -d com.example.app read launch.count
  prefs -d com.example.app read zoom --kind double")]
    Read {
        key: String,

        /// Only succeed if the stored value has this kind
        #[arg(long, short = 'k', value_parser = parse_kind)]
        kind: Option<Kind>,
    },

    /// Store a value under a key, replacing any previous value
    #[command(after_help = "\
Kinds: bool, int, double, bytes (base64), dict (JSON object)

Examples:
  prefs -d com.example.app write feature.enabled bool true
  prefs -d com.example.app write window dict '{\"width\": 800}'")]
    Write {
        key: String,

        #[arg(value_parser = parse_kind)]
        kind: Kind,

        value: String,
    },

    /// Remove a key
    Delete { key: String },

    /// List stored keys and their kinds
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the resolved store file path
    Path,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = store_config(&cli.store).and_then(|config| match cli.command {
        Commands::Read { key, kind } => cmd_read(&config, &key, kind),
        Commands::Write { key, kind, value } => cmd_write(&config, &key, kind, &value),
        Commands::Delete { key } => cmd_delete(&config, &key),
        Commands::List { json } => cmd_list(&config, json),
        Commands::Path => {
            println!("{}", config.path().display());
            Ok(())
        }
    });

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn store(err: StoreError) -> Self {
        let hint = match &err {
            StoreError::Parse(_) => Some("the store file is corrupt; fix or delete it".to_string()),
            _ => None,
        };
        Self { code: EXIT_ERROR, message: err.to_string(), hint }
    }

    /// Absence is reported through the exit code only.
    pub fn absent() -> Self {
        Self { code: EXIT_ABSENT, message: String::new(), hint: None }
    }
}

fn parse_kind(s: &str) -> Result<Kind, String> {
    Kind::parse(s)
        .ok_or_else(|| format!("unknown kind '{s}' (expected bool, int, double, bytes, dict)"))
}

fn store_config(args: &StoreArgs) -> Result<StoreConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|e| {
                CliError::usage(format!("cannot read {}: {}", path.display(), e))
            })?;
            StoreConfig::from_toml(&text).map_err(|e| CliError::usage(e.to_string()))?
        }
        None => StoreConfig::default(),
    };

    if let Some(domain) = &args.domain {
        config.domain = domain.clone();
    }
    if let Some(dir) = &args.dir {
        config.directory = Some(dir.clone());
    }
    if let Some(file) = &args.file {
        config.file = Some(file.clone());
    }

    config.validate().map_err(|e| CliError::usage(e.to_string()))?;
    debug!("using preferences at {}", config.path().display());
    Ok(config)
}

fn open_store(config: &StoreConfig) -> Result<Arc<FileStore>, CliError> {
    FileStore::open_config(config).map(Arc::new).map_err(CliError::store)
}

/// Surface a failed autosave, or persist when autosave is off.
fn save(store: &FileStore) -> Result<(), CliError> {
    if store.is_dirty() {
        store.flush().map_err(CliError::store)?;
    }
    Ok(())
}

fn cmd_read(config: &StoreConfig, key: &str, kind: Option<Kind>) -> Result<(), CliError> {
    let store = open_store(config)?;
    let text = match kind {
        None => store.value(key).map(|value| render_value(&value)),
        Some(kind) => read_typed(&PreferenceStore::with_provider(store), key, kind),
    };

    match text {
        Some(text) => {
            println!("{text}");
            Ok(())
        }
        None => Err(CliError::absent()),
    }
}

fn read_typed(prefs: &impl PreferenceGetter, key: &str, kind: Kind) -> Option<String> {
    match kind {
        Kind::Bool => prefs.get_bool(key).map(|b| b.to_string()),
        Kind::Int => prefs.get_int(key).map(|n| n.to_string()),
        Kind::Double => prefs.get_double(key).map(format_double),
        Kind::Bytes => prefs.get_bytes(key).map(|bytes| encode_bytes(&bytes)),
        Kind::Dict => prefs.get_dict(key).map(|dict| render_dict(&dict)),
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Bool(b) => b.to_string(),
        Value::Int(n) => n.to_string(),
        Value::Double(n) => format_double(*n),
        Value::Bytes(bytes) => encode_bytes(bytes),
        Value::Dict(dict) => render_dict(dict),
    }
}

/// Doubles always print with a fractional part so they never read as ints.
fn format_double(n: f64) -> String {
    format!("{n:?}")
}

fn encode_bytes(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

fn render_dict(dict: &Dict) -> String {
    format!("{:#}", dict_to_json(dict))
}

fn cmd_write(config: &StoreConfig, key: &str, kind: Kind, raw: &str) -> Result<(), CliError> {
    let store = open_store(config)?;
    let prefs = PreferenceStore::with_provider(Arc::clone(&store));
    let raw = raw.trim();

    match kind {
        Kind::Bool => prefs.set_bool(key, parse_bool(raw)?),
        Kind::Int => prefs.set_int(
            key,
            raw.parse()
                .map_err(|_| CliError::usage(format!("'{raw}' is not an integer")))?,
        ),
        Kind::Double => prefs.set_double(
            key,
            raw.parse()
                .map_err(|_| CliError::usage(format!("'{raw}' is not a number")))?,
        ),
        Kind::Bytes => prefs.set_bytes(
            key,
            base64::engine::general_purpose::STANDARD
                .decode(raw)
                .map_err(|e| CliError::usage(format!("invalid base64: {e}")))?,
        ),
        Kind::Dict => prefs.set_dict(key, parse_dict(raw)?),
    }

    save(&store)
}

fn parse_bool(raw: &str) -> Result<bool, CliError> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(CliError::usage(format!("'{raw}' is not a boolean"))),
    }
}

fn parse_dict(raw: &str) -> Result<Dict, CliError> {
    let json: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| CliError::usage(format!("invalid JSON: {e}")))?;
    let map = json
        .as_object()
        .ok_or_else(|| CliError::usage("dict value must be a JSON object"))?;
    dict_from_json(map).ok_or_else(|| CliError {
        code: EXIT_USAGE,
        message: "dict values cannot contain null".to_string(),
        hint: Some("omit the entry instead of storing null".to_string()),
    })
}

fn cmd_delete(config: &StoreConfig, key: &str) -> Result<(), CliError> {
    let store = open_store(config)?;
    if store.value(key).is_none() {
        return Err(CliError::absent());
    }

    let prefs = PreferenceStore::with_provider(Arc::clone(&store));
    prefs.remove(key);
    save(&store)
}

fn cmd_list(config: &StoreConfig, json: bool) -> Result<(), CliError> {
    let store = open_store(config)?;
    let entries = store.entries();

    if json {
        let rows: Vec<serde_json::Value> = entries
            .iter()
            .map(|(key, value)| serde_json::json!({ "key": key, "kind": value.kind().as_str() }))
            .collect();
        println!("{:#}", serde_json::Value::Array(rows));
    } else {
        for (key, value) in &entries {
            println!("{}\t{}", key, value.kind());
        }
    }
    Ok(())
}
