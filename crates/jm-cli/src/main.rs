//! jobmask CLI
//!
//! Censor text with the jobmask blocklist and manage a file-backed enabled flag.

mod state_file;

use std::borrow::Cow;
use std::fs;
use std::io::{self, Read, Write};

use clap::{Parser, Subcommand, ValueEnum};
use log::debug;

use jm_core::{Blocklist, Censor, EngineConfig, ToggleController, ToggleOutcome};

use state_file::{JsonFileStore, NoActivePage};

#[derive(Parser)]
#[command(name = "jm-cli")]
#[command(about = "jobmask word redaction tools")]
struct Cli {
    /// Verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Censor a file (or stdin) and write the result to stdout
    Censor {
        /// Input file, stdin when omitted
        #[arg(short, long)]
        input: Option<String>,

        /// Extra word list, one word per line
        #[arg(long)]
        words: Option<String>,

        /// Engine config (JSON)
        #[arg(long)]
        config: Option<String>,

        /// State file; input passes through unchanged when censoring is off
        #[arg(long)]
        state: Option<String>,
    },

    /// List the blocklist
    Words {
        #[arg(long)]
        words: Option<String>,

        #[arg(long)]
        config: Option<String>,
    },

    /// Print the compiled word pattern
    Pattern {
        #[arg(long)]
        words: Option<String>,

        #[arg(long)]
        config: Option<String>,
    },

    /// Show the stored enabled flag
    Status {
        #[arg(short, long, default_value = "jobmask-state.json")]
        state: String,

        /// Engine config (JSON); its `storageKey` names the flag
        #[arg(long)]
        config: Option<String>,
    },

    /// Turn censoring on or off
    Toggle {
        #[arg(value_enum)]
        value: Switch,

        #[arg(short, long, default_value = "jobmask-state.json")]
        state: String,

        /// Engine config (JSON); its `storageKey` names the flag
        #[arg(long)]
        config: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let result = match cli.command {
        Commands::Censor {
            input,
            words,
            config,
            state,
        } => cmd_censor(input.as_deref(), words.as_deref(), config.as_deref(), state.as_deref()),
        Commands::Words { words, config } => cmd_words(words.as_deref(), config.as_deref()),
        Commands::Pattern { words, config } => cmd_pattern(words.as_deref(), config.as_deref()),
        Commands::Status { state, config } => cmd_status(&state, config.as_deref()),
        Commands::Toggle { value, state, config } => {
            cmd_toggle(&state, config.as_deref(), matches!(value, Switch::On))
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&str>) -> Result<EngineConfig, String> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path, e))?;
    EngineConfig::from_json(&content).map_err(|e| format!("Invalid config '{}': {}", path, e))
}

fn load_blocklist(config: &EngineConfig, words: Option<&str>) -> Result<Blocklist, String> {
    let mut blocklist = Blocklist::builtin();
    blocklist.extend(&config.extra_words);
    if let Some(path) = words {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read '{}': {}", path, e))?;
        let before = blocklist.len();
        blocklist.extend_from_list(&content);
        debug!("Loaded {} words from '{}'", blocklist.len() - before, path);
    }
    Ok(blocklist)
}

fn build_censor(words: Option<&str>, config: Option<&str>) -> Result<(Censor, EngineConfig), String> {
    let config = load_config(config)?;
    let blocklist = load_blocklist(&config, words)?;
    let censor = Censor::with_blocklist(&blocklist, &config).map_err(|e| e.to_string())?;
    Ok((censor, config))
}

fn cmd_censor(
    input: Option<&str>,
    words: Option<&str>,
    config: Option<&str>,
    state: Option<&str>,
) -> Result<(), String> {
    let (censor, config) = build_censor(words, config)?;

    let text = match input {
        Some(path) => fs::read_to_string(path).map_err(|e| format!("Failed to read '{}': {}", path, e))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("Failed to read stdin: {}", e))?;
            buf
        }
    };

    let enabled = stored_enabled(state, &config)?;
    let output = censor_output(&censor, &text, enabled);

    io::stdout()
        .write_all(output.as_bytes())
        .map_err(|e| format!("Failed to write stdout: {}", e))?;
    Ok(())
}

/// Enabled flag from the state file under the configured key. Without a state
/// file censoring is on.
fn stored_enabled(state: Option<&str>, config: &EngineConfig) -> Result<bool, String> {
    match state {
        Some(path) => Ok(jm_core::state::resolve_enabled(
            JsonFileStore::new(path, &config.storage_key).load()?,
        )),
        None => Ok(true),
    }
}

fn censor_output<'t>(censor: &Censor, text: &'t str, enabled: bool) -> Cow<'t, str> {
    if enabled {
        censor.apply(text)
    } else {
        debug!("Censoring disabled, passing input through");
        Cow::Borrowed(text)
    }
}

fn cmd_words(words: Option<&str>, config: Option<&str>) -> Result<(), String> {
    let config = load_config(config)?;
    let blocklist = load_blocklist(&config, words)?;
    for word in blocklist.words() {
        println!("{word}");
    }
    Ok(())
}

fn cmd_pattern(words: Option<&str>, config: Option<&str>) -> Result<(), String> {
    let (censor, _) = build_censor(words, config)?;
    let pattern = censor.pattern();
    if pattern.is_empty() {
        println!("(empty blocklist, never matches)");
    } else {
        println!("{}", pattern.as_str());
    }
    println!("  Words:  {}", pattern.len());
    Ok(())
}

fn cmd_status(state: &str, config: Option<&str>) -> Result<(), String> {
    let config = load_config(config)?;
    let store = JsonFileStore::new(state, &config.storage_key);
    let stored = store.load()?;
    let enabled = jm_core::state::resolve_enabled(stored);
    println!("Censoring: {}", if enabled { "on" } else { "off" });
    if stored.is_none() {
        println!("  (no flag stored in '{}', using default)", store.path().display());
    }
    Ok(())
}

fn cmd_toggle(state: &str, config: Option<&str>, enabled: bool) -> Result<(), String> {
    let config = load_config(config)?;
    let outcome = toggle_flag(state, &config, enabled)?;

    println!("Censoring: {}", if enabled { "on" } else { "off" });
    if outcome == ToggleOutcome::Dropped {
        debug!("No active page notified; pages pick up the flag on next load");
    }
    Ok(())
}

fn toggle_flag(state: &str, config: &EngineConfig, enabled: bool) -> Result<ToggleOutcome, String> {
    let store = JsonFileStore::new(state, &config.storage_key);
    let stored = store.load()?;
    let mut controller = ToggleController::activate(stored, store, NoActivePage);

    let outcome = controller.change(enabled);
    let persisted = controller.store().load()?;
    if persisted != Some(enabled) {
        return Err(format!("Failed to persist flag to '{}'", state));
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom_key_config() -> EngineConfig {
        EngineConfig::from_json(r#"{"storageKey": "myFlag"}"#).unwrap()
    }

    #[test]
    fn test_toggle_writes_configured_key_read_by_censor() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state.json");
        let state = state.to_str().unwrap();
        let config = custom_key_config();

        assert!(stored_enabled(Some(state), &config).unwrap());
        toggle_flag(state, &config, false).unwrap();
        assert!(!stored_enabled(Some(state), &config).unwrap());

        let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(state).unwrap()).unwrap();
        assert_eq!(saved["myFlag"], false);
        assert!(saved.get(jm_core::STORAGE_KEY).is_none());

        toggle_flag(state, &config, true).unwrap();
        assert!(stored_enabled(Some(state), &config).unwrap());
    }

    #[test]
    fn test_default_key_unaffected_by_custom_key_toggle() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state.json");
        let state = state.to_str().unwrap();

        toggle_flag(state, &custom_key_config(), false).unwrap();
        assert!(stored_enabled(Some(state), &EngineConfig::default()).unwrap());
    }

    #[test]
    fn test_censor_passes_through_when_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state.json");
        let state = state.to_str().unwrap();
        let config = EngineConfig::default();
        let censor = Censor::from_config(&config).unwrap();
        let text = "Send me the job offer";

        toggle_flag(state, &config, false).unwrap();
        let enabled = stored_enabled(Some(state), &config).unwrap();
        let output = censor_output(&censor, text, enabled);
        assert_eq!(output, text);
        assert!(matches!(output, Cow::Borrowed(_)));

        toggle_flag(state, &config, true).unwrap();
        let enabled = stored_enabled(Some(state), &config).unwrap();
        assert_eq!(censor_output(&censor, text, enabled), "Send me the j*b offer");
    }

    #[test]
    fn test_no_state_file_means_enabled() {
        assert!(stored_enabled(None, &custom_key_config()).unwrap());
    }
}
