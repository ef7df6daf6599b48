//! The cleanup command: read exports, run the engine, write the result.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, info};
use vaultclean_recon::{run, CleanupConfig, CleanupInput, VaultDocument, VaultError};

use crate::report::write_summary;
use crate::{Cli, CliError};

const EXPORT_HINT: &str = "export the vault as unencrypted JSON";

pub fn cmd_clean(cli: Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_deref())?;

    let mut personal = read_export(&cli.personal)?;
    let org = match cli.org.as_deref() {
        Some(path) => read_export(path)?.items().map_err(|e| parse_err(path, e))?,
        None => Vec::new(),
    };

    let input = CleanupInput {
        personal: personal.items().map_err(|e| parse_err(&cli.personal, e))?,
        folders: personal.folders().map_err(|e| parse_err(&cli.personal, e))?,
        org,
    };
    info!(
        personal = input.personal.len(),
        folders = input.folders.len(),
        org = input.org.len(),
        "loaded exports"
    );

    let outcome = run(&config, input).map_err(|e| CliError::general(e.to_string()))?;
    let report = outcome.report;

    if cli.dry_run {
        if !cli.quiet {
            eprintln!("dry run: no file written");
        }
    } else {
        let path = cli
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&cli.personal, Local::now()));
        personal.set_items(outcome.items);
        let text = personal
            .to_json_pretty()
            .map_err(|e| CliError::general(format!("cannot serialize cleaned export: {e}")))?;
        std::fs::write(&path, text)
            .map_err(|e| CliError::output(format!("cannot write {}: {e}", path.display())))?;
        if !cli.quiet {
            eprintln!("wrote {}", path.display());
        }
    }

    if cli.json {
        let json_str = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    // Human summary to stderr
    if !cli.quiet {
        let stderr = io::stderr();
        let mut handle = stderr.lock();
        write_summary(&mut handle, &report)
            .and_then(|()| handle.flush())
            .map_err(|e| CliError::general(e.to_string()))?;
    }

    Ok(())
}

fn read_export(path: &Path) -> Result<VaultDocument, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        CliError::input_read(format!("cannot read {}: {e}", path.display()))
    })?;
    let doc = VaultDocument::from_json(&text).map_err(|e| parse_err(path, e))?;
    if doc.is_encrypted() {
        return Err(CliError::input_parse(format!(
            "{} is an encrypted export",
            path.display()
        ))
        .with_hint(EXPORT_HINT));
    }
    Ok(doc)
}

fn parse_err(path: &Path, err: VaultError) -> CliError {
    CliError::input_parse(format!("{}: {err}", path.display())).with_hint(EXPORT_HINT)
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vaultclean").join("config.toml"))
}

/// An explicit path must exist; the default location is optional.
fn load_config(explicit: Option<&Path>) -> Result<CleanupConfig, CliError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path().filter(|p| p.is_file()) {
            Some(path) => path,
            None => {
                debug!("no config file, using defaults");
                return Ok(CleanupConfig::default());
            }
        },
    };

    let text = std::fs::read_to_string(&path)
        .map_err(|e| CliError::config(format!("cannot read config {}: {e}", path.display())))?;
    let config = CleanupConfig::from_toml(&text)
        .map_err(|e| CliError::config(format!("{}: {e}", path.display())))?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// `<dir>/<stem>_cleaned_up_<YYYYmmdd_HHMMSS>.json`, next to the personal export.
fn default_output_path(personal: &Path, now: DateTime<Local>) -> PathBuf {
    let stem = personal
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "vault".to_string());
    let name = format!("{stem}_cleaned_up_{}.json", now.format("%Y%m%d_%H%M%S"));
    match personal.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}
