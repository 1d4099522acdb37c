//! Configuration loading
//!
//! Files are merged table by table: keys in `berth.toml` replace the same
//! keys from the user config, untouched keys keep the lower layer's value.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{BerthError, BerthResult};

use super::env_validator::{levenshtein, EnvVarValidator};
use super::types::{Config, MANIFEST_FILE};

/// User config file name inside the berth config directory
pub const USER_CONFIG_FILE: &str = "config.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> BerthResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;
    parse_with_warnings(&content, path)
}

fn parse_with_warnings(content: &str, path: &Path) -> BerthResult<(Config, Vec<ConfigWarning>)> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| BerthError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Read one layer: validated for warnings, returned as a raw table for merging.
fn read_layer(path: &Path) -> BerthResult<Option<(toml::Table, Vec<ConfigWarning>)>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let (_, warnings) = parse_with_warnings(&content, path)?;
    let table = content.parse::<toml::Table>().map_err(|e| BerthError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;
    tracing::debug!(path = %path.display(), warnings = warnings.len(), "config layer loaded");
    Ok(Some((table, warnings)))
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// User config, then `<project_root>/berth.toml`. Missing files are skipped.
pub fn load_layered(
    project_root: &Path,
    user_config_dir: Option<PathBuf>,
) -> BerthResult<(Config, Vec<ConfigWarning>)> {
    let mut layers = Vec::new();
    if let Some(dir) = user_config_dir {
        layers.push(dir.join(USER_CONFIG_FILE));
    }
    let manifest = project_root.join(MANIFEST_FILE);
    layers.push(manifest.clone());

    let mut merged = toml::Table::new();
    let mut warnings = Vec::new();
    for layer in &layers {
        if let Some((table, layer_warnings)) = read_layer(layer)? {
            merge_tables(&mut merged, table);
            warnings.extend(layer_warnings);
        }
    }

    let config = Config::deserialize(toml::Value::Table(merged)).map_err(|e| {
        BerthError::Config {
            file: manifest,
            message: e.to_string(),
        }
    })?;

    Ok((config, warnings))
}

/// Apply environment variable overrides (BERTH_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    with_env_overrides_from(config, |name| std::env::var(name).ok(), &mut std::io::stderr())
}

const BOOL_VALUES: &[&str] = &["true", "false", "1", "0", "yes", "no", "on", "off"];

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Env override core with an injectable lookup and warning writer.
pub fn with_env_overrides_from<F, W>(mut config: Config, lookup: F, writer: &mut W) -> Config
where
    F: Fn(&str) -> Option<String>,
    W: Write,
{
    if let Some(port) = lookup("BERTH_PORT") {
        config.runtime.port = EnvVarValidator::new("BERTH_PORT", &["<1-65535>"]).parse_with_writer(
            &port,
            |s| s.trim().parse::<u16>().ok().filter(|p| *p != 0),
            config.runtime.port,
            writer,
        );
    }

    if let Some(interpreter) = lookup("BERTH_INTERPRETER") {
        if !interpreter.trim().is_empty() {
            config.runtime.interpreter = interpreter.trim().to_string();
        }
    }

    if let Some(index) = lookup("BERTH_INDEX") {
        if !index.trim().is_empty() {
            config.build.index = PathBuf::from(index.trim());
        }
    }

    if let Some(value) = lookup("BERTH_UNBUFFERED") {
        config.env.unbuffered = EnvVarValidator::new("BERTH_UNBUFFERED", BOOL_VALUES)
            .parse_with_writer(&value, parse_bool, config.env.unbuffered, writer);
    }

    if let Some(value) = lookup("BERTH_NO_CACHE") {
        config.env.no_cache = EnvVarValidator::new("BERTH_NO_CACHE", BOOL_VALUES)
            .parse_with_writer(&value, parse_bool, config.env.no_cache, writer);
    }

    if let Some(value) = lookup("BERTH_STARTUP_TIMEOUT") {
        config.runtime.startup_timeout_secs =
            EnvVarValidator::new("BERTH_STARTUP_TIMEOUT", &["<seconds>"]).parse_with_writer(
                &value,
                |s| s.trim().trim_end_matches('s').parse::<u64>().ok(),
                config.runtime.startup_timeout_secs,
                writer,
            );
    }

    config
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "project",
        "name",
        "dependencies",
        "build",
        "index",
        "lock",
        "source",
        "output",
        "tooling",
        "runtime",
        "module",
        "port",
        "interpreter",
        "startup_timeout_secs",
        "env",
        "unbuffered",
        "no_cache",
    ];

    CANDIDATES
        .iter()
        .map(|candidate| (candidate, levenshtein(unknown, candidate)))
        .min_by_key(|(_, dist)| *dist)
        .filter(|(_, dist)| *dist <= 2)
        .map(|(candidate, _)| candidate.to_string())
}
