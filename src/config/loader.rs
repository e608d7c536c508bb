//! Configuration loading and environment parsing.

use super::validation::validate_config;
use super::Config;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix for nested field overrides, e.g. `REALM_TOKEN__TOKEN__TTL_SECS=600`.
pub const ENV_OVERRIDE_PREFIX: &str = "REALM_TOKEN__";
/// Comma-separated realm allow-list shortcut.
pub const ALLOWED_REALMS_ENV: &str = "REALM_TOKEN_ALLOWED_REALMS";
/// Default realm shortcut.
pub const DEFAULT_REALM_ENV: &str = "REALM_TOKEN_DEFAULT_REALM";

/// Load configuration with the following precedence (highest first):
/// 1) `REALM_TOKEN_CONFIG_JSON` env var containing raw JSON
/// 2) If `REALM_TOKEN_CONFIG_STDIN=true/1`, read JSON from stdin
/// 3) File pointed by `REALM_TOKEN_CONFIG_PATH` env var
/// 4) config.json in current working directory
/// 5) config.json next to the executable
/// 6) Defaults compiled into the binary
///
/// Environment overrides are applied last: `REALM_TOKEN__<SECTION>__<FIELD>`
/// for any field, plus [`ALLOWED_REALMS_ENV`] and [`DEFAULT_REALM_ENV`].
/// Read/parse problems are printed to stderr and the affected source is skipped.
///
/// Validation problems are reported but not propagated; `main` calls
/// [`validate_config`] again and fails hard.
#[must_use]
pub fn load() -> Config {
    use std::env;
    use std::io::Read;

    let defaults = Config::default();
    let mut merged =
        serde_json::to_value(&defaults).unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

    // Lowest precedence first so later merges win.
    if let Ok(exe_path) = env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            merge_file_source(&mut merged, &exe_dir.join("config.json"));
        }
    }

    merge_file_source(&mut merged, Path::new("config.json"));

    if let Ok(path) = env::var("REALM_TOKEN_CONFIG_PATH") {
        merge_file_source(&mut merged, &PathBuf::from(path));
    }

    if env::var("REALM_TOKEN_CONFIG_STDIN").is_ok_and(|val| env_var_truthy(&val)) {
        let mut buf = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
            eprintln!("Failed to read config from stdin: {e}");
        } else if let Some(value) = parse_json_document(&buf, "stdin") {
            merge_values(&mut merged, value);
        }
    }

    if let Ok(json) = env::var("REALM_TOKEN_CONFIG_JSON") {
        if let Some(value) = parse_json_document(&json, "REALM_TOKEN_CONFIG_JSON") {
            merge_values(&mut merged, value);
        }
    }

    apply_env_overrides(&mut merged, env::vars());

    let config = match serde_json::from_value::<Config>(merged) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to deserialize config; using defaults: {e}");
            defaults
        }
    };

    if let Err(e) = validate_config(&config) {
        eprintln!("Configuration validation error: {e}");
    }

    config
}

fn parse_json_document(raw: &str, label: &str) -> Option<Value> {
    if raw.trim().is_empty() {
        return None;
    }

    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            eprintln!("Failed to parse config from {label}: {err}");
            None
        }
    }
}

fn merge_file_source(target: &mut Value, path: &Path) {
    if path.as_os_str().is_empty() || !path.exists() {
        return;
    }

    match fs::read_to_string(path) {
        Ok(contents) => {
            if let Some(value) = parse_json_document(&contents, &format!("file {}", path.display()))
            {
                merge_values(target, value);
            }
        }
        Err(err) => {
            eprintln!("Failed to read config from {}: {}", path.display(), err);
        }
    }
}

/// Deep-merge `source` into `target`; objects merge key by key, anything else replaces.
pub fn merge_values(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target_map), Value::Object(source_map)) => {
            for (key, value) in source_map {
                match target_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        target_map.insert(key, value);
                    }
                }
            }
        }
        (target_slot, source_value) => {
            *target_slot = source_value;
        }
    }
}

/// Apply environment overrides from an explicit variable list.
pub fn apply_env_overrides<I>(root: &mut Value, vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut shortcuts = Vec::new();

    for (key, raw_value) in vars {
        match key.as_str() {
            ALLOWED_REALMS_ENV => {
                shortcuts.push((["realms", "allowed"], Value::String(raw_value)));
                continue;
            }
            DEFAULT_REALM_ENV => {
                shortcuts.push((
                    ["realms", "default_realm"],
                    Value::String(raw_value.trim().to_string()),
                ));
                continue;
            }
            _ => {}
        }

        let Some(stripped) = key.strip_prefix(ENV_OVERRIDE_PREFIX) else {
            continue;
        };

        let segments: Vec<String> = stripped
            .split("__")
            .filter(|segment| !segment.is_empty())
            .map(str::to_ascii_lowercase)
            .collect();

        if segments.is_empty() {
            continue;
        }

        set_nested_value(root, &segments, parse_env_value(&raw_value));
    }

    // Dedicated realm variables beat the generic nested form.
    for (path, value) in shortcuts {
        let segments: Vec<String> = path.iter().map(|s| (*s).to_string()).collect();
        set_nested_value(root, &segments, value);
    }
}

fn env_var_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

fn parse_env_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.contains(',') {
        let items = trimmed
            .split(',')
            .map(|segment| parse_scalar(segment.trim()))
            .collect::<Vec<_>>();
        return Value::Array(items);
    }

    parse_scalar(trimmed)
}

fn parse_scalar(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::String(String::new());
    }

    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn set_nested_value(target: &mut Value, segments: &[String], value: Value) {
    let Some((first, rest)) = segments.split_first() else {
        *target = value;
        return;
    };

    let map = ensure_object(target);
    if rest.is_empty() {
        map.insert(first.clone(), value);
        return;
    }

    let entry = map
        .entry(first.clone())
        .or_insert_with(|| Value::Object(serde_json::Map::new()));
    set_nested_value(entry, rest, value);
}

fn ensure_object(value: &mut Value) -> &mut serde_json::Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(serde_json::Map::new());
    }

    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was coerced into an object above"),
    }
}
