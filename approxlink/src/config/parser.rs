//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use ini::{Ini, Properties};
use std::path::PathBuf;

use super::defaults::MAX_POLL_INTERVAL_MS;
use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [exchange] section
    if let Some(section) = ini.section(Some("exchange")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.exchange.directory = expand_tilde(v);
            }
        }
        let files = &mut config.exchange.files;
        for (key, slot) in [
            ("model_file", &mut files.model),
            ("data_definition_file", &mut files.data_definition),
            ("mapping_definition_file", &mut files.mapping_definition),
            ("input_file", &mut files.input),
            ("output_file", &mut files.output),
            ("busy_flag", &mut files.busy_flag),
            ("input_ready_flag", &mut files.input_ready_flag),
            ("output_ready_flag", &mut files.output_ready_flag),
            ("function_input_file", &mut files.function_input),
            ("function_output_file", &mut files.function_output),
        ] {
            if let Some(name) = parse_file_name(section, key)? {
                *slot = name;
            }
        }
    }

    // [protocol] section
    if let Some(section) = ini.section(Some("protocol")) {
        if let Some(v) = section.get("poll_interval_ms") {
            config.protocol.poll_interval_ms = v
                .trim()
                .parse()
                .ok()
                .filter(|ms| (1..=MAX_POLL_INTERVAL_MS).contains(ms))
                .ok_or_else(|| ConfigFileError::InvalidValue {
                    section: "protocol".to_string(),
                    key: "poll_interval_ms".to_string(),
                    value: v.to_string(),
                    reason: format!("must be between 1 and {} (milliseconds)", MAX_POLL_INTERVAL_MS),
                })?;
        }
        if let Some(v) = section.get("max_wait_attempts") {
            config.protocol.max_wait_attempts =
                v.trim().parse().map_err(|_| ConfigFileError::InvalidValue {
                    section: "protocol".to_string(),
                    key: "max_wait_attempts".to_string(),
                    value: v.to_string(),
                    reason: "must be a non-negative integer (0 = wait forever)".to_string(),
                })?;
        }
    }

    // [mapping] section
    if let Some(section) = ini.section(Some("mapping")) {
        if let Some(v) = section.get("enabled") {
            config.mapping.enabled = parse_bool(v);
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

/// File names are plain names inside the exchange directory.
fn parse_file_name(section: &Properties, key: &str) -> Result<Option<String>, ConfigFileError> {
    let Some(v) = section.get(key) else {
        return Ok(None);
    };
    let name = v.trim();
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(ConfigFileError::InvalidValue {
            section: "exchange".to_string(),
            key: key.to_string(),
            value: v.to_string(),
            reason: "must be a plain file name inside the exchange directory".to_string(),
        });
    }
    Ok(Some(name.to_string()))
}

/// Parse a boolean value from config.
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
