//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! Produces the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let files = &config.exchange.files;
    format!(
        r#"[exchange]
; Directory shared by client and server. Both sides must point at the same path.
; Created on first use. Default: ~/.approxlink/exchange
directory = {}
; File names inside the exchange directory. Change them only if the other
; party uses different names; every name can be changed independently.
model_file = {}
data_definition_file = {}
mapping_definition_file = {}
input_file = {}
output_file = {}
busy_flag = {}
input_ready_flag = {}
output_ready_flag = {}
function_input_file = {}
function_output_file = {}

[protocol]
; Milliseconds between flag checks (default: 50, range 1-60000)
; A server in the same process wakes the client immediately regardless.
poll_interval_ms = {}
; Polls before a client reports a protocol error (default: 0 = wait forever)
max_wait_attempts = {}

[mapping]
; Evaluate in reduced space through mapping_definition and the data
; definition (default: false)
enabled = {}

[logging]
; Log file path (default: ~/.approxlink/approxlink.log)
file = {}
"#,
        path_to_string(&config.exchange.directory),
        files.model,
        files.data_definition,
        files.mapping_definition,
        files.input,
        files.output,
        files.busy_flag,
        files.input_ready_flag,
        files.output_ready_flag,
        files.function_input,
        files.function_output,
        config.protocol.poll_interval_ms,
        config.protocol.max_wait_attempts,
        config.mapping.enabled,
        path_to_string(&config.logging.file),
    )
}

/// Convert path to string, collapsing home dir to ~.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");

        let mut config = ConfigFile::default();
        config.exchange.directory = temp_dir.path().join("exchange");
        config.exchange.files.output_ready_flag = "done".to_string();
        config.protocol.poll_interval_ms = 20;
        config.protocol.max_wait_attempts = 1000;
        config.mapping.enabled = true;

        config.save_to(&config_path).unwrap();

        let loaded = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_defaults_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.ini");

        ConfigFile::default().save_to(&config_path).unwrap();

        assert_eq!(
            ConfigFile::load_from(&config_path).unwrap(),
            ConfigFile::default()
        );
    }

    #[test]
    fn test_written_file_is_commented() {
        let text = to_config_string(&ConfigFile::default());
        assert!(text.contains("[exchange]"));
        assert!(text.contains("input_file = neural_input"));
        assert!(text.contains("; Polls before a client reports a protocol error"));
    }

    #[test]
    fn test_path_outside_home_is_kept() {
        assert_eq!(
            path_to_string(&PathBuf::from("/var/lib/approxlink")),
            "/var/lib/approxlink"
        );
    }
}
