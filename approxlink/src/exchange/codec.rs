//! Vector codec collaborator and the default plain-text codec.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::error::ExchangeError;

/// Encodes and decodes whole vectors to files.
///
/// The protocol only relies on two properties: `load` reports a missing
/// file as `NotFound` and an undecodable one as `Corrupt`, and `save`
/// replaces the target file whole.
pub trait VectorCodec: Send + Sync {
    /// Read the vector stored at `path`.
    fn load(&self, path: &Path) -> Result<Vec<f64>, ExchangeError>;

    /// Store `vector` at `path`, replacing any previous content.
    fn save(&self, vector: &[f64], path: &Path) -> Result<(), ExchangeError>;
}

/// Plain-text codec: one number per line.
///
/// Blank lines and lines starting with `#` are ignored on load, so files
/// written by hand or by another language's tooling stay readable.
///
/// ```
/// use approxlink::exchange::{TextVectorCodec, VectorCodec};
///
/// let temp = tempfile::TempDir::new().unwrap();
/// let path = temp.path().join("neural_input");
///
/// TextVectorCodec.save(&[1.5, -2.0], &path).unwrap();
/// assert_eq!(std::fs::read_to_string(&path).unwrap(), "1.5\n-2\n");
/// assert_eq!(TextVectorCodec.load(&path).unwrap(), vec![1.5, -2.0]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextVectorCodec;

impl VectorCodec for TextVectorCodec {
    fn load(&self, path: &Path) -> Result<Vec<f64>, ExchangeError> {
        let text = fs::read_to_string(path).map_err(|e| ExchangeError::io(path, e))?;
        parse_vector(&text).map_err(|reason| ExchangeError::corrupt(path, reason))
    }

    fn save(&self, vector: &[f64], path: &Path) -> Result<(), ExchangeError> {
        let mut text = String::with_capacity(vector.len() * 12);
        for value in vector {
            text.push_str(&value.to_string());
            text.push('\n');
        }
        replace_file(path, text.as_bytes()).map_err(|e| ExchangeError::io(path, e))
    }
}

fn parse_vector(text: &str) -> Result<Vec<f64>, String> {
    text.lines()
        .enumerate()
        .map(|(n, line)| (n + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(n, line)| {
            line.parse::<f64>()
                .map_err(|e| format!("line {}: '{}' is not a number ({})", n, line, e))
        })
        .collect()
}

/// Replace `path` with `contents` via a sibling temp file and a rename.
///
/// Readers see either the old file or the complete new one.
pub fn replace_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    let temp_path = temp_path_for(path);
    fs::write(&temp_path, contents)?;
    fs::rename(&temp_path, path).inspect_err(|_| {
        let _ = fs::remove_file(&temp_path);
    })
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
