//! # Document Loading
//!
//! Reads configuration text (JSON or YAML) into the generic
//! `serde_json::Value` tree that [`SimulationConfig::from_value`]
//! validates. YAML documents are converted into the JSON value model so a
//! single set of validators serves both formats.

use std::path::{Path, PathBuf};

use emsim_core::ConfigError;
use serde_json::Value;
use thiserror::Error;

use crate::config::SimulationConfig;

/// Text format of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Pick a format from a file extension: `.yaml`/`.yml` is YAML,
    /// anything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Errors from loading a configuration file.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The text is not a well-formed document.
    #[error("failed to parse {format:?} document: {reason}")]
    Parse {
        format: DocumentFormat,
        reason: String,
    },

    /// The document parsed but failed validation.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] ConfigError),
}

/// Parse document text into a generic tree.
pub fn parse_document(text: &str, format: DocumentFormat) -> Result<Value, LoadError> {
    match format {
        DocumentFormat::Json => serde_json::from_str(text).map_err(|e| LoadError::Parse {
            format,
            reason: e.to_string(),
        }),
        DocumentFormat::Yaml => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(text).map_err(|e| LoadError::Parse {
                format,
                reason: e.to_string(),
            })?;
            yaml_to_json_value(&yaml).map_err(|reason| LoadError::Parse { format, reason })
        }
    }
}

/// Read, parse and validate the document at `path`.
///
/// `format` overrides the format inferred from the extension.
pub fn load_config(path: &Path, format: Option<DocumentFormat>) -> Result<SimulationConfig, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let format = format.unwrap_or_else(|| DocumentFormat::from_path(path));
    let document = parse_document(&text, format)?;
    tracing::debug!(path = %path.display(), ?format, "parsed configuration document");
    Ok(SimulationConfig::from_value(&document)?)
}

/// Convert a `serde_yaml::Value` into a `serde_json::Value`.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::from(u))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent {f} as a configuration number"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => seq
            .iter()
            .map(yaml_to_json_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_yaml::Value::Mapping(map) => {
            let mut object = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    other => return Err(format!("configuration keys must be strings, found {other:?}")),
                };
                object.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(object))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}
