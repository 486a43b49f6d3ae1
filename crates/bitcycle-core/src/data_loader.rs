//! Program loading from JSON.
//!
//! Feature-gated behind `data-loader`. Deserializes the full load-time
//! parameter set (program body, input lines, I/O format, expand flag, and
//! optional speed hints) from a JSON document.

use crate::grid::ProgramSpec;
use crate::io::{InputError, IoFormat};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during program data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
    #[error("bad program data: {0}")]
    Input(#[from] InputError),
}

// ---------------------------------------------------------------------------
// JSON data structures
// ---------------------------------------------------------------------------

/// Top-level program description for JSON deserialization.
#[derive(Debug, serde::Deserialize)]
pub struct ProgramData {
    /// Program body as one string; split on line breaks.
    pub code: String,
    /// One raw input line per source, in reading order.
    #[serde(default)]
    pub inputs: Vec<String>,
    /// I/O format name: "raw", "unsigned", or "signed". Defaults to raw.
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub expand: bool,
    /// Speed hints for the driver; the engine itself ignores them.
    #[serde(default)]
    pub ticks_per_second: Option<u32>,
    #[serde(default)]
    pub frames_per_tick: Option<u32>,
}

impl ProgramData {
    /// Convert into the engine's load-time spec.
    pub fn to_spec(&self) -> Result<ProgramSpec, InputError> {
        let format = match &self.format {
            Some(name) => IoFormat::parse(name)?,
            None => IoFormat::Raw,
        };
        Ok(ProgramSpec {
            code: self.code.lines().map(str::to_string).collect(),
            inputs: self.inputs.clone(),
            format,
            expand: self.expand,
        })
    }
}

/// Parse a JSON program description.
pub fn load_program_json(json: &str) -> Result<ProgramData, DataLoadError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_document_defaults_to_raw() {
        let data = load_program_json(r#"{"code": "?>!"}"#).unwrap();
        let spec = data.to_spec().unwrap();
        assert_eq!(spec.code, vec!["?>!"]);
        assert_eq!(spec.format, IoFormat::Raw);
        assert!(!spec.expand);
        assert!(spec.inputs.is_empty());
    }

    #[test]
    fn full_document_round_trips() {
        let data = load_program_json(
            r#"{
                "code": "?>v\n  !",
                "inputs": ["3,2"],
                "format": "unsigned",
                "expand": true,
                "ticks_per_second": 30,
                "frames_per_tick": 4
            }"#,
        )
        .unwrap();
        let spec = data.to_spec().unwrap();
        assert_eq!(spec.code.len(), 2);
        assert_eq!(spec.format, IoFormat::Unsigned);
        assert!(spec.expand);
        assert_eq!(data.ticks_per_second, Some(30));
        assert_eq!(data.frames_per_tick, Some(4));
    }

    #[test]
    fn unknown_format_is_rejected() {
        let data = load_program_json(r#"{"code": "!", "format": "octal"}"#).unwrap();
        assert!(matches!(
            data.to_spec(),
            Err(InputError::UnknownFormat { .. })
        ));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            load_program_json("{code:"),
            Err(DataLoadError::JsonParse(_))
        ));
    }
}
