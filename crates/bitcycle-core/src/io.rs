//! I/O formats and the numeric encodings behind them.
//!
//! Sources encode their input line into a bit stream at load time; sinks
//! decode the bit stream they receive back into tokens. `Unsigned` is plain
//! unary (`n` ones), `Signed` is unary with a leading `0` sign digit for
//! non-positive values, and `Raw` passes binary digits through untouched.

use serde::{Deserialize, Serialize};

/// How source input strings and sink output streams are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IoFormat {
    /// Binary digits in, binary digits out. No framing.
    Raw,
    /// Comma-separated non-negative integers as unary runs joined by `0`.
    Unsigned,
    /// Comma-separated integers; non-positive values carry a leading `0`.
    Signed,
}

impl IoFormat {
    /// Parse a format name as given on the command line or in program data.
    pub fn parse(name: &str) -> Result<Self, InputError> {
        match name {
            "raw" => Ok(IoFormat::Raw),
            "unsigned" => Ok(IoFormat::Unsigned),
            "signed" => Ok(IoFormat::Signed),
            _ => Err(InputError::UnknownFormat {
                name: name.to_string(),
            }),
        }
    }

    /// The canonical name for this format.
    pub fn name(self) -> &'static str {
        match self {
            IoFormat::Raw => "raw",
            IoFormat::Unsigned => "unsigned",
            IoFormat::Signed => "signed",
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised while interpreting source input strings. Malformed numeric
/// input is rejected at load time rather than silently coerced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("input field {field} ({text:?}) is not an integer")]
    BadInteger { field: usize, text: String },
    #[error("raw input may only contain 0 and 1, found {found:?}")]
    BadBit { found: char },
    #[error("unknown I/O format {name:?} (expected raw, unsigned, or signed)")]
    UnknownFormat { name: String },
}

// ---------------------------------------------------------------------------
// Encoding (input string -> bit stream)
// ---------------------------------------------------------------------------

/// Encode one integer as an unsigned unary run.
pub fn encode_unsigned(n: i64) -> String {
    "1".repeat(n.unsigned_abs() as usize)
}

/// Encode one integer as signed unary: non-positive values get a leading
/// `0` sign digit, positive values are a bare run of ones.
pub fn encode_signed(n: i64) -> String {
    if n <= 0 {
        let mut s = String::with_capacity(1 + n.unsigned_abs() as usize);
        s.push('0');
        s.push_str(&"1".repeat(n.unsigned_abs() as usize));
        s
    } else {
        "1".repeat(n as usize)
    }
}

/// Encode an input string into the bit stream a source will emit.
///
/// For `Raw` the string is taken literally. For the unary formats each
/// comma-separated field is encoded and the fields are joined by a single
/// `0` separator. An empty input string yields an empty stream; an empty
/// *field* inside a non-empty list is an error.
pub fn encode_input(input: &str, format: IoFormat) -> Result<Vec<bool>, InputError> {
    let digits = match format {
        IoFormat::Raw => {
            for c in input.chars() {
                if c != '0' && c != '1' {
                    return Err(InputError::BadBit { found: c });
                }
            }
            input.to_string()
        }
        IoFormat::Unsigned | IoFormat::Signed => {
            if input.is_empty() {
                String::new()
            } else {
                let fields = parse_fields(input)?;
                let encode = match format {
                    IoFormat::Unsigned => encode_unsigned,
                    _ => encode_signed,
                };
                fields
                    .into_iter()
                    .map(encode)
                    .collect::<Vec<_>>()
                    .join("0")
            }
        }
    };
    Ok(digits.chars().map(|c| c == '1').collect())
}

/// Parse a comma-separated integer list, failing fast on malformed fields.
pub fn parse_fields(input: &str) -> Result<Vec<i64>, InputError> {
    input
        .split(',')
        .enumerate()
        .map(|(i, field)| {
            field
                .trim()
                .parse::<i64>()
                .map_err(|_| InputError::BadInteger {
                    field: i,
                    text: field.to_string(),
                })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Decoding (unary buffer -> integer)
// ---------------------------------------------------------------------------

/// Decode an unsigned unary buffer: the token is the run length.
pub fn decode_unsigned(buffer: &str) -> i64 {
    buffer.len() as i64
}

/// Decode a signed unary buffer: a leading `0` marks a non-positive value
/// whose magnitude is the remaining run length.
pub fn decode_signed(buffer: &str) -> i64 {
    if buffer.starts_with('0') {
        -((buffer.len() - 1) as i64)
    } else {
        buffer.len() as i64
    }
}
