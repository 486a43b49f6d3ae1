//! Sinks: output devices that decode the bit stream they receive.

use crate::bit::Bit;
use crate::id::SinkId;
use crate::io::{self, IoFormat};
use serde::{Deserialize, Serialize};

/// A `!` cell. Consumes bits and turns them into output tokens.
///
/// In `Raw` format every bit is its own token and is flushed on arrival.
/// In the unary formats a `0` bit terminates the current token; the final
/// halt flush emits whatever is buffered, so a trailing unterminated field
/// (including an empty one, which decodes to `0`) is never lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sink {
    pub id: SinkId,
    pub x: i32,
    pub y: i32,
    pub format: IoFormat,
    /// Digits of the token currently being assembled.
    buffer: String,
    /// Completed tokens in emission order.
    tokens: Vec<i64>,
}

impl Sink {
    pub fn new(id: SinkId, x: i32, y: i32, format: IoFormat) -> Self {
        Self {
            id,
            x,
            y,
            format,
            buffer: String::new(),
            tokens: Vec::new(),
        }
    }

    /// Consume one bit that landed on this cell.
    pub fn receive(&mut self, bit: &Bit) {
        match self.format {
            IoFormat::Raw => {
                self.buffer.push(bit.digit());
                self.flush();
            }
            IoFormat::Unsigned => {
                if bit.value {
                    self.buffer.push('1');
                } else {
                    self.flush();
                }
            }
            IoFormat::Signed => {
                // The first digit of a token is the sign flag and is
                // buffered unconditionally; later 0s terminate the token.
                if bit.value || self.buffer.is_empty() {
                    self.buffer.push(bit.digit());
                } else {
                    self.flush();
                }
            }
        }
    }

    /// Emit the buffered token and reset the buffer. Called once more when
    /// the program halts; for `Raw` the buffer is empty by then and nothing
    /// is emitted, while the unary formats decode the pending (possibly
    /// empty) run.
    pub fn flush(&mut self) {
        match self.format {
            IoFormat::Raw => {
                for c in self.buffer.chars() {
                    self.tokens.push(if c == '1' { 1 } else { 0 });
                }
            }
            IoFormat::Unsigned => self.tokens.push(io::decode_unsigned(&self.buffer)),
            IoFormat::Signed => self.tokens.push(io::decode_signed(&self.buffer)),
        }
        self.buffer.clear();
    }

    /// Completed output tokens, oldest first.
    pub fn tokens(&self) -> &[i64] {
        &self.tokens
    }

    /// The output rendered the way a front end shows it: concatenated
    /// digits for `Raw`, comma-separated integers otherwise.
    pub fn text(&self) -> String {
        match self.format {
            IoFormat::Raw => self.tokens.iter().map(|t| t.to_string()).collect(),
            IoFormat::Unsigned | IoFormat::Signed => self
                .tokens
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}
