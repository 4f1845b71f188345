//! Console adapter for the interactive session
//!
//! Input is token-based: a token is any run of non-whitespace characters, so
//! answers can be typed one per line or several on one line. Output is plain
//! text; prompts are written without a trailing newline, and pending output is
//! flushed before each read so it shows up before the user types.

use crate::types::AtmError;
use std::collections::VecDeque;
use std::io::{BufRead, Write};

/// Token reader and line writer over a pair of streams
pub struct Console<R, W> {
    input: R,
    output: W,
    pending: VecDeque<String>,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Console {
            input,
            output,
            pending: VecDeque::new(),
        }
    }

    /// Read the next whitespace-separated token
    ///
    /// # Returns
    ///
    /// * `Ok(Some(token))` - The next token
    /// * `Ok(None)` - End of input
    /// * `Err(AtmError::Io)` - The input stream failed
    pub fn next_token(&mut self) -> Result<Option<String>, AtmError> {
        if self.pending.is_empty() {
            self.output.flush()?;
        }
        while self.pending.is_empty() {
            // Raw bytes: a line that is not UTF-8 becomes a token that fails
            // to parse, not a stream error.
            let mut line = Vec::new();
            if self.input.read_until(b'\n', &mut line)? == 0 {
                return Ok(None);
            }
            self.pending.extend(
                String::from_utf8_lossy(&line)
                    .split_whitespace()
                    .map(str::to_string),
            );
        }
        Ok(self.pending.pop_front())
    }

    /// Write `text` without a newline
    ///
    /// Output is flushed before every blocking read, so the prompt is visible
    /// by the time input is awaited.
    pub fn prompt(&mut self, text: &str) -> Result<(), AtmError> {
        write!(self.output, "{}", text)?;
        Ok(())
    }

    /// Write `text` followed by a newline
    pub fn line(&mut self, text: &str) -> Result<(), AtmError> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), AtmError> {
        self.output.flush()?;
        Ok(())
    }
}
