use std::collections::VecDeque;

/// Byte accumulator that re-delimits an arbitrarily-chunked stream into lines.
///
/// Owned by exactly one reframing task. Complete lines (up to `\n`) are
/// drained as they become available; the unterminated tail stays buffered
/// until the next chunk arrives or the stream closes. Bytes are decoded only
/// once a full line is known, so a UTF-8 sequence split across two network
/// reads is reassembled before decoding.
pub struct TailBuffer {
    buffer: VecDeque<u8>,
}

impl TailBuffer {
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
        }
    }

    /// Append an upstream chunk.
    pub fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend(bytes);
    }

    /// Drain the next complete line, trimmed. Returns `None` while the
    /// buffered bytes contain no `\n`.
    ///
    /// Invalid UTF-8 is decoded lossily: one garbled line must not abort an
    /// otherwise-healthy stream.
    pub fn next_line(&mut self) -> Option<String> {
        let newline_pos = self.buffer.iter().position(|&b| b == b'\n')?;
        let line_bytes: Vec<u8> = self.buffer.drain(..=newline_pos).collect();
        Some(String::from_utf8_lossy(&line_bytes).trim().to_string())
    }

    /// Drain whatever tail never received a terminating newline. `None` if
    /// the remainder is empty after trimming.
    pub fn take_remainder(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest: Vec<u8> = self.buffer.drain(..).collect();
        let rest = String::from_utf8_lossy(&rest).trim().to_string();
        if rest.is_empty() {
            None
        } else {
            Some(rest)
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for TailBuffer {
    fn default() -> Self {
        Self::new()
    }
}
