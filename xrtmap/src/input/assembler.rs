//! Reassembles control-channel chunks into lines.
//!
//! The control channel is read in fixed-size chunks, so a line can be split
//! across two reads or several lines can share one. The assembler keeps the
//! unterminated tail between calls and hands back only complete lines.

use tracing::warn;

/// Buffers partial lines between control-channel reads.
#[derive(Debug)]
pub struct LineAssembler {
    pending: Vec<u8>,
    max_line_len: usize,
}

impl LineAssembler {
    /// Create an assembler that drops partial lines longer than `max_line_len`.
    pub fn new(max_line_len: usize) -> Self {
        Self {
            pending: Vec::new(),
            max_line_len,
        }
    }

    /// Feed a chunk and return every line it completes.
    ///
    /// Lines are returned without their terminator. Blank lines are skipped
    /// and invalid UTF-8 is replaced rather than rejected.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.pending[start..].iter().position(|&b| b == b'\n') {
            let end = start + offset;
            let line = String::from_utf8_lossy(&self.pending[start..end]);
            let line = line.trim();
            if !line.is_empty() {
                lines.push(line.to_string());
            }
            start = end + 1;
        }
        self.pending.drain(..start);

        if self.pending.len() > self.max_line_len {
            warn!(
                bytes = self.pending.len(),
                limit = self.max_line_len,
                "Discarding oversized control line"
            );
            self.pending.clear();
        }

        lines
    }

    /// Bytes held back waiting for a newline.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
